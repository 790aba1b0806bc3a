//! Error types surfaced by the lane pipeline.
//!
//! Every failure here is a configuration or caller-side precondition
//! violation; nothing in the pipeline is transient or retried.

/// Failures while deriving or applying projective transforms.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryError {
    /// Two ROI corners coincide.
    DuplicateCorners { first: &'static str, second: &'static str },
    /// Three ROI corners lie on one line.
    CollinearCorners { corners: [&'static str; 3] },
    /// The correspondence system or the matrix itself could not be inverted.
    Singular { what: &'static str },
    /// A corner or canvas extent is NaN or infinite.
    NonFinite { what: &'static str },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::DuplicateCorners { first, second } => {
                write!(f, "degenerate ROI: corners {first} and {second} coincide")
            }
            GeometryError::CollinearCorners { corners } => write!(
                f,
                "degenerate ROI: corners {}, {} and {} are collinear",
                corners[0], corners[1], corners[2]
            ),
            GeometryError::Singular { what } => write!(f, "singular {what}"),
            GeometryError::NonFinite { what } => write!(f, "non-finite {what}"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Inputs or parameters that violate a documented precondition.
#[derive(Clone, Debug, PartialEq)]
pub enum PreconditionError {
    /// Frame size differs from the configured source size.
    FrameSize {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// Pixel buffer length does not match the declared frame size.
    BufferLength { expected: usize, got: usize },
    /// A configuration value is outside its valid range.
    InvalidParam { name: &'static str, reason: String },
    /// Sliding window with zero width or height.
    EmptyWindow { width: u32, height: u32 },
    /// Mask with zero width or height.
    EmptyMask,
}

impl std::fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreconditionError::FrameSize { expected, got } => write!(
                f,
                "frame size {}x{} does not match configured {}x{}",
                got.0, got.1, expected.0, expected.1
            ),
            PreconditionError::BufferLength { expected, got } => {
                write!(f, "pixel buffer holds {got} pixels, expected {expected}")
            }
            PreconditionError::InvalidParam { name, reason } => {
                write!(f, "invalid parameter `{name}`: {reason}")
            }
            PreconditionError::EmptyWindow { width, height } => {
                write!(f, "sliding window must be non-empty (got {width}x{height})")
            }
            PreconditionError::EmptyMask => write!(f, "mask must be non-empty"),
        }
    }
}

impl std::error::Error for PreconditionError {}

/// Umbrella error returned by the high-level detector API.
#[derive(Clone, Debug, PartialEq)]
pub enum LaneError {
    Geometry(GeometryError),
    Precondition(PreconditionError),
}

impl std::fmt::Display for LaneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaneError::Geometry(e) => write!(f, "geometry error: {e}"),
            LaneError::Precondition(e) => write!(f, "precondition error: {e}"),
        }
    }
}

impl std::error::Error for LaneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaneError::Geometry(e) => Some(e),
            LaneError::Precondition(e) => Some(e),
        }
    }
}

impl From<GeometryError> for LaneError {
    fn from(e: GeometryError) -> Self {
        LaneError::Geometry(e)
    }
}

impl From<PreconditionError> for LaneError {
    fn from(e: PreconditionError) -> Self {
        LaneError::Precondition(e)
    }
}

pub(crate) fn invalid_param(name: &'static str, reason: impl Into<String>) -> PreconditionError {
    PreconditionError::InvalidParam {
        name,
        reason: reason.into(),
    }
}
