//! JSON runtime configuration for the demo tool.
pub mod lane;

pub use lane::{load_config, OutputConfig, RuntimeConfig};
