pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod validate;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
