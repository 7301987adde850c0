pub mod assembler;
pub mod bundle;
pub mod core;
pub mod export;
pub mod imaging;
pub mod layout;
pub mod overlay;
pub mod pipeline;

#[cfg(test)]
mod test_support;

pub use crate::bundle::{combine, BundleManifest, CombinedBundle};
pub use crate::core::{EngineConfig, EngineError, Result};
pub use crate::core::model::InspectionRecord;
pub use crate::pipeline::{generate, generate_from_json, GeneratedDocument};
