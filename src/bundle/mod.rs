//! Bundle Combiner: several finished documents behind one summary cover.

pub mod combiner;
pub mod manifest;
pub mod summary;

pub use combiner::{combine, CombinedBundle};
pub use manifest::{BundleEntry, BundleManifest, FileManifest, Money};
