//! The single error type shared by the generation engine and the bundle combiner.
//!
//! `ImageDecode` and `AssetMissing` are recovered inside the engine and only
//! appear in logs and preprocessing reports; every other variant propagates to
//! the caller and means the whole operation failed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("image {id} could not be decoded: {reason}")]
    ImageDecode { id: String, reason: String },

    #[error("asset {name} is missing or unreadable: {reason}")]
    AssetMissing { name: String, reason: String },

    #[error("bundle contains no documents")]
    EmptyBundle,

    #[error("bundle total overflows at entry {index}")]
    AmountOverflow { index: usize },

    #[error("damage marker {marker_id} is malformed: {reason}")]
    MalformedMarker { marker_id: String, reason: String },

    #[error("image payload at {location} is not valid base64")]
    InvalidImagePayload { location: String },

    #[error("bundle document {index} is not a readable PDF: {source}")]
    UnreadableBundleDocument {
        index: usize,
        #[source]
        source: lopdf::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("compression worker pool could not be started: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// An error from lopdf while building or serializing a document.
    #[error("PDF operation failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
