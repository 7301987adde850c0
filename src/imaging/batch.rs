use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::model::{ImagePayload, InspectionRecord, PhotoCategory};

/// Position of an image in the flattened batch: `<arrayIndex>-<photoIndex>`.
///
/// Arrays 0..19 are the photo categories in [`PhotoCategory::ALL`] order, the
/// next array is the signature, and every damage marker gets one array after
/// that in marker-list order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageKey {
    pub array: usize,
    pub photo: usize,
}

const SIGNATURE_ARRAY: usize = PhotoCategory::ALL.len();
const FIRST_MARKER_ARRAY: usize = SIGNATURE_ARRAY + 1;

impl ImageKey {
    pub fn new(array: usize, photo: usize) -> Self {
        Self { array, photo }
    }

    pub fn category(category: PhotoCategory, photo: usize) -> Self {
        Self::new(category.array_index(), photo)
    }

    pub fn signature() -> Self {
        Self::new(SIGNATURE_ARRAY, 0)
    }

    pub fn marker(marker_idx: usize, photo: usize) -> Self {
        Self::new(FIRST_MARKER_ARRAY + marker_idx, photo)
    }

    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.array, self.photo)
    }
}

/// Flattens every image referenced by the record into one batch with stable keys.
pub fn collect_batch(record: &InspectionRecord) -> Vec<(ImageKey, &ImagePayload)> {
    let mut batch = Vec::new();

    for category in PhotoCategory::ALL {
        for (photo, payload) in record.photos.photos(category).iter().enumerate() {
            batch.push((ImageKey::category(category, photo), payload));
        }
    }

    if let Some(signature) = &record.signature {
        batch.push((ImageKey::signature(), signature));
    }

    for (marker_idx, marker) in record.markers.iter().enumerate() {
        for (photo, payload) in marker.images.iter().enumerate() {
            batch.push((ImageKey::marker(marker_idx, photo), payload));
        }
    }

    batch
}
