use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::EngineError;
use crate::core::model::VehicleView;
use crate::imaging::compress::{compress_image, CompressedImage, CompressionProfile};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum AssetKind {
    Outline(VehicleView),
    Logo,
}

impl AssetKind {
    pub fn file_name(&self) -> String {
        match self {
            AssetKind::Outline(view) => {
                let slug = match view {
                    VehicleView::Front => "front",
                    VehicleView::Rear => "rear",
                    VehicleView::DriverSide => "driver_side",
                    VehicleView::PassengerSide => "passenger_side",
                    VehicleView::Roof => "roof",
                };
                format!("outline_{slug}.png")
            }
            AssetKind::Logo => "logo.png".to_string(),
        }
    }

    /// Every asset the engine tries to load.
    pub fn required() -> Vec<AssetKind> {
        VehicleView::OUTLINED
            .into_iter()
            .map(AssetKind::Outline)
            .chain(std::iter::once(AssetKind::Logo))
            .collect()
    }
}

/// Outline templates and logo, loaded from local storage once per call.
#[derive(Debug, Default)]
pub struct AssetStore {
    images: BTreeMap<AssetKind, CompressedImage>,
    missing: Vec<AssetKind>,
}

impl AssetStore {
    /// Never fails: a missing or unreadable file is logged and later drawn as
    /// a textual fallback.
    pub fn load(dir: &Path, profile: CompressionProfile) -> Self {
        let mut store = AssetStore::default();
        for kind in AssetKind::required() {
            let path = dir.join(kind.file_name());
            let loaded = fs::read(&path)
                .map_err(|err| err.to_string())
                .and_then(|bytes| compress_image(&bytes, profile).map_err(|err| err.to_string()));
            match loaded {
                Ok(image) => {
                    store.images.insert(kind, image);
                }
                Err(reason) => {
                    let err = EngineError::AssetMissing {
                        name: path.display().to_string(),
                        reason,
                    };
                    if kind == AssetKind::Logo {
                        log::debug!("{err}; using text logo");
                    } else {
                        log::warn!("{err}; outline will render as text");
                    }
                    store.missing.push(kind);
                }
            }
        }
        store
    }

    pub fn insert(&mut self, kind: AssetKind, image: CompressedImage) {
        self.missing.retain(|missing| *missing != kind);
        self.images.insert(kind, image);
    }

    pub fn get(&self, kind: AssetKind) -> Option<&CompressedImage> {
        self.images.get(&kind)
    }

    pub fn missing(&self) -> &[AssetKind] {
        &self.missing
    }
}
