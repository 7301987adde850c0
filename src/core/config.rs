use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};

/// Fraction of the distance to the view center that every projected marker is
/// pulled inward. Calibrated by eye against the outline artwork.
pub const DEFAULT_CENTERING_CORRECTION: f32 = 0.15;

pub const DEFAULT_DISCLAIMER: &str = "This report records the visible condition of the vehicle at the \
time and place stated. Areas obscured by dirt, poor light or weather may conceal further damage. \
Mechanical and electrical condition is not assessed. By signing, the point of contact confirms the \
vehicle was handed over in the condition described.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub asset_dir: PathBuf,
    pub centering_correction: f32,
    pub marker_radius: f32,
    pub overlay_padding: f32,
    pub image_max_edge: u32,
    pub jpeg_quality: u8,
    pub workers: Option<usize>,
    pub company_name: String,
    pub disclaimer: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            centering_correction: DEFAULT_CENTERING_CORRECTION,
            marker_radius: 9.0,
            overlay_padding: 12.0,
            image_max_edge: 1600,
            jpeg_quality: 75,
            workers: None,
            company_name: "Vehicle Inspection Services".to_string(),
            disclaimer: DEFAULT_DISCLAIMER.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_asset_dir(mut self, asset_dir: PathBuf) -> Self {
        self.asset_dir = asset_dir;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.centering_correction) {
            return Err(EngineError::InvalidConfig(format!(
                "centering_correction must be in [0, 1), got {}",
                self.centering_correction
            )));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(EngineError::InvalidConfig(format!(
                "jpeg_quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if self.image_max_edge == 0 {
            return Err(EngineError::InvalidConfig(
                "image_max_edge must be positive".to_string(),
            ));
        }
        if self.marker_radius <= 0.0 || self.overlay_padding < 0.0 {
            return Err(EngineError::InvalidConfig(
                "marker_radius must be positive and overlay_padding non-negative".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(EngineError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
