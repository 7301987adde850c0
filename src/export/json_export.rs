use std::fs;
use std::path::PathBuf;

use crate::core::error::Result;
use crate::export::Exporter;
use crate::imaging::ImageCatalog;
use crate::layout::page::DocumentPlan;

/// Writes the typed page plan as pretty JSON, for diffing layouts between runs.
#[derive(Debug, Clone)]
pub struct PlanJsonExporter {
    path: PathBuf,
}

impl PlanJsonExporter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Exporter for PlanJsonExporter {
    fn export(&self, plan: &DocumentPlan, _images: &dyn ImageCatalog) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(plan)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
