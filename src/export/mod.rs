pub mod html_debug_export;
pub mod json_export;
pub mod pdf_export;

use crate::core::error::Result;
use crate::imaging::ImageCatalog;
use crate::layout::page::DocumentPlan;

pub use html_debug_export::HtmlDebugExporter;
pub use json_export::PlanJsonExporter;
pub use pdf_export::{render_pdf, PdfExporter};

/// One output format for an assembled plan.
pub trait Exporter {
    fn export(&self, plan: &DocumentPlan, images: &dyn ImageCatalog) -> Result<()>;
}
