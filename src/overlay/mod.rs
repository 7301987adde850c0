//! Geometric Overlay Renderer: damage markers projected onto the vehicle
//! outlines, plus the evidence pages that reuse the same numbering.

pub mod evidence;
pub mod numbering;
pub mod projection;
pub mod render;

pub use evidence::damage_evidence_pages;
pub use numbering::MarkerNumbering;
pub use projection::{project, OverlayCalibration};
pub use render::damage_overlay_page;
