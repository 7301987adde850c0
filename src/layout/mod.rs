//! Page Layout Engine: turns slices of an inspection record into typed
//! [`PageSpec`] values. Nothing in here writes bytes.

pub mod card;
pub mod chrome;
pub mod grid;
pub mod page;
pub mod pages;
pub mod text;

pub use card::{Card, SlotState, UnavailableReason};
pub use page::{DocumentPlan, Element, FontWeight, PageKind, PageSpec, Rgb, Stroke, TextAlign};
