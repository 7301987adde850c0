use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::geometry::{BBox, Point};
use crate::imaging::ImageSource;

/// A4 portrait, in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 36.0;
pub const HEADER_HEIGHT: f32 = 44.0;
pub const FOOTER_HEIGHT: f32 = 22.0;

/// Area left for page content once header and footer bands are reserved.
pub fn content_area() -> BBox {
    BBox::new(
        MARGIN,
        MARGIN + HEADER_HEIGHT + 12.0,
        PAGE_WIDTH - MARGIN,
        PAGE_HEIGHT - MARGIN - FOOTER_HEIGHT,
    )
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
    pub const INK: Rgb = Rgb(0.13, 0.15, 0.19);
    pub const MUTED: Rgb = Rgb(0.42, 0.45, 0.5);
    pub const RULE: Rgb = Rgb(0.78, 0.8, 0.83);
    pub const PANEL: Rgb = Rgb(0.95, 0.96, 0.97);
    pub const NOT_PRESENT: Rgb = Rgb(0.84, 0.84, 0.84);
    pub const BRAND: Rgb = Rgb(0.09, 0.25, 0.45);
    pub const MARKER: Rgb = Rgb(0.84, 0.11, 0.11);

    pub fn gray(level: f32) -> Rgb {
        Rgb(level, level, level)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f32,
    pub dashed: bool,
}

impl Stroke {
    pub fn solid(color: Rgb, width: f32) -> Self {
        Self {
            color,
            width,
            dashed: false,
        }
    }

    pub fn dashed(color: Rgb, width: f32) -> Self {
        Self {
            color,
            width,
            dashed: true,
        }
    }
}

/// One drawing primitive. Text `origin` is the baseline anchor; `align`
/// says whether it is the left edge, center or right edge of the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text {
        origin: Point,
        text: String,
        size: f32,
        weight: FontWeight,
        color: Rgb,
        align: TextAlign,
    },
    Rect {
        bbox: BBox,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Image {
        bbox: BBox,
        source: ImageSource,
    },
}

impl Element {
    pub fn text(x: f32, y: f32, text: impl Into<String>, size: f32) -> Self {
        Element::Text {
            origin: Point::new(x, y),
            text: text.into(),
            size,
            weight: FontWeight::Regular,
            color: Rgb::INK,
            align: TextAlign::Left,
        }
    }

    pub fn styled_text(
        origin: Point,
        text: impl Into<String>,
        size: f32,
        weight: FontWeight,
        color: Rgb,
        align: TextAlign,
    ) -> Self {
        Element::Text {
            origin,
            text: text.into(),
            size,
            weight,
            color,
            align,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Element::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Element::Text { .. } => "text",
            Element::Rect { .. } => "rect",
            Element::Circle { .. } => "circle",
            Element::Line { .. } => "line",
            Element::Image { .. } => "image",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PageKind {
    Cover,
    Documentation,
    Exterior,
    Interior,
    Wheels,
    DamageOverlay,
    DamageEvidence,
    Confirmation,
    BundleSummary,
}

/// Typed content of one page, produced before any bytes are written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageSpec {
    pub kind: PageKind,
    pub title: String,
    /// 1-based, assigned when the page sequence is final.
    pub number: usize,
    pub elements: Vec<Element>,
}

impl PageSpec {
    pub fn new(kind: PageKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            number: 0,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.elements.extend(elements);
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(Element::as_text)
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text.contains(needle))
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageSource> {
        self.elements.iter().filter_map(|element| match element {
            Element::Image { source, .. } => Some(source),
            _ => None,
        })
    }
}

/// The complete, ordered page list plus document metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentPlan {
    pub title: String,
    pub subject: String,
    pub created: Option<DateTime<Utc>>,
    pub pages: Vec<PageSpec>,
}

impl DocumentPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn kinds(&self) -> Vec<PageKind> {
        self.pages.iter().map(|page| page.kind).collect()
    }
}
