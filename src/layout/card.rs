//! Bordered photo cards and the three slot states.

use serde::{Deserialize, Serialize};

use crate::core::geometry::{BBox, Point};
use crate::imaging::{ImageCatalog, ImageKey, ImageSource};
use crate::layout::page::{Element, FontWeight, Rgb, Stroke, TextAlign};
use crate::layout::text::truncate_to_width;

const CARD_PAD: f32 = 6.0;
const LABEL_SIZE: f32 = 9.0;
const DETAIL_SIZE: f32 = 8.0;
const LINE_GAP: f32 = 3.0;
const BADGE_RADIUS: f32 = 10.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum UnavailableReason {
    NotCaptured,
    DecodeFailed,
}

/// What a card slot shows. The three states never share a rendering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SlotState {
    Photo(ImageSource),
    NotPresent,
    Unavailable(UnavailableReason),
}

impl SlotState {
    /// Photo if the key made it into the cache, otherwise a decode failure.
    pub fn from_photo(key: ImageKey, catalog: &dyn ImageCatalog) -> Self {
        let source = ImageSource::Photo(key);
        if catalog.image(&source).is_some() {
            SlotState::Photo(source)
        } else {
            SlotState::Unavailable(UnavailableReason::DecodeFailed)
        }
    }

    /// Resolution for fixed-count slots: photo first, then the presence flag.
    /// A recorded `false` is "not present"; anything else without a photo is
    /// "unavailable".
    pub fn for_fixed_slot(
        photo: Option<ImageKey>,
        presence: Option<bool>,
        catalog: &dyn ImageCatalog,
    ) -> Self {
        match (photo, presence) {
            (Some(key), _) => SlotState::from_photo(key, catalog),
            (None, Some(false)) => SlotState::NotPresent,
            (None, _) => SlotState::Unavailable(UnavailableReason::NotCaptured),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub state: SlotState,
    pub label: Option<String>,
    pub details: Vec<String>,
    pub badge: Option<u32>,
}

impl Card {
    pub fn new(state: SlotState) -> Self {
        Self {
            state,
            label: None,
            details: Vec::new(),
            badge: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn with_badge(mut self, number: u32) -> Self {
        self.badge = Some(number);
        self
    }

    fn strip_height(&self) -> f32 {
        let label = if self.label.is_some() {
            LABEL_SIZE + LINE_GAP
        } else {
            0.0
        };
        let details = self.details.len() as f32 * (DETAIL_SIZE + LINE_GAP);
        if label + details > 0.0 {
            label + details + CARD_PAD
        } else {
            0.0
        }
    }

    pub fn render(&self, bbox: BBox, catalog: &dyn ImageCatalog) -> Vec<Element> {
        let mut elements = vec![Element::Rect {
            bbox,
            fill: Some(Rgb::WHITE),
            stroke: Some(Stroke::solid(Rgb::RULE, 0.8)),
        }];

        let inner = bbox.inset(CARD_PAD);
        let (media, strip) = inner.split_bottom(self.strip_height());

        match self.state {
            SlotState::Photo(source) => {
                let fitted = catalog
                    .dimensions(&source)
                    .map(|(w, h)| media.fit_aspect(w, h))
                    .unwrap_or(media);
                elements.push(Element::Image {
                    bbox: fitted,
                    source,
                });
                elements.push(Element::Rect {
                    bbox: fitted,
                    fill: None,
                    stroke: Some(Stroke::solid(Rgb::INK, 0.5)),
                });
            }
            SlotState::NotPresent => elements.extend(not_present(media)),
            SlotState::Unavailable(reason) => elements.extend(unavailable(media, reason)),
        }

        if let Some(number) = self.badge {
            let center = Point::new(media.x0 + BADGE_RADIUS + 2.0, media.y0 + BADGE_RADIUS + 2.0);
            elements.extend(numbered_badge(center, BADGE_RADIUS, number));
        }

        let mut baseline = strip.y0 + CARD_PAD * 0.5;
        if let Some(label) = &self.label {
            baseline += LABEL_SIZE;
            elements.push(Element::styled_text(
                Point::new(strip.x0, baseline),
                truncate_to_width(label, LABEL_SIZE, FontWeight::Bold, strip.width()),
                LABEL_SIZE,
                FontWeight::Bold,
                Rgb::INK,
                TextAlign::Left,
            ));
            baseline += LINE_GAP;
        }
        for detail in &self.details {
            baseline += DETAIL_SIZE;
            elements.push(Element::styled_text(
                Point::new(strip.x0, baseline),
                truncate_to_width(detail, DETAIL_SIZE, FontWeight::Regular, strip.width()),
                DETAIL_SIZE,
                FontWeight::Regular,
                Rgb::MUTED,
                TextAlign::Left,
            ));
            baseline += LINE_GAP;
        }

        elements
    }
}

fn not_present(area: BBox) -> Vec<Element> {
    let (cx, cy) = area.center();
    vec![
        Element::Rect {
            bbox: area,
            fill: Some(Rgb::NOT_PRESENT),
            stroke: Some(Stroke::solid(Rgb::gray(0.6), 0.8)),
        },
        Element::styled_text(
            Point::new(cx, cy),
            "N/A",
            16.0,
            FontWeight::Bold,
            Rgb::gray(0.35),
            TextAlign::Center,
        ),
        Element::styled_text(
            Point::new(cx, cy + 14.0),
            "Not Present",
            9.0,
            FontWeight::Regular,
            Rgb::gray(0.35),
            TextAlign::Center,
        ),
    ]
}

fn unavailable(area: BBox, reason: UnavailableReason) -> Vec<Element> {
    let (cx, cy) = area.center();
    let caption = match reason {
        UnavailableReason::NotCaptured => "Not captured",
        UnavailableReason::DecodeFailed => "Image unavailable",
    };
    vec![
        Element::Rect {
            bbox: area,
            fill: Some(Rgb::WHITE),
            stroke: Some(Stroke::dashed(Rgb::gray(0.6), 0.8)),
        },
        Element::styled_text(
            Point::new(cx, cy + 3.0),
            caption,
            9.0,
            FontWeight::Regular,
            Rgb::MUTED,
            TextAlign::Center,
        ),
    ]
}

/// Filled circle with a white border and the number centered inside.
pub fn numbered_badge(center: Point, radius: f32, number: u32) -> Vec<Element> {
    let size = (radius * 1.1).max(6.0);
    vec![
        Element::Circle {
            center,
            radius,
            fill: Some(Rgb::MARKER),
            stroke: Some(Stroke::solid(Rgb::WHITE, 1.5)),
        },
        Element::styled_text(
            // Cap height of Helvetica is ~0.72 em; drop the baseline by half of it.
            Point::new(center.x, center.y + size * 0.36),
            number.to_string(),
            size,
            FontWeight::Bold,
            Rgb::WHITE,
            TextAlign::Center,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::CompressedImage;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    struct StubCatalog(BTreeMap<ImageSource, CompressedImage>);

    impl ImageCatalog for StubCatalog {
        fn image(&self, source: &ImageSource) -> Option<&CompressedImage> {
            self.0.get(source)
        }
    }

    fn catalog_with(key: ImageKey) -> StubCatalog {
        let mut map = BTreeMap::new();
        map.insert(
            ImageSource::Photo(key),
            CompressedImage {
                data: vec![],
                width: 40,
                height: 20,
            },
        );
        StubCatalog(map)
    }

    #[test]
    fn fixed_slot_states_are_distinct() {
        let key = ImageKey::new(13, 0);
        let catalog = catalog_with(key);
        let empty = StubCatalog(BTreeMap::new());

        assert_eq!(
            SlotState::for_fixed_slot(Some(key), Some(false), &catalog),
            SlotState::Photo(ImageSource::Photo(key))
        );
        assert_eq!(
            SlotState::for_fixed_slot(None, Some(false), &catalog),
            SlotState::NotPresent
        );
        assert_eq!(
            SlotState::for_fixed_slot(None, Some(true), &catalog),
            SlotState::Unavailable(UnavailableReason::NotCaptured)
        );
        assert_eq!(
            SlotState::for_fixed_slot(None, None, &catalog),
            SlotState::Unavailable(UnavailableReason::NotCaptured)
        );
        assert_eq!(
            SlotState::for_fixed_slot(Some(key), Some(true), &empty),
            SlotState::Unavailable(UnavailableReason::DecodeFailed)
        );
    }

    #[test]
    fn not_present_and_unavailable_render_differently() {
        let catalog = StubCatalog(BTreeMap::new());
        let bbox = BBox::new(0.0, 0.0, 120.0, 100.0);
        let absent = Card::new(SlotState::NotPresent).render(bbox, &catalog);
        let missing = Card::new(SlotState::Unavailable(UnavailableReason::NotCaptured))
            .render(bbox, &catalog);

        let texts = |elements: &[Element]| -> Vec<String> {
            elements
                .iter()
                .filter_map(|e| e.as_text().map(str::to_string))
                .collect()
        };
        assert_eq!(texts(&absent), vec!["N/A", "Not Present"]);
        assert_eq!(texts(&missing), vec!["Not captured"]);
        assert!(absent.iter().any(|e| matches!(
            e,
            Element::Rect { fill: Some(fill), .. } if *fill == Rgb::NOT_PRESENT
        )));
        assert!(missing.iter().any(|e| matches!(
            e,
            Element::Rect { stroke: Some(Stroke { dashed: true, .. }), .. }
        )));
    }

    #[test]
    fn photo_card_fits_image_and_draws_badge() {
        let key = ImageKey::new(20, 0);
        let catalog = catalog_with(key);
        let bbox = BBox::new(0.0, 0.0, 212.0, 200.0);
        let elements = Card::new(SlotState::from_photo(key, &catalog))
            .with_label("Dent - Large")
            .with_badge(4)
            .render(bbox, &catalog);

        let image_box = elements
            .iter()
            .find_map(|e| match e {
                Element::Image { bbox, .. } => Some(*bbox),
                _ => None,
            })
            .unwrap();
        assert!((image_box.width() / image_box.height() - 2.0).abs() < 1e-3);
        assert!(elements.iter().any(|e| e.as_text() == Some("4")));
        assert!(elements.iter().any(|e| e.as_text() == Some("Dent - Large")));
    }
}
