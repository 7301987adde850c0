use crate::core::model::InspectionRecord;
use crate::imaging::{ImageCatalog, ImageKey};
use crate::layout::card::{Card, SlotState, UnavailableReason};
use crate::layout::grid::{grid_cells, paginate};
use crate::layout::page::{content_area, FontWeight, PageKind, PageSpec};
use crate::layout::pages::GRID_GAP;
use crate::layout::text::wrap_text;
use crate::overlay::numbering::MarkerNumbering;

pub const MARKERS_PER_PAGE: usize = 6;
const DESCRIPTION_LINES: usize = 3;

/// One card per marker in number order, six to a page. The badge on each card
/// is the number the marker carries on the overlay page.
pub fn damage_evidence_pages(
    record: &InspectionRecord,
    numbering: &MarkerNumbering,
    catalog: &dyn ImageCatalog,
) -> Vec<PageSpec> {
    let ordered: Vec<(u32, usize)> = numbering.in_order().collect();
    if ordered.is_empty() {
        return Vec::new();
    }

    paginate(&ordered, MARKERS_PER_PAGE)
        .into_iter()
        .enumerate()
        .map(|(page_idx, chunk)| {
            let title = if page_idx == 0 {
                "Damage Evidence".to_string()
            } else {
                "Damage Evidence (continued)".to_string()
            };
            let mut page = PageSpec::new(PageKind::DamageEvidence, title);
            let cells = grid_cells(content_area(), 2, 3, GRID_GAP);

            for ((number, idx), cell) in chunk.into_iter().zip(cells) {
                let marker = &record.markers[idx];
                let state = if marker.images.is_empty() {
                    SlotState::Unavailable(UnavailableReason::NotCaptured)
                } else {
                    // first photo that decoded
                    (0..marker.images.len())
                        .map(|n| SlotState::from_photo(ImageKey::marker(idx, n), catalog))
                        .find(|state| matches!(state, SlotState::Photo(_)))
                        .unwrap_or(SlotState::Unavailable(UnavailableReason::DecodeFailed))
                };

                let mut details = vec![marker.view.label().to_string()];
                let text_width = cell.width() - 12.0;
                details.extend(
                    wrap_text(&marker.description, 8.0, FontWeight::Regular, text_width)
                        .into_iter()
                        .take(DESCRIPTION_LINES),
                );
                if marker.images.len() > 1 {
                    details.push(format!("+{} more photos on file", marker.images.len() - 1));
                }

                let card = Card::new(state)
                    .with_label(format!(
                        "{} - {}",
                        marker.damage_type.label(),
                        marker.size.label()
                    ))
                    .with_details(details)
                    .with_badge(number);
                page.extend(card.render(cell, catalog));
            }
            page
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::core::model::{ImagePayload, VehicleView};
    use crate::imaging::{AssetStore, CompressionProfile, ImageCache, RenderResources};
    use crate::layout::page::{Element, Rgb};
    use crate::overlay::render::damage_overlay_page;
    use crate::test_support::{marker, sample_record};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    /// Badge number -> marker label text following it on the card.
    fn evidence_badges(pages: &[PageSpec]) -> BTreeMap<u32, String> {
        let mut found = BTreeMap::new();
        for page in pages {
            let elements = &page.elements;
            for (i, element) in elements.iter().enumerate() {
                if let Element::Circle { fill: Some(fill), .. } = element {
                    if *fill != Rgb::MARKER {
                        continue;
                    }
                    let number: u32 = elements[i + 1].as_text().unwrap().parse().unwrap();
                    let view = elements[i + 3].as_text().unwrap().to_string();
                    found.insert(number, view);
                }
            }
        }
        found
    }

    #[test]
    fn evidence_numbers_match_overlay_numbers() {
        let mut record = sample_record();
        record.markers = vec![
            marker("p1", VehicleView::PassengerSide, 10.0, 10.0),
            marker("r1", VehicleView::Roof, 20.0, 20.0),
            marker("f1", VehicleView::Front, 30.0, 30.0),
            marker("p2", VehicleView::PassengerSide, 40.0, 40.0),
            marker("f2", VehicleView::Front, 50.0, 50.0),
        ];
        let images = ImageCache::build(&record, CompressionProfile::default(), Some(2)).unwrap();
        let resources = RenderResources::new(images, AssetStore::default());
        let numbering = MarkerNumbering::new(&record.markers);

        let overlay = damage_overlay_page(&record, &numbering, &resources, &EngineConfig::default());
        let evidence = damage_evidence_pages(&record, &numbering, &resources);
        assert_eq!(evidence.len(), 1);

        let overlay_numbers: Vec<u32> = overlay
            .elements
            .windows(2)
            .filter_map(|pair| match pair {
                [Element::Circle { fill: Some(fill), .. }, Element::Text { text, .. }]
                    if *fill == Rgb::MARKER =>
                {
                    text.parse().ok()
                }
                _ => None,
            })
            .collect();
        // front 1, 2; passenger 3, 4 drawn on the outlines; roof 5 listed in the strip
        assert_eq!(overlay_numbers, vec![1, 2, 3, 4]);
        assert!(overlay.contains_text("5. Scratch - Small: r1 on Roof"));

        for (idx, m) in record.markers.iter().enumerate() {
            let number = numbering.number_of(idx).unwrap();
            let page_text: Vec<&str> = evidence[0].texts().collect();
            let badge_pos = page_text
                .iter()
                .position(|t| *t == number.to_string())
                .unwrap();
            assert_eq!(page_text[badge_pos + 1], "Scratch - Small");
            assert_eq!(page_text[badge_pos + 3], m.description);
        }
        let views = evidence_badges(&evidence);
        assert_eq!(views.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(views[&5], "Roof");
    }

    #[test]
    fn seven_markers_spill_onto_a_second_page() {
        let mut record = sample_record();
        record.markers = (0..7)
            .map(|i| marker(&format!("m{i}"), VehicleView::Rear, 5.0, 5.0))
            .collect();
        record.markers[6].images.clear();
        let images = ImageCache::build(&record, CompressionProfile::default(), None).unwrap();
        let resources = RenderResources::new(images, AssetStore::default());
        let numbering = MarkerNumbering::new(&record.markers);
        let pages = damage_evidence_pages(&record, &numbering, &resources);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].title, "Damage Evidence (continued)");
        assert!(pages[1].contains_text("Not captured"));
        assert!(pages[1].contains_text("7"));
    }

    #[test]
    fn card_uses_a_later_photo_when_the_first_is_broken() {
        let mut record = sample_record();
        let mut damaged = marker("d1", VehicleView::Front, 5.0, 5.0);
        damaged
            .images
            .insert(0, ImagePayload::new(b"not an image".to_vec()));
        record.markers = vec![damaged];
        let images = ImageCache::build(&record, CompressionProfile::default(), Some(1)).unwrap();
        let resources = RenderResources::new(images, AssetStore::default());
        let numbering = MarkerNumbering::new(&record.markers);
        let pages = damage_evidence_pages(&record, &numbering, &resources);

        assert!(pages[0]
            .elements
            .iter()
            .any(|e| matches!(e, Element::Image { .. })));
        assert!(!pages[0].contains_text("Image unavailable"));
    }

    #[test]
    fn no_markers_no_pages() {
        let record = sample_record();
        let numbering = MarkerNumbering::new(&record.markers);
        assert!(damage_evidence_pages(&record, &numbering, &RenderResources::default()).is_empty());
    }
}
