//! Builders for the structural pages. Each is a pure function of its slice of
//! the record plus the image catalog; header, footer and page numbers are
//! added later by the assembler.

use crate::core::config::EngineConfig;
use crate::core::geometry::{BBox, Point};
use crate::core::model::{InspectionRecord, PhotoCategory, PhotoSection};
use crate::imaging::{AssetKind, ImageCatalog, ImageKey, ImageSource};
use crate::layout::card::{Card, SlotState, UnavailableReason};
use crate::layout::grid::{grid_cells, paginate};
use crate::layout::page::{
    content_area, Element, FontWeight, PageKind, PageSpec, Rgb, Stroke, TextAlign,
};
use crate::layout::text::{truncate_to_width, wrap_text};

pub const GRID_GAP: f32 = 12.0;
pub const PHOTOS_PER_PAGE: usize = 4;

const HEADING_SIZE: f32 = 11.0;
const BODY_SIZE: f32 = 9.5;
const ROW_HEIGHT: f32 = 15.0;

/// Bold section heading with a rule underneath; returns the y below it.
pub fn section_heading(page: &mut PageSpec, x0: f32, x1: f32, y: f32, title: &str) -> f32 {
    page.push(Element::styled_text(
        Point::new(x0, y + HEADING_SIZE),
        title,
        HEADING_SIZE,
        FontWeight::Bold,
        Rgb::BRAND,
        TextAlign::Left,
    ));
    let rule_y = y + HEADING_SIZE + 4.0;
    page.push(Element::Line {
        from: Point::new(x0, rule_y),
        to: Point::new(x1, rule_y),
        stroke: Stroke::solid(Rgb::RULE, 0.6),
    });
    rule_y + 8.0
}

/// Two-column label/value rows. Returns the y below the last row.
fn key_value_rows(page: &mut PageSpec, area: BBox, y: f32, rows: &[(&str, String)]) -> f32 {
    let label_width = area.width() * 0.38;
    let mut y = y;
    for (label, value) in rows {
        y += ROW_HEIGHT;
        page.push(Element::styled_text(
            Point::new(area.x0, y),
            *label,
            BODY_SIZE,
            FontWeight::Bold,
            Rgb::MUTED,
            TextAlign::Left,
        ));
        let shown = if value.trim().is_empty() { "-" } else { value.as_str() };
        page.push(Element::styled_text(
            Point::new(area.x0 + label_width, y),
            truncate_to_width(shown, BODY_SIZE, FontWeight::Regular, area.width() - label_width),
            BODY_SIZE,
            FontWeight::Regular,
            Rgb::INK,
            TextAlign::Left,
        ));
    }
    y + 6.0
}

fn text_block(page: &mut PageSpec, area: BBox, y: f32, lines: &[String]) -> f32 {
    let mut y = y;
    for line in lines {
        y += ROW_HEIGHT - 2.0;
        page.push(Element::styled_text(
            Point::new(area.x0, y),
            line.as_str(),
            BODY_SIZE,
            FontWeight::Regular,
            Rgb::INK,
            TextAlign::Left,
        ));
    }
    y + 6.0
}

pub fn cover_page(
    record: &InspectionRecord,
    catalog: &dyn ImageCatalog,
    config: &EngineConfig,
) -> PageSpec {
    let mut page = PageSpec::new(PageKind::Cover, "Inspection Summary");
    let area = content_area();

    let (brand, rest) = area.split_top(70.0);
    let logo = ImageSource::Asset(AssetKind::Logo);
    let logo_box = BBox::from_origin(brand.x0, brand.y0, 160.0, brand.height());
    match catalog.dimensions(&logo) {
        Some((w, h)) => page.push(Element::Image {
            bbox: logo_box.fit_aspect(w, h),
            source: logo,
        }),
        None => page.push(Element::styled_text(
            Point::new(brand.x0, brand.y0 + 30.0),
            truncate_to_width(&config.company_name, 16.0, FontWeight::Bold, brand.width() * 0.55),
            16.0,
            FontWeight::Bold,
            Rgb::BRAND,
            TextAlign::Left,
        )),
    }
    page.push(Element::styled_text(
        Point::new(brand.x1, brand.y0 + 26.0),
        record.kind.title(),
        20.0,
        FontWeight::Bold,
        Rgb::INK,
        TextAlign::Right,
    ));
    page.push(Element::styled_text(
        Point::new(brand.x1, brand.y0 + 46.0),
        format!("Job {}", record.job_reference),
        11.0,
        FontWeight::Regular,
        Rgb::MUTED,
        TextAlign::Right,
    ));
    page.push(Element::styled_text(
        Point::new(brand.x1, brand.y0 + 62.0),
        record.inspected_at.format("%d %B %Y, %H:%M UTC").to_string(),
        9.0,
        FontWeight::Regular,
        Rgb::MUTED,
        TextAlign::Right,
    ));

    let half = (rest.width() - GRID_GAP) * 0.5;
    let left = BBox::new(rest.x0, rest.y0, rest.x0 + half, rest.y1);
    let right = BBox::new(rest.x1 - half, rest.y0, rest.x1, rest.y1);

    let vehicle = &record.vehicle;
    let mut y = section_heading(&mut page, left.x0, left.x1, left.y0 + 10.0, "Vehicle");
    y = key_value_rows(
        &mut page,
        left,
        y,
        &[
            ("Registration", vehicle.registration.clone()),
            ("Make / Model", vehicle.summary()),
            ("Colour", vehicle.colour.clone()),
            ("VIN", vehicle.vin.clone().unwrap_or_default()),
            (
                "Mileage",
                vehicle.mileage.map(|m| m.to_string()).unwrap_or_default(),
            ),
        ],
    );

    y = section_heading(&mut page, left.x0, left.x1, y + 6.0, "Conditions");
    y = key_value_rows(
        &mut page,
        left,
        y,
        &[
            ("Weather", record.conditions.weather.clone()),
            ("Lighting", record.conditions.lighting.clone()),
            ("Cleanliness", record.conditions.cleanliness.clone()),
        ],
    );

    y = section_heading(&mut page, left.x0, left.x1, y + 6.0, "Inspection");
    let photo_count = record.photos.total();
    let marker_count = record.markers.len();
    key_value_rows(
        &mut page,
        left,
        y,
        &[
            ("Inspector", record.inspector.clone().unwrap_or_default()),
            ("Photos", photo_count.to_string()),
            ("Damage markers", marker_count.to_string()),
        ],
    );

    let mut y = section_heading(&mut page, right.x0, right.x1, right.y0 + 10.0, "Collection Address");
    y = text_block(&mut page, right, y, &address_or_dash(record.collection_address.display_lines()));
    y = section_heading(&mut page, right.x0, right.x1, y + 6.0, "Delivery Address");
    text_block(&mut page, right, y, &address_or_dash(record.delivery_address.display_lines()));

    page
}

fn address_or_dash(lines: Vec<String>) -> Vec<String> {
    if lines.is_empty() {
        vec!["-".to_string()]
    } else {
        lines
    }
}

/// First photo of a fixed slot, if one was captured.
fn first_photo(record: &InspectionRecord, category: PhotoCategory) -> Option<ImageKey> {
    (!record.photos.photos(category).is_empty()).then(|| ImageKey::category(category, 0))
}

pub fn documentation_page(record: &InspectionRecord, catalog: &dyn ImageCatalog) -> PageSpec {
    let mut page = PageSpec::new(PageKind::Documentation, PhotoSection::Documents.label());
    let cells = grid_cells(content_area(), 2, 3, GRID_GAP);

    for (category, cell) in PhotoCategory::DOCUMENT_SLOTS.into_iter().zip(cells) {
        let state = SlotState::for_fixed_slot(
            first_photo(record, category),
            record.presence.flag(category),
            catalog,
        );
        let card = Card::new(state).with_label(category.label());
        page.extend(card.render(cell, catalog));
    }
    page
}

/// Exterior or interior photos, four per page. An empty section still yields
/// one page with a single "No photos captured" card.
pub fn photo_section_pages(
    record: &InspectionRecord,
    section: PhotoSection,
    catalog: &dyn ImageCatalog,
) -> Vec<PageSpec> {
    let kind = match section {
        PhotoSection::Interior => PageKind::Interior,
        _ => PageKind::Exterior,
    };
    let photos: Vec<(PhotoCategory, ImageKey)> = PhotoCategory::in_section(section)
        .flat_map(|category| {
            (0..record.photos.photos(category).len())
                .map(move |idx| (category, ImageKey::category(category, idx)))
        })
        .collect();

    paginate(&photos, PHOTOS_PER_PAGE)
        .into_iter()
        .enumerate()
        .map(|(idx, chunk)| {
            let title = if idx == 0 {
                section.label().to_string()
            } else {
                format!("{} (continued)", section.label())
            };
            let mut page = PageSpec::new(kind, title);
            let cells = grid_cells(content_area(), 2, 2, GRID_GAP);

            if chunk.is_empty() {
                let card = Card::new(SlotState::Unavailable(UnavailableReason::NotCaptured))
                    .with_label("No photos captured");
                page.extend(card.render(cells[0], catalog));
                return page;
            }

            for ((category, key), cell) in chunk.into_iter().zip(cells) {
                let count = record.photos.photos(category).len();
                let label = if count > 1 {
                    format!("{} ({} of {count})", category.label(), key.photo + 1)
                } else {
                    category.label().to_string()
                };
                let card = Card::new(SlotState::from_photo(key, catalog)).with_label(label);
                page.extend(card.render(cell, catalog));
            }
            page
        })
        .collect()
}

pub fn wheels_page(record: &InspectionRecord, catalog: &dyn ImageCatalog) -> PageSpec {
    let mut page = PageSpec::new(PageKind::Wheels, PhotoSection::Wheels.label());
    let cells = grid_cells(content_area(), 2, 2, GRID_GAP);
    for (category, cell) in PhotoCategory::WHEELS.into_iter().zip(cells) {
        let state = SlotState::for_fixed_slot(first_photo(record, category), None, catalog);
        page.extend(Card::new(state).with_label(category.label()).render(cell, catalog));
    }
    page
}

pub fn confirmation_page(
    record: &InspectionRecord,
    catalog: &dyn ImageCatalog,
    config: &EngineConfig,
) -> PageSpec {
    let mut page = PageSpec::new(PageKind::Confirmation, "Confirmation");
    let area = content_area();

    let mut y = section_heading(&mut page, area.x0, area.x1, area.y0, "Point of Contact");
    let (name, role) = match &record.point_of_contact {
        Some(contact) => (contact.name.clone(), contact.role.clone().unwrap_or_default()),
        None => (String::new(), String::new()),
    };
    y = key_value_rows(
        &mut page,
        area,
        y,
        &[
            ("Name", name),
            ("Role", role),
            (
                "Signed at",
                record.inspected_at.format("%d %B %Y, %H:%M UTC").to_string(),
            ),
        ],
    );

    y = section_heading(&mut page, area.x0, area.x1, y + 4.0, "Signature");
    let signature_box = BBox::from_origin(area.x0, y, area.width() * 0.5, 110.0);
    let state = match &record.signature {
        Some(_) => SlotState::from_photo(ImageKey::signature(), catalog),
        None => SlotState::Unavailable(UnavailableReason::NotCaptured),
    };
    match state {
        SlotState::Photo(source) => {
            let inner = signature_box.inset(6.0);
            let fitted = catalog
                .dimensions(&source)
                .map(|(w, h)| inner.fit_aspect(w, h))
                .unwrap_or(inner);
            page.push(Element::Rect {
                bbox: signature_box,
                fill: Some(Rgb::WHITE),
                stroke: Some(Stroke::solid(Rgb::RULE, 0.8)),
            });
            page.push(Element::Image {
                bbox: fitted,
                source,
            });
        }
        SlotState::NotPresent | SlotState::Unavailable(_) => {
            let message = match state {
                SlotState::Unavailable(UnavailableReason::DecodeFailed) => {
                    "Signature image unavailable"
                }
                _ => "No signature captured",
            };
            page.push(Element::Rect {
                bbox: signature_box,
                fill: Some(Rgb::WHITE),
                stroke: Some(Stroke::dashed(Rgb::gray(0.6), 0.8)),
            });
            let (cx, cy) = signature_box.center();
            page.push(Element::styled_text(
                Point::new(cx, cy + 3.0),
                message,
                9.0,
                FontWeight::Regular,
                Rgb::MUTED,
                TextAlign::Center,
            ));
        }
    }
    y = signature_box.y1 + 14.0;

    y = section_heading(&mut page, area.x0, area.x1, y, "Notes");
    let notes = if record.notes.trim().is_empty() {
        vec!["No notes recorded.".to_string()]
    } else {
        wrap_text(&record.notes, BODY_SIZE, FontWeight::Regular, area.width())
    };
    // Keep room for the disclaimer at the bottom of the page.
    let disclaimer = wrap_text(&config.disclaimer, 8.0, FontWeight::Regular, area.width());
    let disclaimer_height = disclaimer.len() as f32 * 11.0 + 30.0;
    let max_note_lines = (((area.y1 - disclaimer_height) - y) / (ROW_HEIGHT - 2.0)).max(1.0) as usize;
    let mut shown: Vec<String> = notes.iter().take(max_note_lines).cloned().collect();
    if notes.len() > shown.len() {
        if let Some(last) = shown.last_mut() {
            last.push_str(" ...");
        }
    }
    text_block(&mut page, area, y, &shown);

    let mut y = area.y1 - disclaimer_height;
    y = section_heading(&mut page, area.x0, area.x1, y, "Declaration");
    for line in disclaimer {
        y += 11.0;
        page.push(Element::styled_text(
            Point::new(area.x0, y),
            line,
            8.0,
            FontWeight::Regular,
            Rgb::MUTED,
            TextAlign::Left,
        ));
    }
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{AssetStore, CompressionProfile, ImageCache, RenderResources};
    use crate::core::model::ImagePayload;
    use crate::test_support::{png_payload, sample_record};
    use pretty_assertions::assert_eq;

    fn resources(record: &InspectionRecord) -> RenderResources {
        let images = ImageCache::build(record, CompressionProfile::default(), Some(1)).unwrap();
        RenderResources::new(images, AssetStore::default())
    }

    #[test]
    fn documentation_distinguishes_absent_from_uncaptured() {
        let record = sample_record();
        let resources = resources(&record);
        let page = documentation_page(&record, &resources);

        // v5 flagged false -> N/A; service book unknown -> not captured;
        // locking wheel nut flagged true without a photo -> not captured.
        assert_eq!(page.texts().filter(|t| *t == "N/A").count(), 1);
        assert_eq!(page.texts().filter(|t| *t == "Not captured").count(), 3);
        // fuel and keys have photos
        assert_eq!(page.images().count(), 2);
        for category in PhotoCategory::DOCUMENT_SLOTS {
            assert!(page.contains_text(category.label()));
        }
    }

    #[test]
    fn empty_section_gets_one_placeholder_page() {
        let mut record = sample_record();
        record.photos = Default::default();
        let resources = resources(&record);
        let pages = photo_section_pages(&record, PhotoSection::Interior, &resources);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains_text("No photos captured"));
    }

    #[test]
    fn overflowing_section_continues() {
        let mut record = sample_record();
        record.photos.insert(
            PhotoCategory::ExteriorDriverSide,
            (0..4).map(|_| png_payload(8, 8)).collect(),
        );
        let resources = resources(&record);
        let pages = photo_section_pages(&record, PhotoSection::Exterior, &resources);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].title, "Exterior");
        assert_eq!(pages[1].title, "Exterior (continued)");
        assert_eq!(pages[1].images().count(), 2);
        assert!(pages[0].contains_text("Driver Side (1 of 4)"));
    }

    #[test]
    fn wheels_always_render_four_slots() {
        let record = sample_record();
        let resources = resources(&record);
        let page = wheels_page(&record, &resources);
        assert_eq!(page.images().count(), 1);
        assert_eq!(page.texts().filter(|t| *t == "Not captured").count(), 3);
    }

    #[test]
    fn cover_falls_back_to_company_name_without_logo() {
        let record = sample_record();
        let resources = resources(&record);
        let config = EngineConfig::default();
        let page = cover_page(&record, &resources, &config);
        assert!(page.contains_text(&config.company_name));
        assert!(page.contains_text("Proof of Collection"));
        assert!(page.contains_text("AB12 CDE"));
        assert!(page.contains_text("LS1 4AB"));
    }

    #[test]
    fn confirmation_without_signature_shows_placeholder() {
        let mut record = sample_record();
        record.signature = None;
        let resources = resources(&record);
        let page = confirmation_page(&record, &resources, &EngineConfig::default());
        assert!(page.contains_text("No signature captured"));
        assert!(page.contains_text("Alex Morgan"));
        assert!(page.contains_text("Vehicle collected with full tank."));
    }

    #[test]
    fn undecodable_signature_is_not_reported_as_missing() {
        let mut record = sample_record();
        record.signature = Some(ImagePayload::new(b"garbage".to_vec()));
        let resources = resources(&record);
        let page = confirmation_page(&record, &resources, &EngineConfig::default());
        assert!(page.contains_text("Signature image unavailable"));
        assert!(!page.contains_text("No signature captured"));
    }
}
