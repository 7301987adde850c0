use crate::core::config::EngineConfig;
use crate::core::geometry::{BBox, Point};
use crate::core::model::{InspectionRecord, VehicleView};
use crate::imaging::{AssetKind, ImageCatalog, ImageSource};
use crate::layout::card::numbered_badge;
use crate::layout::grid::grid_cells;
use crate::layout::page::{
    content_area, Element, FontWeight, PageKind, PageSpec, Rgb, Stroke, TextAlign,
};
use crate::layout::pages::{section_heading, GRID_GAP};
use crate::layout::text::wrap_text;
use crate::overlay::numbering::MarkerNumbering;
use crate::overlay::projection::{project, OverlayCalibration};

const LABEL_BAND: f32 = 20.0;
const ROOF_STRIP_HEIGHT: f32 = 96.0;
const STRIP_TEXT_SIZE: f32 = 9.0;

/// Where markers of one view are drawn: the fitted outline when the asset is
/// loaded, otherwise the whole drawing area.
pub fn marker_frame(view: VehicleView, drawing: BBox, catalog: &dyn ImageCatalog) -> BBox {
    catalog
        .dimensions(&ImageSource::Asset(AssetKind::Outline(view)))
        .map(|(w, h)| drawing.fit_aspect(w, h))
        .unwrap_or(drawing)
}

/// Frame, caption, outline (or a textual fallback) and numbered markers for
/// one outlined view.
pub fn render_view_slot(
    view: VehicleView,
    slot: BBox,
    record: &InspectionRecord,
    numbering: &MarkerNumbering,
    catalog: &dyn ImageCatalog,
    calibration: OverlayCalibration,
    radius: f32,
) -> Vec<Element> {
    let mut elements = vec![Element::Rect {
        bbox: slot,
        fill: Some(Rgb::WHITE),
        stroke: Some(Stroke::solid(Rgb::RULE, 0.8)),
    }];

    let indices = numbering.markers_in(view);
    let caption = match indices.len() {
        0 => view.label().to_string(),
        1 => format!("{} (1 marker)", view.label()),
        n => format!("{} ({n} markers)", view.label()),
    };
    let (band, drawing) = slot.inset(6.0).split_top(LABEL_BAND);
    elements.push(Element::styled_text(
        Point::new(band.x0, band.y0 + 11.0),
        caption,
        10.0,
        FontWeight::Bold,
        Rgb::INK,
        TextAlign::Left,
    ));

    let source = ImageSource::Asset(AssetKind::Outline(view));
    let frame = marker_frame(view, drawing, catalog);
    if catalog.image(&source).is_some() {
        elements.push(Element::Image {
            bbox: frame,
            source,
        });
    } else {
        let (cx, cy) = frame.center();
        elements.push(Element::Rect {
            bbox: frame,
            fill: Some(Rgb::PANEL),
            stroke: Some(Stroke::dashed(Rgb::gray(0.6), 0.8)),
        });
        elements.push(Element::styled_text(
            Point::new(cx, cy + 3.0),
            format!("{} outline unavailable", view.label()),
            9.0,
            FontWeight::Regular,
            Rgb::MUTED,
            TextAlign::Center,
        ));
    }

    for &idx in indices {
        let Some(number) = numbering.number_of(idx) else {
            continue;
        };
        let center = project(record.markers[idx].position, &frame, calibration);
        elements.extend(numbered_badge(center, radius, number));
    }
    elements
}

/// Roof markers have no outline; they are listed in number order.
fn roof_strip(
    page: &mut PageSpec,
    area: BBox,
    record: &InspectionRecord,
    numbering: &MarkerNumbering,
) {
    let mut y = section_heading(page, area.x0, area.x1, area.y0, "Roof");
    let roof = numbering.markers_in(VehicleView::Roof);
    if roof.is_empty() {
        page.push(Element::styled_text(
            Point::new(area.x0, y + STRIP_TEXT_SIZE),
            "No roof damage recorded.",
            STRIP_TEXT_SIZE,
            FontWeight::Regular,
            Rgb::MUTED,
            TextAlign::Left,
        ));
        return;
    }

    let entries: Vec<String> = roof
        .iter()
        .filter_map(|&idx| {
            let marker = &record.markers[idx];
            numbering.number_of(idx).map(|number| {
                let mut entry = format!(
                    "{number}. {} - {}",
                    marker.damage_type.label(),
                    marker.size.label()
                );
                if !marker.description.trim().is_empty() {
                    entry.push_str(&format!(": {}", marker.description.trim()));
                }
                entry
            })
        })
        .collect();
    let lines = wrap_text(
        &entries.join("   "),
        STRIP_TEXT_SIZE,
        FontWeight::Regular,
        area.width(),
    );
    for line in lines {
        y += STRIP_TEXT_SIZE + 3.0;
        if y > area.y1 {
            break;
        }
        page.push(Element::styled_text(
            Point::new(area.x0, y),
            line,
            STRIP_TEXT_SIZE,
            FontWeight::Regular,
            Rgb::INK,
            TextAlign::Left,
        ));
    }
}

pub fn damage_overlay_page(
    record: &InspectionRecord,
    numbering: &MarkerNumbering,
    catalog: &dyn ImageCatalog,
    config: &EngineConfig,
) -> PageSpec {
    let mut page = PageSpec::new(PageKind::DamageOverlay, "Damage Overview");
    let calibration = OverlayCalibration::from_config(config);
    let (grid_area, strip) = content_area().split_bottom(ROOF_STRIP_HEIGHT);
    let cells = grid_cells(grid_area, 2, 2, GRID_GAP);

    for (view, cell) in VehicleView::OUTLINED.into_iter().zip(cells) {
        page.extend(render_view_slot(
            view,
            cell,
            record,
            numbering,
            catalog,
            calibration,
            config.marker_radius,
        ));
    }
    roof_strip(&mut page, strip.inset(4.0), record, numbering);
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{AssetStore, CompressionProfile, ImageCache, RenderResources};
    use crate::test_support::{marker, sample_record, write_outline_assets};
    use pretty_assertions::assert_eq;

    fn badge_numbers(page: &PageSpec) -> Vec<(u32, Point)> {
        let mut found = Vec::new();
        for pair in page.elements.windows(2) {
            if let [Element::Circle { center, fill: Some(fill), .. }, Element::Text { text, .. }] =
                pair
            {
                if *fill == Rgb::MARKER {
                    found.push((text.parse().unwrap(), *center));
                }
            }
        }
        found
    }

    #[test]
    fn markers_land_inside_their_view_frames() {
        let mut record = sample_record();
        record.markers = vec![
            marker("a", VehicleView::Front, 0.0, 0.0),
            marker("b", VehicleView::Rear, 100.0, 100.0),
            marker("c", VehicleView::PassengerSide, 50.0, 10.0),
            marker("d", VehicleView::Roof, 30.0, 30.0),
        ];
        let dir = tempfile::tempdir().unwrap();
        write_outline_assets(dir.path());
        let resources = RenderResources::new(
            ImageCache::default(),
            AssetStore::load(dir.path(), CompressionProfile::default()),
        );
        let numbering = MarkerNumbering::new(&record.markers);
        let page = damage_overlay_page(&record, &numbering, &resources, &EngineConfig::default());

        let badges = badge_numbers(&page);
        assert_eq!(
            badges.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        let outlines: Vec<BBox> = page
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Image { bbox, source: ImageSource::Asset(_) } => Some(*bbox),
                _ => None,
            })
            .collect();
        assert_eq!(outlines.len(), 4);
        assert!(outlines[0].contains(badges[0].1));
        assert!(outlines[1].contains(badges[1].1));
        assert!(outlines[3].contains(badges[2].1));
        assert!(page.contains_text("4. Scratch - Small: d on Roof"));
    }

    #[test]
    fn missing_outline_renders_text_fallback() {
        let mut record = sample_record();
        record.markers = vec![marker("a", VehicleView::DriverSide, 40.0, 60.0)];
        let resources = RenderResources::default();
        let numbering = MarkerNumbering::new(&record.markers);
        let page = damage_overlay_page(&record, &numbering, &resources, &EngineConfig::default());

        for view in VehicleView::OUTLINED {
            assert!(page.contains_text(&format!("{} outline unavailable", view.label())));
        }
        assert_eq!(badge_numbers(&page).len(), 1);
        assert!(page.contains_text("No roof damage recorded."));
    }
}
