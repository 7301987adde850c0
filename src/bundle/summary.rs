use crate::bundle::manifest::{BundleManifest, Money};
use crate::core::geometry::{BBox, Point};
use crate::layout::chrome::page_chrome;
use crate::layout::page::{
    content_area, DocumentPlan, Element, FontWeight, PageKind, PageSpec, Rgb, Stroke, TextAlign,
};
use crate::layout::text::truncate_to_width;

pub const ROWS_PER_PAGE: usize = 28;
const ROW_HEIGHT: f32 = 18.0;
const TEXT_SIZE: f32 = 9.0;

/// Column left edges as fractions of the table width; the amount column is
/// right-aligned to the table edge.
const COLUMNS: [(&str, f32); 5] = [
    ("#", 0.0),
    ("Reference", 0.06),
    ("Secondary reference", 0.36),
    ("Pages", 0.68),
    ("Amount", 1.0),
];

fn cell_text(page: &mut PageSpec, table: BBox, column: usize, y: f32, text: &str, weight: FontWeight) {
    let (x, align) = if column == COLUMNS.len() - 1 {
        (table.x1, TextAlign::Right)
    } else {
        (table.x0 + table.width() * COLUMNS[column].1, TextAlign::Left)
    };
    let max_width = if column + 2 < COLUMNS.len() {
        table.width() * (COLUMNS[column + 1].1 - COLUMNS[column].1) - 6.0
    } else {
        table.width() * 0.3
    };
    page.push(Element::styled_text(
        Point::new(x, y),
        truncate_to_width(text, TEXT_SIZE, weight, max_width),
        TEXT_SIZE,
        weight,
        Rgb::INK,
        align,
    ));
}

fn header_row(page: &mut PageSpec, table: BBox, y: f32) -> f32 {
    page.push(Element::Rect {
        bbox: BBox::new(table.x0, y, table.x1, y + ROW_HEIGHT),
        fill: Some(Rgb::PANEL),
        stroke: None,
    });
    for (column, (name, _)) in COLUMNS.iter().enumerate() {
        cell_text(page, table, column, y + 12.5, name, FontWeight::Bold);
    }
    y + ROW_HEIGHT
}

/// Summary cover for a bundle: one row per entry with its own page count,
/// spilling onto further pages, and the grand total after the last row.
pub fn summary_plan(
    manifest: &BundleManifest,
    page_counts: &[usize],
    grand_total: Money,
) -> DocumentPlan {
    let rows: Vec<usize> = (0..manifest.entries.len()).collect();
    let chunks: Vec<&[usize]> = if rows.is_empty() {
        vec![&rows[..]]
    } else {
        rows.chunks(ROWS_PER_PAGE).collect()
    };
    let total_pages = chunks.len();
    let area = content_area();
    let document_pages: usize = page_counts.iter().sum();

    let mut pages = Vec::with_capacity(total_pages);
    for (page_idx, chunk) in chunks.into_iter().enumerate() {
        let title = if page_idx == 0 {
            "Summary".to_string()
        } else {
            "Summary (continued)".to_string()
        };
        let chrome = page_chrome(&manifest.title, "Bundle", &title, page_idx + 1, total_pages);
        let mut page = PageSpec::new(PageKind::BundleSummary, title);
        page.number = page_idx + 1;
        page.extend(chrome);

        let mut y = area.y0;
        if page_idx == 0 {
            page.push(Element::styled_text(
                Point::new(area.x0, y + 18.0),
                truncate_to_width(&manifest.title, 18.0, FontWeight::Bold, area.width()),
                18.0,
                FontWeight::Bold,
                Rgb::INK,
                TextAlign::Left,
            ));
            let issued = manifest
                .issued_at
                .map(|at| format!("Issued {}", at.format("%d %B %Y")))
                .unwrap_or_default();
            page.push(Element::styled_text(
                Point::new(area.x0, y + 36.0),
                format!(
                    "{} documents, {document_pages} pages. {issued}",
                    manifest.entries.len()
                )
                .trim_end()
                .to_string(),
                10.0,
                FontWeight::Regular,
                Rgb::MUTED,
                TextAlign::Left,
            ));
            y += 52.0;
        }

        y = header_row(&mut page, area, y);
        for &idx in chunk {
            let entry = &manifest.entries[idx];
            let baseline = y + 12.5;
            let pages_text = page_counts.get(idx).map(usize::to_string).unwrap_or_default();
            cell_text(&mut page, area, 0, baseline, &(idx + 1).to_string(), FontWeight::Regular);
            cell_text(&mut page, area, 1, baseline, &entry.reference, FontWeight::Regular);
            cell_text(&mut page, area, 2, baseline, &entry.secondary_reference, FontWeight::Regular);
            cell_text(&mut page, area, 3, baseline, &pages_text, FontWeight::Regular);
            cell_text(&mut page, area, 4, baseline, &entry.amount.to_string(), FontWeight::Regular);
            y += ROW_HEIGHT;
            page.push(Element::Line {
                from: Point::new(area.x0, y),
                to: Point::new(area.x1, y),
                stroke: Stroke::solid(Rgb::RULE, 0.5),
            });
        }

        if page_idx + 1 == total_pages {
            y += 8.0;
            page.push(Element::Line {
                from: Point::new(area.x0 + area.width() * 0.6, y),
                to: Point::new(area.x1, y),
                stroke: Stroke::solid(Rgb::INK, 1.0),
            });
            page.push(Element::styled_text(
                Point::new(area.x0 + area.width() * 0.6, y + 16.0),
                "Grand total",
                11.0,
                FontWeight::Bold,
                Rgb::INK,
                TextAlign::Left,
            ));
            page.push(Element::styled_text(
                Point::new(area.x1, y + 16.0),
                grand_total.to_string(),
                11.0,
                FontWeight::Bold,
                Rgb::INK,
                TextAlign::Right,
            ));
        }
        pages.push(page);
    }

    DocumentPlan {
        title: manifest.title.clone(),
        subject: "Bundle summary".to_string(),
        created: manifest.issued_at,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::manifest::BundleEntry;
    use pretty_assertions::assert_eq;

    fn manifest(entries: usize) -> BundleManifest {
        let mut manifest = BundleManifest::new("Invoice 4471");
        for i in 0..entries {
            manifest.entries.push(BundleEntry {
                document: Vec::new(),
                reference: format!("JOB-{i}"),
                secondary_reference: format!("PO-{i}"),
                amount: Money(1250),
            });
        }
        manifest
    }

    #[test]
    fn lists_every_entry_and_the_total() {
        let manifest = manifest(3);
        let plan = summary_plan(&manifest, &[2, 3, 1], manifest.grand_total().unwrap());
        assert_eq!(plan.page_count(), 1);
        let page = &plan.pages[0];
        for reference in ["JOB-0", "JOB-1", "JOB-2", "PO-2"] {
            assert!(page.contains_text(reference));
        }
        assert!(page.contains_text("3 documents, 6 pages."));
        assert!(page.contains_text("37.50"));
        assert!(page.contains_text("Grand total"));
    }

    #[test]
    fn long_manifests_continue_on_further_pages() {
        let manifest = manifest(ROWS_PER_PAGE + 3);
        let plan = summary_plan(
            &manifest,
            &vec![1; ROWS_PER_PAGE + 3],
            manifest.grand_total().unwrap(),
        );
        assert_eq!(plan.page_count(), 2);
        assert_eq!(plan.pages[1].title, "Summary (continued)");
        assert!(!plan.pages[0].contains_text("Grand total"));
        assert!(plan.pages[1].contains_text("Grand total"));
        assert!(plan.pages[1].contains_text(&format!("JOB-{}", ROWS_PER_PAGE)));
        assert!(plan.pages[1].contains_text("Page 2 of 2"));
    }
}
