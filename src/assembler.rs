//! Document Assembler: fixes the page order and stamps header, footer and
//! page numbers once the total is known.

use crate::core::config::EngineConfig;
use crate::core::model::{InspectionRecord, PhotoSection};
use crate::imaging::ImageCatalog;
use crate::layout::chrome::page_chrome;
use crate::layout::page::{DocumentPlan, PageSpec};
use crate::layout::pages::{
    confirmation_page, cover_page, documentation_page, photo_section_pages, wheels_page,
};
use crate::overlay::{damage_evidence_pages, damage_overlay_page, MarkerNumbering};

/// Cover, Documentation, Exterior, Interior, Wheels, then the damage pages when
/// any marker exists, and Confirmation last.
pub fn assemble(
    record: &InspectionRecord,
    catalog: &dyn ImageCatalog,
    config: &EngineConfig,
) -> DocumentPlan {
    let mut pages = vec![
        cover_page(record, catalog, config),
        documentation_page(record, catalog),
    ];
    pages.extend(photo_section_pages(record, PhotoSection::Exterior, catalog));
    pages.extend(photo_section_pages(record, PhotoSection::Interior, catalog));
    pages.push(wheels_page(record, catalog));

    if !record.markers.is_empty() {
        let numbering = MarkerNumbering::new(&record.markers);
        pages.push(damage_overlay_page(record, &numbering, catalog, config));
        pages.extend(damage_evidence_pages(record, &numbering, catalog));
    }

    pages.push(confirmation_page(record, catalog, config));

    let title = record.kind.title();
    number_pages(&mut pages, title, &record.job_reference);
    log::debug!("assembled {} pages for {}", pages.len(), record.job_reference);

    DocumentPlan {
        title: title.to_string(),
        subject: record.job_reference.clone(),
        created: Some(record.inspected_at),
        pages,
    }
}

/// Assigns 1-based numbers and puts the chrome underneath each page's content.
pub fn number_pages(pages: &mut [PageSpec], document_title: &str, reference: &str) {
    let total = pages.len();
    for (idx, page) in pages.iter_mut().enumerate() {
        page.number = idx + 1;
        let mut elements = page_chrome(document_title, reference, &page.title, page.number, total);
        elements.append(&mut page.elements);
        page.elements = elements;
        log::debug!(
            "page {}/{} {:?} '{}': {} elements",
            page.number,
            total,
            page.kind,
            page.title,
            page.elements.len()
        );
    }
}
