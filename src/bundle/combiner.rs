use std::collections::BTreeMap;

use lopdf::xref::XrefType;
use lopdf::{dictionary, Document, Object, ObjectId};

use crate::bundle::manifest::{BundleManifest, Money};
use crate::bundle::summary::summary_plan;
use crate::core::error::{EngineError, Result};
use crate::export::pdf_export::{build_pdf, pdf_date, PRODUCER};
use crate::imaging::RenderResources;
use crate::layout::text::encode_win_ansi;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

#[derive(Debug, Clone)]
pub struct CombinedBundle {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub grand_total: Money,
    pub summary_pages: usize,
}

/// Summary page(s) first, then every input's pages in input order. Inputs are
/// never re-rendered: their objects are renumbered and re-parented only.
pub fn combine(manifest: &BundleManifest) -> Result<CombinedBundle> {
    if manifest.entries.is_empty() {
        return Err(EngineError::EmptyBundle);
    }
    let grand_total = manifest.grand_total()?;

    let documents = manifest
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            Document::load_mem(&entry.document)
                .map_err(|source| EngineError::UnreadableBundleDocument { index, source })
        })
        .collect::<Result<Vec<_>>>()?;
    let page_counts: Vec<usize> = documents.iter().map(|doc| doc.get_pages().len()).collect();

    let summary = summary_plan(manifest, &page_counts, grand_total);
    let summary_pages = summary.page_count();
    let summary_doc = build_pdf(&summary, &RenderResources::default())?;

    let mut sources = Vec::with_capacity(documents.len() + 1);
    sources.push(summary_doc);
    sources.extend(documents);
    let mut merged = merge_documents(sources)?;

    let mut info = dictionary! {
        "Title" => Object::string_literal(encode_win_ansi(&manifest.title)),
        "Producer" => Object::string_literal(PRODUCER),
    };
    if let Some(issued_at) = &manifest.issued_at {
        info.set("CreationDate", Object::string_literal(pdf_date(issued_at)));
    }
    let info_id = merged.add_object(info);
    merged.trailer.set("Info", info_id);

    let page_count = merged.get_pages().len();
    let mut bytes = Vec::new();
    merged.save_to(&mut bytes)?;

    log::info!(
        "combined {} documents into {} pages ({} summary), total {}",
        manifest.entries.len(),
        page_count,
        summary_pages,
        grand_total
    );
    Ok(CombinedBundle {
        bytes,
        page_count,
        grand_total,
        summary_pages,
    })
}

fn type_name(object: &Object) -> Option<&[u8]> {
    object.as_dict().ok()?.get(b"Type").ok()?.as_name().ok()
}

/// Attributes the page would inherit from its ancestors and does not set
/// itself, nearest ancestor first.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(&'static [u8], Object)> {
    let mut found: Vec<(&'static [u8], Object)> = Vec::new();
    let Ok(page) = doc.get_dictionary(page_id) else {
        return found;
    };
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    // Bounded walk; malformed files can contain cycles.
    let mut depth = 0;
    while let Some(node_id) = parent {
        if depth > 64 {
            break;
        }
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };
        for key in INHERITABLE {
            if page.has(key) || found.iter().any(|(k, _)| *k == key) {
                continue;
            }
            if let Ok(value) = node.get(key) {
                found.push((key, value.clone()));
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }
    found
}

/// Concatenates the page sequences of `documents` under one new page tree.
/// Catalogs and intermediate page-tree nodes are dropped; every other object
/// is carried over byte for byte apart from its new id.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    let mut merged = Document::with_version("1.5");
    merged.reference_table.cross_reference_type = XrefType::CrossReferenceTable;

    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        for page_id in doc.get_pages().into_values() {
            let inherited = inherited_attributes(&doc, page_id);
            if let Ok(page) = doc.get_object_mut(page_id).and_then(Object::as_dict_mut) {
                for (key, value) in inherited {
                    page.set(key, value);
                }
            }
            page_ids.push(page_id);
        }

        for (id, object) in doc.objects {
            let tree_node = matches!(type_name(&object), Some(b"Catalog") | Some(b"Pages"));
            if !tree_node {
                objects.insert(id, object);
            }
        }
    }

    merged.max_id = max_id;
    let pages_id = merged.new_object_id();
    for page_id in &page_ids {
        if let Some(Object::Dictionary(page)) = objects.get_mut(page_id) {
            page.set("Parent", pages_id);
        }
    }
    merged.objects.extend(objects);

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);
    Ok(merged)
}
