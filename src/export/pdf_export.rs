//! Serializes a [`DocumentPlan`] into PDF bytes in one sequential pass.
//!
//! Layout coordinates have their origin at the top-left; PDF user space has it
//! at the bottom-left, so every y is flipped here and nowhere else.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::xref::XrefType;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::core::error::Result;
use crate::core::geometry::{BBox, Point};
use crate::export::Exporter;
use crate::imaging::{ImageCatalog, ImageSource};
use crate::layout::page::{
    DocumentPlan, Element, FontWeight, PageSpec, Rgb, Stroke, TextAlign, PAGE_HEIGHT, PAGE_WIDTH,
};
use crate::layout::text::{encode_win_ansi, text_width};

pub const PRODUCER: &str = concat!("inspectdoc ", env!("CARGO_PKG_VERSION"));

/// Control point distance for a quarter circle drawn as a cubic Bezier.
const KAPPA: f32 = 0.552_284_8;

fn pdf_y(y: f32) -> f32 {
    PAGE_HEIGHT - y
}

fn real(value: f32) -> Object {
    // Two decimals keeps streams small and output stable across platforms.
    Object::Real((value * 100.0).round() / 100.0)
}

fn op(operator: &str, operands: Vec<Object>) -> Operation {
    Operation::new(operator, operands)
}

fn color_ops(color: Rgb, stroking: bool) -> Operation {
    let operator = if stroking { "RG" } else { "rg" };
    op(operator, vec![real(color.0), real(color.1), real(color.2)])
}

fn stroke_ops(stroke: &Stroke, ops: &mut Vec<Operation>) {
    ops.push(color_ops(stroke.color, true));
    ops.push(op("w", vec![real(stroke.width)]));
    if stroke.dashed {
        ops.push(op("d", vec![vec![real(3.0), real(2.0)].into(), 0.into()]));
    }
}

fn paint(fill: Option<Rgb>, stroke: Option<&Stroke>, ops: &mut Vec<Operation>) -> Option<&'static str> {
    if let Some(color) = fill {
        ops.push(color_ops(color, false));
    }
    if let Some(stroke) = stroke {
        stroke_ops(stroke, ops);
    }
    match (fill.is_some(), stroke.is_some()) {
        (true, true) => Some("B"),
        (true, false) => Some("f"),
        (false, true) => Some("S"),
        (false, false) => None,
    }
}

fn rect_ops(bbox: &BBox, fill: Option<Rgb>, stroke: Option<&Stroke>, ops: &mut Vec<Operation>) {
    let Some(painter) = paint(fill, stroke, ops) else {
        return;
    };
    ops.push(op(
        "re",
        vec![
            real(bbox.x0),
            real(pdf_y(bbox.y1)),
            real(bbox.width()),
            real(bbox.height()),
        ],
    ));
    ops.push(op(painter, vec![]));
}

fn circle_ops(
    center: Point,
    radius: f32,
    fill: Option<Rgb>,
    stroke: Option<&Stroke>,
    ops: &mut Vec<Operation>,
) {
    let Some(painter) = paint(fill, stroke, ops) else {
        return;
    };
    let (cx, cy) = (center.x, pdf_y(center.y));
    let k = radius * KAPPA;
    ops.push(op("m", vec![real(cx + radius), real(cy)]));
    let quarters = [
        [cx + radius, cy + k, cx + k, cy + radius, cx, cy + radius],
        [cx - k, cy + radius, cx - radius, cy + k, cx - radius, cy],
        [cx - radius, cy - k, cx - k, cy - radius, cx, cy - radius],
        [cx + k, cy - radius, cx + radius, cy - k, cx + radius, cy],
    ];
    for quarter in quarters {
        ops.push(op("c", quarter.iter().map(|v| real(*v)).collect()));
    }
    ops.push(op("h", vec![]));
    ops.push(op(painter, vec![]));
}

fn text_ops(
    origin: Point,
    text: &str,
    size: f32,
    weight: FontWeight,
    color: Rgb,
    align: TextAlign,
    ops: &mut Vec<Operation>,
) {
    let width = text_width(text, size, weight);
    let x = match align {
        TextAlign::Left => origin.x,
        TextAlign::Center => origin.x - width * 0.5,
        TextAlign::Right => origin.x - width,
    };
    let font = match weight {
        FontWeight::Regular => "F1",
        FontWeight::Bold => "F2",
    };
    ops.push(color_ops(color, false));
    ops.push(op("BT", vec![]));
    ops.push(op("Tf", vec![font.into(), real(size)]));
    ops.push(op("Td", vec![real(x), real(pdf_y(origin.y))]));
    ops.push(op(
        "Tj",
        vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
    ));
    ops.push(op("ET", vec![]));
}

fn page_operations(page: &PageSpec, names: &BTreeMap<ImageSource, String>) -> Vec<Operation> {
    let mut ops = Vec::new();
    for element in &page.elements {
        ops.push(op("q", vec![]));
        match element {
            Element::Text {
                origin,
                text,
                size,
                weight,
                color,
                align,
            } => text_ops(*origin, text, *size, *weight, *color, *align, &mut ops),
            Element::Rect { bbox, fill, stroke } => rect_ops(bbox, *fill, stroke.as_ref(), &mut ops),
            Element::Circle {
                center,
                radius,
                fill,
                stroke,
            } => circle_ops(*center, *radius, *fill, stroke.as_ref(), &mut ops),
            Element::Line { from, to, stroke } => {
                stroke_ops(stroke, &mut ops);
                ops.push(op("m", vec![real(from.x), real(pdf_y(from.y))]));
                ops.push(op("l", vec![real(to.x), real(pdf_y(to.y))]));
                ops.push(op("S", vec![]));
            }
            Element::Image { bbox, source } => {
                if let Some(name) = names.get(source) {
                    ops.push(op(
                        "cm",
                        vec![
                            real(bbox.width()),
                            0.into(),
                            0.into(),
                            real(bbox.height()),
                            real(bbox.x0),
                            real(pdf_y(bbox.y1)),
                        ],
                    ));
                    ops.push(op("Do", vec![Object::Name(name.as_bytes().to_vec())]));
                }
            }
        }
        ops.push(op("Q", vec![]));
    }
    ops
}

fn font(base: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// `D:YYYYMMDDHHmmSSZ`
pub fn pdf_date(date: &DateTime<Utc>) -> String {
    date.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// Embeds every referenced image once, in first-use order, and returns the
/// XObject name for each source.
fn embed_images(
    doc: &mut Document,
    plan: &DocumentPlan,
    catalog: &dyn ImageCatalog,
) -> (BTreeMap<ImageSource, String>, Dictionary) {
    let mut names = BTreeMap::new();
    let mut xobjects = Dictionary::new();
    for source in plan.pages.iter().flat_map(PageSpec::images) {
        if names.contains_key(source) {
            continue;
        }
        let Some(image) = catalog.image(source) else {
            log::warn!("image {source:?} is referenced by the layout but not loaded");
            continue;
        };
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            image.data.clone(),
        )
        .with_compression(false);
        let id = doc.add_object(stream);
        let name = format!("Im{}", names.len() + 1);
        xobjects.set(name.as_bytes().to_vec(), id);
        names.insert(*source, name);
    }
    (names, xobjects)
}

/// Builds the document in memory. Output depends only on the plan and the
/// catalog contents.
pub fn build_pdf(plan: &DocumentPlan, catalog: &dyn ImageCatalog) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    doc.reference_table.cross_reference_type = XrefType::CrossReferenceTable;

    let pages_id = doc.new_object_id();
    let regular = doc.add_object(font("Helvetica"));
    let bold = doc.add_object(font("Helvetica-Bold"));
    let (names, xobjects) = embed_images(&mut doc, plan, catalog);

    let mut resources = dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    };
    if !xobjects.is_empty() {
        resources.set("XObject", xobjects);
    }
    let resources_id = doc.add_object(resources);

    let media_box: Vec<Object> = vec![0.into(), 0.into(), real(PAGE_WIDTH), real(PAGE_HEIGHT)];
    let mut kids: Vec<Object> = Vec::with_capacity(plan.pages.len());
    for page in &plan.pages {
        let content = Content {
            operations: page_operations(page, &names),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.clone(),
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "MediaBox" => media_box,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut info = dictionary! {
        "Title" => Object::string_literal(encode_win_ansi(&plan.title)),
        "Subject" => Object::string_literal(encode_win_ansi(&plan.subject)),
        "Producer" => Object::string_literal(PRODUCER),
    };
    if let Some(created) = &plan.created {
        info.set("CreationDate", Object::string_literal(pdf_date(created)));
    }
    let info_id = doc.add_object(info);
    doc.trailer.set("Info", info_id);

    doc.compress();
    Ok(doc)
}

pub fn render_pdf(plan: &DocumentPlan, catalog: &dyn ImageCatalog) -> Result<Vec<u8>> {
    let mut doc = build_pdf(plan, catalog)?;
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    log::debug!(
        "serialized {} pages for {} into {} bytes",
        plan.page_count(),
        plan.subject,
        buffer.len()
    );
    Ok(buffer)
}

#[derive(Debug, Clone)]
pub struct PdfExporter {
    path: PathBuf,
}

impl PdfExporter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Exporter for PdfExporter {
    fn export(&self, plan: &DocumentPlan, images: &dyn ImageCatalog) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, render_pdf(plan, images)?)?;
        Ok(())
    }
}
