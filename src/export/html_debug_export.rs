use std::fs;
use std::path::PathBuf;

use base64::{engine::general_purpose, Engine};

use crate::core::error::Result;
use crate::export::Exporter;
use crate::imaging::ImageCatalog;
use crate::layout::page::{
    DocumentPlan, Element, FontWeight, PageSpec, Rgb, Stroke, TextAlign, PAGE_HEIGHT, PAGE_WIDTH,
};

/// One HTML file per page with every element absolutely positioned in points,
/// so overlay placement can be checked in a browser.
#[derive(Debug, Clone)]
pub struct HtmlDebugExporter {
    out_dir: PathBuf,
}

impl HtmlDebugExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn element_to_html(element: &Element, images: &dyn ImageCatalog) -> String {
        match element {
            Element::Text {
                origin,
                text,
                size,
                weight,
                color,
                align,
            } => {
                let (left, transform) = match align {
                    TextAlign::Left => (origin.x, "none"),
                    TextAlign::Center => (origin.x, "translateX(-50%)"),
                    TextAlign::Right => (origin.x, "translateX(-100%)"),
                };
                let font_weight = match weight {
                    FontWeight::Regular => "normal",
                    FontWeight::Bold => "bold",
                };
                format!(
                    r#"<div class='el text' style='left:{left}pt; top:{top}pt; font-size:{size}pt; font-weight:{font_weight}; color:{color}; transform:{transform};'>{text}</div>"#,
                    top = origin.y - size,
                    color = css_color(*color),
                    text = html_escape::encode_text(text),
                )
            }
            Element::Rect { bbox, fill, stroke } => format!(
                r#"<div class='el rect' style='left:{}pt; top:{}pt; width:{}pt; height:{}pt; {}'></div>"#,
                bbox.x0,
                bbox.y0,
                bbox.width(),
                bbox.height(),
                paint_css(*fill, stroke.as_ref()),
            ),
            Element::Circle {
                center,
                radius,
                fill,
                stroke,
            } => format!(
                r#"<div class='el circle' style='left:{}pt; top:{}pt; width:{d}pt; height:{d}pt; border-radius:50%; {}'></div>"#,
                center.x - radius,
                center.y - radius,
                paint_css(*fill, stroke.as_ref()),
                d = radius * 2.0,
            ),
            Element::Line { from, to, stroke } => {
                let dx = to.x - from.x;
                let dy = to.y - from.y;
                format!(
                    r#"<div class='el line' style='left:{}pt; top:{}pt; width:{}pt; border-top:{}pt {} {}; transform-origin:0 0; transform:rotate({}rad);'></div>"#,
                    from.x,
                    from.y,
                    (dx * dx + dy * dy).sqrt(),
                    stroke.width,
                    if stroke.dashed { "dashed" } else { "solid" },
                    css_color(stroke.color),
                    dy.atan2(dx),
                )
            }
            Element::Image { bbox, source } => {
                let src = images
                    .image(source)
                    .map(|image| {
                        format!(
                            "data:image/jpeg;base64,{}",
                            general_purpose::STANDARD.encode(&image.data)
                        )
                    })
                    .unwrap_or_default();
                format!(
                    r#"<img class='el image' data-source='{}' src='{}' style='left:{}pt; top:{}pt; width:{}pt; height:{}pt;' />"#,
                    html_escape::encode_single_quoted_attribute(&format!("{source:?}")),
                    src,
                    bbox.x0,
                    bbox.y0,
                    bbox.width(),
                    bbox.height(),
                )
            }
        }
    }

    fn page_to_html(plan: &DocumentPlan, page: &PageSpec, images: &dyn ImageCatalog) -> String {
        let body: String = page
            .elements
            .iter()
            .map(|element| Self::element_to_html(element, images))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset='utf-8'>
<title>{title} - page {number}</title>
<style>
body {{ margin: 0; background: #888; font-family: Helvetica, Arial, sans-serif; }}
#page {{ position: relative; width: {width}pt; height: {height}pt; margin: 20px auto; background: #fff; overflow: hidden; }}
.el {{ position: absolute; box-sizing: border-box; }}
.text {{ white-space: pre; line-height: 1; }}
</style>
</head>
<body>
<div id='page' data-kind='{kind:?}'>
{body}
</div>
</body>
</html>"#,
            title = html_escape::encode_text(&plan.title),
            number = page.number,
            width = PAGE_WIDTH,
            height = PAGE_HEIGHT,
            kind = page.kind,
        )
    }
}

fn css_color(color: Rgb) -> String {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(color.0),
        channel(color.1),
        channel(color.2)
    )
}

fn paint_css(fill: Option<Rgb>, stroke: Option<&Stroke>) -> String {
    let mut css = String::new();
    if let Some(fill) = fill {
        css.push_str(&format!("background:{};", css_color(fill)));
    }
    if let Some(stroke) = stroke {
        css.push_str(&format!(
            " border:{}pt {} {};",
            stroke.width,
            if stroke.dashed { "dashed" } else { "solid" },
            css_color(stroke.color)
        ));
    }
    css
}

impl Exporter for HtmlDebugExporter {
    fn export(&self, plan: &DocumentPlan, images: &dyn ImageCatalog) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        for page in &plan.pages {
            let html = HtmlDebugExporter::page_to_html(plan, page, images);
            let path = self.out_dir.join(format!("page_{:03}.html", page.number));
            fs::write(path, html)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{BBox, Point};
    use crate::imaging::RenderResources;
    use crate::layout::page::PageKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_one_file_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = PageSpec::new(PageKind::Cover, "Cover");
        first.number = 1;
        first.push(Element::text(40.0, 60.0, "Fish & <Chips>", 10.0));
        let mut second = PageSpec::new(PageKind::DamageOverlay, "Damage Overview");
        second.number = 2;
        second.push(Element::Circle {
            center: Point::new(100.0, 120.0),
            radius: 9.0,
            fill: Some(Rgb::MARKER),
            stroke: None,
        });
        second.push(Element::Rect {
            bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
            fill: None,
            stroke: Some(Stroke::dashed(Rgb::BLACK, 1.0)),
        });
        let plan = DocumentPlan {
            title: "Proof of Delivery".to_string(),
            subject: "JOB-3".to_string(),
            created: None,
            pages: vec![first, second],
        };

        HtmlDebugExporter::new(dir.path().to_path_buf())
            .export(&plan, &RenderResources::default())
            .unwrap();

        let cover = fs::read_to_string(dir.path().join("page_001.html")).unwrap();
        assert!(cover.contains("Fish &amp; &lt;Chips&gt;"));
        let overlay = fs::read_to_string(dir.path().join("page_002.html")).unwrap();
        assert!(overlay.contains("left:91pt; top:111pt; width:18pt; height:18pt;"));
        assert!(overlay.contains("border:1pt dashed #000000;"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
