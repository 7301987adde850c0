use crate::core::geometry::{BBox, Point};
use crate::layout::page::{
    Element, FontWeight, Rgb, Stroke, TextAlign, FOOTER_HEIGHT, HEADER_HEIGHT, MARGIN,
    PAGE_HEIGHT, PAGE_WIDTH,
};
use crate::layout::text::truncate_to_width;

/// Header band and footer for one page. Needs the final page total, so it is
/// applied only after the page sequence is complete.
pub fn page_chrome(
    document_title: &str,
    reference: &str,
    page_title: &str,
    number: usize,
    total: usize,
) -> Vec<Element> {
    let band = BBox::from_origin(MARGIN, MARGIN, PAGE_WIDTH - 2.0 * MARGIN, HEADER_HEIGHT);
    let mut elements = vec![
        Element::Rect {
            bbox: band,
            fill: Some(Rgb::BRAND),
            stroke: None,
        },
        Element::styled_text(
            Point::new(band.x0 + 12.0, band.y0 + 19.0),
            document_title,
            13.0,
            FontWeight::Bold,
            Rgb::WHITE,
            TextAlign::Left,
        ),
        Element::styled_text(
            Point::new(band.x0 + 12.0, band.y0 + 34.0),
            truncate_to_width(page_title, 9.0, FontWeight::Regular, band.width() * 0.6),
            9.0,
            FontWeight::Regular,
            Rgb::WHITE,
            TextAlign::Left,
        ),
        Element::styled_text(
            Point::new(band.x1 - 12.0, band.y0 + 19.0),
            reference,
            10.0,
            FontWeight::Bold,
            Rgb::WHITE,
            TextAlign::Right,
        ),
    ];

    let rule_y = PAGE_HEIGHT - MARGIN - FOOTER_HEIGHT + 6.0;
    elements.push(Element::Line {
        from: Point::new(MARGIN, rule_y),
        to: Point::new(PAGE_WIDTH - MARGIN, rule_y),
        stroke: Stroke::solid(Rgb::RULE, 0.6),
    });
    elements.push(Element::styled_text(
        Point::new(PAGE_WIDTH - MARGIN, rule_y + 13.0),
        format!("Page {number} of {total}"),
        8.0,
        FontWeight::Regular,
        Rgb::MUTED,
        TextAlign::Right,
    ));
    elements.push(Element::styled_text(
        Point::new(MARGIN, rule_y + 13.0),
        reference,
        8.0,
        FontWeight::Regular,
        Rgb::MUTED,
        TextAlign::Left,
    ));
    elements
}
