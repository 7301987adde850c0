#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose, Engine};
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};

pub fn png_bytes(width: u32, height: u32, seed: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x as u8).wrapping_mul(9).wrapping_add(seed), (y as u8).wrapping_mul(5), 90])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn png_base64(width: u32, height: u32, seed: u8) -> String {
    general_purpose::STANDARD.encode(png_bytes(width, height, seed))
}

pub fn write_outline_assets(dir: &Path) {
    for name in ["front", "rear", "driver_side", "passenger_side"] {
        std::fs::write(dir.join(format!("outline_{name}.png")), png_bytes(80, 50, 3)).unwrap();
    }
}

pub fn marker(id: &str, view: &str, x: f64, y: f64) -> Value {
    json!({
        "id": id,
        "view": view,
        "x": x,
        "y": y,
        "damageType": "dent",
        "size": "medium",
        "description": format!("{id} near the {view} panel"),
        "images": [png_base64(20, 14, 7)]
    })
}

/// A delivery record with a handful of photos and the given markers.
pub fn record_json(markers: Vec<Value>) -> String {
    json!({
        "jobReference": "JOB-5150",
        "kind": "delivery",
        "vehicle": {
            "registration": "YX19 LMN",
            "make": "Vauxhall",
            "model": "Vivaro",
            "colour": "Silver",
            "mileage": 61022
        },
        "collectionAddress": { "lines": ["4 Mill Lane", "York"], "postcode": "YO1 7HH" },
        "deliveryAddress": { "lines": ["Dock Street", "Grimsby"], "postcode": "DN31 3AA" },
        "conditions": { "weather": "Rain", "lighting": "Overcast", "cleanliness": "Dirty" },
        "inspector": "Jo Carter",
        "pointOfContact": { "name": "Priya Shah", "role": "Site Manager" },
        "signature": format!("data:image/png;base64,{}", png_base64(60, 20, 1)),
        "notes": "Delivered to rear yard. Light scuff noted on arrival.",
        "inspectedAt": "2024-05-14T16:05:00Z",
        "photos": {
            "exterior": {
                "front": [png_base64(32, 24, 10)],
                "rear": [png_base64(32, 24, 11)],
                "driverSide": [png_base64(32, 24, 12)]
            },
            "interior": { "dashboard": [png_base64(24, 32, 13)] },
            "wheels": { "frontLeft": [png_base64(16, 16, 14)], "rearRight": [png_base64(16, 16, 15)] },
            "documents": { "keys": [png_base64(16, 16, 16)] },
            "fuel": [png_base64(16, 16, 17)],
            "odometer": [png_base64(16, 16, 18)]
        },
        "documentPresence": { "keys": true, "v5": false, "lockingWheelNut": true },
        "damageMarkers": markers
    })
    .to_string()
}
