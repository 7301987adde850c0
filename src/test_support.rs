//! Shared fixtures for unit tests.

use std::io::Cursor;
use std::path::Path;

use chrono::{TimeZone, Utc};
use image::{ImageFormat, Rgb, RgbImage};

use crate::core::model::{
    Conditions, DamageMarker, DamageSize, DamageType, DocumentPresenceFlags, ImagePayload,
    InspectionKind, InspectionPhotoSet, InspectionRecord, MarkerPosition, PhotoCategory,
    PointOfContact, PostalAddress, VehicleDescriptor, VehicleView,
};
use crate::imaging::AssetKind;

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn png_payload(width: u32, height: u32) -> ImagePayload {
    ImagePayload::new(png_bytes(width, height))
}

pub fn write_outline_assets(dir: &Path) {
    for view in VehicleView::OUTLINED {
        let path = dir.join(AssetKind::Outline(view).file_name());
        std::fs::write(path, png_bytes(60, 40)).unwrap();
    }
}

pub fn marker(id: &str, view: VehicleView, x: f32, y: f32) -> DamageMarker {
    DamageMarker {
        id: id.to_string(),
        view,
        position: MarkerPosition { x, y },
        damage_type: DamageType::Scratch,
        size: DamageSize::Small,
        description: format!("{id} on {}", view.label()),
        images: vec![png_payload(12, 9)],
    }
}

pub fn sample_record() -> InspectionRecord {
    let photos = InspectionPhotoSet::new()
        .with(PhotoCategory::ExteriorFront, vec![png_payload(16, 12)])
        .with(PhotoCategory::ExteriorRear, vec![png_payload(16, 12)])
        .with(PhotoCategory::InteriorDashboard, vec![png_payload(12, 16)])
        .with(PhotoCategory::WheelFrontLeft, vec![png_payload(10, 10)])
        .with(PhotoCategory::Fuel, vec![png_payload(10, 10)])
        .with(PhotoCategory::DocumentKeys, vec![png_payload(10, 10)]);

    InspectionRecord {
        job_reference: "JOB-2041".to_string(),
        kind: InspectionKind::Collection,
        vehicle: VehicleDescriptor {
            registration: "AB12 CDE".to_string(),
            make: "Ford".to_string(),
            model: "Transit Custom".to_string(),
            colour: "White".to_string(),
            vin: Some("WF0XXXTTGXKA12345".to_string()),
            mileage: Some(48_210),
        },
        collection_address: PostalAddress {
            lines: vec!["12 Depot Road".to_string(), "Leeds".to_string()],
            postcode: "LS1 4AB".to_string(),
        },
        delivery_address: PostalAddress {
            lines: vec!["Unit 3, Harbour Park".to_string(), "Hull".to_string()],
            postcode: "HU1 2CD".to_string(),
        },
        conditions: Conditions {
            weather: "Dry".to_string(),
            lighting: "Daylight".to_string(),
            cleanliness: "Clean".to_string(),
        },
        inspector: Some("Sam Driver".to_string()),
        point_of_contact: Some(PointOfContact {
            name: "Alex Morgan".to_string(),
            role: Some("Fleet Manager".to_string()),
        }),
        signature: Some(png_payload(40, 12)),
        notes: "Vehicle collected with full tank.".to_string(),
        inspected_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        photos,
        presence: DocumentPresenceFlags {
            keys: Some(true),
            v5: Some(false),
            locking_wheel_nut: Some(true),
            service_book: None,
        },
        markers: Vec::new(),
    }
}
