//! Wire-format records and the one-time conversion into the typed model.

use base64::{engine::general_purpose, Engine};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::core::error::{EngineError, Result};
use crate::core::model::{
    Conditions, DamageMarker, DamageSize, DamageType, DocumentPresenceFlags, ImagePayload,
    InspectionKind, InspectionPhotoSet, InspectionRecord, MarkerPosition, PhotoCategory,
    PointOfContact, PostalAddress, VehicleDescriptor, VehicleView,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInspectionRecord {
    pub job_reference: String,
    pub kind: InspectionKind,
    #[serde(default)]
    pub vehicle: VehicleDescriptor,
    #[serde(default)]
    pub collection_address: PostalAddress,
    #[serde(default)]
    pub delivery_address: PostalAddress,
    #[serde(default)]
    pub conditions: Conditions,
    #[serde(default)]
    pub inspector: Option<String>,
    #[serde(default)]
    pub point_of_contact: Option<PointOfContact>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub inspected_at: DateTime<Utc>,
    #[serde(default)]
    pub photos: RawPhotoSet,
    #[serde(default)]
    pub document_presence: DocumentPresenceFlags,
    #[serde(default)]
    pub damage_markers: Vec<RawDamageMarker>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPhotoSet {
    pub exterior: RawExteriorPhotos,
    pub interior: RawInteriorPhotos,
    pub wheels: RawWheelPhotos,
    pub documents: RawDocumentPhotos,
    pub fuel: Vec<String>,
    pub odometer: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawExteriorPhotos {
    pub front: Vec<String>,
    pub rear: Vec<String>,
    pub driver_side: Vec<String>,
    pub passenger_side: Vec<String>,
    pub roof: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawInteriorPhotos {
    pub dashboard: Vec<String>,
    pub front_seats: Vec<String>,
    pub back_seats: Vec<String>,
    pub boot: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawWheelPhotos {
    pub front_left: Vec<String>,
    pub front_right: Vec<String>,
    pub rear_left: Vec<String>,
    pub rear_right: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDocumentPhotos {
    pub keys: Vec<String>,
    pub v5: Vec<String>,
    pub locking_wheel_nut: Vec<String>,
    pub service_book: Vec<String>,
}

impl RawPhotoSet {
    fn category(&self, category: PhotoCategory) -> &[String] {
        use PhotoCategory::*;
        match category {
            ExteriorFront => &self.exterior.front,
            ExteriorRear => &self.exterior.rear,
            ExteriorDriverSide => &self.exterior.driver_side,
            ExteriorPassengerSide => &self.exterior.passenger_side,
            ExteriorRoof => &self.exterior.roof,
            InteriorDashboard => &self.interior.dashboard,
            InteriorFrontSeats => &self.interior.front_seats,
            InteriorBackSeats => &self.interior.back_seats,
            InteriorBoot => &self.interior.boot,
            WheelFrontLeft => &self.wheels.front_left,
            WheelFrontRight => &self.wheels.front_right,
            WheelRearLeft => &self.wheels.rear_left,
            WheelRearRight => &self.wheels.rear_right,
            DocumentKeys => &self.documents.keys,
            DocumentV5 => &self.documents.v5,
            DocumentLockingWheelNut => &self.documents.locking_wheel_nut,
            DocumentServiceBook => &self.documents.service_book,
            Fuel => &self.fuel,
            Odometer => &self.odometer,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDamageMarker {
    pub id: String,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub damage_type: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

pub fn parse_record(json: &str) -> Result<InspectionRecord> {
    let raw: RawInspectionRecord = serde_json::from_str(json)?;
    validate_record(raw)
}

pub fn validate_record(raw: RawInspectionRecord) -> Result<InspectionRecord> {
    let mut photos = InspectionPhotoSet::new();
    for category in PhotoCategory::ALL {
        let images = raw
            .photos
            .category(category)
            .iter()
            .enumerate()
            .map(|(idx, encoded)| decode_payload(encoded, &format!("{category:?}[{idx}]")))
            .collect::<Result<Vec<_>>>()?;
        photos.insert(category, images);
    }

    let signature = raw
        .signature
        .as_deref()
        .filter(|encoded| !encoded.trim().is_empty())
        .map(|encoded| decode_payload(encoded, "signature"))
        .transpose()?;

    let markers = raw
        .damage_markers
        .into_iter()
        .map(validate_marker)
        .collect::<Result<Vec<_>>>()?;

    Ok(InspectionRecord {
        job_reference: raw.job_reference,
        kind: raw.kind,
        vehicle: raw.vehicle,
        collection_address: raw.collection_address,
        delivery_address: raw.delivery_address,
        conditions: raw.conditions,
        inspector: raw.inspector.filter(|name| !name.trim().is_empty()),
        point_of_contact: raw.point_of_contact,
        signature,
        notes: raw.notes.unwrap_or_default(),
        inspected_at: raw.inspected_at,
        photos,
        presence: raw.document_presence,
        markers,
    })
}

pub fn validate_marker(raw: RawDamageMarker) -> Result<DamageMarker> {
    let malformed = |reason: String| EngineError::MalformedMarker {
        marker_id: raw.id.clone(),
        reason,
    };

    let view_name = raw
        .view
        .as_deref()
        .ok_or_else(|| malformed("missing view".to_string()))?;
    let view =
        VehicleView::parse(view_name).ok_or_else(|| malformed(format!("unknown view '{view_name}'")))?;

    let x = coordinate(raw.x, "x").map_err(&malformed)?;
    let y = coordinate(raw.y, "y").map_err(&malformed)?;

    let damage_type = match raw.damage_type.as_deref() {
        None => DamageType::Other,
        Some(label) => DamageType::parse(label).unwrap_or_else(|| {
            log::warn!("marker {}: unknown damage type '{label}', using Other", raw.id);
            DamageType::Other
        }),
    };
    let size = match raw.size.as_deref() {
        None => DamageSize::Medium,
        Some(label) => DamageSize::parse(label)
            .ok_or_else(|| malformed(format!("unknown damage size '{label}'")))?,
    };

    let images = raw
        .images
        .iter()
        .enumerate()
        .map(|(idx, encoded)| decode_payload(encoded, &format!("marker {}[{idx}]", raw.id)))
        .collect::<Result<Vec<_>>>()?;

    Ok(DamageMarker {
        id: raw.id.clone(),
        view,
        position: MarkerPosition { x, y },
        damage_type,
        size,
        description: raw.description.clone().unwrap_or_default(),
        images,
    })
}

fn coordinate(value: Option<f64>, axis: &str) -> std::result::Result<f32, String> {
    let value = value.ok_or_else(|| format!("missing {axis} coordinate"))?;
    if !value.is_finite() {
        return Err(format!("{axis} coordinate is not a finite number"));
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(format!("{axis} coordinate {value} is outside [0, 100]"));
    }
    Ok(value as f32)
}

/// Accepts bare base64 or a `data:<mime>;base64,` URL.
pub fn decode_payload(encoded: &str, location: &str) -> Result<ImagePayload> {
    let trimmed = encoded.trim();
    let body = match trimmed.split_once(";base64,") {
        Some((prefix, body)) if prefix.starts_with("data:") => body,
        _ => trimmed,
    };
    general_purpose::STANDARD
        .decode(body)
        .map(ImagePayload::new)
        .map_err(|_| EngineError::InvalidImagePayload {
            location: location.to_string(),
        })
}
