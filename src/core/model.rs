//! Validated inspection data. Values of these types only come out of
//! [`crate::core::validate`], so renderers can rely on every invariant
//! stated here without re-checking.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum VehicleView {
    Front,
    Rear,
    DriverSide,
    PassengerSide,
    Roof,
}

impl VehicleView {
    /// Traversal order for numbering and page sequencing. Roof has no outline
    /// and therefore always numbers last.
    pub const CANONICAL: [VehicleView; 5] = [
        VehicleView::Front,
        VehicleView::Rear,
        VehicleView::DriverSide,
        VehicleView::PassengerSide,
        VehicleView::Roof,
    ];

    /// Views drawn on the damage overlay page, in slot order.
    pub const OUTLINED: [VehicleView; 4] = [
        VehicleView::Front,
        VehicleView::Rear,
        VehicleView::DriverSide,
        VehicleView::PassengerSide,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VehicleView::Front => "Front",
            VehicleView::Rear => "Rear",
            VehicleView::DriverSide => "Driver Side",
            VehicleView::PassengerSide => "Passenger Side",
            VehicleView::Roof => "Roof",
        }
    }

    pub fn has_outline(&self) -> bool {
        !matches!(self, VehicleView::Roof)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace(['_', '-', ' '], "").as_str() {
            "front" => Some(VehicleView::Front),
            "rear" | "back" => Some(VehicleView::Rear),
            "driverside" => Some(VehicleView::DriverSide),
            "passengerside" => Some(VehicleView::PassengerSide),
            "roof" | "top" => Some(VehicleView::Roof),
            _ => None,
        }
    }
}

impl fmt::Display for VehicleView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DamageType {
    Scratch,
    Dent,
    Chip,
    Crack,
    Scuff,
    Missing,
    Other,
}

impl DamageType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace(['_', '-', ' '], "").as_str() {
            "scratch" => Some(DamageType::Scratch),
            "dent" => Some(DamageType::Dent),
            "chip" => Some(DamageType::Chip),
            "crack" => Some(DamageType::Crack),
            "scuff" => Some(DamageType::Scuff),
            "missing" | "missingpart" => Some(DamageType::Missing),
            "other" => Some(DamageType::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DamageType::Scratch => "Scratch",
            DamageType::Dent => "Dent",
            DamageType::Chip => "Chip",
            DamageType::Crack => "Crack",
            DamageType::Scuff => "Scuff",
            DamageType::Missing => "Missing Part",
            DamageType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DamageSize {
    Small,
    Medium,
    Large,
}

impl DamageSize {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "small" => Some(DamageSize::Small),
            "medium" => Some(DamageSize::Medium),
            "large" => Some(DamageSize::Large),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DamageSize::Small => "Small",
            DamageSize::Medium => "Medium",
            DamageSize::Large => "Large",
        }
    }
}

/// Encoded image bytes exactly as captured (JPEG, PNG, ...).
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload(Vec<u8>);

impl ImagePayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImagePayload({} bytes)", self.0.len())
    }
}

/// Marker position in percent of the view frame. Both axes lie in `[0, 100]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MarkerPosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone)]
pub struct DamageMarker {
    pub id: String,
    pub view: VehicleView,
    pub position: MarkerPosition,
    pub damage_type: DamageType,
    pub size: DamageSize,
    pub description: String,
    pub images: Vec<ImagePayload>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum PhotoSection {
    Exterior,
    Interior,
    Wheels,
    Documents,
}

impl PhotoSection {
    pub fn label(&self) -> &'static str {
        match self {
            PhotoSection::Exterior => "Exterior",
            PhotoSection::Interior => "Interior",
            PhotoSection::Wheels => "Wheels",
            PhotoSection::Documents => "Documentation",
        }
    }
}

/// Every photo slot an inspection can fill, in flattening order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum PhotoCategory {
    ExteriorFront,
    ExteriorRear,
    ExteriorDriverSide,
    ExteriorPassengerSide,
    ExteriorRoof,
    InteriorDashboard,
    InteriorFrontSeats,
    InteriorBackSeats,
    InteriorBoot,
    WheelFrontLeft,
    WheelFrontRight,
    WheelRearLeft,
    WheelRearRight,
    DocumentKeys,
    DocumentV5,
    DocumentLockingWheelNut,
    DocumentServiceBook,
    Fuel,
    Odometer,
}

impl PhotoCategory {
    pub const ALL: [PhotoCategory; 19] = [
        PhotoCategory::ExteriorFront,
        PhotoCategory::ExteriorRear,
        PhotoCategory::ExteriorDriverSide,
        PhotoCategory::ExteriorPassengerSide,
        PhotoCategory::ExteriorRoof,
        PhotoCategory::InteriorDashboard,
        PhotoCategory::InteriorFrontSeats,
        PhotoCategory::InteriorBackSeats,
        PhotoCategory::InteriorBoot,
        PhotoCategory::WheelFrontLeft,
        PhotoCategory::WheelFrontRight,
        PhotoCategory::WheelRearLeft,
        PhotoCategory::WheelRearRight,
        PhotoCategory::DocumentKeys,
        PhotoCategory::DocumentV5,
        PhotoCategory::DocumentLockingWheelNut,
        PhotoCategory::DocumentServiceBook,
        PhotoCategory::Fuel,
        PhotoCategory::Odometer,
    ];

    pub const WHEELS: [PhotoCategory; 4] = [
        PhotoCategory::WheelFrontLeft,
        PhotoCategory::WheelFrontRight,
        PhotoCategory::WheelRearLeft,
        PhotoCategory::WheelRearRight,
    ];

    /// The six documentation slots, in grid order.
    pub const DOCUMENT_SLOTS: [PhotoCategory; 6] = [
        PhotoCategory::Fuel,
        PhotoCategory::Odometer,
        PhotoCategory::DocumentKeys,
        PhotoCategory::DocumentV5,
        PhotoCategory::DocumentLockingWheelNut,
        PhotoCategory::DocumentServiceBook,
    ];

    /// Position of this category in the flattened image batch.
    pub fn array_index(&self) -> usize {
        *self as usize
    }

    pub fn section(&self) -> PhotoSection {
        use PhotoCategory::*;
        match self {
            ExteriorFront | ExteriorRear | ExteriorDriverSide | ExteriorPassengerSide
            | ExteriorRoof => PhotoSection::Exterior,
            InteriorDashboard | InteriorFrontSeats | InteriorBackSeats | InteriorBoot => {
                PhotoSection::Interior
            }
            WheelFrontLeft | WheelFrontRight | WheelRearLeft | WheelRearRight => {
                PhotoSection::Wheels
            }
            DocumentKeys | DocumentV5 | DocumentLockingWheelNut | DocumentServiceBook | Fuel
            | Odometer => PhotoSection::Documents,
        }
    }

    pub fn label(&self) -> &'static str {
        use PhotoCategory::*;
        match self {
            ExteriorFront => "Front",
            ExteriorRear => "Rear",
            ExteriorDriverSide => "Driver Side",
            ExteriorPassengerSide => "Passenger Side",
            ExteriorRoof => "Roof",
            InteriorDashboard => "Dashboard",
            InteriorFrontSeats => "Front Seats",
            InteriorBackSeats => "Back Seats",
            InteriorBoot => "Boot",
            WheelFrontLeft => "Front Left Wheel",
            WheelFrontRight => "Front Right Wheel",
            WheelRearLeft => "Rear Left Wheel",
            WheelRearRight => "Rear Right Wheel",
            DocumentKeys => "Keys",
            DocumentV5 => "V5 Document",
            DocumentLockingWheelNut => "Locking Wheel Nut",
            DocumentServiceBook => "Service Book",
            Fuel => "Fuel Level",
            Odometer => "Odometer",
        }
    }

    pub fn in_section(section: PhotoSection) -> impl Iterator<Item = PhotoCategory> {
        Self::ALL
            .into_iter()
            .filter(move |category| category.section() == section)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InspectionPhotoSet {
    photos: BTreeMap<PhotoCategory, Vec<ImagePayload>>,
}

impl InspectionPhotoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: PhotoCategory, images: Vec<ImagePayload>) {
        if images.is_empty() {
            self.photos.remove(&category);
        } else {
            self.photos.insert(category, images);
        }
    }

    pub fn with(mut self, category: PhotoCategory, images: Vec<ImagePayload>) -> Self {
        self.insert(category, images);
        self
    }

    pub fn photos(&self, category: PhotoCategory) -> &[ImagePayload] {
        self.photos
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.photos.values().map(Vec::len).sum()
    }
}

/// Presence flags for the optional documents. `None` means nobody recorded an
/// answer, which is different from a recorded `false`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentPresenceFlags {
    pub keys: Option<bool>,
    pub v5: Option<bool>,
    pub locking_wheel_nut: Option<bool>,
    pub service_book: Option<bool>,
}

impl DocumentPresenceFlags {
    pub fn flag(&self, category: PhotoCategory) -> Option<bool> {
        match category {
            PhotoCategory::DocumentKeys => self.keys,
            PhotoCategory::DocumentV5 => self.v5,
            PhotoCategory::DocumentLockingWheelNut => self.locking_wheel_nut,
            PhotoCategory::DocumentServiceBook => self.service_book,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum InspectionKind {
    Collection,
    Delivery,
}

impl InspectionKind {
    pub fn title(&self) -> &'static str {
        match self {
            InspectionKind::Collection => "Proof of Collection",
            InspectionKind::Delivery => "Proof of Delivery",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleDescriptor {
    pub registration: String,
    pub make: String,
    pub model: String,
    pub colour: String,
    pub vin: Option<String>,
    pub mileage: Option<u32>,
}

impl VehicleDescriptor {
    pub fn summary(&self) -> String {
        [self.make.as_str(), self.model.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PostalAddress {
    pub lines: Vec<String>,
    pub postcode: String,
}

impl PostalAddress {
    pub fn display_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .lines
            .iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        if !self.postcode.trim().is_empty() {
            lines.push(self.postcode.trim().to_string());
        }
        lines
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Conditions {
    pub weather: String,
    pub lighting: String,
    pub cleanliness: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PointOfContact {
    pub name: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InspectionRecord {
    pub job_reference: String,
    pub kind: InspectionKind,
    pub vehicle: VehicleDescriptor,
    pub collection_address: PostalAddress,
    pub delivery_address: PostalAddress,
    pub conditions: Conditions,
    pub inspector: Option<String>,
    pub point_of_contact: Option<PointOfContact>,
    pub signature: Option<ImagePayload>,
    pub notes: String,
    pub inspected_at: DateTime<Utc>,
    pub photos: InspectionPhotoSet,
    pub presence: DocumentPresenceFlags,
    pub markers: Vec<DamageMarker>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn array_indices_follow_flattening_order() {
        for (idx, category) in PhotoCategory::ALL.iter().enumerate() {
            assert_eq!(category.array_index(), idx);
        }
        assert_eq!(PhotoCategory::Odometer.array_index(), 18);
    }

    #[test]
    fn parses_view_aliases() {
        assert_eq!(VehicleView::parse("driverSide"), Some(VehicleView::DriverSide));
        assert_eq!(VehicleView::parse("passenger_side"), Some(VehicleView::PassengerSide));
        assert_eq!(VehicleView::parse("Roof"), Some(VehicleView::Roof));
        assert_eq!(VehicleView::parse("underside"), None);
    }

    #[test]
    fn presence_flags_only_cover_optional_documents() {
        let flags = DocumentPresenceFlags {
            keys: Some(true),
            v5: Some(false),
            ..Default::default()
        };
        assert_eq!(flags.flag(PhotoCategory::DocumentKeys), Some(true));
        assert_eq!(flags.flag(PhotoCategory::DocumentV5), Some(false));
        assert_eq!(flags.flag(PhotoCategory::DocumentServiceBook), None);
        assert_eq!(flags.flag(PhotoCategory::Fuel), None);
    }

    #[test]
    fn empty_photo_lists_are_not_stored() {
        let set = InspectionPhotoSet::new()
            .with(PhotoCategory::ExteriorFront, vec![ImagePayload::new(vec![1, 2])])
            .with(PhotoCategory::ExteriorRear, vec![]);
        assert_eq!(set.total(), 1);
        assert!(set.photos(PhotoCategory::ExteriorRear).is_empty());
    }
}
