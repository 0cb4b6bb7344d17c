//! Hotel records as published by suppliers and as stored after reconciliation.

use serde::{Deserialize, Serialize};

/// A hotel exactly as a supplier sent it. Any field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHotel {
    pub hotel_id: Option<String>,
    pub destination_id: Option<i64>,
    pub hotel_name: Option<String>,
    pub location: Option<RawLocation>,
    pub details: Option<String>,
    pub amenities: Option<RawAmenities>,
    pub images: Option<RawImages>,
    pub booking_conditions: Option<Vec<Option<String>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLocation {
    pub address: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAmenities {
    pub general: Option<Vec<Option<String>>>,
    pub room: Option<Vec<Option<String>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawImages {
    pub rooms: Option<Vec<RawImage>>,
    pub site: Option<Vec<RawImage>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawImage {
    pub link: Option<String>,
    pub caption: Option<String>,
}

/// Normalized hotel. Once it has been folded into the identity map it is the
/// canonical record for its `hotel_id`, and it is what gets stored and served.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotel {
    pub hotel_id: String,
    pub destination_id: i64,
    pub hotel_name: String,
    pub location: Location,
    pub details: String,
    pub amenities: Amenities,
    pub images: Images,
    pub booking_conditions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenities {
    pub general: Vec<String>,
    pub room: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Images {
    pub rooms: Vec<Image>,
    pub site: Vec<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub link: String,
    pub caption: String,
}

impl Image {
    pub fn new(link: impl Into<String>, caption: impl Into<String>) -> Self {
        Image {
            link: link.into(),
            caption: caption.into(),
        }
    }
}
