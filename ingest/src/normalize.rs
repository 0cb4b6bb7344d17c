//! Cleans up a single supplier record.
//!
//! Normalization never rejects anything: values that cannot be cleaned are
//! emptied and it is up to the validator to decide what is acceptable.

use crate::hotel::{Amenities, Hotel, Image, Images, Location, RawHotel, RawImage};

pub fn normalize(raw: RawHotel) -> Hotel {
    let location = raw.location.unwrap_or_default();
    let amenities = raw.amenities.unwrap_or_default();
    let images = raw.images.unwrap_or_default();

    Hotel {
        hotel_id: clean_text(raw.hotel_id),
        destination_id: raw.destination_id.unwrap_or_default(),
        hotel_name: clean_text(raw.hotel_name),
        location: Location {
            address: clean_text(location.address),
            country: clean_text(location.country),
        },
        details: clean_text(raw.details),
        amenities: Amenities {
            general: clean_list(amenities.general),
            room: clean_list(amenities.room),
        },
        images: Images {
            rooms: clean_images(images.rooms),
            site: clean_images(images.site),
        },
        booking_conditions: clean_list(raw.booking_conditions),
    }
}

fn clean_text(value: Option<String>) -> String {
    match value {
        Some(s) => s.trim().to_owned(),
        None => String::new(),
    }
}

/// Trims every entry and drops the ones left empty, keeping the received order.
fn clean_list(values: Option<Vec<Option<String>>>) -> Vec<String> {
    values
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

/// An image without a link is useless even if it has a caption.
fn clean_images(images: Option<Vec<RawImage>>) -> Vec<Image> {
    images
        .unwrap_or_default()
        .into_iter()
        .filter_map(|raw| {
            let link = clean_text(raw.link);
            if link.is_empty() {
                return None;
            }
            Some(Image {
                link,
                caption: clean_text(raw.caption),
            })
        })
        .collect()
}
