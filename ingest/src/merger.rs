//! Reconciliation of hotel records published by several suppliers.
//!
//! Records sharing a `hotel_id` are folded into one canonical record:
//! - Name, address, country: first non-empty value wins
//! - Details: the longest text wins
//! - Destination: first positive id wins
//! - Amenities and booking conditions: case-insensitive union, sorted
//! - Images: union keyed by link, first-seen order and caption

use crate::coordinator::SupplierResults;
use crate::hotel::{Amenities, Hotel, Image, Images, Location};
use indexmap::IndexMap;
use std::collections::HashSet;
use url::Url;

/// Canonical records keyed by `hotel_id`, in order of first appearance.
pub type CanonicalHotels = IndexMap<String, Hotel>;

/// A record that could not take part in reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub supplier: Url,
    pub position: usize,
}

#[derive(Debug, Default)]
pub struct Reconciled {
    pub hotels: CanonicalHotels,
    /// Records dropped because their `hotel_id` was empty.
    pub skipped: Vec<SkippedRecord>,
}

/// Folds the records of every successful supplier, in supplier order, into
/// one canonical record per hotel.
pub fn reconcile(results: &SupplierResults) -> Reconciled {
    let mut reconciled = Reconciled::default();

    for (supplier, hotels) in results.successes() {
        for (position, hotel) in hotels.iter().enumerate() {
            if hotel.hotel_id.is_empty() {
                tracing::warn!(supplier = %supplier, position, "Skipping hotel with empty ID");
                reconciled.skipped.push(SkippedRecord {
                    supplier: supplier.clone(),
                    position,
                });
                continue;
            }

            match reconciled.hotels.get_mut(&hotel.hotel_id) {
                Some(existing) => {
                    *existing = merge(std::mem::take(existing), hotel);
                    tracing::debug!(hotel_id = %hotel.hotel_id, supplier = %supplier, "Merged hotel");
                }
                None => {
                    reconciled
                        .hotels
                        .insert(hotel.hotel_id.clone(), canonicalize(hotel.clone()));
                    tracing::debug!(hotel_id = %hotel.hotel_id, supplier = %supplier, "Added new hotel");
                }
            }
        }
    }

    reconciled
}

/// Brings a freshly seen record into canonical form: set-like lists are
/// de-duplicated and sorted, images de-duplicated by link.
pub fn canonicalize(hotel: Hotel) -> Hotel {
    merge(hotel, &Hotel::default())
}

/// Merges `incoming` into `existing` and returns the combined record.
///
/// Nothing already present in `existing` is lost except where a rule
/// explicitly prefers the incoming value (longer details).
pub fn merge(existing: Hotel, incoming: &Hotel) -> Hotel {
    Hotel {
        hotel_id: existing.hotel_id,
        destination_id: if existing.destination_id <= 0 && incoming.destination_id > 0 {
            incoming.destination_id
        } else {
            existing.destination_id
        },
        hotel_name: first_non_empty(existing.hotel_name, &incoming.hotel_name),
        location: Location {
            address: first_non_empty(existing.location.address, &incoming.location.address),
            country: first_non_empty(existing.location.country, &incoming.location.country),
        },
        details: longest(existing.details, &incoming.details),
        amenities: Amenities {
            general: merge_string_sets(existing.amenities.general, &incoming.amenities.general),
            room: merge_string_sets(existing.amenities.room, &incoming.amenities.room),
        },
        images: Images {
            rooms: merge_images(existing.images.rooms, &incoming.images.rooms),
            site: merge_images(existing.images.site, &incoming.images.site),
        },
        booking_conditions: merge_string_sets(
            existing.booking_conditions,
            &incoming.booking_conditions,
        ),
    }
}

fn first_non_empty(current: String, incoming: &str) -> String {
    if current.trim().is_empty() && !incoming.trim().is_empty() {
        incoming.to_owned()
    } else {
        current
    }
}

fn longest(current: String, incoming: &str) -> String {
    if incoming.trim().chars().count() > current.trim().chars().count() {
        incoming.to_owned()
    } else {
        current
    }
}

/// Case-insensitive union. The first spelling encountered is kept and the
/// result is sorted by that spelling.
fn merge_string_sets(current: Vec<String>, incoming: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged: Vec<String> = current
        .into_iter()
        .chain(incoming.iter().cloned())
        .filter_map(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() || !seen.insert(trimmed.to_lowercase()) {
                return None;
            }
            Some(trimmed.to_owned())
        })
        .collect();

    merged.sort();
    merged
}

/// Union keyed by exact link, keeping first-seen order and caption.
fn merge_images(current: Vec<Image>, incoming: &[Image]) -> Vec<Image> {
    let mut seen = HashSet::new();

    current
        .into_iter()
        .chain(incoming.iter().cloned())
        .filter_map(|image| {
            let link = image.link.trim();
            if link.is_empty() || !seen.insert(link.to_owned()) {
                return None;
            }
            Some(Image::new(link, image.caption.trim()))
        })
        .collect()
}
