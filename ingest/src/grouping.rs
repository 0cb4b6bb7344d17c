use crate::hotel::Hotel;
use std::collections::BTreeMap;

/// Accepted hotels grouped by destination, rebuilt from scratch every run.
pub type DestinationBatch = BTreeMap<i64, Vec<Hotel>>;

/// Appends every hotel to the list of its destination, keeping input order.
pub fn group_by_destination<'a>(hotels: impl IntoIterator<Item = &'a Hotel>) -> DestinationBatch {
    let mut batch = DestinationBatch::new();
    for hotel in hotels {
        batch
            .entry(hotel.destination_id)
            .or_default()
            .push(hotel.clone());
    }
    batch
}
