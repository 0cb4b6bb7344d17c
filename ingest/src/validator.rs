use crate::hotel::Hotel;
use thiserror::Error;

/// Reasons a canonical record is not eligible for storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("hotel ID is required")]
    MissingHotelId,

    #[error("destination ID must be positive, got {0}")]
    InvalidDestinationId(i64),
}

pub fn validate(hotel: &Hotel) -> Result<(), ValidationError> {
    if hotel.hotel_id.is_empty() {
        return Err(ValidationError::MissingHotelId);
    }
    if hotel.destination_id <= 0 {
        return Err(ValidationError::InvalidDestinationId(hotel.destination_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::hotel;

    #[test]
    fn test_validate() {
        assert_eq!(validate(&hotel("iJhz", 5432)), Ok(()));
        assert_eq!(validate(&hotel("", 5432)), Err(ValidationError::MissingHotelId));
        assert_eq!(
            validate(&hotel("iJhz", 0)),
            Err(ValidationError::InvalidDestinationId(0))
        );
        assert_eq!(
            validate(&hotel("iJhz", -3)),
            Err(ValidationError::InvalidDestinationId(-3))
        );
    }
}
