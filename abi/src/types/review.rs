use serde::{Deserialize, Serialize};

use crate::{Error, Validator};

/// A guest's review of a completed stay. At most one per reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub reservation_id: String,
    pub guest_id: String,
    pub rating: i32,
    pub comment: String,
}

impl Review {
    pub fn new(
        guest_id: impl Into<String>,
        reservation_id: impl Into<String>,
        rating: i32,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            reservation_id: reservation_id.into(),
            guest_id: guest_id.into(),
            rating,
            comment: comment.into(),
        }
    }
}

impl Validator for Review {
    fn validate(&self) -> Result<(), Error> {
        if self.guest_id.is_empty() {
            return Err(Error::InvalidGuestId(self.guest_id.clone()));
        }
        if self.reservation_id.is_empty() {
            return Err(Error::InvalidReservationId(self.reservation_id.clone()));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(Error::InvalidRating(self.rating));
        }
        Ok(())
    }
}
