use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::BookingStatus;

/// Filter for listing reservations. All fields optional; an empty query
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into, strip_option), default)]
pub struct ReservationQuery {
    pub room_id: Option<String>,
    pub guest_id: Option<String>,
    pub status: Option<BookingStatus>,
}

impl ReservationQuery {
    pub fn matches_status(&self, status: BookingStatus) -> bool {
        self.status.map_or(true, |s| s == status)
    }
}
