use serde::{Deserialize, Serialize};

/// The slice of the room catalog the booking core needs: enough to confirm
/// the room exists and to price a stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub hotel_id: String,
    pub nightly_rate: f64,
}

impl Room {
    pub fn new(id: impl Into<String>, hotel_id: impl Into<String>, nightly_rate: f64) -> Self {
        Self {
            id: id.into(),
            hotel_id: hotel_id.into(),
            nightly_rate,
        }
    }
}
