use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::types::PgRange;
use sqlx::postgres::PgRow;
use sqlx::types::Uuid;
use sqlx::{FromRow, Row};

use crate::{BookingStatus, DateRange, Error, Validator};

/// One committed stay. Rows are never deleted; cancellation is a state
/// transition so the history stays available for reviews and auditing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub room_id: String,
    pub guest_id: String,
    pub stay: DateRange,
    pub guests: i32,
    pub total_price: f64,
    pub note: String,
    pub status: BookingStatus,
}

/// What a caller submits to book a room. The store assigns the id and the
/// coordinator computes the price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub room_id: String,
    pub guest_id: String,
    pub stay: DateRange,
    pub guests: i32,
    pub note: String,
}

impl ReservationRequest {
    pub fn new(
        guest_id: impl Into<String>,
        room_id: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        guests: i32,
        note: impl Into<String>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            guest_id: guest_id.into(),
            stay: DateRange { start, end },
            guests,
            note: note.into(),
        }
    }
}

impl Validator for ReservationRequest {
    fn validate(&self) -> Result<(), Error> {
        if self.room_id.is_empty() {
            return Err(Error::InvalidRoomId(self.room_id.clone()));
        }
        if self.guest_id.is_empty() {
            return Err(Error::InvalidGuestId(self.guest_id.clone()));
        }
        if self.stay.start >= self.stay.end {
            return Err(Error::InvalidRange);
        }
        if self.guests < 1 {
            return Err(Error::InvalidGuestCount(self.guests));
        }
        Ok(())
    }
}

impl FromRow<'_, PgRow> for Reservation {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let id: Uuid = row.try_get("id")?;
        let range: PgRange<NaiveDate> = row.try_get("stay")?;
        let stay = DateRange::try_from(range).map_err(|e| sqlx::Error::ColumnDecode {
            index: "stay".into(),
            source: Box::new(e),
        })?;
        Ok(Self {
            id: id.to_string(),
            room_id: row.try_get("room_id")?,
            guest_id: row.try_get("guest_id")?,
            stay,
            guests: row.try_get("guests")?,
            total_price: row.try_get("total_price")?,
            note: row.try_get("note")?,
            status: row.try_get("status")?,
        })
    }
}
