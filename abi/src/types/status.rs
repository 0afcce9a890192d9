use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a booking. Mirrors the `booking_status` enum in the
/// database schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Created,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// A reservation in one of these states still holds the room.
    pub fn holds_room(self) -> bool {
        matches!(self, BookingStatus::Created | BookingStatus::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Created => "created",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Events a caller can apply to an existing reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    Confirm,
    Cancel,
    Complete,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleEvent::Confirm => "confirm",
            LifecycleEvent::Cancel => "cancel",
            LifecycleEvent::Complete => "complete",
        };
        f.write_str(s)
    }
}
