mod conflict;

use chrono::NaiveDate;
use sqlx::postgres::PgDatabaseError;
use thiserror::Error;

use crate::{BookingStatus, LifecycleEvent};

pub use conflict::{ReservationConflict, ReservationConflictInfo, ReservationWindow};

#[derive(Error, Debug)]
pub enum Error {
    #[error("database error")]
    DbError(sqlx::Error),

    #[error("failed to read configuration file")]
    ConfigReadError,

    #[error("failed to parse configuration file")]
    ConfigParseError,

    #[error("check-out date must be after check-in date")]
    InvalidRange,

    #[error("check-in date {0} is in the past")]
    PastCheckIn(NaiveDate),

    #[error("invalid room id: {0}")]
    InvalidRoomId(String),

    #[error("invalid guest id: {0}")]
    InvalidGuestId(String),

    #[error("invalid reservation id: {0}")]
    InvalidReservationId(String),

    #[error("guest count must be at least 1, got {0}")]
    InvalidGuestCount(i32),

    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i32),

    #[error("room {0} not found")]
    RoomNotFound(String),

    #[error("guest {0} not found")]
    GuestNotFound(String),

    #[error("room is not available for the selected dates")]
    ConflictReservation(ReservationConflictInfo),

    #[error("cannot {event} a {from} reservation")]
    InvalidTransition {
        from: BookingStatus,
        event: LifecycleEvent,
    },

    #[error("reservation has already been reviewed")]
    AlreadyReviewed,

    #[error("reservation belongs to a different guest")]
    NotOwner,

    #[error("timed out waiting for the room lock")]
    LockTimeout,

    #[error("no reservation found by the given condition")]
    NotFound,
}

impl Error {
    /// Transient faults carry no business outcome; callers may retry them,
    /// re-running the whole check-then-act sequence.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::LockTimeout => true,
            Error::DbError(e) => matches!(
                e,
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
            ),
            _ => false,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(e) => {
                let err: &PgDatabaseError = e.downcast_ref();
                match (err.code(), err.table()) {
                    // exclusion constraint on (room_id, stay)
                    ("23P01", Some("reservations")) => {
                        let detail = err.detail().unwrap_or_default();
                        Error::ConflictReservation(detail.into())
                    }
                    // unique constraint on reviews.reservation_id
                    ("23505", Some("reviews")) => Error::AlreadyReviewed,
                    _ => Error::DbError(sqlx::Error::Database(e)),
                }
            }
            sqlx::Error::RowNotFound => Error::NotFound,
            _ => Error::DbError(e),
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::DbError(_), Self::DbError(_)) => true,
            (Self::ConfigReadError, Self::ConfigReadError) => true,
            (Self::ConfigParseError, Self::ConfigParseError) => true,
            (Self::InvalidRange, Self::InvalidRange) => true,
            (Self::PastCheckIn(a), Self::PastCheckIn(b)) => a == b,
            (Self::InvalidRoomId(a), Self::InvalidRoomId(b)) => a == b,
            (Self::InvalidGuestId(a), Self::InvalidGuestId(b)) => a == b,
            (Self::InvalidReservationId(a), Self::InvalidReservationId(b)) => a == b,
            (Self::InvalidGuestCount(a), Self::InvalidGuestCount(b)) => a == b,
            (Self::InvalidRating(a), Self::InvalidRating(b)) => a == b,
            (Self::RoomNotFound(a), Self::RoomNotFound(b)) => a == b,
            (Self::GuestNotFound(a), Self::GuestNotFound(b)) => a == b,
            (Self::ConflictReservation(a), Self::ConflictReservation(b)) => a == b,
            (
                Self::InvalidTransition { from: f1, event: e1 },
                Self::InvalidTransition { from: f2, event: e2 },
            ) => f1 == f2 && e1 == e2,
            (Self::AlreadyReviewed, Self::AlreadyReviewed) => true,
            (Self::NotOwner, Self::NotOwner) => true,
            (Self::LockTimeout, Self::LockTimeout) => true,
            (Self::NotFound, Self::NotFound) => true,
            _ => false,
        }
    }
}
