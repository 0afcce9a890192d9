mod config;
mod error;
mod types;

pub use config::*;
pub use error::{Error, ReservationConflict, ReservationConflictInfo, ReservationWindow};
pub use types::*;

/// Validate the data structure before it crosses the core boundary.
pub trait Validator {
    fn validate(&self) -> Result<(), Error>;
}
