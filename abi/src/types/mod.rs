mod date_range;
mod query;
mod reservation;
mod review;
mod room;
mod status;

pub use date_range::DateRange;
pub use query::{ReservationQuery, ReservationQueryBuilder};
pub use reservation::{Reservation, ReservationRequest};
pub use review::Review;
pub use room::Room;
pub use status::{BookingStatus, LifecycleEvent};
