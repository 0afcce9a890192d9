mod memory;
mod pg;

use abi::{BookingStatus, Error, Reservation, ReservationQuery};
use async_trait::async_trait;

pub use memory::MemStore;
pub use pg::PgStore;

/// Persistence primitives for reservations. Implementations must make
/// `insert` reject a stay that overlaps an active one on the same room, so
/// the non-overlap invariant holds even if a caller bypasses the manager.
#[async_trait]
pub trait ReservationStore: Send + Sync + 'static {
    /// Persist a new reservation, assigning its id.
    async fn insert(&self, rsvp: Reservation) -> Result<Reservation, Error>;

    /// Fetch by id. `NotFound` if no such reservation exists.
    async fn get(&self, id: &str) -> Result<Reservation, Error>;

    /// Reservations still holding the room, ordered by check-in date.
    async fn active_for_room(&self, room_id: &str) -> Result<Vec<Reservation>, Error>;

    /// Compare-and-set status update: succeeds only while the stored status
    /// still equals `expected`. `NotFound` when the row is gone or the
    /// status moved underneath the caller.
    async fn update_status(
        &self,
        id: &str,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<Reservation, Error>;

    /// All reservations matching the filter, ordered by check-in date.
    async fn query(&self, query: &ReservationQuery) -> Result<Vec<Reservation>, Error>;
}
