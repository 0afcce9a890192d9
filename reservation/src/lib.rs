mod availability;
mod catalog;
mod lifecycle;
mod locks;
mod manager;
mod review;
mod store;

use std::sync::Arc;
use std::time::Duration;

use abi::{Error, Reservation, ReservationQuery, ReservationRequest, Review};
use async_trait::async_trait;

pub use availability::is_available;
pub use catalog::{GuestDirectory, MemGuestDirectory, MemRoomCatalog, RoomCatalog};
pub use lifecycle::transition;
pub use review::{can_review, MemReviewStore, ReviewStore};
pub use store::{MemStore, PgStore, ReservationStore};

pub type ReservationId = String;
pub type RoomId = String;
pub type GuestId = String;

/// The coordinator. Owns the per-room locks and runs every
/// read-check-write sequence under them.
pub struct ReservationManager<S> {
    store: S,
    rooms: Arc<dyn RoomCatalog>,
    guests: Arc<dyn GuestDirectory>,
    reviews: Arc<dyn ReviewStore>,
    locks: locks::RoomLocks,
    lock_timeout: Duration,
}

#[async_trait]
pub trait FrontDesk {
    /// Book a room for a date range. Atomic with respect to other attempts
    /// on the same room: of two overlapping requests exactly one wins.
    async fn reserve(&self, req: ReservationRequest) -> Result<Reservation, Error>;
    /// Created -> Confirmed.
    async fn confirm(&self, id: ReservationId) -> Result<Reservation, Error>;
    /// Created|Confirmed -> Cancelled. Frees the room for future stays.
    async fn cancel(&self, id: ReservationId) -> Result<Reservation, Error>;
    /// Confirmed -> Completed, once the stay is over.
    async fn complete(&self, id: ReservationId) -> Result<Reservation, Error>;
    /// Fetch one reservation by id.
    async fn get(&self, id: ReservationId) -> Result<Reservation, Error>;
    /// Reservations currently holding a room, for display.
    async fn active_for_room(&self, room_id: &str) -> Result<Vec<Reservation>, Error>;
    /// List reservations matching a filter.
    async fn query(&self, query: ReservationQuery) -> Result<Vec<Reservation>, Error>;
    /// Whether a guest may still review a reservation.
    async fn can_review(&self, guest_id: &str, id: ReservationId) -> Result<bool, Error>;
    /// Attach a review to a stay. At most one per reservation, owner only.
    async fn add_review(&self, review: Review) -> Result<Review, Error>;
}
