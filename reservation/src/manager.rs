use std::sync::Arc;
use std::time::Duration;

use abi::{
    BookingStatus, DateRange, Error, LifecycleEvent, Reservation, ReservationConflict,
    ReservationConflictInfo, ReservationQuery, ReservationRequest, ReservationWindow, Review,
    Validator,
};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::locks::RoomLocks;
use crate::{
    availability, lifecycle, review, FrontDesk, GuestDirectory, ReservationId,
    ReservationManager, ReservationStore, ReviewStore, RoomCatalog,
};

impl<S: ReservationStore> ReservationManager<S> {
    pub fn new(
        store: S,
        rooms: Arc<dyn RoomCatalog>,
        guests: Arc<dyn GuestDirectory>,
        reviews: Arc<dyn ReviewStore>,
    ) -> Self {
        Self {
            store,
            rooms,
            guests,
            reviews,
            locks: RoomLocks::new(),
            lock_timeout: Duration::from_millis(5000),
        }
    }

    /// Bound the wait on the per-room lock (see `BookingConfig::lock_timeout_ms`).
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    async fn apply(&self, id: &str, event: LifecycleEvent) -> Result<Reservation, Error> {
        let current = self.store.get(id).await?;
        let next = lifecycle::transition(current.status, event)?;
        match self.store.update_status(id, current.status, next).await {
            Ok(rsvp) => {
                info!(id, %event, from = %current.status, to = %next, "reservation transitioned");
                Ok(rsvp)
            }
            // the status moved underneath us; report against the fresh state
            Err(Error::NotFound) => {
                let fresh = self.store.get(id).await?;
                Err(Error::InvalidTransition {
                    from: fresh.status,
                    event,
                })
            }
            Err(e) => Err(e),
        }
    }
}

fn conflict_info(
    candidate: &DateRange,
    room_id: &str,
    active: &[Reservation],
) -> ReservationConflictInfo {
    match active.iter().find(|r| candidate.overlaps(&r.stay)) {
        Some(existing) => ReservationConflictInfo::Parsed(ReservationConflict {
            new: ReservationWindow {
                rid: room_id.to_string(),
                start: candidate.start,
                end: candidate.end,
            },
            old: ReservationWindow {
                rid: existing.room_id.clone(),
                start: existing.stay.start,
                end: existing.stay.end,
            },
        }),
        None => ReservationConflictInfo::Unparsed(format!(
            "room {} unavailable for {}",
            room_id, candidate
        )),
    }
}

#[async_trait]
impl<S: ReservationStore> FrontDesk for ReservationManager<S> {
    async fn reserve(&self, req: ReservationRequest) -> Result<Reservation, Error> {
        req.validate()?;
        let today = Utc::now().date_naive();
        if req.stay.start < today {
            return Err(Error::PastCheckIn(req.stay.start));
        }
        let room = self
            .rooms
            .room(&req.room_id)
            .await?
            .ok_or_else(|| Error::RoomNotFound(req.room_id.clone()))?;
        if !self.guests.exists(&req.guest_id).await? {
            return Err(Error::GuestNotFound(req.guest_id.clone()));
        }

        // everything below happens inside the room's critical section, so no
        // other attempt on this room can interleave between check and insert
        let _guard = self.locks.acquire(&req.room_id, self.lock_timeout).await?;
        let active = self.store.active_for_room(&req.room_id).await?;
        if !availability::is_available(&req.stay, &active) {
            warn!(room_id = %req.room_id, stay = %req.stay, "reservation conflict");
            return Err(Error::ConflictReservation(conflict_info(
                &req.stay,
                &req.room_id,
                &active,
            )));
        }

        let total_price = req.stay.nights() as f64 * room.nightly_rate;
        let rsvp = self
            .store
            .insert(Reservation {
                id: String::new(),
                room_id: req.room_id,
                guest_id: req.guest_id,
                stay: req.stay,
                guests: req.guests,
                total_price,
                note: req.note,
                status: BookingStatus::Created,
            })
            .await?;
        info!(id = %rsvp.id, room_id = %rsvp.room_id, stay = %rsvp.stay, "reservation created");
        Ok(rsvp)
    }

    async fn confirm(&self, id: ReservationId) -> Result<Reservation, Error> {
        self.apply(&id, LifecycleEvent::Confirm).await
    }

    async fn cancel(&self, id: ReservationId) -> Result<Reservation, Error> {
        self.apply(&id, LifecycleEvent::Cancel).await
    }

    async fn complete(&self, id: ReservationId) -> Result<Reservation, Error> {
        self.apply(&id, LifecycleEvent::Complete).await
    }

    async fn get(&self, id: ReservationId) -> Result<Reservation, Error> {
        self.store.get(&id).await
    }

    async fn active_for_room(&self, room_id: &str) -> Result<Vec<Reservation>, Error> {
        self.store.active_for_room(room_id).await
    }

    async fn query(&self, query: ReservationQuery) -> Result<Vec<Reservation>, Error> {
        self.store.query(&query).await
    }

    async fn can_review(&self, guest_id: &str, id: ReservationId) -> Result<bool, Error> {
        let rsvp = self.store.get(&id).await?;
        let reviewed = self.reviews.exists_for_reservation(&id).await?;
        Ok(review::can_review(guest_id, &rsvp, reviewed))
    }

    async fn add_review(&self, review: Review) -> Result<Review, Error> {
        review.validate()?;
        let rsvp = self.store.get(&review.reservation_id).await?;
        if rsvp.guest_id != review.guest_id {
            return Err(Error::NotOwner);
        }
        if self
            .reviews
            .exists_for_reservation(&review.reservation_id)
            .await?
        {
            return Err(Error::AlreadyReviewed);
        }
        self.reviews.insert(review).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemGuestDirectory, MemReviewStore, MemRoomCatalog, MemStore};
    use abi::{ReservationQueryBuilder, Room};
    use chrono::NaiveDate;

    async fn make_manager() -> ReservationManager<MemStore> {
        let rooms = MemRoomCatalog::new();
        rooms
            .add(Room::new("ocean-view-room-713", "seaside-hotel", 100.0))
            .await;
        rooms
            .add(Room::new("garden-room-102", "seaside-hotel", 80.0))
            .await;
        let guests = MemGuestDirectory::new();
        guests.add("alice").await;
        guests.add("tyr").await;
        ReservationManager::new(
            MemStore::new(),
            Arc::new(rooms),
            Arc::new(guests),
            Arc::new(MemReviewStore::new()),
        )
    }

    fn day(offset: i64) -> NaiveDate {
        Utc::now().date_naive() + chrono::Duration::days(offset)
    }

    fn request(guest: &str, room: &str, from: i64, to: i64) -> ReservationRequest {
        ReservationRequest::new(guest, room, day(from), day(to), 2, "two nights by the sea")
    }

    #[tokio::test]
    async fn reserve_should_work_for_valid_window() {
        let manager = make_manager().await;
        let rsvp = manager
            .reserve(request("alice", "ocean-view-room-713", 10, 12))
            .await
            .unwrap();
        assert!(!rsvp.id.is_empty());
        assert_eq!(rsvp.status, BookingStatus::Created);
        assert_eq!(rsvp.total_price, 200.0);
    }

    #[tokio::test]
    async fn overlapping_reserve_should_reject() {
        let manager = make_manager().await;
        manager
            .reserve(request("alice", "ocean-view-room-713", 10, 12))
            .await
            .unwrap();
        let err = manager
            .reserve(request("tyr", "ocean-view-room-713", 11, 13))
            .await
            .unwrap_err();
        match err {
            Error::ConflictReservation(ReservationConflictInfo::Parsed(conflict)) => {
                assert_eq!(conflict.old.rid, "ocean-view-room-713");
                assert_eq!(conflict.old.start, day(10));
                assert_eq!(conflict.old.end, day(12));
                assert_eq!(conflict.new.start, day(11));
            }
            other => panic!("expected parsed conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn back_to_back_stays_should_both_succeed() {
        let manager = make_manager().await;
        manager
            .reserve(request("alice", "ocean-view-room-713", 10, 12))
            .await
            .unwrap();
        // shared boundary is not an overlap, before or after
        manager
            .reserve(request("tyr", "ocean-view-room-713", 12, 14))
            .await
            .unwrap();
        manager
            .reserve(request("tyr", "ocean-view-room-713", 5, 10))
            .await
            .unwrap();
        assert_eq!(
            manager
                .active_for_room("ocean-view-room-713")
                .await
                .unwrap()
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn cancel_should_free_the_room() {
        let manager = make_manager().await;
        let rsvp = manager
            .reserve(request("alice", "ocean-view-room-713", 10, 12))
            .await
            .unwrap();
        let cancelled = manager.cancel(rsvp.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        // the exact former range is available again
        manager
            .reserve(request("tyr", "ocean-view-room-713", 10, 12))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn invalid_range_should_not_touch_the_store() {
        let manager = make_manager().await;
        let err = manager
            .reserve(request("alice", "ocean-view-room-713", 12, 10))
            .await
            .unwrap_err();
        assert_eq!(err, Error::InvalidRange);
        let err = manager
            .reserve(request("alice", "ocean-view-room-713", 10, 10))
            .await
            .unwrap_err();
        assert_eq!(err, Error::InvalidRange);
        let all = manager.query(ReservationQuery::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn past_check_in_should_reject() {
        let manager = make_manager().await;
        let err = manager
            .reserve(request("alice", "ocean-view-room-713", -1, 2))
            .await
            .unwrap_err();
        assert_eq!(err, Error::PastCheckIn(day(-1)));
    }

    #[tokio::test]
    async fn unknown_room_or_guest_should_reject() {
        let manager = make_manager().await;
        let err = manager
            .reserve(request("alice", "no-such-room", 10, 12))
            .await
            .unwrap_err();
        assert_eq!(err, Error::RoomNotFound("no-such-room".into()));
        let err = manager
            .reserve(request("mallory", "ocean-view-room-713", 10, 12))
            .await
            .unwrap_err();
        assert_eq!(err, Error::GuestNotFound("mallory".into()));
    }

    #[tokio::test]
    async fn lifecycle_should_follow_the_transition_table() {
        let manager = make_manager().await;
        let rsvp = manager
            .reserve(request("alice", "ocean-view-room-713", 10, 12))
            .await
            .unwrap();

        let confirmed = manager.confirm(rsvp.id.clone()).await.unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);

        let err = manager.confirm(rsvp.id.clone()).await.unwrap_err();
        assert_eq!(
            err,
            Error::InvalidTransition {
                from: BookingStatus::Confirmed,
                event: LifecycleEvent::Confirm
            }
        );

        let completed = manager.complete(rsvp.id.clone()).await.unwrap();
        assert_eq!(completed.status, BookingStatus::Completed);

        let err = manager.cancel(rsvp.id).await.unwrap_err();
        assert_eq!(
            err,
            Error::InvalidTransition {
                from: BookingStatus::Completed,
                event: LifecycleEvent::Cancel
            }
        );
    }

    #[tokio::test]
    async fn completed_stay_should_not_hold_the_room() {
        let manager = make_manager().await;
        let rsvp = manager
            .reserve(request("alice", "ocean-view-room-713", 10, 12))
            .await
            .unwrap();
        manager.confirm(rsvp.id.clone()).await.unwrap();
        manager.complete(rsvp.id).await.unwrap();
        assert!(manager
            .active_for_room("ocean-view-room-713")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn review_gate_should_allow_the_owner_exactly_once() {
        let manager = make_manager().await;
        let rsvp = manager
            .reserve(request("alice", "ocean-view-room-713", 10, 12))
            .await
            .unwrap();

        assert!(manager.can_review("alice", rsvp.id.clone()).await.unwrap());
        assert!(!manager.can_review("tyr", rsvp.id.clone()).await.unwrap());

        let err = manager
            .add_review(Review::new("tyr", rsvp.id.clone(), 4, "was not even there"))
            .await
            .unwrap_err();
        assert_eq!(err, Error::NotOwner);

        manager
            .add_review(Review::new("alice", rsvp.id.clone(), 5, "great stay"))
            .await
            .unwrap();
        assert!(!manager.can_review("alice", rsvp.id.clone()).await.unwrap());

        let err = manager
            .add_review(Review::new("alice", rsvp.id, 3, "changed my mind"))
            .await
            .unwrap_err();
        assert_eq!(err, Error::AlreadyReviewed);
    }

    #[tokio::test]
    async fn query_should_list_a_guests_bookings() {
        let manager = make_manager().await;
        manager
            .reserve(request("alice", "ocean-view-room-713", 10, 12))
            .await
            .unwrap();
        manager
            .reserve(request("alice", "garden-room-102", 5, 8))
            .await
            .unwrap();
        manager
            .reserve(request("tyr", "ocean-view-room-713", 20, 22))
            .await
            .unwrap();

        let mine = manager
            .query(
                ReservationQueryBuilder::default()
                    .guest_id("alice")
                    .build()
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].room_id, "garden-room-102");
        assert_eq!(mine[1].total_price, 200.0);
    }
}
