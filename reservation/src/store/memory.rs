use std::collections::HashMap;
use std::sync::Arc;

use abi::{
    BookingStatus, Error, Reservation, ReservationConflict, ReservationConflictInfo,
    ReservationQuery, ReservationWindow,
};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ReservationStore;

/// In-process store for tests and development. Enforces the same
/// non-overlap rule the Postgres exclusion constraint does, under the write
/// lock, so it is safe even for callers that skip the manager.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    inner: Arc<RwLock<HashMap<String, Reservation>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationStore for MemStore {
    async fn insert(&self, mut rsvp: Reservation) -> Result<Reservation, Error> {
        let mut map = self.inner.write().await;
        if let Some(existing) = map
            .values()
            .find(|r| {
                r.room_id == rsvp.room_id
                    && r.status.holds_room()
                    && r.stay.overlaps(&rsvp.stay)
            })
        {
            return Err(Error::ConflictReservation(ReservationConflictInfo::Parsed(
                ReservationConflict {
                    new: ReservationWindow {
                        rid: rsvp.room_id.clone(),
                        start: rsvp.stay.start,
                        end: rsvp.stay.end,
                    },
                    old: ReservationWindow {
                        rid: existing.room_id.clone(),
                        start: existing.stay.start,
                        end: existing.stay.end,
                    },
                },
            )));
        }
        if rsvp.id.is_empty() {
            rsvp.id = Uuid::new_v4().to_string();
        }
        map.insert(rsvp.id.clone(), rsvp.clone());
        Ok(rsvp)
    }

    async fn get(&self, id: &str) -> Result<Reservation, Error> {
        self.inner
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn active_for_room(&self, room_id: &str) -> Result<Vec<Reservation>, Error> {
        let map = self.inner.read().await;
        let mut active: Vec<_> = map
            .values()
            .filter(|r| r.room_id == room_id && r.status.holds_room())
            .cloned()
            .collect();
        active.sort_by_key(|r| r.stay.start);
        Ok(active)
    }

    async fn update_status(
        &self,
        id: &str,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<Reservation, Error> {
        let mut map = self.inner.write().await;
        match map.get_mut(id) {
            Some(r) if r.status == expected => {
                r.status = next;
                Ok(r.clone())
            }
            _ => Err(Error::NotFound),
        }
    }

    async fn query(&self, query: &ReservationQuery) -> Result<Vec<Reservation>, Error> {
        let map = self.inner.read().await;
        let mut found: Vec<_> = map
            .values()
            .filter(|r| {
                query.room_id.as_ref().map_or(true, |id| *id == r.room_id)
                    && query.guest_id.as_ref().map_or(true, |id| *id == r.guest_id)
                    && query.matches_status(r.status)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| (a.stay.start, &a.id).cmp(&(b.stay.start, &b.id)));
        Ok(found)
    }
}
