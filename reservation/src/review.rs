use std::collections::HashMap;

use abi::{Error, Reservation, Review};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// The eligibility rule itself: the caller must own the stay and must not
/// have reviewed it yet. Lifecycle state is deliberately not consulted.
pub fn can_review(guest_id: &str, reservation: &Reservation, already_reviewed: bool) -> bool {
    reservation.guest_id == guest_id && !already_reviewed
}

/// Review persistence, keyed by reservation: at most one review each.
#[async_trait]
pub trait ReviewStore: Send + Sync + 'static {
    async fn insert(&self, review: Review) -> Result<Review, Error>;
    async fn exists_for_reservation(&self, reservation_id: &str) -> Result<bool, Error>;
}

/// HashMap-backed review store for tests and development.
#[derive(Debug, Default)]
pub struct MemReviewStore {
    // reservation id -> review; the key enforces one review per stay
    reviews: RwLock<HashMap<String, Review>>,
}

impl MemReviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for MemReviewStore {
    async fn insert(&self, mut review: Review) -> Result<Review, Error> {
        let mut reviews = self.reviews.write().await;
        if reviews.contains_key(&review.reservation_id) {
            return Err(Error::AlreadyReviewed);
        }
        if review.id.is_empty() {
            review.id = Uuid::new_v4().to_string();
        }
        reviews.insert(review.reservation_id.clone(), review.clone());
        Ok(review)
    }

    async fn exists_for_reservation(&self, reservation_id: &str) -> Result<bool, Error> {
        Ok(self.reviews.read().await.contains_key(reservation_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi::{BookingStatus, DateRange};
    use chrono::NaiveDate;

    fn reservation(guest_id: &str) -> Reservation {
        Reservation {
            id: "22222222-2222-2222-2222-222222222222".into(),
            room_id: "ocean-view-room-713".into(),
            guest_id: guest_id.into(),
            stay: DateRange {
                start: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
            },
            guests: 2,
            total_price: 200.0,
            note: String::new(),
            status: BookingStatus::Completed,
        }
    }

    #[test]
    fn owner_without_prior_review_is_eligible() {
        assert!(can_review("alice", &reservation("alice"), false));
    }

    #[test]
    fn non_owner_is_never_eligible() {
        assert!(!can_review("mallory", &reservation("alice"), false));
    }

    #[test]
    fn second_review_is_not_eligible() {
        assert!(!can_review("alice", &reservation("alice"), true));
    }

    #[tokio::test]
    async fn store_rejects_a_second_review() {
        let store = MemReviewStore::new();
        let review = Review::new("alice", "22222222-2222-2222-2222-222222222222", 5, "great stay");
        let saved = store.insert(review.clone()).await.unwrap();
        assert!(!saved.id.is_empty());
        assert!(store
            .exists_for_reservation(&saved.reservation_id)
            .await
            .unwrap());
        assert_eq!(store.insert(review).await.unwrap_err(), Error::AlreadyReviewed);
    }
}
