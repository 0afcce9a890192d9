use abi::{
    BookingStatus, DbConfig, Error, Reservation, ReservationQuery, Review,
};
use async_trait::async_trait;
use sqlx::postgres::types::PgRange;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Uuid;
use sqlx::{FromRow, PgPool, Row};
use chrono::NaiveDate;

use super::ReservationStore;
use crate::ReviewStore;

/// Postgres-backed store. The non-overlap invariant is also enforced by the
/// schema: an exclusion constraint over `(room_id, stay)` restricted to
/// active rows, so even two racing transactions cannot both commit
/// overlapping stays. The constraint violation is translated into
/// `ConflictReservation` when the error is converted.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn from_config(config: &DbConfig) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url())
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn parse_id(id: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(id).map_err(|_| Error::InvalidReservationId(id.to_string()))
}

#[async_trait]
impl ReservationStore for PgStore {
    async fn insert(&self, mut rsvp: Reservation) -> Result<Reservation, Error> {
        let stay: PgRange<NaiveDate> = rsvp.stay.into();
        let id: Uuid = sqlx::query(
            "INSERT INTO booking.reservations (room_id, guest_id, stay, guests, total_price, note, status) VALUES ($1, $2, $3, $4, $5, $6, $7::booking.booking_status) RETURNING id"
        )
        .bind(rsvp.room_id.clone())
        .bind(rsvp.guest_id.clone())
        .bind(stay)
        .bind(rsvp.guests)
        .bind(rsvp.total_price)
        .bind(rsvp.note.clone())
        .bind(rsvp.status.to_string())
        .fetch_one(&self.pool)
        .await?
        .get(0);
        rsvp.id = id.to_string();
        Ok(rsvp)
    }

    async fn get(&self, id: &str) -> Result<Reservation, Error> {
        let id = parse_id(id)?;
        let rsvp = sqlx::query_as("SELECT * FROM booking.reservations WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(rsvp)
    }

    async fn active_for_room(&self, room_id: &str) -> Result<Vec<Reservation>, Error> {
        let active = sqlx::query_as(
            "SELECT * FROM booking.reservations WHERE room_id = $1 AND status IN ('created', 'confirmed') ORDER BY lower(stay)"
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(active)
    }

    async fn update_status(
        &self,
        id: &str,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<Reservation, Error> {
        let id = parse_id(id)?;
        let rsvp = sqlx::query_as(
            "UPDATE booking.reservations SET status = $1::booking.booking_status WHERE id = $2 AND status = $3::booking.booking_status RETURNING *"
        )
        .bind(next.to_string())
        .bind(id)
        .bind(expected.to_string())
        .fetch_one(&self.pool)
        .await?;
        Ok(rsvp)
    }

    async fn query(&self, query: &ReservationQuery) -> Result<Vec<Reservation>, Error> {
        let mut builder: sqlx::QueryBuilder<sqlx::Postgres> =
            sqlx::QueryBuilder::new("SELECT * FROM booking.reservations WHERE TRUE");
        if let Some(room_id) = &query.room_id {
            builder.push(" AND room_id = ").push_bind(room_id);
        }
        if let Some(guest_id) = &query.guest_id {
            builder.push(" AND guest_id = ").push_bind(guest_id);
        }
        if let Some(status) = query.status {
            builder
                .push(" AND status = ")
                .push_bind(status.to_string())
                .push("::booking.booking_status");
        }
        builder.push(" ORDER BY lower(stay), id");
        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(|row| Ok(Reservation::from_row(row)?)).collect()
    }
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn insert(&self, mut review: Review) -> Result<Review, Error> {
        let reservation_id = parse_id(&review.reservation_id)?;
        let id: Uuid = sqlx::query(
            "INSERT INTO booking.reviews (reservation_id, guest_id, rating, comment) VALUES ($1, $2, $3, $4) RETURNING id"
        )
        .bind(reservation_id)
        .bind(review.guest_id.clone())
        .bind(review.rating)
        .bind(review.comment.clone())
        .fetch_one(&self.pool)
        .await?
        .get(0);
        review.id = id.to_string();
        Ok(review)
    }

    async fn exists_for_reservation(&self, reservation_id: &str) -> Result<bool, Error> {
        let reservation_id = parse_id(reservation_id)?;
        let exists: bool =
            sqlx::query("SELECT EXISTS(SELECT 1 FROM booking.reviews WHERE reservation_id = $1)")
                .bind(reservation_id)
                .fetch_one(&self.pool)
                .await?
                .get(0);
        Ok(exists)
    }
}
