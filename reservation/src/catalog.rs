use std::collections::{HashMap, HashSet};

use abi::{Error, Room};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Room existence and pricing, supplied by the (out-of-scope) catalog.
#[async_trait]
pub trait RoomCatalog: Send + Sync + 'static {
    async fn room(&self, room_id: &str) -> Result<Option<Room>, Error>;
}

/// Guest existence, supplied by the (out-of-scope) user subsystem.
#[async_trait]
pub trait GuestDirectory: Send + Sync + 'static {
    async fn exists(&self, guest_id: &str) -> Result<bool, Error>;
}

/// HashMap-backed catalog for tests and development.
#[derive(Debug, Default)]
pub struct MemRoomCatalog {
    rooms: RwLock<HashMap<String, Room>>,
}

impl MemRoomCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, room: Room) {
        self.rooms.write().await.insert(room.id.clone(), room);
    }
}

#[async_trait]
impl RoomCatalog for MemRoomCatalog {
    async fn room(&self, room_id: &str) -> Result<Option<Room>, Error> {
        Ok(self.rooms.read().await.get(room_id).cloned())
    }
}

/// HashSet-backed directory for tests and development.
#[derive(Debug, Default)]
pub struct MemGuestDirectory {
    guests: RwLock<HashSet<String>>,
}

impl MemGuestDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, guest_id: impl Into<String>) {
        self.guests.write().await.insert(guest_id.into());
    }
}

#[async_trait]
impl GuestDirectory for MemGuestDirectory {
    async fn exists(&self, guest_id: &str) -> Result<bool, Error> {
        Ok(self.guests.read().await.contains(guest_id))
    }
}
