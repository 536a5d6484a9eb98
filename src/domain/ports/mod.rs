use crate::domain::models::{artist::Artist, booking::{Booking, BookingStatus}};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Booking>, AppError>;
    /// Upsert: the store is authoritative, the repository mirrors it.
    async fn persist(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ArtistRepository: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Artist>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Artist>, AppError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangedEvent {
    pub booking_id: String,
    pub old_status: BookingStatus,
    pub new_status: BookingStatus,
    pub actor_id: String,
    pub occurred_at: DateTime<Utc>,
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn status_changed(&self, event: &StatusChangedEvent) -> Result<(), AppError>;
}
