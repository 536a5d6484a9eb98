use std::sync::Arc;
use crate::domain::ports::{ArtistRepository, BookingRepository, NotificationService};
use crate::domain::store::BookingStore;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<BookingStore>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub artist_repo: Arc<dyn ArtistRepository>,
    pub notification_service: Arc<dyn NotificationService>,
}
