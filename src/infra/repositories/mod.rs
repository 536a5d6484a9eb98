pub mod sqlite_booking_repo;
pub mod sqlite_artist_repo;

pub mod postgres_booking_repo;
pub mod postgres_artist_repo;
