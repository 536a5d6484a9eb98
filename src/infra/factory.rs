use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::{ArtistRepository, BookingRepository};
use crate::domain::store::BookingStore;
use crate::state::AppState;
use crate::infra::notification::http_notification_service::HttpNotificationService;
use crate::infra::repositories::{
    postgres_artist_repo::PostgresArtistRepo, postgres_booking_repo::PostgresBookingRepo,
    sqlite_artist_repo::SqliteArtistRepo, sqlite_booking_repo::SqliteBookingRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let notification_service = Arc::new(HttpNotificationService::new(
        config.notify_service_url.clone(),
        config.notify_service_token.clone(),
    ));

    let (booking_repo, artist_repo): (Arc<dyn BookingRepository>, Arc<dyn ArtistRepository>) =
        if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
            info!("Initializing PostgreSQL connection...");

            let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
            opts = opts.log_statements(LevelFilter::Debug)
                .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect_with(opts)
                .await
                .expect("Failed to connect to Postgres");

            run_postgres_migrations(&pool).await;

            (
                Arc::new(PostgresBookingRepo::new(pool.clone())),
                Arc::new(PostgresArtistRepo::new(pool)),
            )
        } else {
            info!("Initializing SQLite connection with WAL Mode...");

            let opts = SqliteConnectOptions::from_str(database_url)
                .expect("Invalid SQLite connection string")
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5))
                .log_statements(LevelFilter::Debug)
                .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(opts)
                .await
                .expect("Failed to connect to SQLite");

            run_sqlite_migrations(&pool).await;

            (
                Arc::new(SqliteBookingRepo::new(pool.clone())),
                Arc::new(SqliteArtistRepo::new(pool)),
            )
        };

    let store = BookingStore::bootstrap(
        booking_repo.clone(),
        artist_repo.clone(),
        notification_service.clone(),
    )
    .await
    .expect("Failed to load booking collection");

    AppState {
        config: config.clone(),
        store: Arc::new(store),
        booking_repo,
        artist_repo,
        notification_service,
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
