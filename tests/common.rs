use salon_admin_backend::{
    api::extractors::auth::ActorClaims,
    api::router::create_router,
    background::start_background_worker,
    config::Config,
    domain::models::booking::{Booking, NewBookingParams},
    domain::ports::{BookingRepository, NotificationService, StatusChangedEvent},
    domain::store::BookingStore,
    error::AppError,
    infra::repositories::{
        sqlite_artist_repo::SqliteArtistRepo,
        sqlite_booking_repo::SqliteBookingRepo,
    },
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::str::FromStr;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use async_trait::async_trait;
use chrono::{NaiveTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tower::ServiceExt;
use serde_json::Value;

pub const TEST_CSRF: &str = "test-csrf-token";

/// Notification double: records every event and can be switched to fail,
/// so tests can show delivery failures never roll back state.
pub struct RecordingNotifier {
    pub events: Mutex<Vec<StatusChangedEvent>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl NotificationService for RecordingNotifier {
    async fn status_changed(&self, event: &StatusChangedEvent) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("notification endpoint down".into()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Booking repository double: delegates to SQLite but can be told to fail
/// persistence, exercising the optimistic-update path and the retry queue.
pub struct FlakyBookingRepo {
    inner: SqliteBookingRepo,
    pub fail_persist: AtomicBool,
}

#[async_trait]
impl BookingRepository for FlakyBookingRepo {
    async fn fetch_all(&self) -> Result<Vec<Booking>, AppError> {
        self.inner.fetch_all().await
    }

    async fn persist(&self, booking: &Booking) -> Result<Booking, AppError> {
        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("database unavailable".into()));
        }
        self.inner.persist(booking).await
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.inner.delete(id).await
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub booking_repo: Arc<FlakyBookingRepo>,
    pub notifier: Arc<RecordingNotifier>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let pub_key_pem = include_str!("keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            notify_service_url: "http://localhost".to_string(),
            notify_service_token: "token".to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_audience: "salon-admin-frontend".to_string(),
        };

        let booking_repo = Arc::new(FlakyBookingRepo {
            inner: SqliteBookingRepo::new(pool.clone()),
            fail_persist: AtomicBool::new(false),
        });
        let artist_repo = Arc::new(SqliteArtistRepo::new(pool.clone()));
        let notifier = Arc::new(RecordingNotifier {
            events: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        });

        let store = BookingStore::bootstrap(
            booking_repo.clone(),
            artist_repo.clone(),
            notifier.clone(),
        )
        .await
        .expect("Failed to bootstrap booking store");

        let state = Arc::new(AppState {
            config,
            store: Arc::new(store),
            booking_repo: booking_repo.clone(),
            artist_repo,
            notification_service: notifier.clone(),
        });

        let worker_state = state.clone();
        tokio::spawn(async move {
            start_background_worker(worker_state).await;
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            booking_repo,
            notifier,
        }
    }

    /// Mints claims the way the identity collaborator would. This backend
    /// only ever verifies; the private test key lives in tests/keys/.
    pub fn auth(&self, role: &str, email: Option<&str>, artist_id: Option<i64>, elevated: bool) -> AuthHeaders {
        let claims = ActorClaims {
            sub: format!("user-{}", role),
            role: role.to_string(),
            email: email.map(|e| e.to_string()),
            artist_id,
            elevated,
            csrf_token: TEST_CSRF.to_string(),
            aud: "salon-admin-frontend".to_string(),
            exp: (Utc::now().timestamp() + 3600) as usize,
        };

        let key = EncodingKey::from_ed_pem(include_str!("keys/test_private.pem").as_bytes())
            .expect("invalid test private key");
        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &key)
            .expect("failed to sign test token");

        AuthHeaders {
            access_token,
            csrf_token: TEST_CSRF.to_string(),
        }
    }

    pub fn auth_controller(&self) -> AuthHeaders {
        self.auth("controller", None, None, false)
    }

    pub fn auth_admin(&self) -> AuthHeaders {
        self.auth("admin", None, None, false)
    }

    pub fn auth_superadmin(&self) -> AuthHeaders {
        self.auth("superadmin", None, None, false)
    }

    pub async fn seed_artist(&self, first: &str, last: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO artists (first_name, last_name, created_at) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(first)
        .bind(last)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .expect("Failed to seed artist")
    }

    /// Seeds a booking straight into the store (pending, persisted).
    pub async fn seed_booking(&self, name: &str, email: &str, date: &str) -> Booking {
        let booking = Booking::new(NewBookingParams {
            customer_name: name.to_string(),
            customer_email: email.to_string(),
            customer_phone: "5550100".to_string(),
            address: None,
            postal_code: None,
            service_name: "Party Makeup".to_string(),
            sub_service: None,
            product_name: None,
            quantity: 1,
            unit_price: 1500,
            booking_date: date.parse().expect("bad seed date"),
            booking_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        });
        let outcome = self.state.store.create(booking).await.expect("Failed to seed booking");
        outcome.booking
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&AuthHeaders>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
