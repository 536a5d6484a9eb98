use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

/// Lifecycle states of a booking. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Assigned => "assigned",
            BookingStatus::InProgress => "inprogress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "assigned" => Some(BookingStatus::Assigned),
            "inprogress" => Some(BookingStatus::InProgress),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BookingStatus::parse(&value).ok_or_else(|| format!("unknown booking status '{}'", value))
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub booking_no: String,
    pub job_no: Option<i64>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub service_name: String,
    pub sub_service: Option<String>,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub unit_price: i64,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub assigned_artist_id: Option<i64>,
    pub assigned_by: Option<String>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub status_updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub service_name: String,
    pub sub_service: Option<String>,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub unit_price: i64,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();

        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            booking_no: format!("BK-{}", code.to_uppercase()),
            job_no: None,
            customer_name: params.customer_name,
            customer_email: params.customer_email,
            customer_phone: params.customer_phone,
            address: params.address,
            postal_code: params.postal_code,
            service_name: params.service_name,
            sub_service: params.sub_service,
            product_name: params.product_name,
            quantity: params.quantity,
            unit_price: params.unit_price,
            booking_date: params.booking_date,
            booking_time: params.booking_time,
            status: BookingStatus::Pending,
            assigned_artist_id: None,
            assigned_by: None,
            assigned_at: None,
            status_updated_at: now,
            created_at: now,
        }
    }

    /// Always derived from its inputs, never stored.
    pub fn line_total(&self) -> i64 {
        self.unit_price * self.quantity as i64
    }
}
