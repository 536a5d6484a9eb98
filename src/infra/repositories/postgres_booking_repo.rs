use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn fetch_all(&self) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn persist(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, booking_no, job_no, customer_name, customer_email, customer_phone, address, postal_code, service_name, sub_service, product_name, quantity, unit_price, booking_date, booking_time, status, assigned_artist_id, assigned_by, assigned_at, status_updated_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
             ON CONFLICT(id) DO UPDATE SET
                job_no=excluded.job_no, customer_name=excluded.customer_name, customer_email=excluded.customer_email,
                customer_phone=excluded.customer_phone, address=excluded.address, postal_code=excluded.postal_code,
                service_name=excluded.service_name, sub_service=excluded.sub_service, product_name=excluded.product_name,
                quantity=excluded.quantity, unit_price=excluded.unit_price, booking_date=excluded.booking_date,
                booking_time=excluded.booking_time, status=excluded.status, assigned_artist_id=excluded.assigned_artist_id,
                assigned_by=excluded.assigned_by, assigned_at=excluded.assigned_at, status_updated_at=excluded.status_updated_at
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.booking_no).bind(booking.job_no)
            .bind(&booking.customer_name).bind(&booking.customer_email).bind(&booking.customer_phone)
            .bind(&booking.address).bind(&booking.postal_code)
            .bind(&booking.service_name).bind(&booking.sub_service).bind(&booking.product_name)
            .bind(booking.quantity).bind(booking.unit_price)
            .bind(booking.booking_date).bind(booking.booking_time)
            .bind(booking.status.as_str())
            .bind(booking.assigned_artist_id).bind(&booking.assigned_by).bind(booking.assigned_at)
            .bind(booking.status_updated_at).bind(booking.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Booking not found".into())); }
        Ok(())
    }
}
