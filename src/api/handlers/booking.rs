use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateBookingRequest, ListBookingsParams};
use crate::api::dtos::responses::{BookingListResponse, BookingRow, MutationResponse};
use crate::api::extractors::auth::AuthActor;
use crate::domain::models::booking::{Booking, BookingStatus, NewBookingParams};
use crate::domain::services::capability;
use crate::domain::services::query::{BookingQuery, DateField, SortDirection, SortField};
use crate::domain::services::validation::{self, BookingCandidate};
use crate::error::AppError;
use crate::state::AppState;

/// Public creation endpoint: every booking enters the lifecycle as
/// `Pending`, validated but untouched by any staff capability.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quantity = payload.quantity.unwrap_or(1);
    let unit_price = payload.unit_price.unwrap_or(0);

    let (date, time) = validation::validate(&BookingCandidate {
        customer_name: &payload.name,
        customer_email: &payload.email,
        customer_phone: &payload.phone,
        service_name: &payload.service,
        quantity,
        unit_price,
        line_total: payload.line_total,
        date: &payload.date,
        time: &payload.time,
    })?;

    let booking = Booking::new(NewBookingParams {
        customer_name: payload.name,
        customer_email: payload.email,
        customer_phone: payload.phone,
        address: payload.address,
        postal_code: payload.postal_code,
        service_name: payload.service,
        sub_service: payload.sub_service,
        product_name: payload.product,
        quantity,
        unit_price,
        booking_date: date,
        booking_time: time,
    });

    let outcome = state.store.create(booking).await?;
    info!("Booking created: {} ({})", outcome.booking.id, outcome.booking.booking_no);

    Ok(Json(serde_json::json!({
        "booking": outcome.booking,
        "line_total": outcome.booking.line_total(),
        "persisted": outcome.persisted,
    })))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Query(params): Query<ListBookingsParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = parse_query(&params)?;
    let total = state.store.snapshot().await.len();
    let rows = state.store.query(&actor, &query).await;
    let shown = rows.len();

    let bookings = rows
        .into_iter()
        .map(|b| BookingRow::for_actor(b, &actor))
        .collect();

    Ok(Json(BookingListResponse { total, shown, bookings }))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.store.get(&id).await
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    // Out-of-scope reads are indistinguishable from missing records.
    let caps = capability::resolve(actor.role);
    if !caps.sees(&actor, &booking) {
        return Err(AppError::NotFound("Booking not found".into()));
    }

    Ok(Json(BookingRow::for_actor(booking, &actor)))
}

pub(crate) fn mutation_response(
    outcome: crate::domain::store::MutationOutcome,
    actor: &crate::domain::models::actor::Actor,
) -> MutationResponse {
    MutationResponse {
        row: BookingRow::for_actor(outcome.booking, actor),
        persisted: outcome.persisted,
    }
}

fn parse_query(params: &ListBookingsParams) -> Result<BookingQuery, AppError> {
    let status = match params.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(
            BookingStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown status filter '{}'", raw)))?,
        ),
    };

    let date_type = match params.date_type.as_deref() {
        None | Some("booking") => DateField::Booking,
        Some("creation") => DateField::Creation,
        Some(raw) => {
            return Err(AppError::Validation(format!("Unknown date_type '{}'", raw)));
        }
    };

    let start_date = params
        .start_date
        .as_deref()
        .map(|raw| validation::parse_date(raw, "start_date"))
        .transpose()?;
    let end_date = params
        .end_date
        .as_deref()
        .map(|raw| validation::parse_date(raw, "end_date"))
        .transpose()?;

    let sort_field = match params.sort_field.as_deref() {
        None | Some("creation_date") => SortField::CreationDate,
        Some("booking_date") => SortField::BookingDate,
        Some(raw) => {
            return Err(AppError::Validation(format!("Unknown sort_field '{}'", raw)));
        }
    };

    let sort_direction = match params.sort_direction.as_deref() {
        None | Some("desc") => SortDirection::Desc,
        Some("asc") => SortDirection::Asc,
        Some(raw) => {
            return Err(AppError::Validation(format!("Unknown sort_direction '{}'", raw)));
        }
    };

    Ok(BookingQuery {
        search: params.q.clone(),
        status,
        date_type,
        start_date,
        end_date,
        sort_field,
        sort_direction,
    })
}
