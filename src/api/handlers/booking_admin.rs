use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{
    AssignArtistRequest, RescheduleBookingRequest, UpdateBookingRequest, UpdateStatusRequest,
};
use crate::api::extractors::auth::AuthActor;
use crate::api::handlers::booking::mutation_response;
use crate::domain::models::actor::Role;
use crate::domain::models::booking::BookingStatus;
use crate::domain::services::validation;
use crate::domain::store::BookingDetails;
use crate::error::AppError;
use crate::state::AppState;

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let target = BookingStatus::parse(&payload.status)
        .ok_or_else(|| AppError::Validation(format!("Unknown status '{}'", payload.status)))?;

    let outcome = state.store.transition(&id, target, &actor).await?;
    info!("Booking {} moved to {}", id, target);
    Ok(Json(mutation_response(outcome, &actor)))
}

pub async fn assign_artist(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    Json(payload): Json<AssignArtistRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.store.assign(&id, payload.artist_id, &actor).await?;
    match payload.artist_id {
        Some(artist_id) => info!("Booking {} assigned to artist {}", id, artist_id),
        None => info!("Booking {} unassigned", id),
    }
    Ok(Json(mutation_response(outcome, &actor)))
}

pub async fn reschedule_booking(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    Json(payload): Json<RescheduleBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = validation::parse_date(&payload.date, "date")?;
    let time = validation::parse_time(&payload.time, "time")?;

    let outcome = state.store.reschedule(&id, date, time, &actor).await?;
    info!("Booking {} rescheduled to {} {}", id, date, time);
    Ok(Json(mutation_response(outcome, &actor)))
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let details = BookingDetails {
        customer_name: payload.name,
        customer_email: payload.email,
        customer_phone: payload.phone,
        address: payload.address,
        postal_code: payload.postal_code,
        service_name: payload.service,
        sub_service: payload.sub_service,
        product_name: payload.product,
        quantity: payload.quantity,
        unit_price: payload.unit_price,
    };

    let outcome = state.store.update_details(&id, details, &actor).await?;
    info!("Booking {} details updated", id);
    Ok(Json(mutation_response(outcome, &actor)))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.store.delete(&id, &actor).await?;
    info!("Booking {} deleted by {}", id, actor.id);
    Ok(Json(serde_json::json!({
        "status": "deleted",
        "id": outcome.booking.id,
        "persisted": outcome.persisted,
    })))
}

/// Reloads the working set from the persistence collaborator. Restricted
/// to admins: refresh discards any pending retry queue.
pub async fn refresh_store(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> Result<impl IntoResponse, AppError> {
    if !matches!(actor.role, Role::Admin | Role::Superadmin) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not refresh the booking store",
            actor.role
        )));
    }

    let count = state.store.refresh().await?;
    Ok(Json(serde_json::json!({ "status": "refreshed", "count": count })))
}
