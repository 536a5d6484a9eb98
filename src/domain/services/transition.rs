use chrono::{DateTime, Utc};

use crate::domain::models::actor::Actor;
use crate::domain::models::booking::{Booking, BookingStatus};
use crate::domain::services::capability;
use crate::error::AppError;

/// The defined edges of the booking state machine. Everything else is a
/// cross-jump and rejected.
pub fn edge_allowed(from: BookingStatus, to: BookingStatus) -> bool {
    use BookingStatus::*;
    matches!(
        (from, to),
        (Pending, Confirmed)
            | (Confirmed, Assigned)
            | (Assigned, InProgress)
            | (InProgress, Completed)
            | (Pending, Cancelled)
            | (Confirmed, Cancelled)
            | (Assigned, Cancelled)
    )
}

/// Validates and applies a status change. Pure: returns the updated record,
/// never mutates the input. Assignment fields are untouched even when the
/// target is `Assigned` — assigning an artist is a separate operation.
pub fn transition(
    booking: &Booking,
    target: BookingStatus,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<Booking, AppError> {
    let caps = capability::resolve(actor.role);
    if !caps.change_status {
        return Err(AppError::Forbidden(format!(
            "Role {} may not change booking status",
            actor.role
        )));
    }

    if !edge_allowed(booking.status, target) {
        return Err(AppError::InvalidTransition {
            from: booking.status,
            to: target,
        });
    }

    let mut updated = booking.clone();
    updated.status = target;
    updated.status_updated_at = now;
    Ok(updated)
}
