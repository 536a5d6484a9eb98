use chrono::{DateTime, Utc};

use crate::domain::models::actor::Actor;
use crate::domain::models::booking::Booking;
use crate::domain::services::capability;
use crate::error::AppError;

/// Validates and applies an artist (re)assignment. `target` of `None`
/// unassigns. Never alters `status`: callers wanting "assigned and marked
/// Assigned" invoke the transition authority explicitly as a second step.
///
/// Artist existence is checked by the store against the artist directory
/// before this runs; this function assumes a resolvable target.
pub fn assign(
    booking: &Booking,
    target: Option<i64>,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<Booking, AppError> {
    let caps = capability::resolve(actor.role);
    if !caps.assign {
        return Err(AppError::Forbidden(format!(
            "Role {} may not assign artists",
            actor.role
        )));
    }

    if booking.status.is_terminal() {
        return Err(AppError::InvalidState(format!(
            "Cannot reassign a {} booking",
            booking.status
        )));
    }

    let mut updated = booking.clone();
    match target {
        Some(artist_id) => {
            updated.assigned_artist_id = Some(artist_id);
            updated.assigned_by = Some(actor.id.clone());
            updated.assigned_at = Some(now);
        }
        None => {
            updated.assigned_artist_id = None;
            updated.assigned_by = None;
            updated.assigned_at = None;
        }
    }
    Ok(updated)
}
