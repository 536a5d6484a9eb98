use chrono::{NaiveDate, NaiveTime};

use crate::domain::models::actor::Actor;
use crate::domain::models::booking::Booking;
use crate::domain::services::capability;
use crate::error::AppError;

/// Validates and applies a reschedule. Date and time are replaced together
/// or not at all. The first successful reschedule stamps the booking with
/// its job number (`next_job_no`, drawn by the store).
pub fn reschedule(
    booking: &Booking,
    date: NaiveDate,
    time: NaiveTime,
    actor: &Actor,
    next_job_no: i64,
) -> Result<Booking, AppError> {
    let caps = capability::resolve(actor.role);
    if !caps.reschedule {
        return Err(AppError::Forbidden(format!(
            "Role {} may not reschedule bookings",
            actor.role
        )));
    }

    if booking.status.is_terminal() {
        return Err(AppError::InvalidState(format!(
            "Cannot reschedule a {} booking",
            booking.status
        )));
    }

    let mut updated = booking.clone();
    updated.booking_date = date;
    updated.booking_time = time;
    if updated.job_no.is_none() {
        updated.job_no = Some(next_job_no);
    }
    Ok(updated)
}
