use chrono::{NaiveDate, NaiveTime};

use crate::error::AppError;

/// A candidate booking as submitted by the customer-facing collaborator,
/// before anything is constructed or stored.
pub struct BookingCandidate<'a> {
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub customer_phone: &'a str,
    pub service_name: &'a str,
    pub quantity: i32,
    pub unit_price: i64,
    /// Claimed total, when the caller sends one; must match price x qty.
    pub line_total: Option<i64>,
    pub date: &'a str,
    pub time: &'a str,
}

pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} (expected YYYY-MM-DD)", field)))
}

pub fn parse_time(raw: &str, field: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("Invalid {} (expected HH:MM)", field)))
}

/// Pure candidate validation: names every offending field, touches nothing.
/// Returns the parsed schedule on success so callers don't parse twice.
pub fn validate(candidate: &BookingCandidate) -> Result<(NaiveDate, NaiveTime), AppError> {
    let mut bad: Vec<&str> = Vec::new();

    if candidate.customer_name.trim().is_empty() {
        bad.push("name");
    }
    if candidate.customer_email.trim().is_empty() || !candidate.customer_email.contains('@') {
        bad.push("email");
    }
    if candidate.customer_phone.trim().is_empty() {
        bad.push("phone");
    }
    if candidate.service_name.trim().is_empty() {
        bad.push("service");
    }
    if candidate.quantity < 1 {
        bad.push("quantity");
    }
    if candidate.unit_price < 0 {
        bad.push("price");
    }
    if let Some(total) = candidate.line_total {
        if candidate.quantity >= 1
            && candidate.unit_price >= 0
            && total != candidate.unit_price * candidate.quantity as i64
        {
            bad.push("line_total");
        }
    }

    let date = match parse_date(candidate.date, "date") {
        Ok(d) => Some(d),
        Err(_) => {
            bad.push("date");
            None
        }
    };
    let time = match parse_time(candidate.time, "time") {
        Ok(t) => Some(t),
        Err(_) => {
            bad.push("time");
            None
        }
    };

    if !bad.is_empty() {
        return Err(AppError::Validation(format!(
            "Invalid or missing field(s): {}",
            bad.join(", ")
        )));
    }

    Ok((date.unwrap(), time.unwrap()))
}
