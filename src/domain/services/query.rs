use chrono::NaiveDate;

use crate::domain::models::actor::Actor;
use crate::domain::models::booking::{Booking, BookingStatus};
use crate::domain::services::capability;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Creation,
    Booking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreationDate,
    BookingDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct BookingQuery {
    pub search: Option<String>,
    /// `None` means the "all" pass-through.
    pub status: Option<BookingStatus>,
    pub date_type: DateField,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl Default for BookingQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            date_type: DateField::Booking,
            start_date: None,
            end_date: None,
            sort_field: SortField::CreationDate,
            sort_direction: SortDirection::Desc,
        }
    }
}

/// Role-scoped, filtered, sorted projection over a snapshot of the
/// collection. Pure and repeatable: identical inputs yield identical
/// ordered output. Capability governs mutation, not visibility, so the
/// only capability applied here is the view scope.
pub fn run(snapshot: &[Booking], actor: &Actor, query: &BookingQuery) -> Vec<Booking> {
    let caps = capability::resolve(actor.role);

    let mut rows: Vec<Booking> = snapshot
        .iter()
        .filter(|b| caps.sees(actor, b))
        .filter(|b| matches_search(b, query.search.as_deref()))
        .filter(|b| matches_date_range(b, query))
        .filter(|b| query.status.is_none_or(|s| b.status == s))
        .cloned()
        .collect();

    rows.sort_by(|a, b| {
        let ord = match query.sort_field {
            SortField::CreationDate => a.created_at.cmp(&b.created_at),
            SortField::BookingDate => a.booking_date.cmp(&b.booking_date),
        };
        let ord = match query.sort_direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        // Deterministic ordering across repeated calls regardless of
        // snapshot order.
        ord.then_with(|| a.id.cmp(&b.id))
    });

    rows
}

fn matches_search(booking: &Booking, search: Option<&str>) -> bool {
    let Some(raw) = search else { return true };
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [
        booking.booking_no.as_str(),
        booking.customer_name.as_str(),
        booking.customer_email.as_str(),
        booking.service_name.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Range filtering only activates when both bounds are present; a single
/// bound disables it entirely. Bounds are exclusive.
fn matches_date_range(booking: &Booking, query: &BookingQuery) -> bool {
    let (Some(start), Some(end)) = (query.start_date, query.end_date) else {
        return true;
    };
    let date = match query.date_type {
        DateField::Booking => booking.booking_date,
        DateField::Creation => booking.created_at.date_naive(),
    };
    start < date && date < end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::actor::Role;
    use crate::domain::models::booking::{Booking, NewBookingParams};
    use chrono::{NaiveTime, TimeZone, Utc};

    fn booking(id: &str, name: &str, email: &str, date: &str) -> Booking {
        let mut b = Booking::new(NewBookingParams {
            customer_name: name.to_string(),
            customer_email: email.to_string(),
            customer_phone: "5550100".to_string(),
            address: None,
            postal_code: None,
            service_name: "Bridal Makeup".to_string(),
            sub_service: None,
            product_name: None,
            quantity: 1,
            unit_price: 2500,
            booking_date: date.parse().unwrap(),
            booking_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        });
        b.id = id.to_string();
        b.booking_no = format!("BK-{}", id.to_uppercase());
        b.created_at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        b.status_updated_at = b.created_at;
        b
    }

    fn admin() -> Actor {
        Actor {
            id: "admin-1".into(),
            role: Role::Admin,
            email: None,
            artist_id: None,
            elevated: false,
        }
    }

    #[test]
    fn search_matches_any_configured_field() {
        let rows = vec![
            booking("a", "Asha Verma", "asha@example.com", "2024-04-01"),
            booking("b", "Nina Rao", "nina@example.com", "2024-04-02"),
        ];
        let query = BookingQuery { search: Some("ASHA".into()), ..Default::default() };
        let out = run(&rows, &admin(), &query);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].customer_name, "Asha Verma");

        let by_service = BookingQuery { search: Some("bridal".into()), ..Default::default() };
        assert_eq!(run(&rows, &admin(), &by_service).len(), 2);
    }

    #[test]
    fn single_bound_disables_range_filter() {
        let rows = vec![booking("a", "Asha", "a@example.com", "2024-04-15")];
        let query = BookingQuery {
            start_date: Some("2024-05-01".parse().unwrap()),
            end_date: None,
            ..Default::default()
        };
        assert_eq!(run(&rows, &admin(), &query).len(), 1);
    }

    #[test]
    fn both_bounds_filter_strictly() {
        let rows = vec![
            booking("a", "In", "in@example.com", "2024-01-15"),
            booking("b", "Out", "out@example.com", "2024-02-01"),
            booking("c", "Edge", "edge@example.com", "2024-01-31"),
        ];
        let query = BookingQuery {
            date_type: DateField::Booking,
            start_date: Some("2024-01-01".parse().unwrap()),
            end_date: Some("2024-01-31".parse().unwrap()),
            ..Default::default()
        };
        let out = run(&rows, &admin(), &query);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].customer_name, "In");
    }

    #[test]
    fn ties_break_by_id_ascending_regardless_of_input_order() {
        // Same created_at and booking_date everywhere; only ids differ.
        let a = booking("a", "A", "a@example.com", "2024-04-01");
        let b = booking("b", "B", "b@example.com", "2024-04-01");
        let c = booking("c", "C", "c@example.com", "2024-04-01");

        let query = BookingQuery {
            sort_field: SortField::BookingDate,
            sort_direction: SortDirection::Desc,
            ..Default::default()
        };

        let forward = run(&[a.clone(), b.clone(), c.clone()], &admin(), &query);
        let reversed = run(&[c, b, a], &admin(), &query);

        let ids: Vec<&str> = forward.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(
            forward.iter().map(|b| b.id.clone()).collect::<Vec<_>>(),
            reversed.iter().map(|b| b.id.clone()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let rows = vec![
            booking("x", "X", "x@example.com", "2024-04-03"),
            booking("y", "Y", "y@example.com", "2024-04-01"),
        ];
        let query = BookingQuery::default();
        let first = run(&rows, &admin(), &query);
        let second = run(&rows, &admin(), &query);
        assert_eq!(
            first.iter().map(|b| b.id.clone()).collect::<Vec<_>>(),
            second.iter().map(|b| b.id.clone()).collect::<Vec<_>>()
        );
    }
}
