use serde::Serialize;

use crate::domain::models::actor::Actor;
use crate::domain::models::artist::Artist;
use crate::domain::models::booking::Booking;
use crate::domain::services::capability;

/// A booking as presented to the caller: the record, its derived total,
/// and the per-row controls this actor's role is entitled to render.
#[derive(Serialize)]
pub struct BookingRow {
    #[serde(flatten)]
    pub booking: Booking,
    pub line_total: i64,
    pub can_edit: bool,
    pub can_assign: bool,
    pub can_reschedule: bool,
    pub can_change_status: bool,
    pub can_delete: bool,
}

impl BookingRow {
    pub fn for_actor(booking: Booking, actor: &Actor) -> Self {
        let caps = capability::resolve(actor.role);
        let line_total = booking.line_total();
        Self {
            booking,
            line_total,
            can_edit: caps.can_edit_details(),
            can_assign: caps.assign,
            can_reschedule: caps.reschedule,
            can_change_status: caps.change_status,
            can_delete: caps.can_delete(actor),
        }
    }
}

#[derive(Serialize)]
pub struct BookingListResponse {
    pub total: usize,
    pub shown: usize,
    pub bookings: Vec<BookingRow>,
}

#[derive(Serialize)]
pub struct MutationResponse {
    #[serde(flatten)]
    pub row: BookingRow,
    pub persisted: bool,
}

#[derive(Serialize)]
pub struct ArtistResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
}

impl From<Artist> for ArtistResponse {
    fn from(artist: Artist) -> Self {
        let display_name = artist.display_name();
        Self {
            id: artist.id,
            first_name: artist.first_name,
            last_name: artist.last_name,
            display_name,
        }
    }
}
