use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub service: String,
    pub sub_service: Option<String>,
    pub product: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<i64>,
    pub line_total: Option<i64>,
    pub date: String,
    pub time: String,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct AssignArtistRequest {
    /// `null` unassigns.
    pub artist_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct RescheduleBookingRequest {
    pub date: String,
    pub time: String,
}

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub service: Option<String>,
    pub sub_service: Option<String>,
    pub product: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<i64>,
}

/// Raw listing parameters; parsed into a `BookingQuery` by the handler so
/// bad values surface as named validation errors rather than 400s from the
/// query-string layer.
#[derive(Deserialize, Default)]
pub struct ListBookingsParams {
    pub q: Option<String>,
    pub status: Option<String>,
    pub date_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
}
