use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::responses::ArtistResponse;
use crate::api::extractors::auth::AuthActor;
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_artists(
    State(state): State<Arc<AppState>>,
    AuthActor(_actor): AuthActor,
) -> Result<impl IntoResponse, AppError> {
    let artists = state.artist_repo.fetch_all().await?;
    let response: Vec<ArtistResponse> = artists.into_iter().map(ArtistResponse::from).collect();
    Ok(Json(response))
}
