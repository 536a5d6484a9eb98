use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::domain::models::actor::{Actor, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_cookies::Cookies;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::Span;

/// Claims minted by the identity collaborator. This service only verifies;
/// it never issues tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActorClaims {
    pub sub: String,
    pub role: String,
    pub email: Option<String>,
    pub artist_id: Option<i64>,
    #[serde(default)]
    pub elevated: bool,
    pub csrf_token: String,
    pub aud: String,
    pub exp: usize,
}

pub struct AuthActor(pub Actor);

impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        let access_token = cookies.get("access_token")
            .ok_or(StatusCode::UNAUTHORIZED)?
            .value()
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let decoding_key = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes())
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[app_state.config.auth_audience.as_str()]);

        let token_data = decode::<ActorClaims>(&access_token, &decoding_key, &validation)
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let method = &parts.method;
        if method != "GET" && method != "HEAD" && method != "OPTIONS" {
            let csrf_header_val = parts.headers.get("X-CSRF-Token")
                .ok_or(StatusCode::FORBIDDEN)?
                .to_str()
                .map_err(|_| StatusCode::FORBIDDEN)?;

            if csrf_header_val != token_data.claims.csrf_token {
                return Err(StatusCode::FORBIDDEN);
            }
        }

        // Closed-world: a role outside the capability table is no actor.
        let role = Role::parse(&token_data.claims.role)
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let actor = Actor {
            id: token_data.claims.sub,
            role,
            email: token_data.claims.email,
            artist_id: token_data.claims.artist_id,
            elevated: token_data.claims.elevated,
        };

        Span::current().record("actor_id", &actor.id);
        Span::current().record("actor_role", actor.role.as_str());

        Ok(AuthActor(actor))
    }
}
