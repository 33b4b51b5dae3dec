// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{common::error::AppError, config::AppState};

/// Payload do token da equipe. Os tokens são emitidos fora daqui; este serviço só verifica.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "Token bearer rejeitado");
        AppError::InvalidToken
    })
}

/// Assina um token HS256 para `subject`. Usado por ferramentas de operação e pelos testes.
pub fn issue_token(subject: &str, secret: &str, ttl: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: subject.to_string(),
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.into()))
}

// Guarda das rotas que alteram dados
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::InvalidToken)?;
    let claims = verify_token(bearer.token(), &app_state.jwt_secret)?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Claims do membro da equipe por trás da requisição. Só existe atrás do `auth_guard`.
pub struct AuthenticatedStaff(pub Claims);

impl<S> FromRequestParts<S> for AuthenticatedStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthenticatedStaff)
            .ok_or(AppError::InvalidToken)
    }
}
