use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{axum_http::error_responses::AppError, config::config_loader};

pub const DEFAULT_ROLE: &str = "user";

/// Claims issued by the dashboard's login service. `role` is absent for
/// regular accounts.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardClaims {
    pub sub: String,
    #[serde(default)]
    pub role: Option<String>,
    pub email: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,
    #[error("Invalid Authorization header format")]
    MalformedHeader,
    #[error("JWT validation failed: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid user ID in token")]
    InvalidSubject,
    #[error("Authentication is not configured")]
    NotConfigured,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotConfigured => AppError::Internal(anyhow::anyhow!(err)),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

pub fn validate_jwt(token: &str, secret: &str) -> Result<DashboardClaims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    let token_data = decode::<DashboardClaims>(token, &decoding_key, &validation)?;
    Ok(token_data.claims)
}

fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn bearer_from_headers(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;
    bearer_token(header).ok_or(AuthError::MalformedHeader)
}

fn user_from_token(token: &str, secret: &str) -> Result<AuthUser, AuthError> {
    let claims = validate_jwt(token, secret)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidSubject)?;

    Ok(AuthUser {
        user_id,
        email: claims.email,
        role: claims.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Malformed requests get a 401 even when the secret is missing.
        let token = bearer_from_headers(&parts.headers).map_err(|e| {
            warn!(reason = %e, "auth: request rejected");
            AppError::from(e)
        })?;

        let secret = config_loader::get_jwt_secret().map_err(|e| {
            error!(error = %e, "auth: jwt secret unavailable");
            AuthError::NotConfigured
        })?;

        user_from_token(token, &secret).map_err(|e| {
            warn!(reason = %e, "auth: request rejected");
            AppError::from(e)
        })
    }
}

#[cfg(test)]
mod tests;
