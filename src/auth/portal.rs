//! Customer portal magic-link tokens
//!
//! A magic link carries a short HS256 token scoped to a single quote. Portal
//! routes take the [`PortalAccess`] extractor; contractor routes take
//! [`super::RequireAuth`]. The session type is chosen where the route is
//! registered, never by swapping client behavior at runtime.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::middleware::AuthError;
use crate::app::AppState;

const PORTAL_AUDIENCE: &str = "quote-portal";

/// Claims carried by a portal magic-link token
#[derive(Debug, Serialize, Deserialize)]
struct PortalClaims {
    /// Quote the link grants access to
    sub: String,
    aud: String,
    company_id: String,
    iat: i64,
    exp: i64,
}

/// Mint a magic-link token for a quote
pub fn issue_portal_token(
    secret: &str,
    quote_id: Uuid,
    company_id: Uuid,
    ttl_hours: u64,
) -> Result<String> {
    let now = Utc::now();
    let claims = PortalClaims {
        sub: quote_id.to_string(),
        aud: PORTAL_AUDIENCE.to_string(),
        company_id: company_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours as i64)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to sign portal token")
}

fn verify_portal_token(secret: &str, token: &str) -> Result<(Uuid, Uuid)> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[PORTAL_AUDIENCE]);
    validation.validate_exp = true;

    let data = decode::<PortalClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .context("Portal token validation failed")?;

    let quote_id = Uuid::parse_str(&data.claims.sub).context("Invalid quote ID in token")?;
    let company_id =
        Uuid::parse_str(&data.claims.company_id).context("Invalid company ID in token")?;
    Ok((quote_id, company_id))
}

/// Extractor granting access to exactly one quote via a magic-link token.
///
/// The token is read from the `token` query parameter (magic links are URLs)
/// or a Bearer header.
#[derive(Debug, Clone)]
pub struct PortalAccess {
    pub quote_id: Uuid,
    pub company_id: Uuid,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for PortalAccess {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_query(parts)
            .or_else(|| token_from_header(parts))
            .ok_or(AuthError::MissingToken)?;

        let (quote_id, company_id) =
            verify_portal_token(&state.settings.portal_token_secret, &token).map_err(|e| {
                tracing::warn!(error = %e, "Portal token verification failed");
                AuthError::InvalidToken(e.to_string())
            })?;

        Ok(PortalAccess {
            quote_id,
            company_id,
        })
    }
}

fn token_from_query(parts: &Parts) -> Option<String> {
    // JWTs are URL-safe; no percent-decoding needed
    parts
        .uri
        .query()?
        .split('&')
        .find_map(|kv| kv.strip_prefix("token="))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn token_from_header(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify_and_round_trip_ids() {
        let quote_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();
        let token = issue_portal_token("test-secret", quote_id, company_id, 24).unwrap();

        let (q, c) = verify_portal_token("test-secret", &token).unwrap();
        assert_eq!(q, quote_id);
        assert_eq!(c, company_id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_portal_token("test-secret", Uuid::new_v4(), Uuid::new_v4(), 24).unwrap();
        assert!(verify_portal_token("other-secret", &token).is_err());
    }
}
