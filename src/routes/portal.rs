//! Customer portal routes
//!
//! Magic-link access to a single quote: view, accept, decline. These routes
//! take [`PortalAccess`] instead of contractor auth; the token scopes every
//! query to one quote and one company. Margin internals (overhead, profit,
//! markup) are never exposed here.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::auth::PortalAccess;
use crate::domain::quotes::{AreaTotals, JobType, Quote, QuoteStatus};
use crate::error::ApiError;
use crate::routes::quotes::fetch_quote;
use crate::services::QuoteEvent;

/// Customer-facing view of a quote. Only the figures a customer should see:
/// the price, the deposit split, and the per-area lines.
#[derive(Debug, Serialize)]
pub struct PortalQuoteResponse {
    pub customer_name: String,
    pub job_address: Option<String>,
    pub job_type: JobType,
    pub status: QuoteStatus,
    pub areas: Vec<AreaTotals>,
    pub total_cents: Option<i64>,
    pub deposit_cents: Option<i64>,
    pub balance_cents: Option<i64>,
    pub notes: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl From<Quote> for PortalQuoteResponse {
    fn from(q: Quote) -> Self {
        let (areas, total, deposit, balance) = match q.totals {
            Some(t) => (
                t.areas,
                Some(t.total_cents),
                Some(t.deposit_cents),
                Some(t.balance_cents),
            ),
            None => (Vec::new(), None, None, None),
        };
        Self {
            customer_name: q.customer_name,
            job_address: q.job_address,
            job_type: q.job_type,
            status: q.status,
            areas,
            total_cents: total,
            deposit_cents: deposit,
            balance_cents: balance,
            notes: q.notes,
            sent_at: q.sent_at,
        }
    }
}

/// GET /portal/quote
///
/// The customer's view of their quote. The first open transitions the quote
/// from sent to viewed.
pub async fn get_portal_quote(
    access: PortalAccess,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut quote = fetch_quote(&state, access.company_id, access.quote_id).await?;

    if quote.status == QuoteStatus::Sent {
        sqlx::query(
            "UPDATE quotes SET status = 'viewed', viewed_at = NOW(), updated_at = NOW() WHERE id = $1 AND company_id = $2 AND status = 'sent'",
        )
        .bind(access.quote_id)
        .bind(access.company_id)
        .execute(&state.db)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to mark quote viewed: {}", e)))?;

        quote.status = QuoteStatus::Viewed;

        tracing::info!(
            quote_id = %access.quote_id,
            company_id = %access.company_id,
            "Quote viewed through portal"
        );

        state.events.publish(QuoteEvent::Viewed {
            quote_id: access.quote_id,
            company_id: access.company_id,
            customer_name: quote.customer_name.clone(),
        });
    }

    let response: PortalQuoteResponse = quote.into();
    Ok(Json(DataResponse::new(response)))
}

/// POST /portal/quote/accept
pub async fn accept_quote(
    access: PortalAccess,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = fetch_quote(&state, access.company_id, access.quote_id).await?;

    if !matches!(quote.status, QuoteStatus::Sent | QuoteStatus::Viewed) {
        return Err(ApiError::conflict(format!(
            "Quote in status '{}' cannot be accepted",
            quote.status
        )));
    }

    sqlx::query(
        "UPDATE quotes SET status = 'accepted', decided_at = NOW(), updated_at = NOW() WHERE id = $1 AND company_id = $2",
    )
    .bind(access.quote_id)
    .bind(access.company_id)
    .execute(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to accept quote: {}", e)))?;

    tracing::info!(
        quote_id = %access.quote_id,
        company_id = %access.company_id,
        "Quote accepted through portal"
    );

    state.events.publish(QuoteEvent::Accepted {
        quote_id: access.quote_id,
        company_id: access.company_id,
        customer_name: quote.customer_name,
        total_cents: quote.totals.map(|t| t.total_cents).unwrap_or(0),
    });

    Ok(Json(DataResponse::new(serde_json::json!({
        "status": "accepted"
    }))))
}

/// POST /portal/quote/decline
pub async fn decline_quote(
    access: PortalAccess,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = fetch_quote(&state, access.company_id, access.quote_id).await?;

    if !matches!(quote.status, QuoteStatus::Sent | QuoteStatus::Viewed) {
        return Err(ApiError::conflict(format!(
            "Quote in status '{}' cannot be declined",
            quote.status
        )));
    }

    sqlx::query(
        "UPDATE quotes SET status = 'declined', decided_at = NOW(), updated_at = NOW() WHERE id = $1 AND company_id = $2",
    )
    .bind(access.quote_id)
    .bind(access.company_id)
    .execute(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to decline quote: {}", e)))?;

    tracing::info!(
        quote_id = %access.quote_id,
        company_id = %access.company_id,
        "Quote declined through portal"
    );

    state.events.publish(QuoteEvent::Declined {
        quote_id: access.quote_id,
        company_id: access.company_id,
        customer_name: quote.customer_name,
    });

    Ok(Json(DataResponse::new(serde_json::json!({
        "status": "declined"
    }))))
}
