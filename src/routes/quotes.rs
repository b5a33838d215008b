//! Quote routes
//!
//! Quote CRUD, calculation, sending, and the company event stream. All
//! pricing math goes through the engine; handlers only move data.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse,
    },
    Json,
};
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, sync::Arc, time::Duration};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use uuid::Uuid;

use crate::api::pagination::PaginationParams;
use crate::api::pagination::Paginated;
use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::auth::{portal, RequireAuth};
use crate::domain::quotes::{
    Area, CalculateQuoteRequest, CreateQuoteRequest, ProductSelection, Quote, QuoteResponse,
    QuoteStatus, QuoteSummary, QuoteTotals, UpdateQuoteRequest,
};
use crate::domain::schemes::Tier;
use crate::error::ApiError;
use crate::pricing::{self, QuoteInput};
use crate::routes::pricing_schemes::load_scheme;
use crate::services::QuoteEvent;

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(Debug, sqlx::FromRow)]
struct QuoteRow {
    id: Uuid,
    company_id: Uuid,
    customer_name: String,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    job_address: Option<String>,
    job_type: String,
    status: String,
    scheme_id: Option<Uuid>,
    tier: Option<String>,
    home_square_footage: Option<f64>,
    areas: serde_json::Value,
    product_selections: serde_json::Value,
    totals: Option<serde_json::Value>,
    notes: Option<String>,
    sent_at: Option<DateTime<Utc>>,
    viewed_at: Option<DateTime<Utc>>,
    decided_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn tier_from_str(tier: Option<&str>) -> Option<Tier> {
    match tier {
        Some("good") => Some(Tier::Good),
        Some("better") => Some(Tier::Better),
        Some("best") => Some(Tier::Best),
        _ => None,
    }
}

impl From<QuoteRow> for Quote {
    fn from(row: QuoteRow) -> Self {
        let areas: Vec<Area> = serde_json::from_value(row.areas).unwrap_or_default();
        let product_selections: Vec<ProductSelection> =
            serde_json::from_value(row.product_selections).unwrap_or_default();
        let totals: Option<QuoteTotals> =
            row.totals.and_then(|t| serde_json::from_value(t).ok());

        Self {
            id: row.id,
            company_id: row.company_id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            job_address: row.job_address,
            job_type: row.job_type.into(),
            status: row.status.into(),
            scheme_id: row.scheme_id,
            tier: tier_from_str(row.tier.as_deref()),
            home_square_footage: row.home_square_footage,
            areas,
            product_selections,
            totals,
            notes: row.notes,
            sent_at: row.sent_at,
            viewed_at: row.viewed_at,
            decided_at: row.decided_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) async fn fetch_quote(
    state: &AppState,
    company_id: Uuid,
    quote_id: Uuid,
) -> Result<Quote, ApiError> {
    let row = sqlx::query_as::<_, QuoteRow>(
        r#"
        SELECT id, company_id, customer_name, customer_email, customer_phone,
               job_address, job_type, status, scheme_id, tier, home_square_footage,
               areas, product_selections, totals, notes, sent_at, viewed_at, decided_at,
               created_at, updated_at
        FROM quotes WHERE id = $1 AND company_id = $2
        "#,
    )
    .bind(quote_id)
    .bind(company_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
    .ok_or_else(|| ApiError::not_found("Quote not found"))?;

    Ok(row.into())
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct QuoteQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub status: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /quotes
pub async fn create_quote(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateQuoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(
        company_id = %auth.company_id,
        customer_name = %req.customer_name,
        "Creating quote"
    );

    // Verify the referenced scheme belongs to this company
    if let Some(scheme_id) = req.scheme_id {
        load_scheme(&state, auth.company_id, scheme_id).await?;
    }

    let areas = serde_json::to_value(&req.areas)
        .map_err(|e| ApiError::internal(format!("Failed to encode areas: {}", e)))?;
    let selections = serde_json::to_value(&req.product_selections)
        .map_err(|e| ApiError::internal(format!("Failed to encode selections: {}", e)))?;

    let row = sqlx::query_as::<_, QuoteRow>(
        r#"
        INSERT INTO quotes (company_id, customer_name, customer_email, customer_phone,
                            job_address, job_type, scheme_id, tier, home_square_footage,
                            areas, product_selections, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id, company_id, customer_name, customer_email, customer_phone,
               job_address, job_type, status, scheme_id, tier, home_square_footage,
               areas, product_selections, totals, notes, sent_at, viewed_at, decided_at,
               created_at, updated_at
        "#,
    )
    .bind(auth.company_id)
    .bind(&req.customer_name)
    .bind(&req.customer_email)
    .bind(&req.customer_phone)
    .bind(&req.job_address)
    .bind(req.job_type.to_string())
    .bind(req.scheme_id)
    .bind(req.tier.map(|t| t.to_string()))
    .bind(req.home_square_footage)
    .bind(&areas)
    .bind(&selections)
    .bind(&req.notes)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to create quote: {}", e)))?;

    let response: QuoteResponse = Quote::from(row).into();
    Ok((StatusCode::CREATED, Json(DataResponse::new(response))))
}

/// GET /quotes
pub async fn list_quotes(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuoteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let offset = query.pagination.offset() as i64;
    let limit = query.pagination.limit() as i64;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM quotes
        WHERE company_id = $1
        AND ($2::text IS NULL OR status = $2)
        "#,
    )
    .bind(auth.company_id)
    .bind(&query.status)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    let rows = sqlx::query_as::<_, QuoteRow>(
        r#"
        SELECT id, company_id, customer_name, customer_email, customer_phone,
               job_address, job_type, status, scheme_id, tier, home_square_footage,
               areas, product_selections, totals, notes, sent_at, viewed_at, decided_at,
               created_at, updated_at
        FROM quotes
        WHERE company_id = $1
        AND ($2::text IS NULL OR status = $2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(auth.company_id)
    .bind(&query.status)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    let data: Vec<QuoteSummary> = rows
        .into_iter()
        .map(|row| {
            let quote: Quote = row.into();
            QuoteSummary {
                id: quote.id,
                customer_name: quote.customer_name,
                job_type: quote.job_type,
                status: quote.status,
                total_cents: quote.totals.map(|t| t.total_cents),
                sent_at: quote.sent_at,
                created_at: quote.created_at,
            }
        })
        .collect();

    Ok(Json(Paginated::new(data, &query.pagination, total as u64)))
}

/// GET /quotes/:quote_id
pub async fn get_quote(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(quote_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = fetch_quote(&state, auth.company_id, quote_id).await?;
    let response: QuoteResponse = quote.into();
    Ok(Json(DataResponse::new(response)))
}

/// PUT /quotes/:quote_id
pub async fn update_quote(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(quote_id): Path<Uuid>,
    Json(req): Json<UpdateQuoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let existing = fetch_quote(&state, auth.company_id, quote_id).await?;

    if matches!(existing.status, QuoteStatus::Accepted | QuoteStatus::Scheduled) {
        return Err(ApiError::conflict("Accepted quotes can no longer be edited"));
    }

    if let Some(scheme_id) = req.scheme_id {
        load_scheme(&state, auth.company_id, scheme_id).await?;
    }

    let customer_name = req.customer_name.unwrap_or(existing.customer_name);
    let customer_email = req.customer_email.or(existing.customer_email);
    let customer_phone = req.customer_phone.or(existing.customer_phone);
    let job_address = req.job_address.or(existing.job_address);
    let job_type = req.job_type.unwrap_or(existing.job_type);
    let scheme_id = req.scheme_id.or(existing.scheme_id);
    let tier = req.tier.or(existing.tier);
    let home_square_footage = req.home_square_footage.or(existing.home_square_footage);
    let areas = req.areas.unwrap_or(existing.areas);
    let product_selections = req.product_selections.unwrap_or(existing.product_selections);
    let notes = req.notes.or(existing.notes);

    let areas_json = serde_json::to_value(&areas)
        .map_err(|e| ApiError::internal(format!("Failed to encode areas: {}", e)))?;
    let selections_json = serde_json::to_value(&product_selections)
        .map_err(|e| ApiError::internal(format!("Failed to encode selections: {}", e)))?;

    let row = sqlx::query_as::<_, QuoteRow>(
        r#"
        UPDATE quotes
        SET customer_name = $3, customer_email = $4, customer_phone = $5, job_address = $6,
            job_type = $7, scheme_id = $8, tier = $9, home_square_footage = $10,
            areas = $11, product_selections = $12, notes = $13, updated_at = NOW()
        WHERE id = $1 AND company_id = $2
        RETURNING id, company_id, customer_name, customer_email, customer_phone,
               job_address, job_type, status, scheme_id, tier, home_square_footage,
               areas, product_selections, totals, notes, sent_at, viewed_at, decided_at,
               created_at, updated_at
        "#,
    )
    .bind(quote_id)
    .bind(auth.company_id)
    .bind(&customer_name)
    .bind(&customer_email)
    .bind(&customer_phone)
    .bind(&job_address)
    .bind(job_type.to_string())
    .bind(scheme_id)
    .bind(tier.map(|t| t.to_string()))
    .bind(home_square_footage)
    .bind(&areas_json)
    .bind(&selections_json)
    .bind(&notes)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to update quote: {}", e)))?;

    let response: QuoteResponse = Quote::from(row).into();
    Ok(Json(DataResponse::new(response)))
}

/// POST /quotes/calculate
///
/// Ad hoc calculation for builder previews; nothing is persisted.
pub async fn calculate_quote(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalculateQuoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let scheme = load_scheme(&state, auth.company_id, req.scheme_id).await?;

    let input = QuoteInput {
        areas: &req.areas,
        job_type: req.job_type,
        home_square_footage: req.home_square_footage,
        tier: req.tier,
    };
    let totals = pricing::calculate_quote(&input, scheme.model, &scheme.rules)?;

    Ok(Json(DataResponse::new(totals)))
}

/// POST /quotes/:quote_id/calculate
///
/// Recompute and persist a stored quote's totals.
pub async fn calculate_stored_quote(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(quote_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = fetch_quote(&state, auth.company_id, quote_id).await?;
    let scheme_id = quote
        .scheme_id
        .ok_or_else(|| ApiError::bad_request("Quote has no pricing scheme selected"))?;
    let scheme = load_scheme(&state, auth.company_id, scheme_id).await?;

    let input = QuoteInput {
        areas: &quote.areas,
        job_type: quote.job_type,
        home_square_footage: quote.home_square_footage,
        tier: quote.tier,
    };
    let totals = pricing::calculate_quote(&input, scheme.model, &scheme.rules)?;

    let totals_json = serde_json::to_value(&totals)
        .map_err(|e| ApiError::internal(format!("Failed to encode totals: {}", e)))?;

    sqlx::query("UPDATE quotes SET totals = $3, updated_at = NOW() WHERE id = $1 AND company_id = $2")
        .bind(quote_id)
        .bind(auth.company_id)
        .bind(&totals_json)
        .execute(&state.db)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to store totals: {}", e)))?;

    tracing::info!(
        company_id = %auth.company_id,
        quote_id = %quote_id,
        total_cents = totals.total_cents,
        "Quote totals recomputed"
    );

    state.events.publish(QuoteEvent::Calculated {
        quote_id,
        company_id: auth.company_id,
        customer_name: quote.customer_name,
        total_cents: totals.total_cents,
    });

    Ok(Json(DataResponse::new(totals)))
}

#[derive(Debug, Serialize)]
struct SendQuoteResponse {
    status: QuoteStatus,
    portal_url: String,
}

/// POST /quotes/:quote_id/send
///
/// Transition the quote to sent and mint the customer's magic link.
pub async fn send_quote(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(quote_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = fetch_quote(&state, auth.company_id, quote_id).await?;

    if quote.totals.is_none() {
        return Err(ApiError::bad_request("Calculate the quote before sending it"));
    }
    if !matches!(quote.status, QuoteStatus::Draft | QuoteStatus::Sent) {
        return Err(ApiError::conflict(format!(
            "Quote in status '{}' cannot be sent",
            quote.status
        )));
    }

    sqlx::query(
        "UPDATE quotes SET status = 'sent', sent_at = COALESCE(sent_at, NOW()), updated_at = NOW() WHERE id = $1 AND company_id = $2",
    )
    .bind(quote_id)
    .bind(auth.company_id)
    .execute(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to send quote: {}", e)))?;

    let token = portal::issue_portal_token(
        &state.settings.portal_token_secret,
        quote_id,
        auth.company_id,
        state.settings.portal_token_ttl_hours,
    )
    .map_err(|e| ApiError::internal(format!("Failed to mint portal link: {}", e)))?;
    let portal_url = format!("{}?token={}", state.settings.portal_base_url, token);

    tracing::info!(
        company_id = %auth.company_id,
        quote_id = %quote_id,
        customer_name = %quote.customer_name,
        "Quote sent"
    );

    state.events.publish(QuoteEvent::Sent {
        quote_id,
        company_id: auth.company_id,
        customer_name: quote.customer_name,
    });

    Ok(Json(DataResponse::new(SendQuoteResponse {
        status: QuoteStatus::Sent,
        portal_url,
    })))
}

/// GET /quotes/events
///
/// SSE stream of this company's quote lifecycle events.
pub async fn stream_quote_events(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let company_id = auth.company_id;
    let rx = state.events.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(move |event| match event {
        Ok(event) if event.company_id() == company_id => Some(Ok::<_, Infallible>(
            Event::default()
                .event("quote_update")
                .data(serde_json::to_string(&event).unwrap_or_default()),
        )),
        // Other tenants' events and lagged receivers are silently skipped
        _ => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
