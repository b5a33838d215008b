pub mod health;
pub mod leads;
pub mod notifications;
pub mod portal;
pub mod pricing_schemes;
pub mod products;
pub mod quotes;
pub mod settings;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        .route("/leads", post(leads::create_lead))
        // Leads (contractor)
        .route("/leads", get(leads::list_leads))
        .route("/leads/:lead_id/status", put(leads::update_lead_status))
        // Product catalog
        .route("/products", post(products::create_product))
        .route("/products", get(products::list_products))
        .route("/products/:product_id", put(products::update_product))
        .route("/products/:product_id", delete(products::delete_product))
        // Pricing schemes
        .route("/pricing-schemes", post(pricing_schemes::create_scheme))
        .route("/pricing-schemes", get(pricing_schemes::list_schemes))
        .route("/pricing-schemes/:scheme_id", get(pricing_schemes::get_scheme))
        .route("/pricing-schemes/:scheme_id", put(pricing_schemes::update_scheme))
        .route(
            "/pricing-schemes/:scheme_id",
            delete(pricing_schemes::delete_scheme),
        )
        .route(
            "/pricing-schemes/:scheme_id/calculate",
            post(pricing_schemes::calculate_with_scheme),
        )
        // Quotes
        .route("/quotes", post(quotes::create_quote))
        .route("/quotes", get(quotes::list_quotes))
        .route("/quotes/calculate", post(quotes::calculate_quote))
        .route("/quotes/events", get(quotes::stream_quote_events))
        .route("/quotes/:quote_id", get(quotes::get_quote))
        .route("/quotes/:quote_id", put(quotes::update_quote))
        .route(
            "/quotes/:quote_id/calculate",
            post(quotes::calculate_stored_quote),
        )
        .route("/quotes/:quote_id/send", post(quotes::send_quote))
        // Customer portal (magic-link access)
        .route("/portal/quote", get(portal::get_portal_quote))
        .route("/portal/quote/accept", post(portal::accept_quote))
        .route("/portal/quote/decline", post(portal::decline_quote))
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/:notification_id/read",
            post(notifications::mark_notification_read),
        )
        // Company settings
        .route("/settings/company", get(settings::get_company_settings))
        .route("/settings/company", put(settings::update_company_settings))
}
