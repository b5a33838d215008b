//! Notification service
//!
//! Writes company feed entries for quote lifecycle events. The event
//! listener spawned at startup calls into this module; routes never write
//! notifications directly.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::notifications::NotificationType;
use crate::services::events::QuoteEvent;

/// Create a notification for a company
pub async fn create_notification(
    db: &PgPool,
    company_id: Uuid,
    notification_type: NotificationType,
    title: &str,
    message: Option<&str>,
    data: Option<serde_json::Value>,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    let type_str = notification_type.to_string();
    let data = data.unwrap_or(serde_json::json!({}));

    sqlx::query(
        r#"
        INSERT INTO notifications (id, company_id, type, title, message, data)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(company_id)
    .bind(&type_str)
    .bind(title)
    .bind(message)
    .bind(&data)
    .execute(db)
    .await?;

    tracing::info!(
        company_id = %company_id,
        notification_type = %type_str,
        notification_id = %id,
        "Notification created"
    );

    Ok(id)
}

/// Create a lead received notification
pub async fn notify_lead_received(
    db: &PgPool,
    company_id: Uuid,
    lead_id: Uuid,
    lead_name: &str,
) -> Result<Uuid, sqlx::Error> {
    create_notification(
        db,
        company_id,
        NotificationType::LeadReceived,
        &format!("New lead from {}", lead_name),
        Some("A new lead came in through your website form."),
        Some(serde_json::json!({ "lead_id": lead_id })),
    )
    .await
}

/// Record a quote lifecycle event as a feed entry.
///
/// Calculated events are internal bookkeeping and produce no notification.
pub async fn record_quote_event(db: &PgPool, event: &QuoteEvent) -> Result<(), sqlx::Error> {
    match event {
        QuoteEvent::Calculated { .. } => {}
        QuoteEvent::Sent {
            quote_id,
            company_id,
            customer_name,
        } => {
            create_notification(
                db,
                *company_id,
                NotificationType::QuoteSent,
                &format!("Quote sent to {}", customer_name),
                None,
                Some(serde_json::json!({ "quote_id": quote_id })),
            )
            .await?;
        }
        QuoteEvent::Viewed {
            quote_id,
            company_id,
            customer_name,
        } => {
            create_notification(
                db,
                *company_id,
                NotificationType::QuoteViewed,
                &format!("{} viewed their quote", customer_name),
                None,
                Some(serde_json::json!({ "quote_id": quote_id })),
            )
            .await?;
        }
        QuoteEvent::Accepted {
            quote_id,
            company_id,
            customer_name,
            total_cents,
        } => {
            create_notification(
                db,
                *company_id,
                NotificationType::QuoteAccepted,
                &format!("{} accepted their quote", customer_name),
                Some(&format!("Job value ${:.2}", *total_cents as f64 / 100.0)),
                Some(serde_json::json!({
                    "quote_id": quote_id,
                    "total_cents": total_cents,
                })),
            )
            .await?;
        }
        QuoteEvent::Declined {
            quote_id,
            company_id,
            customer_name,
        } => {
            create_notification(
                db,
                *company_id,
                NotificationType::QuoteDeclined,
                &format!("{} declined their quote", customer_name),
                None,
                Some(serde_json::json!({ "quote_id": quote_id })),
            )
            .await?;
        }
    }
    Ok(())
}
