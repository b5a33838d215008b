//! Notification domain types
//!
//! Per-company feed entries written by the quote event listener.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    LeadReceived,
    QuoteSent,
    QuoteViewed,
    QuoteAccepted,
    QuoteDeclined,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LeadReceived => write!(f, "lead_received"),
            Self::QuoteSent => write!(f, "quote_sent"),
            Self::QuoteViewed => write!(f, "quote_viewed"),
            Self::QuoteAccepted => write!(f, "quote_accepted"),
            Self::QuoteDeclined => write!(f, "quote_declined"),
        }
    }
}

/// Response DTO for a notification
#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: Option<String>,
    pub data: serde_json::Value,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
