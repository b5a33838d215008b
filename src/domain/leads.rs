//! Lead domain types
//!
//! Leads arrive from the public capture endpoint and move through a simple
//! contact pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::quotes::JobType;

/// Lead pipeline status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Quoted,
    Won,
    Lost,
}

impl From<String> for LeadStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "contacted" => Self::Contacted,
            "quoted" => Self::Quoted,
            "won" => Self::Won,
            "lost" => Self::Lost,
            _ => Self::New,
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Contacted => write!(f, "contacted"),
            Self::Quoted => write!(f, "quoted"),
            Self::Won => write!(f, "won"),
            Self::Lost => write!(f, "lost"),
        }
    }
}

/// Lead entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub job_type: JobType,
    pub message: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for the public capture endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLeadRequest {
    pub company_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Request DTO for moving a lead through the pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLeadStatusRequest {
    pub status: LeadStatus,
}

/// Response DTO for a lead
#[derive(Debug, Clone, Serialize)]
pub struct LeadResponse {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub job_type: JobType,
    pub message: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Lead> for LeadResponse {
    fn from(l: Lead) -> Self {
        Self {
            id: l.id,
            name: l.name,
            email: l.email,
            phone: l.phone,
            address: l.address,
            job_type: l.job_type,
            message: l.message,
            source: l.source,
            status: l.status,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}
