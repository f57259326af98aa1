use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::{Application, ApplicationStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateApplicationPayload {
    pub job_id: Uuid,
    pub company_id: Uuid,
    #[validate(length(min = 1))]
    pub cover_letter: Option<String>,
    #[validate(length(min = 1))]
    pub resume: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionPayload {
    pub target_status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationListQuery {
    pub candidate_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub company_id: Uuid,
    pub candidate_id: Uuid,
    pub status: ApplicationStatus,
    pub application_date: DateTime<Utc>,
    pub cover_letter: Option<String>,
    pub notes: Option<String>,
    pub resume: Option<String>,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl From<Application> for ApplicationResponse {
    fn from(app: Application) -> Self {
        Self {
            id: app.id,
            job_id: app.job_id,
            company_id: app.company_id,
            candidate_id: app.candidate_id,
            status: app.status,
            application_date: app.application_date,
            cover_letter: app.cover_letter,
            notes: app.notes,
            resume: app.resume,
            version: app.version,
            updated_at: app.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationResponse>,
    pub total: usize,
}

impl From<Vec<Application>> for ApplicationListResponse {
    fn from(apps: Vec<Application>) -> Self {
        let total = apps.len();
        Self {
            applications: apps.into_iter().map(ApplicationResponse::from).collect(),
            total,
        }
    }
}
