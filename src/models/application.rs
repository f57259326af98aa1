use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Applied,
    UnderReview,
    Shortlisted,
    InterviewScheduled,
    Interviewed,
    Rejected,
    Accepted,
    Withdrawn,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::UnderReview => "under-review",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::InterviewScheduled => "interview-scheduled",
            ApplicationStatus::Interviewed => "interviewed",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected | ApplicationStatus::Accepted | ApplicationStatus::Withdrawn
        )
    }

    /// Edges of the application status graph. Withdrawal and rejection are
    /// legal from any non-terminal state; the interview-scheduled ⇄
    /// interviewed pair supports multi-round processes.
    pub fn can_transition_to(self, target: ApplicationStatus) -> bool {
        use ApplicationStatus::*;

        if self.is_terminal() {
            return false;
        }
        match (self, target) {
            (_, Withdrawn) | (_, Rejected) => true,
            (Applied, UnderReview) => true,
            (UnderReview, Shortlisted) => true,
            (Shortlisted, InterviewScheduled) => true,
            (InterviewScheduled, Interviewed) => true,
            (Interviewed, InterviewScheduled) => true,
            (Interviewed, Accepted) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub company_id: Uuid,
    pub candidate_id: Uuid,
    pub status: ApplicationStatus,
    pub application_date: DateTime<Utc>,
    pub cover_letter: Option<String>,
    pub notes: Option<String>,
    /// Opaque reference into the external file store.
    pub resume: Option<String>,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn new(
        job_id: Uuid,
        company_id: Uuid,
        candidate_id: Uuid,
        cover_letter: Option<String>,
        resume: Option<String>,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            job_id,
            company_id,
            candidate_id,
            status: ApplicationStatus::Applied,
            application_date: now,
            cover_letter,
            notes,
            resume,
            version: 0,
            updated_at: now,
        }
    }

    /// Still counts against the one-active-application-per-job rule.
    pub fn is_active(&self) -> bool {
        !matches!(
            self.status,
            ApplicationStatus::Withdrawn | ApplicationStatus::Rejected
        )
    }
}
