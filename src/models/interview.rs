use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_DURATION_MINUTES: u32 = 15;
pub const MAX_DURATION_MINUTES: u32 = 480;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewType {
    Phone,
    Video,
    InPerson,
    Technical,
    Panel,
    Hr,
    Final,
}

impl InterviewType {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewType::Phone => "phone",
            InterviewType::Video => "video",
            InterviewType::InPerson => "in-person",
            InterviewType::Technical => "technical",
            InterviewType::Panel => "panel",
            InterviewType::Hr => "hr",
            InterviewType::Final => "final",
        }
    }
}

impl std::fmt::Display for InterviewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exactly one delivery variant, matching the interview type's mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewLocation {
    Office { address: String },
    Remote { meeting_link: String },
    Phone { phone_number: String },
}

impl InterviewLocation {
    pub fn mode(&self) -> &'static str {
        match self {
            InterviewLocation::Office { .. } => "office",
            InterviewLocation::Remote { .. } => "remote",
            InterviewLocation::Phone { .. } => "phone",
        }
    }

    /// Phone interviews need a phone number, video interviews a meeting
    /// link, on-site interviews an address. The remaining types can be
    /// delivered any way.
    pub fn matches_type(&self, interview_type: InterviewType) -> bool {
        match interview_type {
            InterviewType::Phone => matches!(self, InterviewLocation::Phone { .. }),
            InterviewType::Video => matches!(self, InterviewLocation::Remote { .. }),
            InterviewType::InPerson => matches!(self, InterviewLocation::Office { .. }),
            InterviewType::Technical
            | InterviewType::Panel
            | InterviewType::Hr
            | InterviewType::Final => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    Rescheduled,
}

impl InterviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::Confirmed => "confirmed",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
            InterviewStatus::Rescheduled => "rescheduled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, InterviewStatus::Completed | InterviewStatus::Cancelled)
    }

    /// Open for reschedule/complete/cancel.
    pub fn is_pending(self) -> bool {
        matches!(self, InterviewStatus::Scheduled | InterviewStatus::Confirmed)
    }
}

impl std::fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewOutcome {
    Pending,
    Passed,
    Failed,
    Cancelled,
}

impl InterviewOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewOutcome::Pending => "pending",
            InterviewOutcome::Passed => "passed",
            InterviewOutcome::Failed => "failed",
            InterviewOutcome::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for InterviewOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interviewer {
    pub name: String,
    pub email: Option<String>,
    pub title: Option<String>,
    pub linkedin: Option<String>,
}

/// Write-once at completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewFeedback {
    pub user_notes: Option<String>,
    pub interviewer_feedback: Option<String>,
    pub rating: Option<u8>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewPreparation {
    pub notes: Option<String>,
    pub research: Option<String>,
    pub questions: Vec<String>,
    pub documents: Vec<String>,
}

/// Audit entry kept for every reschedule; the record itself always holds
/// the current date/duration/location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleEntry {
    pub previous_date: DateTime<Utc>,
    pub previous_duration_minutes: u32,
    pub previous_location: InterviewLocation,
    pub reason: Option<String>,
    pub rescheduled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    pub id: Uuid,
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub company_id: Uuid,
    pub candidate_id: Uuid,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub round: u32,
    pub scheduled_date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub location: InterviewLocation,
    pub interviewers: Vec<Interviewer>,
    pub preparation: InterviewPreparation,
    pub status: InterviewStatus,
    pub outcome: InterviewOutcome,
    pub feedback: Option<InterviewFeedback>,
    pub next_steps: Option<String>,
    pub reschedule_history: Vec<RescheduleEntry>,
    pub cancellation_reason: Option<String>,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Interview {
    /// Latest date the interview has ever been scheduled for; reschedules
    /// must move strictly past this.
    pub fn max_scheduled_date(&self) -> DateTime<Utc> {
        self.reschedule_history
            .iter()
            .map(|entry| entry.previous_date)
            .chain(std::iter::once(self.scheduled_date))
            .max()
            .expect("chain always yields at least the current date")
    }
}
