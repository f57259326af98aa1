use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::interview::{
    Interview, InterviewFeedback, InterviewLocation, InterviewOutcome, InterviewPreparation,
    InterviewStatus, InterviewType, Interviewer, RescheduleEntry,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InterviewerPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub title: Option<String>,
    pub linkedin: Option<String>,
}

impl From<InterviewerPayload> for Interviewer {
    fn from(payload: InterviewerPayload) -> Self {
        Self {
            name: payload.name,
            email: payload.email,
            title: payload.title,
            linkedin: payload.linkedin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScheduleInterviewPayload {
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    #[validate(range(min = 1))]
    pub round: u32,
    pub scheduled_date: DateTime<Utc>,
    #[validate(range(min = 15, max = 480))]
    pub duration_minutes: u32,
    pub location: InterviewLocation,
    #[validate(nested)]
    #[serde(default)]
    pub interviewers: Vec<InterviewerPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RescheduleInterviewPayload {
    pub new_date: DateTime<Utc>,
    #[validate(range(min = 15, max = 480))]
    pub new_duration_minutes: Option<u32>,
    pub new_location: Option<InterviewLocation>,
    #[validate(length(min = 1))]
    pub reason: Option<String>,
    pub next_steps: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedbackPayload {
    pub user_notes: Option<String>,
    pub interviewer_feedback: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<u8>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_for_improvement: Vec<String>,
}

impl From<FeedbackPayload> for InterviewFeedback {
    fn from(payload: FeedbackPayload) -> Self {
        Self {
            user_notes: payload.user_notes,
            interviewer_feedback: payload.interviewer_feedback,
            rating: payload.rating,
            strengths: payload.strengths,
            areas_for_improvement: payload.areas_for_improvement,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompleteInterviewPayload {
    pub outcome: InterviewOutcome,
    #[validate(nested)]
    pub feedback: FeedbackPayload,
    pub next_steps: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CancelInterviewPayload {
    #[validate(length(min = 1))]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparationPayload {
    pub notes: Option<String>,
    pub research: Option<String>,
    pub questions: Option<Vec<String>>,
    pub documents: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewResponse {
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

impl From<Interview> for InterviewResponse {
    fn from(interview: Interview) -> Self {
        Self {
            id: interview.id,
            application_id: interview.application_id,
            job_id: interview.job_id,
            company_id: interview.company_id,
            candidate_id: interview.candidate_id,
            interview_type: interview.interview_type,
            round: interview.round,
            scheduled_date: interview.scheduled_date,
            duration_minutes: interview.duration_minutes,
            location: interview.location,
            interviewers: interview.interviewers,
            preparation: interview.preparation,
            status: interview.status,
            outcome: interview.outcome,
            feedback: interview.feedback,
            next_steps: interview.next_steps,
            reschedule_history: interview.reschedule_history,
            cancellation_reason: interview.cancellation_reason,
            version: interview.version,
            created_at: interview.created_at,
            updated_at: interview.updated_at,
        }
    }
}
