use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dto::interview_dto::{
    CompleteInterviewPayload, PreparationPayload, RescheduleInterviewPayload,
    ScheduleInterviewPayload,
};
use crate::error::{Error, Result};
use crate::models::actor::Actor;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::interview::{
    Interview, InterviewOutcome, InterviewPreparation, InterviewStatus, RescheduleEntry,
    MAX_DURATION_MINUTES, MIN_DURATION_MINUTES,
};
use crate::services::application_service::ApplicationService;
use crate::services::notification_service::{EntityType, NotificationHook, TransitionEvent};
use crate::store::{ApplicationLocks, Store};

/// Manages the interview sub-lifecycle and cascades status changes up to
/// the parent application. Interview mutations lock the parent application,
/// so a transition and its cascade commit as one unit.
#[derive(Clone)]
pub struct InterviewService {
    store: Arc<dyn Store>,
    locks: ApplicationLocks,
    notifier: Arc<dyn NotificationHook>,
    applications: ApplicationService,
}

impl InterviewService {
    pub fn new(
        store: Arc<dyn Store>,
        locks: ApplicationLocks,
        notifier: Arc<dyn NotificationHook>,
        applications: ApplicationService,
    ) -> Self {
        Self {
            store,
            locks,
            notifier,
            applications,
        }
    }

    pub async fn schedule(
        &self,
        application_id: Uuid,
        payload: ScheduleInterviewPayload,
        actor: Actor,
    ) -> Result<Interview> {
        if !actor.is_admin() {
            return Err(Error::Forbidden(
                "Only administrators may schedule interviews".to_string(),
            ));
        }

        let _guard = self.locks.acquire(application_id).await;

        let application = self.load_application(application_id).await?;
        if application.status.is_terminal() {
            return Err(Error::InvalidState(format!(
                "Application is {}; no interview can be scheduled",
                application.status
            )));
        }
        if matches!(
            application.status,
            ApplicationStatus::Applied | ApplicationStatus::UnderReview
        ) {
            return Err(Error::InvalidState(format!(
                "Application is {}; it must be shortlisted before an interview is scheduled",
                application.status
            )));
        }

        if payload.scheduled_date <= Utc::now() {
            return Err(Error::field(
                "scheduled_date",
                "interview date must be strictly in the future",
            ));
        }
        validate_duration(payload.duration_minutes)?;
        if !payload.location.matches_type(payload.interview_type) {
            return Err(Error::field(
                "location",
                format!(
                    "a {} interview cannot use a {} location",
                    payload.interview_type,
                    payload.location.mode()
                ),
            ));
        }

        let existing = self.store.list_interviews(application_id).await?;
        let max_round = existing.iter().map(|i| i.round).max().unwrap_or(0);
        if payload.round <= max_round {
            return Err(Error::field(
                "round",
                format!(
                    "round must exceed the latest scheduled round ({}) for this application",
                    max_round
                ),
            ));
        }

        let now = Utc::now();
        let interview = Interview {
            id: Uuid::new_v4(),
            application_id,
            job_id: application.job_id,
            company_id: application.company_id,
            candidate_id: application.candidate_id,
            interview_type: payload.interview_type,
            round: payload.round,
            scheduled_date: payload.scheduled_date,
            duration_minutes: payload.duration_minutes,
            location: payload.location,
            interviewers: payload
                .interviewers
                .into_iter()
                .map(Into::into)
                .collect(),
            preparation: InterviewPreparation::default(),
            status: InterviewStatus::Scheduled,
            outcome: InterviewOutcome::Pending,
            feedback: None,
            next_steps: None,
            reschedule_history: Vec::new(),
            cancellation_reason: None,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        let interview = self.store.insert_interview(interview).await?;

        // Cascade under the same lock: the application advances to
        // interview-scheduled from shortlisted, or re-enters it for a new
        // round after being interviewed; no-op when already there.
        if matches!(
            application.status,
            ApplicationStatus::Shortlisted | ApplicationStatus::Interviewed
        ) {
            self.applications
                .transition_inner(application_id, ApplicationStatus::InterviewScheduled, actor)
                .await?;
        }

        tracing::info!(
            interview_id = %interview.id,
            application_id = %application_id,
            round = interview.round,
            interview_type = interview.interview_type.as_str(),
            "interview scheduled"
        );
        self.notifier.notify(TransitionEvent::new(
            EntityType::Interview,
            interview.id,
            None,
            InterviewStatus::Scheduled.as_str(),
            actor,
        ));

        Ok(interview)
    }

    pub async fn confirm(&self, interview_id: Uuid, actor: Actor) -> Result<Interview> {
        let (_guard, interview, application) = self.lock_and_load(interview_id).await?;
        self.reject_terminal_parent(&application)?;

        if !actor.is_admin() && !actor.owns_candidate(interview.candidate_id) {
            return Err(Error::Forbidden(
                "Only the interviewed candidate or an administrator may confirm".to_string(),
            ));
        }
        if interview.status != InterviewStatus::Scheduled {
            return Err(Error::InvalidState(format!(
                "Only a scheduled interview can be confirmed; this one is {}",
                interview.status
            )));
        }

        let mut updated = interview;
        updated.status = InterviewStatus::Confirmed;
        let expected = updated.version;
        let updated = self.store.put_interview(updated, expected).await?;

        self.notify_status(&updated, InterviewStatus::Scheduled, actor);
        Ok(updated)
    }

    /// Resolves atomically back to `scheduled`; the transient `rescheduled`
    /// status is recorded in history, never observable at rest.
    pub async fn reschedule(
        &self,
        interview_id: Uuid,
        payload: RescheduleInterviewPayload,
        actor: Actor,
    ) -> Result<Interview> {
        if !actor.is_admin() {
            return Err(Error::Forbidden(
                "Only administrators may reschedule interviews".to_string(),
            ));
        }

        let (_guard, interview, application) = self.lock_and_load(interview_id).await?;
        self.reject_terminal_parent(&application)?;

        if !interview.status.is_pending() {
            return Err(Error::InvalidState(format!(
                "A {} interview cannot be rescheduled",
                interview.status
            )));
        }
        if payload.new_date <= Utc::now() {
            return Err(Error::field(
                "new_date",
                "new interview date must be strictly in the future",
            ));
        }
        if payload.new_date <= interview.max_scheduled_date() {
            return Err(Error::field(
                "new_date",
                "new interview date must be later than every previously scheduled date",
            ));
        }
        if let Some(duration) = payload.new_duration_minutes {
            validate_duration(duration)?;
        }
        if let Some(location) = &payload.new_location {
            if !location.matches_type(interview.interview_type) {
                return Err(Error::field(
                    "new_location",
                    format!(
                        "a {} interview cannot use a {} location",
                        interview.interview_type,
                        location.mode()
                    ),
                ));
            }
        }

        let from = interview.status;
        let mut updated = interview;
        updated.reschedule_history.push(RescheduleEntry {
            previous_date: updated.scheduled_date,
            previous_duration_minutes: updated.duration_minutes,
            previous_location: updated.location.clone(),
            reason: payload.reason,
            rescheduled_at: Utc::now(),
        });
        updated.scheduled_date = payload.new_date;
        if let Some(duration) = payload.new_duration_minutes {
            updated.duration_minutes = duration;
        }
        if let Some(location) = payload.new_location {
            updated.location = location;
        }
        if payload.next_steps.is_some() {
            updated.next_steps = payload.next_steps;
        }
        updated.status = InterviewStatus::Scheduled;
        let expected = updated.version;
        let updated = self.store.put_interview(updated, expected).await?;

        tracing::info!(
            interview_id = %updated.id,
            reschedules = updated.reschedule_history.len(),
            "interview rescheduled"
        );
        self.notify_status(&updated, from, actor);
        Ok(updated)
    }

    /// Writes feedback, outcome and next steps exactly once, then cascades:
    /// a failed outcome suggests rejection, a passed final round moves the
    /// application toward interviewed.
    pub async fn complete(
        &self,
        interview_id: Uuid,
        payload: CompleteInterviewPayload,
        actor: Actor,
    ) -> Result<Interview> {
        if !actor.is_admin() {
            return Err(Error::Forbidden(
                "Only administrators may complete interviews".to_string(),
            ));
        }

        let (_guard, interview, application) = self.lock_and_load(interview_id).await?;
        self.reject_terminal_parent(&application)?;

        match interview.status {
            InterviewStatus::Completed => return Err(Error::AlreadyCompleted),
            InterviewStatus::Cancelled => {
                return Err(Error::InvalidState(
                    "A cancelled interview cannot be completed".to_string(),
                ))
            }
            _ => {}
        }
        if !matches!(
            payload.outcome,
            InterviewOutcome::Passed | InterviewOutcome::Failed
        ) {
            return Err(Error::field(
                "outcome",
                "completion outcome must be 'passed' or 'failed'",
            ));
        }

        let cascade_target = match payload.outcome {
            InterviewOutcome::Failed => Some(ApplicationStatus::Rejected),
            InterviewOutcome::Passed => {
                let siblings = self.store.list_interviews(interview.application_id).await?;
                let more_rounds_pending = siblings
                    .iter()
                    .filter(|other| other.id != interview.id)
                    .any(|other| other.status.is_pending());
                if more_rounds_pending {
                    None
                } else {
                    Some(ApplicationStatus::Interviewed)
                }
            }
            _ => unreachable!("outcome validated above"),
        };

        let from = interview.status;
        let mut updated = interview;
        updated.status = InterviewStatus::Completed;
        updated.outcome = payload.outcome;
        updated.feedback = Some(payload.feedback.into());
        if payload.next_steps.is_some() {
            updated.next_steps = payload.next_steps;
        }
        let expected = updated.version;
        let updated = self.store.put_interview(updated, expected).await?;

        // The cascade is a default suggestion: skipped when the parent has
        // already been accepted, idempotent when the status is current.
        if let Some(target) = cascade_target {
            if !application.status.is_terminal() {
                self.applications
                    .transition_inner(updated.application_id, target, actor)
                    .await?;
            }
        }

        tracing::info!(
            interview_id = %updated.id,
            application_id = %updated.application_id,
            outcome = updated.outcome.as_str(),
            "interview completed"
        );
        self.notify_status(&updated, from, actor);
        Ok(updated)
    }

    pub async fn cancel(
        &self,
        interview_id: Uuid,
        reason: String,
        actor: Actor,
    ) -> Result<Interview> {
        if !actor.is_admin() {
            return Err(Error::Forbidden(
                "Only administrators may cancel interviews".to_string(),
            ));
        }

        let (_guard, interview, application) = self.lock_and_load(interview_id).await?;
        self.reject_terminal_parent(&application)?;

        if interview.status.is_terminal() {
            return Err(Error::InvalidState(format!(
                "A {} interview cannot be cancelled",
                interview.status
            )));
        }

        let from = interview.status;
        let mut updated = interview;
        updated.status = InterviewStatus::Cancelled;
        updated.outcome = InterviewOutcome::Cancelled;
        updated.cancellation_reason = Some(reason);
        let expected = updated.version;
        let updated = self.store.put_interview(updated, expected).await?;

        self.notify_status(&updated, from, actor);
        Ok(updated)
    }

    /// Candidate-owned notes; legal in any interview status while the
    /// parent application is still live. Not a status transition, so no
    /// notification is emitted.
    pub async fn update_preparation(
        &self,
        interview_id: Uuid,
        payload: PreparationPayload,
        actor: Actor,
    ) -> Result<Interview> {
        let (_guard, interview, application) = self.lock_and_load(interview_id).await?;
        self.reject_terminal_parent(&application)?;

        if !actor.owns_candidate(interview.candidate_id) {
            return Err(Error::Forbidden(
                "Preparation notes belong to the interviewed candidate".to_string(),
            ));
        }

        let mut updated = interview;
        if payload.notes.is_some() {
            updated.preparation.notes = payload.notes;
        }
        if payload.research.is_some() {
            updated.preparation.research = payload.research;
        }
        if let Some(questions) = payload.questions {
            updated.preparation.questions = questions;
        }
        if let Some(documents) = payload.documents {
            updated.preparation.documents = documents;
        }
        let expected = updated.version;
        self.store.put_interview(updated, expected).await
    }

    pub async fn get(&self, interview_id: Uuid, actor: Actor) -> Result<Interview> {
        let interview = self.load_interview(interview_id).await?;
        if !actor.is_admin() && !actor.owns_candidate(interview.candidate_id) {
            return Err(Error::Forbidden(
                "You may only view your own interviews".to_string(),
            ));
        }
        Ok(interview)
    }

    pub async fn list_for_application(
        &self,
        application_id: Uuid,
        actor: Actor,
    ) -> Result<Vec<Interview>> {
        let application = self.load_application(application_id).await?;
        if !actor.is_admin() && !actor.owns_candidate(application.candidate_id) {
            return Err(Error::Forbidden(
                "You may only view interviews for your own applications".to_string(),
            ));
        }
        self.store.list_interviews(application_id).await
    }

    /// Locks the parent application before re-reading both entities, so the
    /// snapshot the mutation works on cannot go stale.
    async fn lock_and_load(
        &self,
        interview_id: Uuid,
    ) -> Result<(tokio::sync::OwnedMutexGuard<()>, Interview, Application)> {
        let application_id = self.load_interview(interview_id).await?.application_id;
        let guard = self.locks.acquire(application_id).await;
        let interview = self.load_interview(interview_id).await?;
        let application = self.load_application(interview.application_id).await?;
        Ok((guard, interview, application))
    }

    async fn load_interview(&self, id: Uuid) -> Result<Interview> {
        self.store
            .get_interview(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Interview {} not found", id)))
    }

    async fn load_application(&self, id: Uuid) -> Result<Application> {
        self.store
            .get_application(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    /// Interviews are retained but frozen once the candidate has withdrawn
    /// or the application was rejected.
    fn reject_terminal_parent(&self, application: &Application) -> Result<()> {
        if matches!(
            application.status,
            ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        ) {
            return Err(Error::InvalidState(format!(
                "Parent application is {}; its interviews are read-only",
                application.status
            )));
        }
        Ok(())
    }

    fn notify_status(&self, interview: &Interview, from: InterviewStatus, actor: Actor) {
        self.notifier.notify(TransitionEvent::new(
            EntityType::Interview,
            interview.id,
            Some(from.as_str()),
            interview.status.as_str(),
            actor,
        ));
    }
}

fn validate_duration(minutes: u32) -> Result<()> {
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
        return Err(Error::field(
            "duration_minutes",
            format!(
                "duration must be between {} and {} minutes",
                MIN_DURATION_MINUTES, MAX_DURATION_MINUTES
            ),
        ));
    }
    Ok(())
}
