use std::sync::Arc;

use uuid::Uuid;

use crate::dto::application_dto::{ApplicationListQuery, CreateApplicationPayload};
use crate::error::{Error, Result};
use crate::models::actor::Actor;
use crate::models::application::{Application, ApplicationStatus};
use crate::services::notification_service::{EntityType, NotificationHook, TransitionEvent};
use crate::store::{ApplicationLocks, Store};

/// Enforces the application status graph and authorization, and keeps the
/// application consistent with its interviews. Every mutation runs under
/// the per-application lock and commits all-or-nothing.
#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn Store>,
    locks: ApplicationLocks,
    notifier: Arc<dyn NotificationHook>,
    creation_lock: Arc<tokio::sync::Mutex<()>>,
}

impl ApplicationService {
    pub fn new(
        store: Arc<dyn Store>,
        locks: ApplicationLocks,
        notifier: Arc<dyn NotificationHook>,
    ) -> Self {
        Self {
            store,
            locks,
            notifier,
            creation_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Candidate submits an application. At most one active application per
    /// (job, candidate) pair; the creation lock serializes the
    /// duplicate check against concurrent submissions.
    pub async fn create(
        &self,
        payload: CreateApplicationPayload,
        actor: Actor,
    ) -> Result<Application> {
        if actor.is_admin() {
            return Err(Error::Forbidden(
                "Applications are created by candidates, not administrators".to_string(),
            ));
        }

        let _guard = self.creation_lock.lock().await;
        if self
            .store
            .find_active_application(payload.job_id, actor.id)
            .await?
            .is_some()
        {
            return Err(Error::DuplicateApplication);
        }

        let application = Application::new(
            payload.job_id,
            payload.company_id,
            actor.id,
            payload.cover_letter,
            payload.resume,
            payload.notes,
        );
        let application = self.store.insert_application(application).await?;

        self.notifier.notify(TransitionEvent::new(
            EntityType::Application,
            application.id,
            None,
            application.status.as_str(),
            actor,
        ));

        Ok(application)
    }

    pub async fn get(&self, id: Uuid, actor: Actor) -> Result<Application> {
        let application = self.load(id).await?;
        if !actor.is_admin() && !actor.owns_candidate(application.candidate_id) {
            return Err(Error::Forbidden(
                "You may only view your own applications".to_string(),
            ));
        }
        Ok(application)
    }

    /// Candidates are scoped to their own applications regardless of the
    /// filter they pass.
    pub async fn list(&self, query: ApplicationListQuery, actor: Actor) -> Result<Vec<Application>> {
        let candidate_filter = if actor.is_admin() {
            query.candidate_id
        } else {
            Some(actor.id)
        };
        self.store
            .list_applications(candidate_filter, query.job_id, query.status)
            .await
    }

    pub async fn transition(
        &self,
        id: Uuid,
        target: ApplicationStatus,
        actor: Actor,
    ) -> Result<Application> {
        let _guard = self.locks.acquire(id).await;
        self.transition_inner(id, target, actor).await
    }

    /// Candidate-only convenience wrapper around the withdrawal edge.
    pub async fn withdraw(&self, id: Uuid, actor: Actor) -> Result<Application> {
        if actor.is_admin() {
            return Err(Error::Forbidden(
                "Withdrawal is a candidate action; administrators reject instead".to_string(),
            ));
        }
        self.transition(id, ApplicationStatus::Withdrawn, actor).await
    }

    /// Body of `transition`, also entered by the interview service while it
    /// already holds the application lock (cascades).
    pub(crate) async fn transition_inner(
        &self,
        id: Uuid,
        target: ApplicationStatus,
        actor: Actor,
    ) -> Result<Application> {
        let application = self.load(id).await?;
        self.authorize_edge(&application, target, actor)?;

        if application.status.is_terminal() {
            return Err(Error::InvalidTransition(format!(
                "Application is {} and accepts no further transitions",
                application.status
            )));
        }

        // Re-applying the current status is an idempotent no-op so cascades
        // can be retried safely.
        if application.status == target {
            return Ok(application);
        }

        if !application.status.can_transition_to(target) {
            return Err(Error::InvalidTransition(format!(
                "Cannot move application from {} to {}",
                application.status, target
            )));
        }

        self.check_interview_preconditions(&application, target)
            .await?;

        let from = application.status;
        let mut updated = application;
        updated.status = target;
        let expected_version = updated.version;
        let updated = self.store.put_application(updated, expected_version).await?;

        tracing::info!(
            application_id = %updated.id,
            from = from.as_str(),
            to = target.as_str(),
            actor_id = %actor.id,
            role = actor.role.as_str(),
            "application transitioned"
        );
        self.notifier.notify(TransitionEvent::new(
            EntityType::Application,
            updated.id,
            Some(from.as_str()),
            target.as_str(),
            actor,
        ));

        Ok(updated)
    }

    async fn load(&self, id: Uuid) -> Result<Application> {
        self.store
            .get_application(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    /// Withdrawal belongs to the owning candidate; every other edge is an
    /// administrator action.
    fn authorize_edge(
        &self,
        application: &Application,
        target: ApplicationStatus,
        actor: Actor,
    ) -> Result<()> {
        if target == ApplicationStatus::Withdrawn {
            if actor.is_admin() {
                return Err(Error::Forbidden(
                    "Withdrawal is a candidate action; administrators reject instead".to_string(),
                ));
            }
            if !actor.owns_candidate(application.candidate_id) {
                return Err(Error::Forbidden(
                    "Only the owning candidate may withdraw this application".to_string(),
                ));
            }
            return Ok(());
        }
        if !actor.is_admin() {
            return Err(Error::Forbidden(format!(
                "Only administrators may move an application to {}",
                target
            )));
        }
        Ok(())
    }

    /// The interview-scheduled state is only meaningful with an interview
    /// on file, entering it or leaving it toward interviewed both demand one.
    async fn check_interview_preconditions(
        &self,
        application: &Application,
        target: ApplicationStatus,
    ) -> Result<()> {
        let needs_interview = target == ApplicationStatus::InterviewScheduled
            || (application.status == ApplicationStatus::InterviewScheduled
                && target == ApplicationStatus::Interviewed);
        if !needs_interview {
            return Ok(());
        }

        let interviews = self.store.list_interviews(application.id).await?;
        let has_live_interview = interviews
            .iter()
            .any(|interview| interview.status != crate::models::interview::InterviewStatus::Cancelled);
        if !has_live_interview {
            return Err(Error::PreconditionFailed(format!(
                "Application {} has no scheduled interview on file",
                application.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use mockall::mock;
    use mockall::predicate::always;

    mock! {
        Hook {}
        impl NotificationHook for Hook {
            fn notify(&self, event: TransitionEvent);
        }
    }

    fn service_with(notifier: Arc<dyn NotificationHook>) -> ApplicationService {
        ApplicationService::new(Arc::new(MemoryStore::new()), ApplicationLocks::new(), notifier)
    }

    fn quiet_service() -> ApplicationService {
        let mut hook = MockHook::new();
        hook.expect_notify().with(always()).returning(|_| ());
        service_with(Arc::new(hook))
    }

    fn payload() -> CreateApplicationPayload {
        CreateApplicationPayload {
            job_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            cover_letter: Some("Dear team".into()),
            resume: Some("resume-ref-1".into()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_notifies_with_applied_status() {
        let mut hook = MockHook::new();
        hook.expect_notify()
            .withf(|event| {
                event.entity_type == EntityType::Application
                    && event.from_status.is_none()
                    && event.to_status == "applied"
            })
            .times(1)
            .returning(|_| ());

        let service = service_with(Arc::new(hook));
        let candidate = Actor::candidate(Uuid::new_v4());
        let app = service.create(payload(), candidate).await.unwrap();
        assert_eq!(app.status, ApplicationStatus::Applied);
        assert_eq!(app.candidate_id, candidate.id);
    }

    #[tokio::test]
    async fn duplicate_active_application_is_rejected() {
        let service = quiet_service();
        let candidate = Actor::candidate(Uuid::new_v4());
        let req = payload();

        service.create(req.clone(), candidate).await.unwrap();
        let err = service.create(req, candidate).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateApplication));
    }

    #[tokio::test]
    async fn reapplying_after_withdrawal_succeeds() {
        let service = quiet_service();
        let candidate = Actor::candidate(Uuid::new_v4());
        let req = payload();

        let app = service.create(req.clone(), candidate).await.unwrap();
        service.withdraw(app.id, candidate).await.unwrap();
        let second = service.create(req, candidate).await.unwrap();
        assert_eq!(second.status, ApplicationStatus::Applied);
        assert_ne!(second.id, app.id);
    }

    #[tokio::test]
    async fn admins_cannot_create_or_withdraw() {
        let service = quiet_service();
        let admin = Actor::admin(Uuid::new_v4());
        let candidate = Actor::candidate(Uuid::new_v4());

        let err = service.create(payload(), admin).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));

        let app = service.create(payload(), candidate).await.unwrap();
        let err = service.withdraw(app.id, admin).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn candidates_cannot_drive_admin_edges() {
        let service = quiet_service();
        let candidate = Actor::candidate(Uuid::new_v4());
        let app = service.create(payload(), candidate).await.unwrap();

        let err = service
            .transition(app.id, ApplicationStatus::UnderReview, candidate)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn withdrawing_someone_elses_application_is_forbidden() {
        let service = quiet_service();
        let owner = Actor::candidate(Uuid::new_v4());
        let stranger = Actor::candidate(Uuid::new_v4());
        let app = service.create(payload(), owner).await.unwrap();

        let err = service.withdraw(app.id, stranger).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn terminal_application_rejects_every_target() {
        let service = quiet_service();
        let candidate = Actor::candidate(Uuid::new_v4());
        let admin = Actor::admin(Uuid::new_v4());
        let app = service.create(payload(), candidate).await.unwrap();
        service
            .transition(app.id, ApplicationStatus::Rejected, admin)
            .await
            .unwrap();

        for target in [
            ApplicationStatus::UnderReview,
            ApplicationStatus::Shortlisted,
            ApplicationStatus::Accepted,
            ApplicationStatus::Rejected,
        ] {
            let err = service.transition(app.id, target, admin).await.unwrap_err();
            assert!(matches!(err, Error::InvalidTransition(_)), "target {target}");
        }
        let err = service.withdraw(app.id, candidate).await.unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn entering_interview_scheduled_requires_an_interview() {
        let service = quiet_service();
        let candidate = Actor::candidate(Uuid::new_v4());
        let admin = Actor::admin(Uuid::new_v4());
        let app = service.create(payload(), candidate).await.unwrap();

        service
            .transition(app.id, ApplicationStatus::UnderReview, admin)
            .await
            .unwrap();
        service
            .transition(app.id, ApplicationStatus::Shortlisted, admin)
            .await
            .unwrap();

        let err = service
            .transition(app.id, ApplicationStatus::InterviewScheduled, admin)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PreconditionFailed(_)));
    }

    #[tokio::test]
    async fn racing_terminal_transitions_commit_exactly_once() {
        let service = quiet_service();
        let candidate = Actor::candidate(Uuid::new_v4());
        let admin = Actor::admin(Uuid::new_v4());
        let app = service.create(payload(), candidate).await.unwrap();

        // Both edges are legal from `applied`; the per-application lock must
        // serialize them so only the first writer lands.
        let reject = {
            let service = service.clone();
            let id = app.id;
            tokio::spawn(async move {
                service.transition(id, ApplicationStatus::Rejected, admin).await
            })
        };
        let withdraw = {
            let service = service.clone();
            let id = app.id;
            tokio::spawn(async move { service.withdraw(id, candidate).await })
        };

        let results = [reject.await.unwrap(), withdraw.await.unwrap()];
        let committed = results.iter().filter(|result| result.is_ok()).count();
        assert_eq!(committed, 1, "exactly one writer must land");
        for result in &results {
            if let Err(err) = result {
                // The loser observes the terminal state, never a stale write.
                assert!(matches!(err, Error::InvalidTransition(_)), "loser saw {err}");
            }
        }

        let stored = service.get(app.id, admin).await.unwrap();
        assert!(stored.status.is_terminal());
    }

    #[tokio::test]
    async fn unknown_application_is_not_found() {
        let service = quiet_service();
        let admin = Actor::admin(Uuid::new_v4());
        let err = service
            .transition(Uuid::new_v4(), ApplicationStatus::UnderReview, admin)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
