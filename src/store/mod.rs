pub mod memory;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::error::Result;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::interview::Interview;

/// Persistence contract for the lifecycle services. `put_*` takes the
/// version the caller read and fails with `Error::Conflict` when the stored
/// entity has moved on, so no transition can apply against a stale snapshot.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_application(&self, id: Uuid) -> Result<Option<Application>>;

    async fn insert_application(&self, application: Application) -> Result<Application>;

    async fn put_application(
        &self,
        application: Application,
        expected_version: u64,
    ) -> Result<Application>;

    /// Active means neither withdrawn nor rejected. At most one such
    /// application may exist per (job, candidate) pair.
    async fn find_active_application(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<Application>>;

    async fn list_applications(
        &self,
        candidate_id: Option<Uuid>,
        job_id: Option<Uuid>,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>>;

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>>;

    async fn insert_interview(&self, interview: Interview) -> Result<Interview>;

    async fn put_interview(&self, interview: Interview, expected_version: u64)
        -> Result<Interview>;

    async fn list_interviews(&self, application_id: Uuid) -> Result<Vec<Interview>>;
}

/// Per-application mutual exclusion. Every read-modify-write against an
/// application or one of its interviews runs under the application's lock,
/// which also makes interview-to-application cascades atomic.
#[derive(Clone, Default)]
pub struct ApplicationLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>>,
}

impl ApplicationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, application_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut registry = self.inner.lock().expect("lock registry mutex poisoned");
            registry
                .entry(application_id)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
