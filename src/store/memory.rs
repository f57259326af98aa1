use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::interview::Interview;
use crate::store::Store;

/// In-memory store with optimistic versioning. Entities are never removed;
/// withdrawn applications and cancelled interviews stay behind for audit.
#[derive(Default)]
pub struct MemoryStore {
    applications: RwLock<HashMap<Uuid, Application>>,
    interviews: RwLock<HashMap<Uuid, Interview>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        let applications = self.applications.read().expect("application map poisoned");
        Ok(applications.get(&id).cloned())
    }

    async fn insert_application(&self, application: Application) -> Result<Application> {
        let mut applications = self.applications.write().expect("application map poisoned");
        if applications.contains_key(&application.id) {
            return Err(Error::Conflict(format!(
                "application {} already exists",
                application.id
            )));
        }
        applications.insert(application.id, application.clone());
        Ok(application)
    }

    async fn put_application(
        &self,
        mut application: Application,
        expected_version: u64,
    ) -> Result<Application> {
        let mut applications = self.applications.write().expect("application map poisoned");
        let stored = applications.get(&application.id).ok_or_else(|| {
            Error::NotFound(format!("Application {} not found", application.id))
        })?;
        if stored.version != expected_version {
            return Err(Error::Conflict(format!(
                "application {} was modified concurrently (stored v{}, expected v{})",
                application.id, stored.version, expected_version
            )));
        }
        application.version = expected_version + 1;
        application.updated_at = Utc::now();
        applications.insert(application.id, application.clone());
        Ok(application)
    }

    async fn find_active_application(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<Application>> {
        let applications = self.applications.read().expect("application map poisoned");
        Ok(applications
            .values()
            .find(|app| app.job_id == job_id && app.candidate_id == candidate_id && app.is_active())
            .cloned())
    }

    async fn list_applications(
        &self,
        candidate_id: Option<Uuid>,
        job_id: Option<Uuid>,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>> {
        let applications = self.applications.read().expect("application map poisoned");
        let mut rows: Vec<Application> = applications
            .values()
            .filter(|app| candidate_id.map_or(true, |id| app.candidate_id == id))
            .filter(|app| job_id.map_or(true, |id| app.job_id == id))
            .filter(|app| status.map_or(true, |s| app.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.application_date.cmp(&a.application_date));
        Ok(rows)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        let interviews = self.interviews.read().expect("interview map poisoned");
        Ok(interviews.get(&id).cloned())
    }

    async fn insert_interview(&self, interview: Interview) -> Result<Interview> {
        let mut interviews = self.interviews.write().expect("interview map poisoned");
        if interviews.contains_key(&interview.id) {
            return Err(Error::Conflict(format!(
                "interview {} already exists",
                interview.id
            )));
        }
        interviews.insert(interview.id, interview.clone());
        Ok(interview)
    }

    async fn put_interview(
        &self,
        mut interview: Interview,
        expected_version: u64,
    ) -> Result<Interview> {
        let mut interviews = self.interviews.write().expect("interview map poisoned");
        let stored = interviews
            .get(&interview.id)
            .ok_or_else(|| Error::NotFound(format!("Interview {} not found", interview.id)))?;
        if stored.version != expected_version {
            return Err(Error::Conflict(format!(
                "interview {} was modified concurrently (stored v{}, expected v{})",
                interview.id, stored.version, expected_version
            )));
        }
        interview.version = expected_version + 1;
        interview.updated_at = Utc::now();
        interviews.insert(interview.id, interview.clone());
        Ok(interview)
    }

    async fn list_interviews(&self, application_id: Uuid) -> Result<Vec<Interview>> {
        let interviews = self.interviews.read().expect("interview map poisoned");
        let mut rows: Vec<Interview> = interviews
            .values()
            .filter(|interview| interview.application_id == application_id)
            .cloned()
            .collect();
        rows.sort_by_key(|interview| interview.round);
        Ok(rows)
    }
}
