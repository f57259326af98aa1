pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use crate::services::application_service::ApplicationService;
use crate::services::interview_service::InterviewService;
use crate::services::notification_service::NotificationHook;
use crate::store::{ApplicationLocks, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub application_service: ApplicationService,
    pub interview_service: InterviewService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn NotificationHook>) -> Self {
        let locks = ApplicationLocks::new();

        let application_service =
            ApplicationService::new(store.clone(), locks.clone(), notifier.clone());
        let interview_service = InterviewService::new(
            store.clone(),
            locks,
            notifier,
            application_service.clone(),
        );

        Self {
            store,
            application_service,
            interview_service,
        }
    }
}
