pub mod application_service;
pub mod interview_service;
pub mod notification_service;
