pub mod application;
pub mod health;
pub mod interview;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::AppState;

/// The `/api` surface; callers layer actor extraction and rate limiting on
/// top (see main.rs).
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/applications",
            get(application::list_applications).post(application::create_application),
        )
        .route("/api/applications/:id", get(application::get_application))
        .route(
            "/api/applications/:id/transition",
            post(application::transition_application),
        )
        .route(
            "/api/applications/:id/withdraw",
            post(application::withdraw_application),
        )
        .route(
            "/api/applications/:id/interviews",
            get(interview::list_interviews).post(interview::schedule_interview),
        )
        .route("/api/interviews/:id", get(interview::get_interview))
        .route("/api/interviews/:id/confirm", post(interview::confirm_interview))
        .route(
            "/api/interviews/:id/reschedule",
            post(interview::reschedule_interview),
        )
        .route(
            "/api/interviews/:id/complete",
            post(interview::complete_interview),
        )
        .route("/api/interviews/:id/cancel", post(interview::cancel_interview))
        .route(
            "/api/interviews/:id/preparation",
            patch(interview::update_preparation),
        )
}
