use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::interview_dto::{
        CancelInterviewPayload, CompleteInterviewPayload, InterviewResponse, PreparationPayload,
        RescheduleInterviewPayload, ScheduleInterviewPayload,
    },
    error::Result,
    models::actor::Actor,
    AppState,
};

#[axum::debug_handler]
pub async fn schedule_interview(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(application_id): Path<Uuid>,
    Json(payload): Json<ScheduleInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .interview_service
        .schedule(application_id, payload, actor)
        .await?;
    Ok((StatusCode::CREATED, Json(InterviewResponse::from(interview))))
}

#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(application_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let interviews = state
        .interview_service
        .list_for_application(application_id, actor)
        .await?;
    let interviews: Vec<InterviewResponse> =
        interviews.into_iter().map(InterviewResponse::from).collect();
    Ok(Json(interviews))
}

#[axum::debug_handler]
pub async fn get_interview(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let interview = state.interview_service.get(id, actor).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[axum::debug_handler]
pub async fn confirm_interview(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let interview = state.interview_service.confirm(id, actor).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[axum::debug_handler]
pub async fn reschedule_interview(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RescheduleInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state.interview_service.reschedule(id, payload, actor).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[axum::debug_handler]
pub async fn complete_interview(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state.interview_service.complete(id, payload, actor).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[axum::debug_handler]
pub async fn cancel_interview(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .interview_service
        .cancel(id, payload.reason, actor)
        .await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[axum::debug_handler]
pub async fn update_preparation(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PreparationPayload>,
) -> Result<impl IntoResponse> {
    let interview = state
        .interview_service
        .update_preparation(id, payload, actor)
        .await?;
    Ok(Json(InterviewResponse::from(interview)))
}
