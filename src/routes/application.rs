use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{
        ApplicationListQuery, ApplicationListResponse, ApplicationResponse,
        CreateApplicationPayload, TransitionPayload,
    },
    error::Result,
    models::actor::Actor,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = CreateApplicationPayload,
    responses(
        (status = 201, description = "Application created", body = Json<ApplicationResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Active application already exists for this job")
    )
)]
#[axum::debug_handler]
pub async fn create_application(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state.application_service.create(payload, actor).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse::from(application)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/applications",
    params(
        ("candidate_id" = Option<Uuid>, Query, description = "Filter by candidate (admin only)"),
        ("job_id" = Option<Uuid>, Query, description = "Filter by job"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "List of applications", body = Json<ApplicationListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list(query, actor).await?;
    Ok(Json(ApplicationListResponse::from(applications)))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application found", body = Json<ApplicationResponse>),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.get(id, actor).await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/transition",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = TransitionPayload,
    responses(
        (status = 200, description = "Application transitioned", body = Json<ApplicationResponse>),
        (status = 403, description = "Actor lacks authority for this edge"),
        (status = 409, description = "Edge not legal from current status"),
        (status = 412, description = "No interview on file for this edge")
    )
)]
#[axum::debug_handler]
pub async fn transition_application(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionPayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .transition(id, payload.target_status, actor)
        .await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/withdraw",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application withdrawn", body = Json<ApplicationResponse>),
        (status = 403, description = "Not the owning candidate"),
        (status = 409, description = "Application already terminal")
    )
)]
#[axum::debug_handler]
pub async fn withdraw_application(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.withdraw(id, actor).await?;
    Ok(Json(ApplicationResponse::from(application)))
}
