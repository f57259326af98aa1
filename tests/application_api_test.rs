use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use jobtrack_backend::models::actor::Actor;
use jobtrack_backend::services::notification_service::WebhookNotifier;
use jobtrack_backend::store::memory::MemoryStore;
use jobtrack_backend::{middleware, routes, AppState};

fn setup_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(WebhookNotifier::disabled());
    let state = AppState::new(store, notifier);

    routes::api_router()
        .layer(axum::middleware::from_fn(middleware::actor::require_actor))
        .with_state(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    actor: Option<Actor>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(actor) = actor {
        builder = builder
            .header("x-actor-id", actor.id.to_string())
            .header("x-actor-role", actor.role.as_str());
    }
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::from("{}"),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_application(app: &Router, candidate: Actor) -> Value {
    let payload = json!({
        "job_id": Uuid::new_v4(),
        "company_id": Uuid::new_v4(),
        "cover_letter": "Dear hiring team",
        "resume": "resume-ref-42",
    });
    let (status, body) = send(app, "POST", "/api/applications", Some(candidate), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn transition(
    app: &Router,
    application_id: &str,
    target: &str,
    actor: Actor,
) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        &format!("/api/applications/{application_id}/transition"),
        Some(actor),
        Some(json!({ "target_status": target })),
    )
    .await
}

#[tokio::test]
async fn requests_without_actor_headers_are_unauthorized() {
    let app = setup_app();
    let (status, body) = send(&app, "GET", "/api/applications", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_actor_id");
}

#[tokio::test]
async fn full_hiring_pipeline_ends_in_acceptance() {
    let app = setup_app();
    let candidate = Actor::candidate(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());

    let created = create_application(&app, candidate).await;
    assert_eq!(created["status"], "applied");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = transition(&app, &id, "under-review", admin).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let (status, _) = transition(&app, &id, "shortlisted", admin).await;
    assert_eq!(status, StatusCode::OK);

    // Scheduling the first round auto-advances the application.
    let schedule = json!({
        "type": "video",
        "round": 1,
        "scheduled_date": (Utc::now() + Duration::days(7)).to_rfc3339(),
        "duration_minutes": 60,
        "location": { "remote": { "meeting_link": "https://x" } },
        "interviewers": [{ "name": "Jordan Reyes", "email": "jordan@example.com" }],
    });
    let (status, interview) = send(
        &app,
        "POST",
        &format!("/api/applications/{id}/interviews"),
        Some(admin),
        Some(schedule),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{interview}");
    let interview_id = interview["id"].as_str().unwrap().to_string();

    let (_, application) = send(&app, "GET", &format!("/api/applications/{id}"), Some(admin), None).await;
    assert_eq!(application["status"], "interview-scheduled");

    let complete = json!({
        "outcome": "passed",
        "feedback": {
            "interviewer_feedback": "Strong communication, solid systems answers",
            "rating": 5,
            "strengths": ["communication"],
        },
        "next_steps": "Prepare offer",
    });
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/interviews/{interview_id}/complete"),
        Some(admin),
        Some(complete),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (_, application) = send(&app, "GET", &format!("/api/applications/{id}"), Some(admin), None).await;
    assert_eq!(application["status"], "interviewed");

    let (status, body) = transition(&app, &id, "accepted", admin).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "accepted");

    // Accepted is terminal; withdrawal must be refused.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/applications/{id}/withdraw"),
        Some(candidate),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_transition");
}

#[tokio::test]
async fn duplicate_application_is_rejected_until_withdrawn() {
    let app = setup_app();
    let candidate = Actor::candidate(Uuid::new_v4());
    let payload = json!({
        "job_id": Uuid::new_v4(),
        "company_id": Uuid::new_v4(),
    });

    let (status, first) = send(&app, "POST", "/api/applications", Some(candidate), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/applications", Some(candidate), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "duplicate_application");

    let id = first["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/applications/{id}/withdraw"),
        Some(candidate),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/api/applications", Some(candidate), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn illegal_edges_and_foreign_withdrawals_are_refused() {
    let app = setup_app();
    let candidate = Actor::candidate(Uuid::new_v4());
    let stranger = Actor::candidate(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());

    let created = create_application(&app, candidate).await;
    let id = created["id"].as_str().unwrap().to_string();

    // Skipping states is not in the graph.
    let (status, body) = transition(&app, &id, "shortlisted", admin).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_transition");

    // Candidates cannot drive admin edges.
    let (status, body) = transition(&app, &id, "under-review", candidate).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");

    // Only the owner may withdraw.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/applications/{id}/withdraw"),
        Some(stranger),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "forbidden");
}

#[tokio::test]
async fn interview_scheduled_requires_an_interview_on_file() {
    let app = setup_app();
    let candidate = Actor::candidate(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());

    let created = create_application(&app, candidate).await;
    let id = created["id"].as_str().unwrap().to_string();
    transition(&app, &id, "under-review", admin).await;
    transition(&app, &id, "shortlisted", admin).await;

    let (status, body) = transition(&app, &id, "interview-scheduled", admin).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["kind"], "precondition_failed");
}

#[tokio::test]
async fn candidates_only_see_their_own_applications() {
    let app = setup_app();
    let alice = Actor::candidate(Uuid::new_v4());
    let bob = Actor::candidate(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());

    let alice_app = create_application(&app, alice).await;
    create_application(&app, bob).await;

    let (status, body) = send(&app, "GET", "/api/applications", Some(alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["applications"][0]["candidate_id"], json!(alice.id));

    let (_, body) = send(&app, "GET", "/api/applications", Some(admin), None).await;
    assert_eq!(body["total"], 2);

    // Direct reads are scoped the same way.
    let id = alice_app["id"].as_str().unwrap();
    let (status, _) = send(&app, "GET", &format!("/api/applications/{id}"), Some(bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_application_returns_not_found() {
    let app = setup_app();
    let admin = Actor::admin(Uuid::new_v4());
    let (status, body) = transition(&app, &Uuid::new_v4().to_string(), "under-review", admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}
