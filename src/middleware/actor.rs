use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::models::actor::{Actor, Role};

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Authentication happens upstream; the gateway forwards the resolved
/// identity in two headers. This middleware turns them into a typed actor
/// extension so no handler ever reads ambient session state.
pub async fn require_actor(mut req: Request, next: Next) -> Response {
    let Some(id_header) = req.headers().get(ACTOR_ID_HEADER) else {
        return unauthorized("missing_actor_id");
    };
    let Some(role_header) = req.headers().get(ACTOR_ROLE_HEADER) else {
        return unauthorized("missing_actor_role");
    };

    let Some(id) = id_header
        .to_str()
        .ok()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
    else {
        return unauthorized("bad_actor_id");
    };
    let Some(role) = role_header
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<Role>().ok())
    else {
        return unauthorized("bad_actor_role");
    };

    req.extensions_mut().insert(Actor { id, role });
    next.run(req).await
}

fn unauthorized(code: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}
