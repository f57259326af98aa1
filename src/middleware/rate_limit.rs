use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use uuid::Uuid;

use crate::models::actor::Actor;

const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Window {
    start: Instant,
    count: u32,
}

/// Fixed one-second window per actor, so one noisy client cannot starve
/// everyone else's lifecycle calls. Requests that reach the limiter without
/// a resolved actor share a single anonymous bucket.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    rps: u32,
    windows: Arc<Mutex<HashMap<Option<Uuid>, Window>>>,
}

impl RateLimiter {
    fn new(rps: u32) -> Self {
        Self {
            rps: rps.max(1),
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn allow(&self, actor_id: Option<Uuid>) -> bool {
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();
        let window = windows.entry(actor_id).or_insert(Window {
            start: now,
            count: 0,
        });
        if now.duration_since(window.start) >= WINDOW {
            window.start = now;
            window.count = 0;
        }
        if window.count < self.rps {
            window.count += 1;
            true
        } else {
            false
        }
    }
}

/// Runs inside `require_actor`, keying the window on the actor it resolved.
pub async fn rps_middleware(
    State(state): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let actor_id = req.extensions().get::<Actor>().map(|actor| actor.id);
    if !state.allow(actor_id) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "too many requests", "kind": "rate_limited" })),
        )
            .into_response();
    }
    next.run(req).await
}

pub fn new_rps_state(rps: u32) -> RateLimiter {
    RateLimiter::new(rps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_are_tracked_per_actor() {
        let limiter = RateLimiter::new(2);
        let alice = Some(Uuid::new_v4());
        let bob = Some(Uuid::new_v4());

        assert!(limiter.allow(alice));
        assert!(limiter.allow(alice));
        assert!(!limiter.allow(alice));

        // A different actor is unaffected by alice's exhausted window.
        assert!(limiter.allow(bob));
    }

    #[test]
    fn anonymous_requests_share_one_bucket() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.allow(None));
        assert!(!limiter.allow(None));
    }

    #[test]
    fn zero_rps_still_admits_one_request() {
        let limiter = RateLimiter::new(0);
        let actor = Some(Uuid::new_v4());
        assert!(limiter.allow(actor));
        assert!(!limiter.allow(actor));
    }
}
