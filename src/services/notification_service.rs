use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use crate::models::actor::Actor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Application,
    Interview,
}

/// Emitted once per committed status transition, never before commit.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionEvent {
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub from_status: Option<&'static str>,
    pub to_status: &'static str,
    pub actor: Actor,
    pub timestamp: DateTime<Utc>,
}

impl TransitionEvent {
    pub fn new(
        entity_type: EntityType,
        entity_id: Uuid,
        from_status: Option<&'static str>,
        to_status: &'static str,
        actor: Actor,
    ) -> Self {
        Self {
            entity_type,
            entity_id,
            from_status,
            to_status,
            actor,
            timestamp: Utc::now(),
        }
    }
}

/// Fire-and-forget egress. Delivery failures are logged and never roll back
/// the transition that produced the event.
pub trait NotificationHook: Send + Sync {
    fn notify(&self, event: TransitionEvent);
}

#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
    target_url: Option<String>,
    secret: Option<String>,
}

impl WebhookNotifier {
    pub fn new(target_url: Option<String>, secret: Option<String>) -> Self {
        Self {
            client: Client::new(),
            target_url,
            secret,
        }
    }

    /// No-op notifier for deployments without a webhook target.
    pub fn disabled() -> Self {
        Self::new(None, None)
    }
}

impl NotificationHook for WebhookNotifier {
    fn notify(&self, event: TransitionEvent) {
        let Some(url) = self.target_url.clone() else {
            tracing::debug!(
                entity_id = %event.entity_id,
                to_status = event.to_status,
                "no notification webhook configured, dropping event"
            );
            return;
        };

        let client = self.client.clone();
        let secret = self.secret.clone();
        tokio::spawn(async move {
            let mut request = client.post(&url).json(&event);
            if let Some(secret) = secret {
                request = request.header("X-Webhook-Secret", secret);
            }
            match request.send().await {
                Ok(resp) if !resp.status().is_success() => {
                    tracing::warn!(
                        status = %resp.status(),
                        entity_id = %event.entity_id,
                        to_status = event.to_status,
                        "notification webhook rejected event"
                    );
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(
                        error = ?err,
                        entity_id = %event.entity_id,
                        to_status = event.to_status,
                        "failed to deliver notification webhook"
                    );
                }
            }
        });
    }
}
