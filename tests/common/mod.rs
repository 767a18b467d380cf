//! Shared harness for the HTTP integration tests.
//!
//! Builds the full router over the in-memory store with a small directory:
//! five users (`memberN@example.org`) and two campaigns. User 1 organizes
//! both campaigns; user 2 may only view Riverside's events.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use campaign_board::adapters::http::{api_router, AppState, USER_ID_HEADER};
use campaign_board::adapters::{InMemoryStore, StaticAuthorizer};
use campaign_board::application::{BoardLimits, Storage};
use campaign_board::domain::directory::{CampaignSummary, UserContact};
use campaign_board::domain::foundation::{CampaignGuid, Permission, PermissionTarget, UserId};
use campaign_board::domain::notification::Notification;
use campaign_board::ports::NotificationQueue;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Queue that keeps every message for inspection.
#[derive(Default)]
pub struct RecordingQueue {
    messages: Mutex<Vec<Notification>>,
}

impl RecordingQueue {
    pub fn labels_for(&self, user: i64) -> Vec<&'static str> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.recipient.user_id.value() == user)
            .map(|m| m.kind.label())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    /// Publication fan-out runs on a spawned task; yield until `user` has
    /// `count` messages.
    pub async fn wait_for_labels(&self, user: i64, count: usize) -> Vec<&'static str> {
        tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                let labels = self.labels_for(user);
                if labels.len() >= count {
                    return labels;
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("notifications were not queued in time")
    }
}

impl NotificationQueue for RecordingQueue {
    fn enqueue(&self, notification: Notification) {
        self.messages.lock().unwrap().push(notification);
    }
}

pub struct TestApp {
    pub router: Router,
    pub queue: Arc<RecordingQueue>,
    pub riverside: CampaignGuid,
    pub hillcrest: CampaignGuid,
}

pub fn user(id: i64) -> UserId {
    UserId::new(id).unwrap()
}

pub fn email(id: i64) -> String {
    format!("member{}@example.org", id)
}

pub fn test_app() -> TestApp {
    let store = InMemoryStore::new();
    for id in 1..=5 {
        store.register_user(UserContact {
            user_id: user(id),
            first_name: Some(format!("First{}", id)),
            last_name: Some(format!("Last{}", id)),
            display_name: format!("member{}", id),
            email: email(id),
            phone: Some(format!("555-010{}", id)),
            profile_pic_url: None,
        });
    }

    let riverside = CampaignGuid::new();
    let hillcrest = CampaignGuid::new();
    store.register_campaign(CampaignSummary {
        guid: riverside,
        name: "Riverside Council".to_string(),
        city: Some("Riverside".to_string()),
        logo_url: None,
    });
    store.register_campaign(CampaignSummary {
        guid: hillcrest,
        name: "Hillcrest Mayor".to_string(),
        city: Some("Hillcrest".to_string()),
        logo_url: None,
    });

    let mut authorizer = StaticAuthorizer::new();
    for campaign in [riverside, hillcrest] {
        for target in [PermissionTarget::Events, PermissionTarget::Publishing] {
            authorizer = authorizer
                .grant(user(1), campaign, Permission::view(target))
                .grant(user(1), campaign, Permission::edit(target));
        }
    }
    let authorizer = authorizer
        .grant(user(2), riverside, Permission::view(PermissionTarget::Events))
        .grant(user(5), riverside, Permission::view(PermissionTarget::Events))
        .grant(user(5), riverside, Permission::edit(PermissionTarget::Events));

    let queue = Arc::new(RecordingQueue::default());
    let state = AppState::new(
        Storage::shared(Arc::new(store)),
        Arc::new(authorizer),
        queue.clone(),
        BoardLimits::default(),
    );

    TestApp {
        router: api_router(state),
        queue,
        riverside,
        hillcrest,
    }
}

impl TestApp {
    /// Sends one request and returns the status and the JSON body
    /// (`Value::Null` when the body is empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        as_user: Option<i64>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = as_user {
            builder = builder.header(USER_ID_HEADER, id.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, as_user: Option<i64>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, as_user, None).await
    }

    pub async fn post(&self, uri: &str, as_user: i64, body: Option<Value>) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(as_user), body).await
    }

    pub async fn delete(&self, uri: &str, as_user: i64) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(as_user), None).await
    }

    /// Creates a campaign event as user 1 and returns its guid.
    pub async fn campaign_event(&self, campaign: CampaignGuid, body: Value) -> String {
        let (status, json) = self
            .post(&format!("/events/create-campaign-event/{}", campaign), 1, Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", json);
        json["event_guid"].as_str().unwrap().to_string()
    }

    /// Creates a personal event as `creator` and returns its guid.
    pub async fn personal_event(&self, creator: i64, body: Value) -> String {
        let (status, json) = self
            .post("/events/create-personal-event", creator, Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", json);
        json["event_guid"].as_str().unwrap().to_string()
    }
}
