//! Integration tests for the public board, preferences and campaign
//! notification subscriptions.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{test_app, TestApp};

/// Publishes one event in each campaign, Riverside first.
async fn publish_one_per_campaign(app: &TestApp) -> (String, String) {
    let mut published = Vec::new();
    for (campaign, name) in [(app.riverside, "River cleanup"), (app.hillcrest, "Hill debate")] {
        let event = app
            .campaign_event(campaign, json!({ "name": name, "location": "Main Square" }))
            .await;
        let (status, _) = app
            .post(
                &format!("/publishing/publish-event/{}/{}", event, campaign),
                1,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        published.push(event);
    }
    (published.remove(0), published.remove(0))
}

fn names(events: &Value) -> Vec<&str> {
    events
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn anonymous_board_hides_contact_details() {
    let app = test_app();
    publish_one_per_campaign(&app).await;

    let (status, board) = app.get("/public-board", None).await;

    assert_eq!(status, StatusCode::OK);
    let events = board["events"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    for event in events {
        assert_eq!(event["publisher_name"], "First1 Last1");
        assert!(event.get("publisher").is_none());
        assert!(event["campaign"].get("city").is_none());
    }
    assert!(board["announcements"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn preferred_campaign_ranks_first() {
    let app = test_app();
    publish_one_per_campaign(&app).await;

    let (status, _) = app
        .post(
            &format!("/preferences/add/{}", app.riverside),
            3,
            Some(json!({ "is_preferred": true })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, board) = app.get("/public-board", Some(3)).await;
    assert_eq!(names(&board["events"]), vec!["River cleanup", "Hill debate"]);
}

#[tokio::test]
async fn avoided_campaign_is_hidden_from_viewer() {
    let app = test_app();
    publish_one_per_campaign(&app).await;

    app.post(
        &format!("/preferences/add/{}", app.hillcrest),
        4,
        Some(json!({ "is_preferred": false })),
    )
    .await;

    let (_, board) = app.get("/public-board", Some(4)).await;
    assert_eq!(names(&board["events"]), vec!["River cleanup"]);

    let (_, board) = app.get("/public-board", None).await;
    assert_eq!(board["events"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn board_window_limits_results() {
    let app = test_app();
    publish_one_per_campaign(&app).await;

    let (_, board) = app.get("/public-board?limit=1", None).await;
    assert_eq!(board["events"].as_array().unwrap().len(), 1);

    let (_, board) = app.get("/public-board?limit=1&offset=5", None).await;
    assert!(board["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn search_matches_case_insensitive_substrings() {
    let app = test_app();
    publish_one_per_campaign(&app).await;

    let (status, events) = app
        .get("/public-board/events-search?campaign_name=RIVER", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&events), vec!["River cleanup"]);

    let (_, events) = app
        .get("/public-board/events-search?event_location=square&campaign_city=hill", None)
        .await;
    assert_eq!(names(&events), vec!["Hill debate"]);

    let (_, events) = app
        .get("/public-board/events-search?event_name=picnic", None)
        .await;
    assert!(events.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn announcement_search_by_title() {
    let app = test_app();
    for (title, content) in [("Office hours", "Tuesdays."), ("Debate recap", "Thanks all.")] {
        app.post(
            &format!("/publishing/publish-announcement/{}", app.hillcrest),
            1,
            Some(json!({ "title": title, "content": content })),
        )
        .await;
    }

    let (status, found) = app
        .get("/public-board/announcements-search?announcement_title=debate", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["title"], "Debate recap");
    assert_eq!(found[0]["campaign"]["name"], "Hillcrest Mayor");
}

// =============================================================================
// Preferences
// =============================================================================

#[tokio::test]
async fn preference_crud() {
    let app = test_app();
    let uri = |op: &str| format!("/preferences/{}/{}", op, app.riverside);

    assert_eq!(
        app.post(&uri("add"), 3, Some(json!({ "is_preferred": true }))).await.0,
        StatusCode::CREATED
    );
    let (status, body) = app
        .post(&uri("add"), 3, Some(json!({ "is_preferred": false })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_KEY");

    let (status, _) = app
        .send(Method::PUT, &uri("update"), Some(3), Some(json!({ "is_preferred": false })))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = app.get("/preferences/list", Some(3)).await;
    assert_eq!(list[0]["campaign"]["name"], "Riverside Council");
    assert_eq!(list[0]["is_preferred"], false);

    assert_eq!(app.delete(&uri("remove"), 3).await.0, StatusCode::NO_CONTENT);
    let (status, body) = app.delete(&uri("remove"), 3).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PREFERENCE_NOT_FOUND");
}

#[tokio::test]
async fn preference_for_unknown_campaign_is_not_found() {
    let app = test_app();

    let (status, body) = app
        .post(
            "/preferences/add/00000000-0000-4000-8000-000000000000",
            3,
            Some(json!({ "is_preferred": true })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "CAMPAIGN_NOT_FOUND");
}

// =============================================================================
// Subscriptions
// =============================================================================

#[tokio::test]
async fn subscription_lifecycle() {
    let app = test_app();
    let subscribe = format!("/public-board/subscribe-for-notifications/{}", app.riverside);

    let (status, body) = app
        .post(&subscribe, 3, Some(json!({ "via_email": false, "via_sms": false })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOTIFICATION_SETTINGS_REQUIRED");

    let settings = json!({ "via_email": true, "via_sms": false });
    assert_eq!(
        app.post(&subscribe, 3, Some(settings.clone())).await.0,
        StatusCode::CREATED
    );
    let (status, body) = app.post(&subscribe, 3, Some(settings)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_KEY");

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/public-board/update-notification-settings/{}", app.riverside),
            Some(3),
            Some(json!({ "via_email": false, "via_sms": true })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = app.get("/public-board/notification-settings", Some(3)).await;
    assert_eq!(list[0]["campaign"]["guid"], app.riverside.to_string());
    assert_eq!(list[0]["settings"]["via_sms"], true);

    let unsubscribe = format!("/public-board/unsubscribe-from-notifications/{}", app.riverside);
    assert_eq!(app.delete(&unsubscribe, 3).await.0, StatusCode::NO_CONTENT);
    let (status, body) = app.delete(&unsubscribe, 3).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SUBSCRIPTION_NOT_FOUND");
}

#[tokio::test]
async fn subscribers_hear_about_publications() {
    let app = test_app();
    app.post(
        &format!("/public-board/subscribe-for-notifications/{}", app.riverside),
        4,
        Some(json!({ "via_email": true, "via_sms": true })),
    )
    .await;

    publish_one_per_campaign(&app).await;
    app.post(
        &format!("/publishing/publish-announcement/{}", app.riverside),
        1,
        Some(json!({ "title": "Thank you", "content": "Great turnout." })),
    )
    .await;

    let mut labels = app.queue.wait_for_labels(4, 2).await;
    labels.sort_unstable();
    assert_eq!(labels, vec!["announcement_published", "event_published"]);
    assert!(app.queue.labels_for(5).is_empty());
}
