//! Integration tests for the authoring flow: roll, compose, submit, resume.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use storytellers_api::extract::SESSION_HEADER;
use storytellers_core::identity::SessionId;
use storytellers_core::outcome::CallOutcome;
use storytellers_test_support::{
    StubBackends, StubNarrative, StubPromptSets, draft, prompt_set, story,
};
use storytellers_workflow::application::state_store::WorkflowStateStore;
use storytellers_workflow::domain::state::WorkflowPhase;

use common::{Caller, SESSION, build_test_app, get_json, post_json};

fn session() -> SessionId {
    SESSION.parse().unwrap()
}

fn rolling_stubs(narrative: StubNarrative) -> StubBackends {
    StubBackends {
        prompts: Arc::new(StubPromptSets {
            sets: CallOutcome::Success(vec![prompt_set("7", "Fantasy")]),
            roll: CallOutcome::Success(vec!["p1".into(), "p2".into(), "p3".into()]),
            ..StubPromptSets::default()
        }),
        narrative: Arc::new(narrative),
        ..StubBackends::default()
    }
}

#[tokio::test]
async fn test_roll_compose_publish_lands_on_story_list() {
    // Arrange
    let app = build_test_app(rolling_stubs(StubNarrative {
        stories: CallOutcome::Success(vec![story(40, 1, "#p1#p2#p3#")]),
        saved: CallOutcome::Success(story(40, 1, "#p1#p2#p3#")),
        ..StubNarrative::default()
    }));
    let caller = Caller::user("1");

    // Act
    let rolled = post_json(
        &app.router,
        "/stories/new/roll",
        caller,
        &json!({ "dice_number": 3, "dice_set": "7_Fantasy" }),
    )
    .await;
    let compose = get_json(&app.router, "/stories/new/write", caller).await;
    let submitted = post_json(
        &app.router,
        "/stories/new/write",
        caller,
        &json!({ "text": "Once upon a time", "as_draft": false }),
    )
    .await;

    // Assert
    assert_eq!(rolled.status, StatusCode::OK);
    assert_eq!(rolled.headers[SESSION_HEADER], SESSION);
    assert_eq!(rolled.json["view"]["figures"], json!(["p1", "p2", "p3"]));

    assert_eq!(compose.status, StatusCode::OK);
    assert_eq!(compose.json["view"]["prompts"], json!(["p1", "p2", "p3"]));

    assert_eq!(submitted.status, StatusCode::OK);
    assert_eq!(submitted.json["view"]["stories"][0]["id"], 40);
    assert_eq!(submitted.json["notices"][0]["message"], "story published");

    let created = app.stubs.narrative.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].figures, "#p1#p2#p3#");
    assert_eq!(created[0].dice_set.as_deref(), Some("7"));
    assert!(!created[0].is_draft);
    drop(created);

    assert_eq!(app.store.load(session()).await.unwrap(), None);
}

#[tokio::test]
async fn test_saving_a_draft_lands_on_drafts() {
    // Arrange
    let app = build_test_app(rolling_stubs(StubNarrative {
        stories: CallOutcome::Success(vec![draft(41, 1, "#p1#p2#p3#")]),
        ..StubNarrative::default()
    }));
    let caller = Caller::user("1");
    post_json(
        &app.router,
        "/stories/new/roll",
        caller,
        &json!({ "dice_number": 3, "dice_set": "7_Fantasy" }),
    )
    .await;
    get_json(&app.router, "/stories/new/write", caller).await;

    // Act
    let submitted = post_json(
        &app.router,
        "/stories/new/write",
        caller,
        &json!({ "text": "Not finished", "as_draft": true }),
    )
    .await;

    // Assert
    assert_eq!(submitted.status, StatusCode::OK);
    assert_eq!(submitted.json["view"]["stories"][0]["is_draft"], true);
    assert_eq!(submitted.json["notices"][0]["message"], "draft saved");
}

#[tokio::test]
async fn test_resuming_someone_elses_draft_redirects_home() {
    // Arrange
    let app = build_test_app(rolling_stubs(StubNarrative {
        story: CallOutcome::Success(draft(4, 2, "#x#y#")),
        ..StubNarrative::default()
    }));
    let caller = Caller::user("9");
    post_json(
        &app.router,
        "/stories/new/roll",
        caller,
        &json!({ "dice_number": 3, "dice_set": "7_Fantasy" }),
    )
    .await;
    let before = app.store.load(session()).await.unwrap();

    // Act
    let response = get_json(&app.router, "/stories/new/write/4", caller).await;

    // Assert
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
    assert_eq!(response.json["error"], "unauthorized");
    assert_eq!(app.store.load(session()).await.unwrap(), before);
}

#[tokio::test]
async fn test_resuming_own_draft_opens_editor_with_its_prompts() {
    // Arrange
    let app = build_test_app(rolling_stubs(StubNarrative {
        story: CallOutcome::Success(draft(4, 2, "#x#y#")),
        ..StubNarrative::default()
    }));
    let caller = Caller::user("2");

    // Act
    let response = get_json(&app.router, "/stories/new/write/4", caller).await;

    // Assert
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["view"]["prompts"], json!(["x", "y"]));
    assert_eq!(response.json["view"]["resuming_draft_id"], 4);
    let state = app.store.load(session()).await.unwrap().unwrap();
    assert_eq!(state.phase, WorkflowPhase::Composing);
}

#[tokio::test]
async fn test_submitting_another_users_resumed_draft_redirects_home() {
    // Arrange
    let app = build_test_app(rolling_stubs(StubNarrative {
        story: CallOutcome::Success(draft(4, 2, "#x#y#")),
        ..StubNarrative::default()
    }));
    get_json(&app.router, "/stories/new/write/4", Caller::user("2")).await;
    let before = app.store.load(session()).await.unwrap();

    // Act
    let response = post_json(
        &app.router,
        "/stories/new/write",
        Caller::user("9"),
        &json!({ "text": "Overwritten", "as_draft": false }),
    )
    .await;

    // Assert
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
    assert_eq!(response.json["error"], "unauthorized");
    assert!(app.stubs.narrative.updated.lock().unwrap().is_empty());
    assert_eq!(app.store.load(session()).await.unwrap(), before);
}

#[tokio::test]
async fn test_zero_prompt_roll_redirects_without_backend_calls() {
    // Arrange
    let app = build_test_app(rolling_stubs(StubNarrative::default()));

    // Act
    let response = post_json(
        &app.router,
        "/stories/new/roll",
        Caller::user("1"),
        &json!({ "dice_number": 0, "dice_set": "7_Fantasy" }),
    )
    .await;

    // Assert
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/stories/new/settings"));
    assert_eq!(app.stubs.prompts.calls(), 0);
    assert_eq!(app.store.load(session()).await.unwrap(), None);
}

#[tokio::test]
async fn test_compose_without_roll_redirects_to_roll_step() {
    // Arrange
    let app = build_test_app(StubBackends::default());

    // Act
    let response = get_json(&app.router, "/stories/new/write", Caller::user("1")).await;

    // Assert
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/stories/new/settings"));
}

#[tokio::test]
async fn test_anonymous_submit_redirects_to_login() {
    // Arrange
    let app = build_test_app(StubBackends::default());

    // Act
    let response = post_json(
        &app.router,
        "/stories/new/write",
        Caller::anonymous(),
        &json!({ "text": "Anonymous tale" }),
    )
    .await;

    // Assert
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/login"));
    assert_eq!(app.stubs.narrative.calls(), 0);
}

#[tokio::test]
async fn test_settings_lists_sets_with_selectors() {
    // Arrange
    let app = build_test_app(rolling_stubs(StubNarrative::default()));

    // Act
    let response = get_json(&app.router, "/stories/new/settings", Caller::user("1")).await;

    // Assert
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["view"]["sets"][0]["selector"], "7_Fantasy");
    assert_eq!(response.json["view"]["phase"], "idle");
}

#[tokio::test]
async fn test_unreadable_roll_body_is_400_back_to_roll_step() {
    // Arrange
    let app = build_test_app(StubBackends::default());

    // Act
    let response = post_json(
        &app.router,
        "/stories/new/roll",
        Caller::user("1"),
        &json!({ "dice_number": "three", "dice_set": "7_Fantasy" }),
    )
    .await;

    // Assert
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["error"], "application_rejected");
    assert_eq!(response.json["redirect"], "/stories/new/settings");
    assert_eq!(app.stubs.prompts.calls(), 0);
}
