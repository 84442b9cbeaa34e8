//! Integration tests for aggregated read views and social actions.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use storytellers_core::outcome::{CallOutcome, Service};
use storytellers_test_support::{
    StubBackends, StubIdentity, StubNarrative, StubReactions, draft, story, user,
};

use common::{Caller, build_test_app, get_json, post_empty, post_json};

fn wall_identity() -> StubIdentity {
    StubIdentity {
        user: CallOutcome::Success(user(7)),
        followers: CallOutcome::Success(vec![user(8)]),
        ..StubIdentity::default()
    }
}

#[tokio::test]
async fn test_wall_renders_zero_block_when_reactions_are_down() {
    // Arrange
    let app = build_test_app(StubBackends {
        identity: Arc::new(wall_identity()),
        reactions: Arc::new(StubReactions {
            stats: CallOutcome::ServiceUnavailable(Service::Reaction),
            ..StubReactions::default()
        }),
        ..StubBackends::default()
    });

    // Act
    let response = get_json(&app.router, "/users/7", Caller::anonymous()).await;

    // Assert
    assert_eq!(response.status, StatusCode::OK);
    let view = &response.json["view"];
    assert_eq!(view["profile"]["id"], 7);
    assert_eq!(view["followers"], 1);
    assert_eq!(view["reaction_stats"], json!({ "likes": 0, "dislikes": 0 }));
    assert_eq!(view["degraded"][0]["slot"], "reaction-stats");
}

#[tokio::test]
async fn test_wall_of_unknown_user_is_404() {
    // Arrange
    let app = build_test_app(StubBackends {
        identity: Arc::new(StubIdentity {
            user: CallOutcome::ApplicationError {
                status: 404,
                description: "User 99 does not exist".into(),
            },
            ..StubIdentity::default()
        }),
        ..StubBackends::default()
    });

    // Act
    let response = get_json(&app.router, "/users/99", Caller::anonymous()).await;

    // Assert
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json["error"], "not_found");
    assert_eq!(response.json["message"], "User 99 does not exist");
}

#[tokio::test]
async fn test_story_view_with_narrative_down_is_503() {
    // Arrange
    let app = build_test_app(StubBackends {
        narrative: Arc::new(StubNarrative {
            story: CallOutcome::ServiceUnavailable(Service::Narrative),
            ..StubNarrative::default()
        }),
        ..StubBackends::default()
    });

    // Act
    let response = get_json(&app.router, "/stories/3", Caller::anonymous()).await;

    // Assert
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json["error"], "service_unavailable");
    assert_eq!(app.stubs.identity.calls(), 0);
}

#[tokio::test]
async fn test_story_view_decodes_prompts() {
    // Arrange
    let app = build_test_app(StubBackends {
        identity: Arc::new(StubIdentity {
            user: CallOutcome::Success(user(2)),
            ..StubIdentity::default()
        }),
        narrative: Arc::new(StubNarrative {
            story: CallOutcome::Success(story(3, 2, "#castle#dragon#")),
            ..StubNarrative::default()
        }),
        ..StubBackends::default()
    });

    // Act
    let response = get_json(&app.router, "/stories/3", Caller::anonymous()).await;

    // Assert
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json["view"]["story"]["prompts"],
        json!(["castle", "dragon"])
    );
    assert_eq!(response.json["view"]["author"]["id"], 2);
}

#[tokio::test]
async fn test_draft_is_hidden_from_other_readers() {
    // Arrange
    let app = build_test_app(StubBackends {
        narrative: Arc::new(StubNarrative {
            story: CallOutcome::Success(draft(3, 2, "#castle#")),
            ..StubNarrative::default()
        }),
        ..StubBackends::default()
    });

    // Act
    let response = get_json(&app.router, "/stories/3", Caller::user("5")).await;

    // Assert
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_search_with_both_sources_down_is_503() {
    // Arrange
    let app = build_test_app(StubBackends {
        identity: Arc::new(StubIdentity {
            search: CallOutcome::ServiceUnavailable(Service::Identity),
            ..StubIdentity::default()
        }),
        narrative: Arc::new(StubNarrative {
            search: CallOutcome::ServiceUnavailable(Service::Narrative),
            ..StubNarrative::default()
        }),
        ..StubBackends::default()
    });

    // Act
    let response = get_json(&app.router, "/search?query=dragon", Caller::anonymous()).await;

    // Assert
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_search_with_no_matches_is_empty_view() {
    // Arrange
    let app = build_test_app(StubBackends::default());

    // Act
    let response = get_json(&app.router, "/search?query=dragon", Caller::anonymous()).await;

    // Assert
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["view"]["query"], "dragon");
    assert_eq!(response.json["view"]["users"], json!([]));
    assert_eq!(response.json["view"]["stories"], json!([]));
}

#[tokio::test]
async fn test_inverted_range_redirects_to_story_list() {
    // Arrange
    let app = build_test_app(StubBackends::default());

    // Act
    let response = get_json(
        &app.router,
        "/stories/range?begin=2026-02-01&end=2026-01-01",
        Caller::anonymous(),
    )
    .await;

    // Assert
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/stories"));
    assert_eq!(app.stubs.narrative.calls(), 0);
}

#[tokio::test]
async fn test_follow_refusal_is_a_notice_on_the_wall() {
    // Arrange
    let app = build_test_app(StubBackends {
        identity: Arc::new(StubIdentity {
            follow: CallOutcome::ApplicationError {
                status: 409,
                description: "Already following".into(),
            },
            ..wall_identity()
        }),
        ..StubBackends::default()
    });

    // Act
    let response = post_empty(&app.router, "/users/7/follow", Caller::user("1")).await;

    // Assert
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["view"]["profile"]["id"], 7);
    assert_eq!(response.json["notices"][0]["level"], "error");
    assert_eq!(response.json["notices"][0]["message"], "Already following");
}

#[tokio::test]
async fn test_self_follow_redirects_to_own_wall() {
    // Arrange
    let app = build_test_app(StubBackends::default());

    // Act
    let response = post_empty(&app.router, "/users/7/follow", Caller::user("7")).await;

    // Assert
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/users/7"));
    assert_eq!(app.stubs.identity.calls(), 0);
}

#[tokio::test]
async fn test_login_rejection_is_400_with_description() {
    // Arrange
    let app = build_test_app(StubBackends {
        identity: Arc::new(StubIdentity {
            account: CallOutcome::ApplicationError {
                status: 400,
                description: "Wrong password".into(),
            },
            ..StubIdentity::default()
        }),
        ..StubBackends::default()
    });

    // Act
    let response = post_json(
        &app.router,
        "/login",
        Caller::anonymous(),
        &json!({ "email": "user1@example.com", "password": "nope" }),
    )
    .await;

    // Assert
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["message"], "Wrong password");
    assert_eq!(response.json["redirect"], "/login");
}

#[tokio::test]
async fn test_non_numeric_story_id_is_400_back_to_story_list() {
    // Arrange
    let app = build_test_app(StubBackends::default());

    // Act
    let response = get_json(&app.router, "/stories/abc", Caller::anonymous()).await;

    // Assert
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["error"], "application_rejected");
    assert_eq!(response.json["redirect"], "/stories");
    assert_eq!(app.stubs.narrative.calls(), 0);
}

#[tokio::test]
async fn test_non_numeric_user_id_is_400_back_to_user_list() {
    // Arrange
    let app = build_test_app(StubBackends::default());

    // Act
    let response = get_json(&app.router, "/users/abc/followers", Caller::anonymous()).await;

    // Assert
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["error"], "application_rejected");
    assert_eq!(response.json["redirect"], "/users");
    assert_eq!(app.stubs.identity.calls(), 0);
}

#[tokio::test]
async fn test_reaction_without_body_is_400_back_to_story() {
    // Arrange
    let app = build_test_app(StubBackends::default());

    // Act
    let response = post_empty(&app.router, "/stories/3/react", Caller::user("1")).await;

    // Assert
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["redirect"], "/stories/3");
    assert!(app.stubs.reactions.reactions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreadable_login_body_is_400_back_to_login() {
    // Arrange
    let app = build_test_app(StubBackends::default());

    // Act
    let response = post_json(
        &app.router,
        "/login",
        Caller::anonymous(),
        &json!({ "email": "user1@example.com" }),
    )
    .await;

    // Assert
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["error"], "application_rejected");
    assert_eq!(response.json["redirect"], "/login");
    assert_eq!(app.stubs.identity.calls(), 0);
}

#[tokio::test]
async fn test_reaction_without_counters_renders_no_counts() {
    // Arrange
    let app = build_test_app(StubBackends {
        reactions: Arc::new(StubReactions {
            stats: CallOutcome::ServiceUnavailable(Service::Reaction),
            ..StubReactions::default()
        }),
        ..StubBackends::default()
    });

    // Act
    let response = post_json(
        &app.router,
        "/stories/3/react",
        Caller::user("1"),
        &json!({ "reaction": "like" }),
    )
    .await;

    // Assert
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json["view"].is_null());
    assert_eq!(response.json["notices"][0]["message"], "your reaction was recorded");
    assert_eq!(app.stubs.reactions.reactions.lock().unwrap().len(), 1);
}
