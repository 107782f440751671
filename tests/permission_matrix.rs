//! The full mode/action matrix, exercised through the public gate API
//! rather than the enforcer alone.

#[path = "support/gate_harness.rs"]
mod gate_harness;

use gate_harness::{RecordingApi, gate, sample_post};
use moltgate::error::{EngagementError, MoltgateError, PermissionError};
use moltgate::security::{Action, Mode};

#[test]
fn verdict_matrix_pins_all_twelve_cells() {
    let expectations = [
        (Mode::Lurk, Action::Read, true, false),
        (Mode::Lurk, Action::Upvote, false, false),
        (Mode::Lurk, Action::Comment, false, false),
        (Mode::Lurk, Action::Post, false, false),
        (Mode::Engage, Action::Read, true, false),
        (Mode::Engage, Action::Upvote, true, false),
        (Mode::Engage, Action::Comment, true, true),
        (Mode::Engage, Action::Post, true, true),
        (Mode::Active, Action::Read, true, false),
        (Mode::Active, Action::Upvote, true, false),
        (Mode::Active, Action::Comment, true, false),
        (Mode::Active, Action::Post, true, true),
    ];

    for (mode, action, allowed, requires_approval) in expectations {
        let (_dir, _api, manager) = gate(mode, RecordingApi::new());
        let verdict = manager.verdict_for(action).unwrap();
        assert_eq!(
            verdict.allowed, allowed,
            "allowed mismatch for {mode}/{action}"
        );
        assert_eq!(
            verdict.requires_approval, requires_approval,
            "approval mismatch for {mode}/{action}"
        );
    }
}

#[test]
fn posting_requires_approval_in_every_mode_that_allows_it() {
    for mode in Mode::ALL {
        let (_dir, _api, manager) = gate(mode, RecordingApi::new());
        let verdict = manager.verdict_for(Action::Post).unwrap();
        assert!(
            !verdict.allowed || verdict.requires_approval,
            "{mode} must never allow unapproved posts"
        );
    }
}

#[tokio::test]
async fn reading_works_in_every_mode() {
    for mode in Mode::ALL {
        let (_dir, _api, manager) = gate(
            mode,
            RecordingApi::with_posts(vec![sample_post("p1", "Title", "body")]),
        );
        let value = manager.perform_low_impact(Action::Read, "p1").await.unwrap();
        assert_eq!(value["id"], "p1", "read failed in {mode}");
    }
}

#[tokio::test]
async fn lurk_blocks_every_write_shape() {
    let (_dir, api, mut manager) = gate(Mode::Lurk, RecordingApi::new());

    let upvote = manager.perform_low_impact(Action::Upvote, "p1").await;
    assert!(matches!(
        upvote.unwrap_err(),
        MoltgateError::Permission(PermissionError::NotPermitted {
            mode: Mode::Lurk,
            action: Action::Upvote,
        })
    ));

    let comment = manager.comment_direct("p1", "hello").await;
    assert!(matches!(
        comment.unwrap_err(),
        MoltgateError::Permission(PermissionError::NotPermitted { .. })
    ));

    let comment_draft = manager.draft_comment("p1", "hello");
    assert!(comment_draft.is_err());

    let post_draft = manager.draft_post("rustdev", "Title", Some("body"), None);
    assert!(post_draft.is_err());

    assert!(api.calls().is_empty(), "no write may reach the API in lurk");
}

#[tokio::test]
async fn engage_upvotes_freely_but_gates_content() {
    let (_dir, api, manager) = gate(Mode::Engage, RecordingApi::new());

    manager.perform_low_impact(Action::Upvote, "p1").await.unwrap();
    assert_eq!(api.calls(), vec!["upvote:p1".to_string()]);

    let direct = manager.comment_direct("p1", "hello").await;
    assert!(matches!(
        direct.unwrap_err(),
        MoltgateError::Engagement(EngagementError::ApprovalRequired {
            action: Action::Comment
        })
    ));
    assert_eq!(api.calls().len(), 1, "refusal must not touch the API");
}

#[tokio::test]
async fn active_comments_directly_but_still_drafts_posts() {
    let (_dir, api, mut manager) = gate(Mode::Active, RecordingApi::new());

    manager.comment_direct("p1", "direct comment").await.unwrap();
    assert_eq!(api.calls(), vec!["comment:p1:direct comment".to_string()]);

    let direct_post = manager.perform_low_impact(Action::Post, "rustdev").await;
    assert!(matches!(
        direct_post.unwrap_err(),
        MoltgateError::Engagement(EngagementError::ApprovalRequired {
            action: Action::Post
        })
    ));

    let draft = manager
        .draft_post("rustdev", "A title", Some("body"), None)
        .unwrap();
    assert_eq!(api.calls().len(), 1, "drafting alone sends nothing");
    assert!(manager.draft_snapshot(&draft.id).is_some());
}

#[test]
fn unknown_action_is_rejected_at_parse_time() {
    let err = "downvote".parse::<Action>().unwrap_err();
    assert!(matches!(
        err,
        PermissionError::UnknownAction { ref value } if value == "downvote"
    ));

    // Parsing is strict; case variants are not actions.
    assert!("Read".parse::<Action>().is_err());
    assert!(" read".parse::<Action>().is_err());
}
