use std::sync::Arc;

use jules_manager::app::{ChatView, View, ViewEvent};
use jules_manager::dispatcher::{ActionDispatcher, ACCEPT_REVIEW_MESSAGE};
use jules_manager::ActionError;

mod support;

use support::{agent_message, session, FakeService};

const SESSION: &str = "sessions/42";

fn service() -> FakeService {
    FakeService::new()
        .with_sessions(vec![session(SESSION, Some("repoA"), "AWAITING_USER_FEEDBACK")])
        .with_activities(SESSION, vec![agent_message("m1", "what next?")])
}

#[tokio::test]
async fn send_posts_then_reloads_the_feed() {
    let service = service();
    let dispatcher = ActionDispatcher::new(Arc::new(service.clone()));

    let feed = dispatcher
        .send_message(SESSION, "  ship it  ")
        .await
        .expect("send succeeds");

    assert_eq!(
        service.calls(),
        vec![
            "send_message sessions/42".to_string(),
            "list_activities sessions/42".to_string(),
        ]
    );
    assert_eq!(
        service.state().sent_messages,
        vec![(SESSION.to_string(), "ship it".to_string())]
    );
    let texts: Vec<&str> = feed.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["what next?", "ship it"]);
}

#[tokio::test]
async fn blank_message_is_not_sent() {
    let service = service();
    let dispatcher = ActionDispatcher::new(Arc::new(service.clone()));

    let error = dispatcher
        .send_message(SESSION, "\n\t ")
        .await
        .expect_err("blank message rejected");

    assert!(matches!(error, ActionError::EmptyInput { field: "message" }));
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn publish_sends_numbered_branch_instructions_in_order() {
    let service = service();
    let dispatcher = ActionDispatcher::new(Arc::new(service.clone()));
    let mut view = ChatView::new(SESSION);

    for _ in 0..3 {
        let branch = view.next_publish_branch();
        dispatcher
            .publish_to_branch(SESSION, &branch)
            .await
            .expect("publish succeeds");
    }

    let sent: Vec<String> = service
        .state()
        .sent_messages
        .iter()
        .map(|(_, message)| message.clone())
        .collect();
    assert_eq!(
        sent,
        vec![
            "Please publish the changes to a new branch named feature/change1 and create a PR.",
            "Please publish the changes to a new branch named feature/change2 and create a PR.",
            "Please publish the changes to a new branch named feature/change3 and create a PR.",
        ]
    );

    // A new view starts counting again.
    assert_eq!(ChatView::new(SESSION).next_publish_branch(), "feature/change1");
}

#[tokio::test]
async fn accept_review_sends_canned_message() {
    let service = service();
    ActionDispatcher::new(Arc::new(service.clone()))
        .accept_review(SESSION)
        .await
        .expect("accept succeeds");

    assert_eq!(
        service.state().sent_messages,
        vec![(SESSION.to_string(), ACCEPT_REVIEW_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn approval_hides_plan_controls_once_session_completes() {
    let service = FakeService::new()
        .with_sessions(vec![session(SESSION, Some("repoA"), "AWAITING_PLAN_APPROVAL")]);
    let dispatcher = ActionDispatcher::new(Arc::new(service.clone()));
    let mut view = ChatView::new(SESSION);

    let before = service.state().sessions[0].clone();
    view.apply(ViewEvent::SessionLoaded(before));
    assert!(view.show_plan_controls);

    let (session, feed) = dispatcher.approve_plan(SESSION).await.expect("approve succeeds");
    assert_eq!(
        service.calls(),
        vec![
            "approve_plan sessions/42".to_string(),
            "get_session sessions/42".to_string(),
            "list_activities sessions/42".to_string(),
        ]
    );
    assert_eq!(session.state.as_str(), "COMPLETED");

    view.apply(ViewEvent::PlanApproved { session, feed });
    assert!(!view.show_plan_controls);
}
