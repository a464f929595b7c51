use jules_api::{Activity, ActivityPayload, Session, SessionState, Source};
use serde_json::json;

#[test]
fn activities_decode_into_tagged_payloads() {
    let activities: Vec<Activity> = serde_json::from_value(json!([
        {
            "name": "sessions/1/activities/a",
            "createTime": "2025-01-01T00:00:00Z",
            "originator": "user",
            "userMessaged": {"userMessage": "hi"}
        },
        {
            "name": "sessions/1/activities/b",
            "agentMessaged": {"agentMessage": "hello"}
        },
        {
            "name": "sessions/1/activities/c",
            "planGenerated": {"plan": {"id": "p1", "steps": [
                {"id": "s1", "index": 0, "title": "Read code", "description": "Scan repo"},
                {"title": "Patch"}
            ]}}
        },
        {
            "name": "sessions/1/activities/d",
            "sessionCompleted": {}
        }
    ]))
    .expect("activities decode");

    assert_eq!(
        activities[0].payload,
        ActivityPayload::UserMessage {
            text: "hi".to_owned()
        }
    );
    assert_eq!(activities[0].create_time.as_deref(), Some("2025-01-01T00:00:00Z"));
    assert_eq!(
        activities[1].payload,
        ActivityPayload::AgentMessage {
            text: "hello".to_owned()
        }
    );
    match &activities[2].payload {
        ActivityPayload::PlanGenerated { plan } => {
            assert_eq!(plan.id.as_deref(), Some("p1"));
            assert_eq!(plan.steps.len(), 2);
            assert_eq!(plan.steps[0].description.as_deref(), Some("Scan repo"));
            assert_eq!(plan.steps[1].title, "Patch");
        }
        other => panic!("expected plan payload, got {other:?}"),
    }
    assert_eq!(activities[3].kind(), "sessionCompleted");
}

#[test]
fn activity_key_prefers_id_over_name() {
    let activity: Activity = serde_json::from_value(json!({
        "name": "sessions/1/activities/a",
        "id": "a",
        "agentMessaged": {"agentMessage": "x"}
    }))
    .expect("activity decodes");
    assert_eq!(activity.key(), "a");
}

#[test]
fn session_state_keeps_unknown_labels_verbatim() {
    let session: Session = serde_json::from_value(json!({
        "name": "sessions/7",
        "state": "IN_PROGRESS",
        "sourceContext": {"source": "sources/github/acme/app"}
    }))
    .expect("session decodes");

    assert_eq!(session.state, SessionState::Other("IN_PROGRESS".to_owned()));
    assert_eq!(session.state.as_str(), "IN_PROGRESS");
    assert_eq!(session.source(), Some("sources/github/acme/app"));
    assert_eq!(session.display_title(), "Untitled");
    assert_eq!(session.short_name(), "7");
}

#[test]
fn session_state_missing_or_null_is_unspecified() {
    let missing: Session = serde_json::from_value(json!({"name": "sessions/1"})).expect("decodes");
    let null: Session =
        serde_json::from_value(json!({"name": "sessions/1", "state": null})).expect("decodes");

    assert_eq!(missing.state, SessionState::Unspecified);
    assert_eq!(null.state, SessionState::Unspecified);
}

#[test]
fn session_state_recognises_plan_approval_sentinel() {
    let session: Session = serde_json::from_value(json!({
        "name": "sessions/1",
        "state": "AWAITING_PLAN_APPROVAL"
    }))
    .expect("decodes");
    assert_eq!(session.state, SessionState::AwaitingPlanApproval);

    let lower: Session = serde_json::from_value(json!({
        "name": "sessions/1",
        "state": "awaiting_plan_approval"
    }))
    .expect("decodes");
    assert_eq!(
        lower.state,
        SessionState::Other("awaiting_plan_approval".to_owned())
    );
}

#[test]
fn source_display_name_prefers_linked_repo() {
    let linked: Source = serde_json::from_value(json!({
        "name": "sources/github/acme/app",
        "githubRepo": {"owner": "acme", "repo": "app", "defaultBranch": {"displayName": "main"}}
    }))
    .expect("source decodes");
    assert_eq!(linked.display_name(), "acme/app");
    assert_eq!(linked.default_branch(), Some("main"));

    let bare: Source =
        serde_json::from_value(json!({"name": "sources/local/scratch"})).expect("source decodes");
    assert_eq!(bare.display_name(), "scratch");
    assert_eq!(bare.default_branch(), None);
}
