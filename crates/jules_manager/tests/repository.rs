use std::sync::Arc;

use jules_manager::repository::SessionRepository;
use jules_manager::ActionError;

mod support;

use support::{session, FakeService};

fn repository(service: &FakeService) -> SessionRepository {
    SessionRepository::new(Arc::new(service.clone()))
}

#[tokio::test]
async fn sessions_for_source_fetches_everything_then_matches_exactly() {
    let service = FakeService::new().with_sessions(vec![
        session("sessions/1", Some("repoA"), "COMPLETED"),
        session("sessions/2", Some("repoB"), "COMPLETED"),
        session("sessions/3", Some("repoA"), "FAILED"),
        session("sessions/4", Some("repoa"), "COMPLETED"),
        session("sessions/5", None, "COMPLETED"),
    ]);

    let names: Vec<String> = repository(&service)
        .list_sessions_for_source("repoA")
        .await
        .expect("list succeeds")
        .into_iter()
        .map(|session| session.name)
        .collect();

    assert_eq!(names, vec!["sessions/1", "sessions/3"]);
    assert_eq!(service.calls(), vec!["list_sessions"]);
}

#[tokio::test]
async fn created_session_appears_in_following_source_listing() {
    let service = FakeService::new()
        .with_sessions(vec![session("sessions/old", Some("repoB"), "COMPLETED")]);
    let repository = repository(&service);

    let created = repository
        .create_session("fix bug", "repoA", None, None)
        .await
        .expect("create succeeds");
    assert!(!created.name.is_empty());

    let listed = repository
        .list_sessions_for_source("repoA")
        .await
        .expect("list succeeds");
    assert!(listed.iter().any(|session| session.name == created.name));
    assert!(listed.iter().all(|session| session.source() == Some("repoA")));
}

#[tokio::test]
async fn create_forwards_branch_and_title() {
    let service = FakeService::new();
    repository(&service)
        .create_session("add tests", "repoA", Some("develop"), Some("Tests"))
        .await
        .expect("create succeeds");

    let state = service.state();
    let request = &state.created[0];
    assert_eq!(request.prompt, "add tests");
    assert_eq!(request.source_context.source, "repoA");
    assert_eq!(request.source_context.branch.as_deref(), Some("develop"));
    assert_eq!(request.title.as_deref(), Some("Tests"));
}

#[tokio::test]
async fn blank_prompt_never_reaches_the_service() {
    let service = FakeService::new();
    let error = repository(&service)
        .create_session("  ", "repoA", None, None)
        .await
        .expect_err("blank prompt is rejected");

    assert!(matches!(error, ActionError::EmptyInput { field: "prompt" }));
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn service_failures_surface_as_request_failed_notice() {
    let service = FakeService::new();
    service.fail_with(jules_api::StatusCode::INTERNAL_SERVER_ERROR, "backend exploded");

    let error = repository(&service)
        .list_sources()
        .await
        .expect_err("list fails");
    assert_eq!(error.user_message(), "Request failed: backend exploded");
}
