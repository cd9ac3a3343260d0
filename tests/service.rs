mod common;

use std::time::{Duration, Instant};

use snaprepo::error::SnapRepoError;
use snaprepo::models::Repository;
use snaprepo::proxy::create_router;
use snaprepo::service::RepositoryService;
use tokio::net::TcpListener;

/// Run the real proxy in front of the fake GitHub API and return its base URL.
async fn spawn_proxy() -> String {
    let app = create_router(common::proxy_state().await);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[test]
fn test_mock_backend_serves_sample_after_delay() {
    let service = RepositoryService::mock(Duration::from_millis(30));

    let started = Instant::now();
    let repo = tokio_test::block_on(service.fetch_repository("anyone", "anything")).unwrap();

    assert!(started.elapsed() >= Duration::from_millis(30));
    assert_eq!(repo, Repository::mock());
}

#[test]
fn test_extract_details() {
    let details = RepositoryService::extract_details("https://github.com/octo/spoon.git").unwrap();
    assert_eq!(details.full_name(), "octo/spoon");
    assert!(RepositoryService::extract_details("octo/spoon").is_err());
}

#[tokio::test]
async fn test_proxy_backend_unwraps_envelope() {
    let service = RepositoryService::proxy(spawn_proxy().await).unwrap();
    let repo = service.fetch_repository("octo", "spoon").await.unwrap();

    assert_eq!(repo.name, "spoon");
    assert_eq!(repo.stars, 1234);
    assert_eq!(repo.top_languages.map(|l| l.len()), Some(5));
}

#[tokio::test]
async fn test_proxy_backend_maps_error_envelopes() {
    let service = RepositoryService::proxy(spawn_proxy().await).unwrap();

    let err = service.fetch_repository("missing", "x").await.unwrap_err();
    assert!(matches!(err, SnapRepoError::NotFound(_)));
    assert_eq!(err.user_message(), "Repository not found");

    let err = service.fetch_repository("limited", "x").await.unwrap_err();
    assert!(matches!(err, SnapRepoError::RateLimitExceeded(_)));

    let err = service.fetch_repository("flaky", "x").await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to fetch repository");
}

#[tokio::test]
async fn test_proxy_backend_reports_unreachable_proxy() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = RepositoryService::proxy(format!("http://{}", addr)).unwrap();
    let err = service.fetch_repository("octo", "spoon").await.unwrap_err();

    assert!(matches!(err, SnapRepoError::NetworkError(_)));
    assert_eq!(err.user_message(), "Failed to fetch repository");
}
