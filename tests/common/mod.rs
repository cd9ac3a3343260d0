//! Local stand-in for the GitHub REST API.
//!
//! The owner segment picks the behavior:
//! `octo` full record, `sparse` missing fields with a failing languages call,
//! `auth` echoes the Authorization header as the description, `missing` 404,
//! `limited` 403, anything else 502.

#![allow(dead_code)]

use axum::{
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use snaprepo::card::{CardRenderer, StaticImageLoader, Typography};
use snaprepo::github::GitHubClient;
use snaprepo::proxy::ProxyState;
use tokio::net::TcpListener;

/// Environment variable that no test ever sets.
pub const UNSET_TOKEN_ENV: &str = "SNAPREPO_TEST_TOKEN_NEVER_SET";

pub const AVATAR_URL: &str = "https://avatars.example.test/u/1";

/// Key order matters: the proxy keeps GitHub's order.
const LANGUAGES_BODY: &str =
    r#"{"TypeScript":90210,"JavaScript":5000,"CSS":4000,"HTML":3000,"Shell":200,"Python":10}"#;

async fn repository(Path((owner, repo)): Path<(String, String)>, headers: HeaderMap) -> Response {
    match owner.as_str() {
        "octo" => Json(json!({
            "name": repo,
            "html_url": format!("https://github.com/{}/{}", owner, repo),
            "description": "Spoons, but for octopuses",
            "stargazers_count": 1234,
            "forks_count": 56,
            "watchers_count": 1234,
            "open_issues_count": 7,
            "language": "TypeScript",
            "owner": { "login": owner, "avatar_url": AVATAR_URL },
            "updated_at": "2024-05-01T12:00:00Z"
        }))
        .into_response(),
        "sparse" => Json(json!({
            "name": repo,
            "html_url": format!("https://github.com/{}/{}", owner, repo),
            "description": null,
            "language": "Go",
            "owner": { "login": owner, "avatar_url": AVATAR_URL }
        }))
        .into_response(),
        "auth" => {
            let authorization = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none")
                .to_string();
            Json(json!({
                "name": repo,
                "html_url": format!("https://github.com/{}/{}", owner, repo),
                "description": authorization,
                "owner": { "login": owner, "avatar_url": AVATAR_URL }
            }))
            .into_response()
        }
        "missing" => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response(),
        "limited" => (
            StatusCode::FORBIDDEN,
            [("X-RateLimit-Remaining", "0")],
            Json(json!({ "message": "API rate limit exceeded" })),
        )
            .into_response(),
        _ => (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response(),
    }
}

async fn languages(Path((owner, _repo)): Path<(String, String)>) -> Response {
    match owner.as_str() {
        "sparse" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => ([(header::CONTENT_TYPE, "application/json")], LANGUAGES_BODY).into_response(),
    }
}

/// Start the fake API on an ephemeral port and return its base URL.
pub async fn spawn_fake_github() -> String {
    let app = Router::new()
        .route("/repos/:owner/:repo", get(repository))
        .route("/repos/:owner/:repo/languages", get(languages));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake github");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake github server");
    });

    format!("http://{}", addr)
}

pub async fn fake_github_client() -> GitHubClient {
    let base_url = spawn_fake_github().await;
    GitHubClient::with_base_url(base_url)
        .expect("client")
        .with_token_env(UNSET_TOKEN_ENV)
}

pub fn test_renderer() -> CardRenderer<StaticImageLoader> {
    CardRenderer::new(StaticImageLoader::new(), Typography::fallback())
}

pub async fn proxy_state() -> ProxyState<StaticImageLoader> {
    ProxyState::new(fake_github_client().await, test_renderer())
}
