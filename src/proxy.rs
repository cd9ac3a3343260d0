use crate::card::{CardRenderer, CardRequest, ImageLoader, Card};
use crate::error::SnapRepoError;
use crate::github::GitHubClient;
use crate::health;
use crate::models::{ApiResponse, Repository};
use axum::{
    extract::{Query, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub const MSG_MISSING_PARAMS: &str = "Missing owner or repo parameter";

/// Shared state for the proxy and card endpoints
pub struct ProxyState<L> {
    pub github: Arc<GitHubClient>,
    pub renderer: Arc<CardRenderer<L>>,
    pub start_time: Instant,
}

impl<L> Clone for ProxyState<L> {
    fn clone(&self) -> Self {
        ProxyState {
            github: self.github.clone(),
            renderer: self.renderer.clone(),
            start_time: self.start_time,
        }
    }
}

impl<L> ProxyState<L> {
    pub fn new(github: GitHubClient, renderer: CardRenderer<L>) -> Self {
        ProxyState {
            github: Arc::new(github),
            renderer: Arc::new(renderer),
            start_time: Instant::now(),
        }
    }
}

/// Query parameters of `/info`
#[derive(Debug, Deserialize)]
pub struct InfoParams {
    pub owner: Option<String>,
    pub repo: Option<String>,
}

/// Query parameters of `/card`
#[derive(Debug, Deserialize)]
pub struct CardParams {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub theme: Option<String>,
    /// Kept as text so odd values fall back to the default instead of a bare 400.
    pub watermark: Option<String>,
}

/// Permissive CORS: any origin, the usual verbs and request headers.
///
/// Every `OPTIONS` request is answered by the layer itself with an empty 200.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::DELETE,
            Method::POST,
            Method::PUT,
        ]))
        .allow_headers(AllowHeaders::list([
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
            HeaderName::from_static("accept-version"),
            header::CONTENT_LENGTH,
            HeaderName::from_static("content-md5"),
            header::CONTENT_TYPE,
            header::DATE,
            HeaderName::from_static("x-api-version"),
        ]))
}

/// Create the proxy router: `/info`, `/card` and the health probes.
pub fn create_router<L: ImageLoader + 'static>(state: ProxyState<L>) -> Router {
    Router::new()
        .route("/info", get(get_info::<L>))
        .route("/card", get(get_card::<L>))
        .merge(health::routes::<L>())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `0.0.0.0:{port}` and serve until `shutdown` resolves.
pub async fn start_server<L, F>(
    state: ProxyState<L>,
    port: u16,
    shutdown: F,
) -> Result<(), SnapRepoError>
where
    L: ImageLoader + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("SnapRepo proxy listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// `false`, `0`, `no` and `off` (any case) disable the watermark; anything else keeps it.
fn watermark_flag(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) => !matches!(v.as_str(), "false" | "0" | "no" | "off"),
        None => true,
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Translate a failed lookup into the JSON envelope, mirroring GitHub's status.
fn error_response(err: &SnapRepoError) -> Response {
    let status = err
        .status_code()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(status = %status, error = %err, "repository lookup failed");
    } else {
        warn!(status = %status, error = %err, "repository lookup failed");
    }

    (
        status,
        Json(ApiResponse::<Repository>::failure(err.user_message())),
    )
        .into_response()
}

fn missing_params() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<Repository>::failure(MSG_MISSING_PARAMS)),
    )
        .into_response()
}

/// Fetch repository metadata and languages from GitHub
async fn get_info<L: ImageLoader + 'static>(
    State(state): State<ProxyState<L>>,
    Query(params): Query<InfoParams>,
) -> Response {
    let (Some(owner), Some(repo)) = (required(params.owner), required(params.repo)) else {
        return missing_params();
    };

    match state.github.fetch_repository(&owner, &repo).await {
        Ok(repository) => (StatusCode::OK, Json(ApiResponse::ok(repository))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Render the repository card as a downloadable PNG
async fn get_card<L: ImageLoader + 'static>(
    State(state): State<ProxyState<L>>,
    Query(params): Query<CardParams>,
) -> Response {
    let (Some(owner), Some(repo)) = (required(params.owner), required(params.repo)) else {
        return missing_params();
    };

    let repository = match state.github.fetch_repository(&owner, &repo).await {
        Ok(repository) => repository,
        Err(e) => return error_response(&e),
    };

    let theme = params.theme.unwrap_or_default();
    let request = CardRequest::new(repository, &theme, watermark_flag(params.watermark.as_deref()));

    let png = match state.renderer.render(&request).await.and_then(|card| card.encode_png()) {
        Ok(png) => png,
        Err(e) => {
            error!(owner = %owner, repo = %repo, error = %e, "card render failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Repository>::failure(e.to_string())),
            )
                .into_response();
        }
    };

    let disposition = format!("attachment; filename=\"{}\"", Card::FILE_NAME);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/png")),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&disposition)
                    .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
            ),
        ],
        png,
    )
        .into_response()
}
