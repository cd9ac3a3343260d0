use crate::card::ImageLoader;
use crate::proxy::ProxyState;
use axum::{extract::State, response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};

/// Health check status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

/// Individual health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub github_token: CheckResult,
    pub fonts: CheckResult,
}

/// Result of an individual check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness probe response (minimal, just indicates the process is running)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

pub fn routes<L: ImageLoader + 'static>() -> Router<ProxyState<L>> {
    Router::new()
        .route("/health", get(health_check::<L>))
        .route("/healthz", get(health_check::<L>)) // Kubernetes convention
        .route("/livez", get(liveness_check)) // Kubernetes liveness probe
}

/// Main health check endpoint
///
/// Nothing here can make the proxy unusable: a missing token only lowers
/// GitHub's rate limit and missing fonts only leave card text unpainted.
async fn health_check<L: ImageLoader + 'static>(
    State(state): State<ProxyState<L>>,
) -> Json<HealthResponse> {
    let github_token = if state.github.has_token() {
        CheckResult {
            status: HealthStatus::Healthy,
            message: None,
        }
    } else {
        CheckResult {
            status: HealthStatus::Degraded,
            message: Some("No GitHub token configured, unauthenticated rate limit applies".to_string()),
        }
    };

    let fonts = if state.renderer.typography().has_faces() {
        CheckResult {
            status: HealthStatus::Healthy,
            message: None,
        }
    } else {
        CheckResult {
            status: HealthStatus::Degraded,
            message: Some("No font face loaded, card text is not painted".to_string()),
        }
    };

    let status = if github_token.status == HealthStatus::Healthy && fonts.status == HealthStatus::Healthy {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        checks: HealthChecks { github_token, fonts },
    })
}

/// Liveness probe - just checks if the process is running
async fn liveness_check() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}
