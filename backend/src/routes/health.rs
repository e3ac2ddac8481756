//! Service health and metrics
//!
//! `/health/ready` only reports ready when the user store answers and the
//! token signer can round-trip a token with the configured lifetime; without
//! both, sign-up, login and every protected route fail.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use uuid::Uuid;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Body for `/health` and `/health/live`
#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub version: &'static str,
}

/// Body for `/health/ready`
#[derive(Debug, Serialize)]
pub struct ReadinessBody {
    pub status: &'static str,
    pub version: &'static str,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadinessChecks {
    pub store: StoreCheck,
    pub tokens: TokenCheck,
}

/// User store reachability
#[derive(Debug, Serialize)]
pub struct StoreCheck {
    pub kind: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Token issue/verify self-test
#[derive(Debug, Serialize)]
pub struct TokenCheck {
    pub status: &'static str,
    pub lifetime_secs: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn outcome(ok: bool) -> &'static str {
    if ok {
        "healthy"
    } else {
        "unhealthy"
    }
}

pub async fn health_check() -> Json<StatusBody> {
    Json(StatusBody {
        status: "healthy",
        version: VERSION,
    })
}

pub async fn liveness_check() -> Json<StatusBody> {
    Json(StatusBody {
        status: "alive",
        version: VERSION,
    })
}

/// Readiness: 503 unless both the store and the token signer work
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessBody>) {
    let store_error = state.users().ping().await.err().map(|e| e.to_string());
    let store = StoreCheck {
        kind: state.users().kind(),
        status: outcome(store_error.is_none()),
        message: store_error,
    };

    let jwt = state.jwt();
    let token_error = jwt
        .issue_token(Uuid::nil())
        .map_err(|e| e.to_string())
        .and_then(|token| {
            jwt.verify_token(&token)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .err();
    let tokens = TokenCheck {
        status: outcome(token_error.is_none()),
        lifetime_secs: jwt.expires_in_secs(),
        message: token_error,
    };

    let ready = store.message.is_none() && tokens.message.is_none();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessBody {
            status: if ready { "ready" } else { "not_ready" },
            version: VERSION,
            checks: ReadinessChecks { store, tokens },
        }),
    )
}

/// Prometheus text exposition, 404 when no recorder is installed
pub async fn metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::repositories::MemoryUserStore;
    use std::sync::Arc;

    fn state_with_expiry(expires_in_secs: i64) -> AppState {
        let mut config = AppConfig::default();
        config.jwt.expires_in_secs = expires_in_secs;
        AppState::new(Arc::new(MemoryUserStore::new()), config)
    }

    #[tokio::test]
    async fn test_health_and_liveness() {
        assert_eq!(health_check().await.status, "healthy");
        assert_eq!(liveness_check().await.status, "alive");
    }

    #[tokio::test]
    async fn test_ready_reports_store_kind_and_token_lifetime() {
        let (status, Json(body)) = readiness_check(State(state_with_expiry(3600))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ready");
        assert_eq!(body.checks.store.kind, "memory");
        assert_eq!(body.checks.tokens.status, "healthy");
        assert_eq!(body.checks.tokens.lifetime_secs, 3600);
    }

    #[tokio::test]
    async fn test_not_ready_when_tokens_cannot_be_issued() {
        let (status, Json(body)) =
            readiness_check(State(state_with_expiry(i64::MAX / 100))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "not_ready");
        assert_eq!(body.checks.store.status, "healthy");
        assert_eq!(body.checks.tokens.status, "unhealthy");
        assert!(body.checks.tokens.message.is_some());
    }

    #[tokio::test]
    async fn test_metrics_without_recorder_is_not_found() {
        assert_eq!(
            metrics(State(state_with_expiry(3600))).await.unwrap_err(),
            StatusCode::NOT_FOUND
        );
    }
}
