//! Application state management
//!
//! Shared state passed to all request handlers via Axum's state extraction.
//! It is built once at startup, read-only afterwards, and cheap to clone.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::repositories::UserStore;
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// User persistence
    pub users: Arc<dyn UserStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Prometheus handle, present when a recorder was installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Derives the JWT keys from the configured secret, so call this once
    /// at startup rather than per request.
    pub fn new(users: Arc<dyn UserStore>, config: AppConfig) -> Self {
        let jwt = JwtService::new(config.jwt.secret.expose_secret(), config.jwt.expires_in_secs);

        Self {
            users,
            config: Arc::new(config),
            jwt,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the user store
    #[inline]
    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
