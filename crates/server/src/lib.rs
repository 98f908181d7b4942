//! HTTP front end for cloze exercises.
//!
//! Routes:
//!
//! - `GET /wiki?url=…&cloze=…` exercise page for a Wikipedia URL
//! - `GET /languages` supported language codes as JSON
//! - `GET /stats` statistics page
//! - everything else is served from the public directory

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use lacuna_core::{Lacuna, message_page};
use serde::Deserialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Listen address variable.
pub const ADDR_ENV_VAR: &str = "LACUNA_ADDR";
/// Public asset directory variable.
pub const PUBLIC_ENV_VAR: &str = "LACUNA_PUBLIC";
/// Request timeout variable, in seconds.
pub const TIMEOUT_ENV_VAR: &str = "LACUNA_REQUEST_TIMEOUT";

pub const DEFAULT_ADDR: &str = "0.0.0.0:4567";
pub const DEFAULT_PUBLIC_DIR: &str = "crates/server/public";
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 60;

/// Shown when the Wikipedia page could not be fetched or rewritten.
pub const MESSAGE_FETCH_FAILED: &str = "No processing possible. Page could not be loaded!";

/// Server settings read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub public_dir: PathBuf,
    pub request_timeout: Duration,
}

impl ServerConfig {
    /// Reads `LACUNA_ADDR`, `LACUNA_PUBLIC` and `LACUNA_REQUEST_TIMEOUT`,
    /// falling back to the defaults for unset variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup(ADDR_ENV_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {} {:?}: {}", ADDR_ENV_VAR, addr, e))?;

        let public_dir = lookup(PUBLIC_ENV_VAR).map_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR), PathBuf::from);

        let request_timeout = match lookup(TIMEOUT_ENV_VAR) {
            Some(secs) => secs
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid {} {:?}: {}", TIMEOUT_ENV_VAR, secs, e))?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self { addr, public_dir, request_timeout: Duration::from_secs(request_timeout) })
    }
}

/// Query parameters of `/wiki`.
#[derive(Debug, Deserialize)]
pub struct WikiParams {
    url: Option<String>,
    cloze: Option<String>,
}

/// Builds the application router.
pub fn router(lacuna: Arc<Lacuna>, public_dir: &Path, request_timeout: Duration) -> Router {
    Router::new()
        .route("/wiki", get(wiki))
        .route("/languages", get(languages))
        .route_service("/stats", ServeFile::new(public_dir.join("stats.html")))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(lacuna)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn wiki(State(lacuna): State<Arc<Lacuna>>, Query(params): Query<WikiParams>) -> Response {
    match lacuna.process_site(params.url.as_deref(), params.cloze.as_deref()).await {
        Ok(page) => Html(page).into_response(),
        Err(err) => {
            tracing::error!(error = %err, url = ?params.url, "failed to build exercise");
            (StatusCode::BAD_GATEWAY, Html(message_page(MESSAGE_FETCH_FAILED))).into_response()
        }
    }
}

async fn languages(State(lacuna): State<Arc<Lacuna>>) -> Json<Vec<String>> {
    Json(lacuna.tables().supported_languages().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr.port(), 4567);
        assert_eq!(config.public_dir, PathBuf::from(DEFAULT_PUBLIC_DIR));
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT));
    }

    #[test]
    fn test_config_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ADDR_ENV_VAR, "127.0.0.1:8080"),
            (PUBLIC_ENV_VAR, "/srv/lacuna"),
            (TIMEOUT_ENV_VAR, "5"),
        ]))
        .unwrap();

        assert_eq!(config.addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.public_dir, PathBuf::from("/srv/lacuna"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_invalid_values() {
        assert!(ServerConfig::from_lookup(lookup(&[(ADDR_ENV_VAR, "localhost")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[(TIMEOUT_ENV_VAR, "soon")])).is_err());
    }
}
