//! Shared Middleware Stack
//!
//! The mock server is usually called from a browser test harness on another
//! origin, so CORS is open by default. `--cors-origin` narrows it to a list
//! and `--no-cors` turns it off.

use crate::{Result, ServerError};
use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    Router,
};
use mocktree_core::TreeError;
use std::time::{Duration, Instant};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Which origins get CORS headers
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CorsPolicy {
    /// No CORS layer at all
    Disabled,
    /// `Access-Control-Allow-Origin: *`
    #[default]
    AnyOrigin,
    /// Echo the request origin only when it is listed
    Origins(Vec<HeaderValue>),
}

impl CorsPolicy {
    /// Allow only `origins`; an empty list or `*` allows any origin
    pub fn origins<I, S>(origins: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origins: Vec<S> = origins.into_iter().collect();
        if origins.iter().any(|origin| AsRef::<str>::as_ref(origin) == "*") {
            return Ok(CorsPolicy::AnyOrigin);
        }

        let origins = origins
            .iter()
            .map(|origin| {
                let origin: &str = origin.as_ref();
                HeaderValue::from_str(origin).map_err(|_| {
                    ServerError::Config(TreeError::config(format!(
                        "invalid CORS origin '{}'",
                        origin
                    )))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(if origins.is_empty() {
            CorsPolicy::AnyOrigin
        } else {
            CorsPolicy::Origins(origins)
        })
    }

    fn layer(&self) -> Option<CorsLayer> {
        let allow_origin = match self {
            CorsPolicy::Disabled => return None,
            CorsPolicy::AnyOrigin => AllowOrigin::any(),
            CorsPolicy::Origins(origins) => AllowOrigin::list(origins.iter().cloned()),
        };

        Some(
            CorsLayer::new()
                .allow_origin(allow_origin)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    }
}

/// Middleware configuration
#[derive(Debug, Clone)]
pub struct MiddlewareConfig {
    pub cors: CorsPolicy,
    /// Enable request tracing (default: true)
    pub tracing_enabled: bool,
    /// Request timeout (default: 30s)
    pub timeout: Duration,
    /// Enable request logging (default: true)
    pub request_logging: bool,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            cors: CorsPolicy::AnyOrigin,
            tracing_enabled: true,
            timeout: Duration::from_secs(30),
            request_logging: true,
        }
    }
}

impl MiddlewareConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cors(mut self, policy: CorsPolicy) -> Self {
        self.cors = policy;
        self
    }

    pub fn tracing(mut self, enabled: bool) -> Self {
        self.tracing_enabled = enabled;
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    pub fn request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }
}

/// Wrap `router` in the configured layers. CORS is outermost so preflight
/// requests are answered before they reach logging or the timeout.
pub fn apply_middleware(router: Router, config: MiddlewareConfig) -> Router {
    let mut router = router;

    if config.request_logging {
        router = router.layer(middleware::from_fn(log_request));
    }

    router = router.layer(TimeoutLayer::new(config.timeout));

    if config.tracing_enabled {
        router = router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );
    }

    if let Some(cors) = config.cors.layer() {
        router = router.layer(cors);
    }

    router
}

/// One line per request; 404s for unknown tree paths land at warn
async fn log_request(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();
    let millis = start.elapsed().as_millis();

    if status.is_server_error() {
        tracing::error!("{} {} {} - {}ms", method, uri, status.as_u16(), millis);
    } else if status.is_client_error() {
        tracing::warn!("{} {} {} - {}ms", method, uri, status.as_u16(), millis);
    } else {
        tracing::info!("{} {} {} - {}ms", method, uri, status.as_u16(), millis);
    }

    response
}
