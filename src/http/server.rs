//! HTTP server setup and the translating handler.
//!
//! # Responsibilities
//! - Create Axum Router with a catch-all handler
//! - Wire up middleware (tracing, body limit, request ID)
//! - Translate each request, run the program, rebuild the response
//! - Serve on a listener until shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, TransportConfig};
use crate::error::{TransportError, TransportResult};
use crate::lifecycle::signalled;
use crate::observability::metrics;
use crate::process::Program;
use crate::response::{reconstruct, OutgoingResponse};
use crate::translate::{IncomingRequest, Translator};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub program: Arc<Program>,
    pub translator: Arc<Translator>,
}

impl AppState {
    pub fn new(program: Program, translator: Translator) -> Self {
        Self {
            program: Arc::new(program),
            translator: Arc::new(translator),
        }
    }

    /// Run one request through translation, invocation and reconstruction.
    pub async fn serve(&self, request: &IncomingRequest) -> TransportResult<OutgoingResponse> {
        let translation = self.translator.translate(request)?;

        tracing::debug!(
            args = ?translation.command.args,
            piped_input = translation.command.stdin.is_some(),
            page = translation.page.page,
            "Invoking program"
        );

        let result = self.program.invoke(&translation.command).await?;
        Ok(reconstruct(result, &translation.page))
    }
}

/// HTTP server that answers REST requests through the external program.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Validate `config`, resolve the program and build the router.
    ///
    /// Fails when the program cannot be found; no request is ever served
    /// without one.
    pub fn new(config: TransportConfig) -> TransportResult<Self> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let program = Program::resolve(
            &config.program.name,
            Duration::from_secs(config.program.timeout_secs),
        )?;
        let translator = Translator::new(config.limits.default_per_page);
        let state = AppState::new(program, translator);

        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &TransportConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gh_handler))
            .route("/", any(gh_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_size))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, usable in-process as a `tower::Service`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signalled(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: every request becomes one program invocation.
async fn gh_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start_time = Instant::now();
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method_str = method.to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Translating request"
    );

    let request = IncomingRequest::new(method, &uri, body);
    match state.serve(&request).await {
        Ok(response) => {
            metrics::record_request(&method_str, response.status.as_u16(), start_time);
            tracing::info!(
                request_id = %request_id,
                method = %method_str,
                endpoint = %request.path,
                status = response.status.as_u16(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Request served"
            );
            response.into_response()
        }
        Err(e) => {
            let status = e.status();
            match &e {
                TransportError::UnsupportedMethod(_)
                | TransportError::MalformedQuery(_)
                | TransportError::MalformedBody(_) => {
                    metrics::record_rejection(&method_str, "bad_request");
                    tracing::warn!(request_id = %request_id, error = %e, "Request rejected");
                }
                _ => {
                    metrics::record_request(&method_str, status.as_u16(), start_time);
                    tracing::error!(request_id = %request_id, error = %e, "Invocation failed");
                }
            }
            e.into_response()
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::os::unix::fs::PermissionsExt;
    use tower::ServiceExt;

    fn server_with_script(dir: &tempfile::TempDir, body: &str) -> HttpServer {
        let path = dir.path().join("gh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = TransportConfig::default();
        config.program.name = path.to_string_lossy().into_owned();
        HttpServer::new(config).unwrap()
    }

    #[test]
    fn test_missing_program_fails_construction() {
        let mut config = TransportConfig::default();
        config.program.name = "no-such-gh-binary-e1c9".into();
        let err = HttpServer::new(config).err().unwrap();
        assert!(matches!(err, TransportError::ProgramNotFound { .. }));
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let mut config = TransportConfig::default();
        config.program.timeout_secs = 0;
        let err = HttpServer::new(config).err().unwrap();
        assert!(matches!(err, TransportError::Config(_)));
    }

    #[tokio::test]
    async fn test_request_id_is_set() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_script(&dir, "echo '{}'");

        let response = server
            .router()
            .oneshot(Request::get("/user").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_put_is_rejected_without_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("invoked");
        let server = server_with_script(&dir, &format!("touch {}", marker.display()));

        let response = server
            .router()
            .oneshot(Request::put("/user").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!marker.exists());
    }
}
