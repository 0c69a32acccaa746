//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum router,
//! plus a handful of test-only handler kinds and a capture server for delayed responses.
//!
//! ## Test Servers
//!
//! Use [`spawn_test_server()`] when something outside the router must reach the app
//! over the network, and [`spawn_capture_server()`] to receive delayed response POSTs.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::State;
use axum::http::{self, header, Method, Request, Response, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use slashgate_server::api::{create_router, AppState};
use slashgate_server::commands::{
    CommandRegistry, CommandWorkspace, HandlerCatalog, HandlerError, HandlerOutput,
    HandlerResult, Manifest, RegistrationError, SlashCommand,
};
use slashgate_server::config::Config;
use slashgate_server::slack::{DelayedResponder, SlashRequest};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tower::ServiceExt;

/// Token every command in [`DEFAULT_MANIFEST`] is registered with.
pub const TOKEN: &str = "test-secret";

/// Manifest used by [`TestApp::new`].
pub const DEFAULT_MANIFEST: &str = r#"{
  "handlers": [
    { "command": "echo", "handler": "echo", "token_var": "TEST_TOKEN" },
    { "command": "shout", "handler": "echo", "token_var": "TEST_TOKEN",
      "options": { "in_channel": true } },
    { "command": "later", "handler": "deferred-echo", "token_var": "TEST_TOKEN" },
    { "command": "motd", "handler": "static-text", "token_var": "TEST_TOKEN",
      "options": { "text": "Deploy freeze" } },
    { "command": "note", "handler": "note", "token_var": "TEST_TOKEN" },
    { "command": "card", "handler": "payload", "token_var": "TEST_TOKEN",
      "options": { "payload": { "response_type": "in_channel", "text": "hi" } } },
    { "command": "bare", "handler": "payload", "token_var": "TEST_TOKEN",
      "options": { "payload": {} } },
    { "command": "done", "handler": "payload", "token_var": "TEST_TOKEN",
      "options": { "payload": { "isDelayedResponse": true, "text": "done" } } },
    { "command": "notyet", "handler": "payload", "token_var": "TEST_TOKEN",
      "options": { "payload": { "isDelayedResponse": false, "text": "now" } } },
    { "command": "fail", "handler": "fail", "token_var": "TEST_TOKEN",
      "options": { "message": "boom" } },
    { "command": "crash", "handler": "panic", "token_var": "TEST_TOKEN" },
    { "command": "slow", "handler": "slow", "token_var": "TEST_TOKEN",
      "options": { "millis": 5000 } },
    { "command": "broken", "handler": "no-such-kind", "token_var": "TEST_TOKEN" },
    { "command": "unset", "handler": "echo", "token_var": "UNSET_TOKEN" }
  ]
}"#;

// ============================================================================
// Test handler kinds
// ============================================================================

/// Replies with the JSON value of its `payload` option.
struct PayloadCommand(Value);

#[async_trait]
impl SlashCommand for PayloadCommand {
    async fn handle(&self, _request: &SlashRequest) -> HandlerResult {
        Ok(HandlerOutput::from_value(self.0.clone()))
    }
}

/// Always fails with its `message` option.
struct FailCommand(String);

#[async_trait]
impl SlashCommand for FailCommand {
    async fn handle(&self, _request: &SlashRequest) -> HandlerResult {
        Err(HandlerError::new(self.0.clone()))
    }
}

/// Panics instead of completing.
struct PanicCommand;

#[async_trait]
impl SlashCommand for PanicCommand {
    async fn handle(&self, _request: &SlashRequest) -> HandlerResult {
        panic!("handler exploded");
    }
}

/// Sleeps for its `millis` option before replying.
struct SlowCommand(Duration);

#[async_trait]
impl SlashCommand for SlowCommand {
    async fn handle(&self, _request: &SlashRequest) -> HandlerResult {
        tokio::time::sleep(self.0).await;
        Ok(HandlerOutput::Text("finally".into()))
    }
}

/// Built-in kinds plus the test-only kinds above.
pub fn test_catalog() -> HandlerCatalog {
    let mut catalog = HandlerCatalog::with_builtins();
    catalog
        .register("payload", |init| {
            let payload = init
                .options
                .get("payload")
                .cloned()
                .ok_or_else(|| RegistrationError::invalid_options("payload", "missing `payload`"))?;
            Ok(Arc::new(PayloadCommand(payload)) as Arc<dyn SlashCommand>)
        })
        .register("fail", |init| {
            let message = init.options.get_str("message").unwrap_or("failed").to_string();
            Ok(Arc::new(FailCommand(message)) as Arc<dyn SlashCommand>)
        })
        .register("panic", |_init| Ok(Arc::new(PanicCommand) as Arc<dyn SlashCommand>))
        .register("slow", |init| {
            let millis = init.options.get("millis").and_then(Value::as_u64).unwrap_or(1000);
            Ok(Arc::new(SlowCommand(Duration::from_millis(millis))) as Arc<dyn SlashCommand>)
        });
    catalog
}

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub config: Arc<Config>,
    pub registry_commands: Vec<String>,
    /// Keeps the working directory alive for the test's duration.
    pub work_dir: TempDir,
}

impl TestApp {
    /// Create a test app from [`DEFAULT_MANIFEST`].
    pub fn new() -> Self {
        Self::with_config(DEFAULT_MANIFEST, |_| {})
    }

    /// Create a test app from a manifest, adjusting the config first.
    pub fn with_config(manifest: &str, configure: impl FnOnce(&mut Config)) -> Self {
        let work_dir = tempfile::tempdir().expect("Failed to create work dir");

        let mut config = Config::default_for_test();
        config.work_dir = work_dir.path().to_path_buf();
        configure(&mut config);

        let manifest = Manifest::from_json(manifest).expect("Invalid test manifest");
        let tokens = HashMap::from([("TEST_TOKEN".to_string(), TOKEN.to_string())]);
        let workspace = CommandWorkspace::new(&config.work_dir, &config.public_path_prefix);
        let registry =
            CommandRegistry::build(&manifest.handlers, &tokens, &workspace, &test_catalog());
        let registry_commands = registry.commands().into_iter().map(String::from).collect();

        let responder = DelayedResponder::new(config.delayed_response_timeout)
            .expect("Failed to build delayed responder");
        let state = AppState::new(config.clone(), registry, responder);
        let router = create_router(state).expect("Failed to build router");

        Self {
            router,
            config: Arc::new(config),
            registry_commands,
            work_dir,
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// POST a JSON body to `/svc/slack/{command}`.
    pub async fn slash_json(&self, command: &str, body: Value) -> Response<Body> {
        let req = Self::request(Method::POST, &format!("/svc/slack/{command}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.oneshot(req).await
    }

    /// POST a form-encoded body to `/svc/slack/{command}`.
    pub async fn slash_form(&self, command: &str, body: &str) -> Response<Body> {
        let req = Self::request(Method::POST, &format!("/svc/slack/{command}"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.oneshot(req).await
    }
}

/// Read a response body as bytes.
pub async fn body_to_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes()
        .to_vec()
}

/// Read a response body as a UTF-8 string.
pub async fn body_to_string(response: Response<Body>) -> String {
    String::from_utf8(body_to_bytes(response).await).expect("Body is not UTF-8")
}

/// Read a response body as JSON.
pub async fn body_to_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_to_bytes(response).await).expect("Body is not JSON")
}

// ============================================================================
// Test Servers
// ============================================================================

/// A running test server bound to a random port.
pub struct TestServer {
    /// Server address (127.0.0.1:PORT).
    pub addr: SocketAddr,
    /// Base URL for HTTP requests (e.g., `http://127.0.0.1:12345`).
    pub url: String,
    /// Handle to the server task for cleanup.
    _handle: JoinHandle<()>,
}

/// Spawn a real HTTP server on a random port.
pub async fn spawn_test_server(router: Router) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    TestServer {
        addr,
        url,
        _handle: handle,
    }
}

/// A server recording every JSON body POSTed to `/hook`.
pub struct CaptureServer {
    pub server: TestServer,
    received: mpsc::UnboundedReceiver<Value>,
}

impl CaptureServer {
    /// URL to hand out as a `response_url`.
    pub fn hook_url(&self) -> String {
        format!("{}/hook", self.server.url)
    }

    /// Wait for the next captured body.
    pub async fn next(&mut self) -> Value {
        tokio::time::timeout(Duration::from_secs(5), self.received.recv())
            .await
            .expect("Timed out waiting for delayed response")
            .expect("Capture server closed")
    }

    /// Assert nothing else arrives within `wait`.
    pub async fn assert_quiet(&mut self, wait: Duration) {
        if let Ok(Some(body)) = tokio::time::timeout(wait, self.received.recv()).await {
            panic!("Unexpected delayed response: {body}");
        }
    }
}

/// Spawn a [`CaptureServer`] that answers every POST with `status`.
pub async fn spawn_capture_server(status: StatusCode) -> CaptureServer {
    let (tx, received) = mpsc::unbounded_channel();

    async fn record(
        State((tx, status)): State<(mpsc::UnboundedSender<Value>, StatusCode)>,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let _ = tx.send(body);
        status
    }

    let router = Router::new()
        .route("/hook", post(record))
        .with_state((tx, status));

    CaptureServer {
        server: spawn_test_server(router).await,
        received,
    }
}
