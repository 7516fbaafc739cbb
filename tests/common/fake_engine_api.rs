//! Fake search engine REST API for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `GET /`: cluster info
//! - `HEAD /{index}`: 200 if the index exists, 404 otherwise
//! - `PUT /{index}`: create an index from `settings` / `mappings`
//! - `POST /{index}/_search`: reply with a scripted `took`
//! - `GET /{index}/_settings`: shard and replica counts (as strings, like
//!   the real engine)
//!
//! Every request is recorded so tests can assert on what was sent.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn demo() {
//! use common::fake_engine_api::FakeEngineApi;
//!
//! let api = FakeEngineApi::start().await.unwrap();
//! api.add_index("covid_data_index", 1, 2).await;
//! api.script_took(&[12, 5, 8]).await;
//!
//! // Point an HttpEngine at api.base_url()
//! # }
//! ```

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, head, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// `Authorization` header for `elastic:changeme`.
pub const ELASTIC_CHANGEME: &str = "Basic ZWxhc3RpYzpjaGFuZ2VtZQ==";

/// One request as the server saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub shards: u32,
    pub replicas: u32,
}

/// State shared between the router and test code.
#[derive(Default)]
struct ApiState {
    indices: HashMap<String, Layout>,
    mappings: HashMap<String, Value>,
    requests: Vec<Recorded>,
    /// `took` values handed out by successive searches; 1 when exhausted.
    took: VecDeque<u64>,
    hits: u64,
    /// Fail the search with this (0-based) sequence number.
    fail_search_at: Option<usize>,
    searches: usize,
    /// Canned reply for every index creation.
    create_failure: Option<(StatusCode, Value)>,
    settings_unavailable: bool,
    /// Hold every search reply back this long.
    search_delay: Option<Duration>,
    /// Expected `Authorization` header; `None` accepts anything.
    auth: Option<String>,
}

type Shared = Arc<Mutex<ApiState>>;

/// Handle to the running fake engine.
pub struct FakeEngineApi {
    addr: SocketAddr,
    state: Shared,
}

impl FakeEngineApi {
    /// Start the fake engine on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state: Shared = Arc::new(Mutex::new(ApiState { hits: 100, ..Default::default() }));

        let app = Router::new()
            .route("/", get(cluster_info))
            .route("/{index}", head(index_exists).put(create_index))
            .route("/{index}/_search", post(search))
            .route("/{index}/_settings", get(settings))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the API (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Pre-create an index with the given layout.
    pub async fn add_index(&self, name: &str, shards: u32, replicas: u32) {
        self.state.lock().await.indices.insert(name.to_string(), Layout { shards, replicas });
    }

    pub async fn layout(&self, name: &str) -> Option<Layout> {
        self.state.lock().await.indices.get(name).copied()
    }

    pub async fn mappings(&self, name: &str) -> Option<Value> {
        self.state.lock().await.mappings.get(name).cloned()
    }

    /// Queue `took` values for the next searches.
    pub async fn script_took(&self, took: &[u64]) {
        self.state.lock().await.took.extend(took.iter().copied());
    }

    /// Make the search with this 0-based sequence number return HTTP 400.
    pub async fn fail_search_at(&self, n: usize) {
        self.state.lock().await.fail_search_at = Some(n);
    }

    /// Make every `PUT /{index}` answer `status` with `body`.
    pub async fn fail_create(&self, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap();
        self.state.lock().await.create_failure = Some((status, body));
    }

    /// Delay every search reply, leaving the request in flight.
    pub async fn delay_search(&self, delay: Duration) {
        self.state.lock().await.search_delay = Some(delay);
    }

    pub async fn hide_settings(&self) {
        self.state.lock().await.settings_unavailable = true;
    }

    /// Reject requests whose `Authorization` header differs from `header`.
    pub async fn require_auth(&self, header: &str) {
        self.state.lock().await.auth = Some(header.to_string());
    }

    pub async fn requests(&self) -> Vec<Recorded> {
        self.state.lock().await.requests.clone()
    }

    /// Number of requests with this method.
    pub async fn count(&self, method: &str) -> usize {
        self.state.lock().await.requests.iter().filter(|r| r.method == method).count()
    }

    /// Bodies of every search, in arrival order.
    pub async fn search_bodies(&self) -> Vec<Value> {
        self.state
            .lock()
            .await
            .requests
            .iter()
            .filter(|r| r.method == "POST")
            .filter_map(|r| r.body.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

fn error_body(status: StatusCode, kind: &str, reason: &str) -> Response {
    (status, Json(json!({"error": {"type": kind, "reason": reason}, "status": status.as_u16()})))
        .into_response()
}

/// Record the request and check credentials. `Err` carries the 401 reply.
fn admit(
    state: &mut ApiState,
    headers: &HeaderMap,
    method: &'static str,
    path: String,
    body: Option<Value>,
) -> Result<(), Response> {
    state.requests.push(Recorded { method, path, body });
    match &state.auth {
        Some(expected) => {
            let given = headers.get("authorization").and_then(|v| v.to_str().ok());
            if given == Some(expected.as_str()) {
                Ok(())
            } else {
                Err(error_body(StatusCode::UNAUTHORIZED, "security_exception", "missing authentication credentials"))
            }
        }
        None => Ok(()),
    }
}

fn parse_body(bytes: &Bytes) -> Option<Value> {
    serde_json::from_slice(bytes).ok()
}

async fn cluster_info(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().await;
    if let Err(reply) = admit(&mut state, &headers, "GET", "/".into(), None) {
        return reply;
    }
    Json(json!({
        "name": "fake-node-1",
        "cluster_name": "fake-cluster",
        "version": {"number": "8.11.1"},
        "tagline": "You Know, for Search"
    }))
    .into_response()
}

async fn index_exists(
    Path(index): Path<String>,
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().await;
    if let Err(reply) = admit(&mut state, &headers, "HEAD", format!("/{index}"), None) {
        return reply;
    }
    if state.indices.contains_key(&index) {
        StatusCode::OK.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn create_index(
    Path(index): Path<String>,
    State(state): State<Shared>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut state = state.lock().await;
    let body = parse_body(&body);
    if let Err(reply) = admit(&mut state, &headers, "PUT", format!("/{index}"), body.clone()) {
        return reply;
    }
    if let Some((status, reply)) = &state.create_failure {
        return (*status, Json(reply.clone())).into_response();
    }
    if state.indices.contains_key(&index) {
        return error_body(
            StatusCode::BAD_REQUEST,
            "resource_already_exists_exception",
            &format!("index [{index}/uuid] already exists"),
        );
    }

    let body = body.unwrap_or(Value::Null);
    let count = |key: &str| body.pointer(&format!("/settings/{key}")).and_then(Value::as_u64).unwrap_or(1) as u32;
    let layout = Layout { shards: count("number_of_shards"), replicas: count("number_of_replicas") };
    state.indices.insert(index.clone(), layout);
    state.mappings.insert(index.clone(), body.get("mappings").cloned().unwrap_or(Value::Null));

    Json(json!({"acknowledged": true, "shards_acknowledged": true, "index": index})).into_response()
}

async fn search(
    Path(index): Path<String>,
    State(state): State<Shared>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let delay = {
        let mut state = state.lock().await;
        if let Err(reply) = admit(&mut state, &headers, "POST", format!("/{index}/_search"), parse_body(&body)) {
            return reply;
        }
        state.search_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut state = state.lock().await;
    let n = state.searches;
    state.searches += 1;

    if state.fail_search_at == Some(n) {
        return error_body(StatusCode::BAD_REQUEST, "search_phase_execution_exception", "all shards failed");
    }
    if !state.indices.contains_key(&index) {
        return error_body(StatusCode::NOT_FOUND, "index_not_found_exception", &format!("no such index [{index}]"));
    }

    let took = state.took.pop_front().unwrap_or(1);
    Json(json!({
        "took": took,
        "timed_out": false,
        "_shards": {"total": 1, "successful": 1, "skipped": 0, "failed": 0},
        "hits": {"total": {"value": state.hits, "relation": "eq"}, "max_score": 1.0, "hits": []}
    }))
    .into_response()
}

async fn settings(
    Path(index): Path<String>,
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().await;
    if let Err(reply) = admit(&mut state, &headers, "GET", format!("/{index}/_settings"), None) {
        return reply;
    }
    if state.settings_unavailable {
        return error_body(StatusCode::FORBIDDEN, "security_exception", "action [indices:monitor/settings/get] is unauthorized");
    }
    let Some(layout) = state.indices.get(&index).copied() else {
        return error_body(StatusCode::NOT_FOUND, "index_not_found_exception", &format!("no such index [{index}]"));
    };

    let mut body = serde_json::Map::new();
    body.insert(
        index.clone(),
        json!({"settings": {"index": {
            "number_of_shards": layout.shards.to_string(),
            "number_of_replicas": layout.replicas.to_string(),
            "provided_name": index,
        }}}),
    );
    Json(Value::Object(body)).into_response()
}
