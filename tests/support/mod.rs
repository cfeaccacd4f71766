//! Common test infrastructure: an in-process control-plane stub serving
//! canned task manager responses, with request capture for asserting on
//! headers and query strings.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use taskmanager_client::types::{
    GarbageCollectorInfo, HardwareDescription, LogFileEntry, LogListResponse, Metric,
    TaskManagerDetail, TaskManagerList, TaskManagerMetrics, TaskManagerSummary, ThreadDumpInfo,
    ThreadInfo,
};
use taskmanager_client::{RestApiConfig, TaskManagerClient};

/// Record of one request seen by the stub server
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub cache_control: Option<String>,
    pub query: HashMap<String, String>,
}

/// Shared request log, cloned into every handler
#[derive(Clone, Default)]
pub struct Captured {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl Captured {
    fn record(&self, path: impl Into<String>, headers: &HeaderMap, query: HashMap<String, String>) {
        let cache_control = headers
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        self.requests
            .lock()
            .expect("request log poisoned")
            .push(CapturedRequest {
                path: path.into(),
                cache_control,
                query,
            });
    }

    /// Most recent captured request for the given path
    pub fn find(&self, path: &str) -> Option<CapturedRequest> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .iter()
            .rev()
            .find(|request| request.path == path)
            .cloned()
    }
}

/// Test server instance that manages a running stub for the duration of a test
pub struct TestServer {
    pub base_url: String,
    handle: JoinHandle<()>,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl TestServer {
    /// Start the given app on a dynamically allocated local port
    pub async fn start(app: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read listener addr");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Test server failed");
        });

        TestServer {
            base_url: format!("http://{}", addr),
            handle,
            shutdown_tx,
        }
    }

    /// Create a client pointed at this server
    pub fn client(&self) -> TaskManagerClient {
        TaskManagerClient::new(RestApiConfig {
            base_url: self.base_url.clone(),
            timeout_ms: 5000,
        })
        .expect("Failed to create test client")
    }

    /// Shutdown the test server
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

/// A base URL nothing is listening on
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind throwaway listener");
    let addr = listener.local_addr().expect("Failed to read listener addr");
    drop(listener);
    format!("http://{}", addr)
}

/// Stub control plane with canned responses for every endpoint
///
/// Behavior varies by worker id where tests need it: `tm-missing` yields 404
/// on the detail endpoint, `tm-partial` answers only one of two requested
/// metrics, `tm-nan` answers one metric with a non-numeric value.
pub fn control_plane_app(captured: Captured) -> Router {
    Router::new()
        .route("/taskmanagers", get(list_managers))
        .route("/taskmanagers/{id}", get(get_manager))
        .route("/taskmanagers/{id}/logs", get(list_logs))
        .route("/taskmanagers/{id}/logs/{log_name}", get(get_named_log))
        .route("/taskmanagers/{id}/thread-dump", get(get_thread_dump))
        .route("/taskmanagers/{id}/log", get(get_log))
        .route("/taskmanagers/{id}/stdout", get(get_stdout))
        .route("/taskmanagers/{id}/metrics", get(get_metrics))
        .with_state(captured)
}

/// Stub where every route answers 500
pub fn failing_app() -> Router {
    Router::new().fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") })
}

/// Stub whose roster response carries no `taskmanagers` field
pub fn empty_envelope_app() -> Router {
    Router::new().route(
        "/taskmanagers",
        get(|| async { Json(serde_json::json!({})) }),
    )
}

pub fn sample_summary(id: &str) -> TaskManagerSummary {
    TaskManagerSummary {
        id: id.to_string(),
        path: format!("pekko.tcp://cluster@host:6122/user/{}", id),
        data_port: 6121,
        time_since_last_heartbeat: 750,
        slots_number: 4,
        free_slots: 2,
        hardware: sample_hardware(),
    }
}

pub fn sample_detail(id: &str) -> TaskManagerDetail {
    TaskManagerDetail {
        id: id.to_string(),
        path: format!("pekko.tcp://cluster@host:6122/user/{}", id),
        data_port: 6121,
        time_since_last_heartbeat: 750,
        slots_number: 4,
        free_slots: 2,
        hardware: sample_hardware(),
        metrics: TaskManagerMetrics {
            heap_used: 104_857_600,
            heap_committed: 209_715_200,
            heap_max: 419_430_400,
            non_heap_used: 52_428_800,
            non_heap_committed: 62_914_560,
            non_heap_max: -1,
            direct_count: 16,
            direct_used: 8_388_608,
            direct_max: 8_388_608,
            mapped_count: 0,
            mapped_used: 0,
            mapped_max: 0,
            memory_segments_available: 128,
            memory_segments_total: 256,
            garbage_collectors: vec![GarbageCollectorInfo {
                name: "G1 Young Generation".to_string(),
                count: 12,
                time: 340,
            }],
        },
    }
}

fn sample_hardware() -> HardwareDescription {
    HardwareDescription {
        cpu_cores: 8,
        physical_memory: 16_000_000_000,
        free_memory: 4_000_000_000,
        managed_memory: 2_000_000_000,
    }
}

async fn list_managers(
    State(captured): State<Captured>,
    headers: HeaderMap,
) -> Json<TaskManagerList> {
    captured.record("/taskmanagers", &headers, HashMap::new());
    Json(TaskManagerList {
        taskmanagers: vec![sample_summary("tm-1"), sample_summary("tm-2")],
    })
}

async fn get_manager(
    State(captured): State<Captured>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    captured.record(format!("/taskmanagers/{}", id), &headers, HashMap::new());
    if id == "tm-missing" {
        (StatusCode::NOT_FOUND, "task manager not found").into_response()
    } else {
        Json(sample_detail(&id)).into_response()
    }
}

async fn list_logs(
    State(captured): State<Captured>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Json<LogListResponse> {
    captured.record(format!("/taskmanagers/{}/logs", id), &headers, HashMap::new());
    Json(LogListResponse {
        logs: vec![
            LogFileEntry {
                name: "taskmanager.log".to_string(),
                size: 3_145_728,
            },
            LogFileEntry {
                name: "taskmanager.out".to_string(),
                size: 1_024,
            },
        ],
    })
}

async fn get_named_log(
    State(captured): State<Captured>,
    Path((id, log_name)): Path<(String, String)>,
    headers: HeaderMap,
) -> String {
    captured.record(
        format!("/taskmanagers/{}/logs/{}", id, log_name),
        &headers,
        HashMap::new(),
    );
    format!("contents of {} on {}\n", log_name, id)
}

async fn get_thread_dump(
    State(captured): State<Captured>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Json<ThreadDumpInfo> {
    captured.record(
        format!("/taskmanagers/{}/thread-dump", id),
        &headers,
        HashMap::new(),
    );
    Json(ThreadDumpInfo {
        thread_infos: vec![
            ThreadInfo {
                thread_name: "Thread-1".to_string(),
                stringified_thread_info: "T1\n".to_string(),
            },
            ThreadInfo {
                thread_name: "Thread-2".to_string(),
                stringified_thread_info: "T2\n".to_string(),
            },
        ],
    })
}

async fn get_log(
    State(captured): State<Captured>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> String {
    captured.record(format!("/taskmanagers/{}/log", id), &headers, HashMap::new());
    "full log text\n".to_string()
}

async fn get_stdout(
    State(captured): State<Captured>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> String {
    captured.record(
        format!("/taskmanagers/{}/stdout", id),
        &headers,
        HashMap::new(),
    );
    "stdout text\n".to_string()
}

async fn get_metrics(
    State(captured): State<Captured>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Vec<Metric>> {
    captured.record(format!("/taskmanagers/{}/metrics", id), &headers, query);

    let metric = |metric_id: &str, value: &str| Metric {
        id: metric_id.to_string(),
        value: value.to_string(),
    };

    // Arbitrary response order on purpose: the client keys by id.
    let samples = match id.as_str() {
        "tm-partial" => vec![metric("a", "3")],
        "tm-nan" => vec![metric("b", "not-a-number"), metric("a", "3")],
        _ => vec![metric("b", "7"), metric("a", "3")],
    };
    Json(samples)
}
