//! # Task Manager API Client
//!
//! HTTP client for the control-plane task manager endpoints. Provides roster
//! listing, per-worker diagnostics, log retrieval, thread dumps, and metric
//! queries.
//!
//! Failure handling is a per-endpoint contract, not a global policy: the
//! roster degrades to an empty list, the detail record is suppressed to
//! `None`, and every other endpoint propagates its error to the caller.
//! Collapsing these into one handler would change what list and detail views
//! observe on a transient miss.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::RestApiConfig;
use crate::detail_cache::TaskManagerDetailCache;
use crate::error::{ClientError, ClientResult};
use crate::types::{
    LogContent, LogFileEntry, LogListResponse, Metric, TaskManagerDetail, TaskManagerList,
    TaskManagerSummary, ThreadDumpInfo,
};

/// HTTP client for task manager monitoring operations
///
/// Every method returns a future that performs no work until awaited;
/// awaiting issues exactly one GET request. Dropping the future cancels
/// delivery of the result but does not guarantee the in-flight request is
/// aborted.
pub struct TaskManagerClient {
    client: Client,
    base_url: Url,
    config: RestApiConfig,
    detail_cache: TaskManagerDetailCache,
}

impl std::fmt::Debug for TaskManagerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskManagerClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_ms", &self.config.timeout_ms)
            .finish()
    }
}

impl TaskManagerClient {
    /// Create a new client with the given configuration
    pub fn new(config: RestApiConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ClientError::config_error(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("taskmanager-client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ClientError::config_error(format!("Failed to create HTTP client: {}", e))
            })?;

        debug!(
            "Created TaskManagerClient for base_url: {}, timeout: {}ms",
            base_url, config.timeout_ms
        );

        Ok(Self {
            client,
            base_url,
            config,
            detail_cache: TaskManagerDetailCache::new(),
        })
    }

    /// Load the task manager roster
    ///
    /// Any failure degrades to an empty list so a roster view never blocks
    /// on a transient miss.
    pub async fn load_managers(&self) -> Vec<TaskManagerSummary> {
        match self.fetch_managers().await {
            Ok(list) => list.taskmanagers,
            Err(e) => {
                debug!("Task manager roster unavailable, degrading to empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Load the full diagnostic record for one task manager
    ///
    /// Any failure is suppressed to `None`; a detail view treats a miss the
    /// same as "nothing loaded yet". Callers that want the record shared
    /// should publish it into [`Self::detail_cache`] after a successful load.
    pub async fn load_manager(&self, taskmanager_id: &str) -> Option<TaskManagerDetail> {
        match self.fetch_manager(taskmanager_id).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                debug!(
                    "Detail for task manager {} unavailable, suppressing: {}",
                    taskmanager_id, e
                );
                None
            }
        }
    }

    /// List the log files available on one task manager
    pub async fn load_log_list(&self, taskmanager_id: &str) -> ClientResult<Vec<LogFileEntry>> {
        let url = self.endpoint(&format!("/taskmanagers/{}/logs", taskmanager_id))?;
        let response: LogListResponse = self.get_json(url).await?;
        Ok(response.logs)
    }

    /// Fetch one named log file as raw text
    ///
    /// Returns the text together with the exact URL it was fetched from. The
    /// request carries `Cache-Control: no-cache` so repeated calls always
    /// reach live server state.
    pub async fn load_log(&self, taskmanager_id: &str, log_name: &str) -> ClientResult<LogContent> {
        let url = self.endpoint(&format!(
            "/taskmanagers/{}/logs/{}",
            taskmanager_id, log_name
        ))?;
        let data = self.get_text_no_cache(url.clone()).await?;
        Ok(LogContent {
            data,
            url: url.to_string(),
        })
    }

    /// Fetch a thread dump for one task manager
    ///
    /// The per-thread stack traces are concatenated in server-provided order
    /// with no separator; the server-supplied strings already carry their own
    /// delimiters.
    pub async fn load_thread_dump(&self, taskmanager_id: &str) -> ClientResult<String> {
        let url = self.endpoint(&format!("/taskmanagers/{}/thread-dump", taskmanager_id))?;
        let dump: ThreadDumpInfo = self.get_json(url).await?;
        Ok(dump
            .thread_infos
            .into_iter()
            .map(|info| info.stringified_thread_info)
            .collect())
    }

    /// Fetch the full log file of one task manager as raw text
    pub async fn load_logs(&self, taskmanager_id: &str) -> ClientResult<String> {
        let url = self.endpoint(&format!("/taskmanagers/{}/log", taskmanager_id))?;
        self.get_text_no_cache(url).await
    }

    /// Fetch the captured standard output of one task manager as raw text
    pub async fn load_stdout(&self, taskmanager_id: &str) -> ClientResult<String> {
        let url = self.endpoint(&format!("/taskmanagers/{}/stdout", taskmanager_id))?;
        self.get_text_no_cache(url).await
    }

    /// Query metric values for one task manager
    ///
    /// The requested names are joined into one comma-separated `get` query
    /// parameter. Each response value is parsed as a base-10 integer and
    /// keyed by metric id; a requested name with no response entry is absent
    /// from the map, as is an entry whose value does not parse.
    pub async fn get_metrics(
        &self,
        taskmanager_id: &str,
        metric_names: &[&str],
    ) -> ClientResult<HashMap<String, i64>> {
        if metric_names.is_empty() {
            return Err(ClientError::InvalidInput(
                "at least one metric name is required".to_string(),
            ));
        }

        let mut url = self.endpoint(&format!("/taskmanagers/{}/metrics", taskmanager_id))?;
        url.query_pairs_mut()
            .append_pair("get", &metric_names.join(","));

        let samples: Vec<Metric> = self.get_json(url).await?;

        let mut result = HashMap::with_capacity(samples.len());
        for sample in samples {
            match sample.value.parse::<i64>() {
                Ok(value) => {
                    result.insert(sample.id, value);
                }
                Err(_) => {
                    debug!(
                        "Skipping non-numeric value for metric '{}': {}",
                        sample.id, sample.value
                    );
                }
            }
        }
        Ok(result)
    }

    /// The single-slot broadcast holding the most recently published detail
    /// record
    ///
    /// The client never publishes into it; population is the caller's job
    /// after a successful [`Self::load_manager`].
    pub fn detail_cache(&self) -> &TaskManagerDetailCache {
        &self.detail_cache
    }

    /// Get the base URL of the control-plane API
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Get the configured timeout in milliseconds
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }

    async fn fetch_managers(&self) -> ClientResult<TaskManagerList> {
        let url = self.endpoint("/taskmanagers")?;
        self.get_json(url).await
    }

    async fn fetch_manager(&self, taskmanager_id: &str) -> ClientResult<TaskManagerDetail> {
        let url = self.endpoint(&format!("/taskmanagers/{}", taskmanager_id))?;
        self.get_json(url).await
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::config_error(format!("Invalid URL path '{}': {}", path, e)))
    }

    async fn get_json<T>(&self, url: Url) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let response = Self::require_success(response).await?;
        Ok(response.json().await?)
    }

    async fn get_text_no_cache(&self, url: Url) -> ClientResult<String> {
        debug!("GET {} (no-cache)", url);
        let response = self
            .client
            .get(url)
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        let response = Self::require_success(response).await?;
        Ok(response.text().await?)
    }

    async fn require_success(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ClientError::api_error(status.as_u16(), message))
        }
    }
}
