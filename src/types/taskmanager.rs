//! # Task Manager API Types
//!
//! Response payloads for the control-plane task manager endpoints. All types
//! are immutable snapshots of server state; field names follow the wire's
//! camelCase convention.

use serde::{Deserialize, Serialize};

// =============================================================================
// Roster Types
// =============================================================================

/// Response envelope for the task manager roster
///
/// The `taskmanagers` field is optional on the wire; an absent field reads as
/// an empty roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskManagerList {
    #[serde(default)]
    pub taskmanagers: Vec<TaskManagerSummary>,
}

/// One entry in the cluster's worker roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskManagerSummary {
    /// Worker identifier, unique within the cluster
    pub id: String,
    /// Actor path of the worker's endpoint
    pub path: String,
    /// Port used for data exchange, -1 when not yet bound
    pub data_port: i32,
    /// Milliseconds since the worker last reported in
    pub time_since_last_heartbeat: i64,
    /// Total processing slots on this worker
    pub slots_number: u32,
    /// Slots currently unoccupied
    pub free_slots: u32,
    pub hardware: HardwareDescription,
}

/// Hardware resources of one worker host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareDescription {
    pub cpu_cores: u32,
    /// Total physical memory in bytes
    pub physical_memory: i64,
    /// Memory available to the worker process in bytes
    pub free_memory: i64,
    /// Memory reserved for managed operations in bytes
    pub managed_memory: i64,
}

// =============================================================================
// Detail Types
// =============================================================================

/// Full diagnostic record for one worker
///
/// Shares the roster fields and adds the memory/garbage-collection metrics
/// block. This is also the value held by the detail broadcast cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskManagerDetail {
    pub id: String,
    pub path: String,
    pub data_port: i32,
    pub time_since_last_heartbeat: i64,
    pub slots_number: u32,
    pub free_slots: u32,
    pub hardware: HardwareDescription,
    pub metrics: TaskManagerMetrics,
}

/// Memory and garbage-collection statistics for one worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskManagerMetrics {
    pub heap_used: i64,
    pub heap_committed: i64,
    /// Maximum heap size in bytes, -1 when undefined
    pub heap_max: i64,
    pub non_heap_used: i64,
    pub non_heap_committed: i64,
    pub non_heap_max: i64,
    pub direct_count: i64,
    pub direct_used: i64,
    pub direct_max: i64,
    pub mapped_count: i64,
    pub mapped_used: i64,
    pub mapped_max: i64,
    pub memory_segments_available: i64,
    pub memory_segments_total: i64,
    #[serde(default)]
    pub garbage_collectors: Vec<GarbageCollectorInfo>,
}

/// Accumulated activity of one garbage collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarbageCollectorInfo {
    pub name: String,
    /// Total number of collections performed
    pub count: i64,
    /// Total collection time in milliseconds
    pub time: i64,
}

// =============================================================================
// Log Types
// =============================================================================

/// Response envelope for a worker's log file listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogListResponse {
    pub logs: Vec<LogFileEntry>,
}

/// Metadata for one log file available on a worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogFileEntry {
    pub name: String,
    /// File size in bytes
    pub size: i64,
}

/// Raw log text together with the exact URL it was fetched from
///
/// The URL lets callers offer a direct download link for the same content.
#[derive(Debug, Clone, PartialEq)]
pub struct LogContent {
    pub data: String,
    pub url: String,
}

// =============================================================================
// Thread Dump Types
// =============================================================================

/// Response envelope for a worker's thread dump
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadDumpInfo {
    pub thread_infos: Vec<ThreadInfo>,
}

/// Stack trace of one live thread
///
/// `stringified_thread_info` is pre-formatted by the server and carries its
/// own trailing delimiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadInfo {
    pub thread_name: String,
    pub stringified_thread_info: String,
}

// =============================================================================
// Metric Types
// =============================================================================

/// Raw metric sample from the metrics endpoint
///
/// Values arrive as strings and are parsed into integers by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: String,
    pub value: String,
}
