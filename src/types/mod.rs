//! Wire and domain types for the control-plane task manager endpoints.

pub mod taskmanager;

pub use taskmanager::{
    GarbageCollectorInfo, HardwareDescription, LogContent, LogFileEntry, LogListResponse, Metric,
    TaskManagerDetail, TaskManagerList, TaskManagerMetrics, TaskManagerSummary, ThreadDumpInfo,
    ThreadInfo,
};
