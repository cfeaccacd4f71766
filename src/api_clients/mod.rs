//! API Client Modules
//!
//! HTTP clients for the cluster's REST control plane, currently the task
//! manager monitoring and diagnostics endpoints.

pub mod task_manager_client;

pub use task_manager_client::TaskManagerClient;
