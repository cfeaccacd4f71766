//! # Task Manager Client Library
//!
//! Client library for retrieving monitoring and diagnostic data about task
//! managers (worker processes in a distributed data-processing cluster) from
//! the cluster's REST control plane.
//!
//! Each read operation is a lazy asynchronous producer: calling it returns a
//! future that performs no work until awaited, and awaiting it issues exactly
//! one GET request and yields at most one terminal result. Endpoints differ
//! deliberately in how they treat failure:
//!
//! - the roster list degrades to an empty list,
//! - the per-worker detail record is silently suppressed to `None`,
//! - log, stdout, thread-dump, and metric requests surface errors to the
//!   caller unmodified.
//!
//! The most recently viewed detail record is additionally available through
//! [`TaskManagerDetailCache`], a single-slot broadcast that replays its last
//! published value to every new subscriber.

pub mod api_clients;
pub mod config;
pub mod detail_cache;
pub mod error;
pub mod types;

// Re-export commonly used types for convenience
pub use api_clients::TaskManagerClient;
pub use config::{ClientConfig, RestApiConfig};
pub use detail_cache::TaskManagerDetailCache;
pub use error::{ClientError, ClientResult};
