//! Infrastructure Layer
//!
//! Cross-cutting concerns and infrastructure components.

pub mod metrics;
pub mod shutdown;

pub use metrics::{MetricsSnapshot, RelayMetrics};
pub use shutdown::{shutdown_signal, ShutdownController, TaskGuard};
