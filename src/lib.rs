//! line-relay Library
//!
//! Line-oriented relay: records read from files and sockets are funnelled
//! through one bounded queue and copied to every configured destination.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::inbound::{FileSource, SocketSource};
pub use adapters::outbound::{FileDestination, SocketDestination};
pub use adapters::{build_destination, build_source};
pub use application::{Exporter, Importer, RelayOptions, RelayService};
pub use config::{load_config, Config, EndpointSpec};
pub use domain::entities::{EndpointState, Record};
pub use domain::error::RelayError;
pub use domain::ports::{Destination, Source};
pub use domain::value_objects::{Address, TransportKind};
pub use infrastructure::{MetricsSnapshot, RelayMetrics, ShutdownController};
