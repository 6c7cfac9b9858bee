//! Application Layer
//!
//! The import and export stages and the service that runs them together.

pub mod exporter;
pub mod importer;
pub mod relay_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use exporter::Exporter;
pub use importer::Importer;
pub use relay_service::{RelayOptions, RelayService};
