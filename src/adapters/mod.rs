//! Adapters Layer
//!
//! Inbound adapters produce records (sources), outbound adapters deliver
//! them (destinations).

pub mod inbound;
pub mod outbound;

use crate::config::EndpointSpec;
use crate::domain::ports::{Destination, Source};
use inbound::{FileSource, SocketSource};
use outbound::{FileDestination, SocketDestination};

/// Build the source adapter for a configured endpoint.
pub fn build_source(spec: &EndpointSpec) -> Box<dyn Source> {
    match spec {
        EndpointSpec::File(path) => Box::new(FileSource::new(path)),
        EndpointSpec::Socket(address) => Box::new(SocketSource::new(address)),
    }
}

/// Build the destination adapter for a configured endpoint.
pub fn build_destination(spec: &EndpointSpec, append_newline: bool) -> Box<dyn Destination> {
    match spec {
        EndpointSpec::File(path) => Box::new(FileDestination::new(path, append_newline)),
        EndpointSpec::Socket(address) => Box::new(SocketDestination::new(address)),
    }
}
