//! Domain Layer
//!
//! Records, endpoint state, address resolution and the ports that
//! adapters implement.

pub mod entities;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use entities::{EndpointState, Record};
pub use error::RelayError;
pub use value_objects::{Address, TransportKind};
