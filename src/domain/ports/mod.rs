mod destination;
mod source;

pub use destination::Destination;
pub use source::Source;
