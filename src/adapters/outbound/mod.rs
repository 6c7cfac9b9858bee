mod file_destination;
mod socket_destination;

pub use file_destination::FileDestination;
pub use socket_destination::SocketDestination;
