//! Port definitions (interfaces for adapters)

mod transport_port;

#[cfg(test)]
pub use transport_port::MockTransportPort;
pub use transport_port::{CredentialsMode, HttpMethod, TransportPort, TransportRequest};
