//! Server module for building the book order HTTP server
//!
//! `ServerBuilder` wires a record store and configuration into a
//! `ServerHost`, and the REST exposure turns the host into a router.

pub mod builder;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use host::ServerHost;
