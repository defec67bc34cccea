//! Application layer - Printer use cases
//!
//! Command encoding, connection registry, discovery, and status probing,
//! composed behind [`PrinterService`].

pub mod connection;
pub mod discovery;
pub mod printer;
pub mod service;
pub mod status;

pub use connection::ConnectionRegistry;
pub use discovery::Discovery;
pub use service::PrinterService;
pub use status::StatusProbe;
