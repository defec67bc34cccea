//! Infrastructure layer - Transports, discovery sources and configuration

pub mod config;
pub mod discovery;
pub mod transport;

pub use config::PrinterSettings;
pub use discovery::{TcpScanner, UnavailableAdapter, bonded_source};
pub use transport::{MockConnector, MockHandle, MockTransport, NetworkConnector, TransportFactory};
