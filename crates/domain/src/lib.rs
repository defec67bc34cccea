//! Domain layer - Pure printer model with no external dependencies
//!
//! This crate contains:
//! - Value Objects (DeviceIdentifier, CommandBytes, SizeSetting)
//! - Print requests (plain text and receipt templates)
//! - Discovery and status results
//! - Seams implemented by infrastructure (Transport, TransportConnector, BondedDeviceSource,
//!   NetworkScanner)
//!
//! Principles:
//! - No I/O, no runtime
//! - Every failure is a `PrinterError` variant
//! - Testable in isolation

pub mod command;
pub mod device;
pub mod error;
pub mod identifier;
pub mod request;
pub mod status;
pub mod transport;

// Re-export commonly used types
pub use command::CommandBytes;
pub use device::{
    BondState, BondedDevice, BondedDeviceSource, ConnectionType, DiscoveredPrinter,
    NetworkScanner, ReachabilityState,
};
pub use error::{PrinterError, Result};
pub use identifier::DeviceIdentifier;
pub use request::{
    PrintRequest, ReceiptFormatting, ReceiptItem, ReceiptSection, ReceiptTemplate, SectionStyle,
    SizeSetting,
};
pub use status::{PaperState, PrinterState, PrinterStatus};
pub use transport::{Transport, TransportConnector, TransportKind, TransportState};
