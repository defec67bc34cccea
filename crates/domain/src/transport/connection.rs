use async_trait::async_trait;

use super::kind::TransportKind;
use super::state::TransportState;
use crate::error::PrinterError;
use crate::identifier::DeviceIdentifier;

/// An open duplex byte channel to one printer.
///
/// Instances are produced already open by a [`TransportConnector`] and are
/// exclusively owned by at most one registry entry.
#[async_trait]
pub trait Transport: Send + Sync {
    fn kind(&self) -> TransportKind;

    fn state(&self) -> TransportState;

    /// Write the whole payload then flush. All-or-nothing from the caller's view.
    async fn write_and_flush(&mut self, bytes: &[u8]) -> Result<(), PrinterError>;

    /// Release the channel. Terminal; calling it twice is harmless.
    async fn close(&mut self) -> Result<(), PrinterError>;
}

/// Opens transports of a single kind
#[async_trait]
pub trait TransportConnector: Send + Sync {
    fn kind(&self) -> TransportKind;

    /// Attempt to establish a channel to the printer
    async fn open(&self, identifier: &DeviceIdentifier) -> Result<Box<dyn Transport>, PrinterError>;
}
