use std::sync::Arc;

use tracing::{debug, warn};

use domain::{DeviceIdentifier, PrinterError, PrinterStatus};

use crate::connection::ConnectionRegistry;
use crate::printer::encode_status_probe;

/// Reports coarse printer status by writing the status inquiry.
///
/// The printer's reply is not read: a successful write is reported as ready.
pub struct StatusProbe {
    registry: Arc<ConnectionRegistry>,
}

impl StatusProbe {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn status(&self, identifier: &DeviceIdentifier) -> PrinterStatus {
        match self.registry.send(identifier, &encode_status_probe()).await {
            Ok(()) => PrinterStatus::ready(),
            Err(PrinterError::NotConnected) => {
                debug!(identifier = %identifier, "Status requested for unconnected printer");
                PrinterStatus::offline()
            }
            Err(e) => {
                warn!(identifier = %identifier, error = %e, "Status inquiry failed");
                PrinterStatus::write_error()
            }
        }
    }
}
