use std::sync::Arc;

use tracing::{info, warn};

use domain::{
    DeviceIdentifier, DiscoveredPrinter, PrintRequest, PrinterStatus, Result, TransportKind,
};

use crate::connection::ConnectionRegistry;
use crate::discovery::Discovery;
use crate::printer::encode;
use crate::status::StatusProbe;

/// Operations exposed to the host bridge
///
/// Each call is independent and may run concurrently with any other;
/// calls for the same identifier are serialized by the registry.
pub struct PrinterService {
    registry: Arc<ConnectionRegistry>,
    discovery: Discovery,
    probe: StatusProbe,
}

impl PrinterService {
    pub fn new(registry: Arc<ConnectionRegistry>, discovery: Discovery) -> Self {
        let probe = StatusProbe::new(registry.clone());
        Self {
            registry,
            discovery,
            probe,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub async fn discover(&self) -> Result<Vec<DiscoveredPrinter>> {
        self.discovery.discover().await
    }

    pub async fn discover_network(&self, range: Option<&str>) -> Result<Vec<DiscoveredPrinter>> {
        self.discovery.discover_network(range).await
    }

    pub async fn discover_all(&self, range: Option<&str>) -> Vec<DiscoveredPrinter> {
        self.discovery.discover_all(range).await
    }

    pub async fn connect(&self, identifier: &str) -> Result<TransportKind> {
        let identifier = DeviceIdentifier::new(identifier)?;
        self.registry.connect(&identifier).await
    }

    pub async fn disconnect(&self, identifier: &str) -> Result<()> {
        let identifier = DeviceIdentifier::new(identifier)?;
        self.registry.disconnect(&identifier).await
    }

    /// Encode then send. Encoding is pure, so nothing is written for a bad request.
    pub async fn print(&self, identifier: &str, request: &PrintRequest) -> Result<()> {
        let identifier = DeviceIdentifier::new(identifier)?;
        let bytes = encode(request);

        match self.registry.send(&identifier, &bytes).await {
            Ok(()) => {
                info!(identifier = %identifier, bytes = bytes.len(), "🖨️ Print job sent");
                Ok(())
            }
            Err(e) => {
                warn!(identifier = %identifier, error = %e, kind = e.kind(), "❌ Print failed");
                Err(e)
            }
        }
    }

    pub async fn status(&self, identifier: &str) -> PrinterStatus {
        match DeviceIdentifier::new(identifier) {
            Ok(identifier) => self.probe.status(&identifier).await,
            Err(_) => PrinterStatus::offline(),
        }
    }

    /// Close every open transport
    pub async fn shutdown(&self) {
        let closed = self.registry.close_all().await;
        info!(closed, "Printer service stopped");
    }
}
