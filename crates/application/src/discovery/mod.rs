use std::sync::Arc;

use tracing::{debug, info, warn};

use domain::{
    BondState, BondedDevice, BondedDeviceSource, ConnectionType, DeviceIdentifier,
    DiscoveredPrinter, NetworkScanner, PrinterError, ReachabilityState, Result,
};

/// Lower-case name fragments that mark a bonded device as a printer
pub const PRINTER_NAME_KEYWORDS: [&str; 3] = ["zywell", "zyprint", "printer"];

/// Case-insensitive keyword match on a device name
pub fn is_printer_name(name: &str) -> bool {
    let name = name.to_lowercase();
    PRINTER_NAME_KEYWORDS
        .iter()
        .any(|keyword| name.contains(keyword))
}

/// Finds candidate printers without connecting to them
pub struct Discovery {
    bonded: Arc<dyn BondedDeviceSource>,
    scanner: Option<Arc<dyn NetworkScanner>>,
}

impl Discovery {
    pub fn new(bonded: Arc<dyn BondedDeviceSource>) -> Self {
        Self {
            bonded,
            scanner: None,
        }
    }

    pub fn with_scanner(mut self, scanner: Arc<dyn NetworkScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// Bonded wireless devices whose name looks like a printer.
    ///
    /// A missing or disabled adapter yields an empty list; any other host
    /// failure (e.g. permission denial) is returned.
    pub async fn discover(&self) -> Result<Vec<DiscoveredPrinter>> {
        let devices = match self.bonded.bonded_devices().await {
            Ok(devices) => devices,
            Err(PrinterError::AdapterUnavailable(reason)) => {
                info!(reason = %reason, "Wireless adapter unavailable, no printers discovered");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(error = %e, "Wireless discovery failed");
                return Err(e);
            }
        };

        let total = devices.len();
        let printers: Vec<DiscoveredPrinter> =
            devices.into_iter().filter_map(to_discovered).collect();

        info!(bonded = total, printers = printers.len(), "🔍 Wireless discovery complete");
        Ok(printers)
    }

    /// Hosts on `range` answering on the raw-print port. No range, nothing to scan.
    pub async fn discover_network(&self, range: Option<&str>) -> Result<Vec<DiscoveredPrinter>> {
        let (Some(range), Some(scanner)) = (range, self.scanner.as_ref()) else {
            debug!("Network scan skipped");
            return Ok(Vec::new());
        };

        let hosts = scanner.scan(range).await?;
        let printers: Vec<DiscoveredPrinter> = hosts
            .into_iter()
            .filter_map(|ip| {
                let identifier = DeviceIdentifier::new(ip.to_string()).ok()?;
                Some(DiscoveredPrinter::new(
                    identifier,
                    format!("Network Printer ({ip})"),
                    ReachabilityState::Ready,
                    ConnectionType::Wifi,
                ))
            })
            .collect();

        info!(range = %range, printers = printers.len(), "🔍 Network scan complete");
        Ok(printers)
    }

    /// Wireless and network results together. A failing side contributes nothing.
    pub async fn discover_all(&self, range: Option<&str>) -> Vec<DiscoveredPrinter> {
        let (wireless, network) = tokio::join!(self.discover(), self.discover_network(range));

        let mut printers = wireless.unwrap_or_else(|e| {
            warn!(error = %e, "Skipping wireless results");
            Vec::new()
        });
        printers.extend(network.unwrap_or_else(|e| {
            warn!(error = %e, "Skipping network results");
            Vec::new()
        }));
        printers
    }
}

fn to_discovered(device: BondedDevice) -> Option<DiscoveredPrinter> {
    let name = device.name.as_deref().filter(|name| is_printer_name(name))?;

    let identifier = match DeviceIdentifier::new(device.address.as_str()) {
        Ok(identifier) => identifier,
        Err(e) => {
            warn!(address = %device.address, error = %e, "Ignoring device with unusable address");
            return None;
        }
    };

    let state = match device.bond_state {
        BondState::Bonded => ReachabilityState::Ready,
        BondState::Bonding | BondState::NotBonded => ReachabilityState::Offline,
    };

    Some(DiscoveredPrinter::new(
        identifier,
        name,
        state,
        ConnectionType::Bluetooth,
    ))
}
