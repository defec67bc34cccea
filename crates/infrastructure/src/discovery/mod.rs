#[cfg(feature = "bluetooth")]
pub mod bluez;
pub mod scanner;

#[cfg(feature = "bluetooth")]
pub use bluez::BluezBondedSource;
pub use scanner::{TcpScanner, parse_range};

use std::sync::Arc;

use async_trait::async_trait;
use domain::{BondedDevice, BondedDeviceSource, PrinterError};

/// Source used when this build has no wireless stack
pub struct UnavailableAdapter;

#[async_trait]
impl BondedDeviceSource for UnavailableAdapter {
    async fn bonded_devices(&self) -> Result<Vec<BondedDevice>, PrinterError> {
        Err(PrinterError::AdapterUnavailable(
            "built without Bluetooth support".to_string(),
        ))
    }
}

/// Bonded-device source for this build
pub fn bonded_source() -> Arc<dyn BondedDeviceSource> {
    #[cfg(feature = "bluetooth")]
    {
        Arc::new(BluezBondedSource)
    }
    #[cfg(not(feature = "bluetooth"))]
    {
        Arc::new(UnavailableAdapter)
    }
}
