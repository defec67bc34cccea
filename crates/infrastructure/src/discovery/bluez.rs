use async_trait::async_trait;
use bluer::{ErrorKind, Session};
use domain::{BondState, BondedDevice, BondedDeviceSource, PrinterError};
use tracing::{debug, warn};

/// Devices known to the local BlueZ daemon. No inquiry scan is started.
pub struct BluezBondedSource;

pub(crate) fn map_bluer_error(e: bluer::Error) -> PrinterError {
    match e.kind {
        ErrorKind::NotReady
        | ErrorKind::NotFound
        | ErrorKind::NotAvailable
        | ErrorKind::Internal(_) => PrinterError::AdapterUnavailable(e.to_string()),
        ErrorKind::NotAuthorized | ErrorKind::NotPermitted => {
            PrinterError::PermissionDenied(e.to_string())
        }
        _ => PrinterError::ConnectionFailed(e.to_string()),
    }
}

#[async_trait]
impl BondedDeviceSource for BluezBondedSource {
    async fn bonded_devices(&self) -> Result<Vec<BondedDevice>, PrinterError> {
        let session = Session::new().await.map_err(map_bluer_error)?;
        let adapter = session.default_adapter().await.map_err(map_bluer_error)?;

        if !adapter.is_powered().await.map_err(map_bluer_error)? {
            return Err(PrinterError::AdapterUnavailable(format!(
                "adapter {} is powered off",
                adapter.name()
            )));
        }

        let addresses = adapter.device_addresses().await.map_err(map_bluer_error)?;
        let mut devices = Vec::with_capacity(addresses.len());

        for address in addresses {
            let device = match adapter.device(address) {
                Ok(device) => device,
                Err(e) => {
                    warn!(address = %address, error = %e, "Skipping unreadable device");
                    continue;
                }
            };

            let name = device.name().await.ok().flatten();
            let bond_state = match device.is_paired().await {
                Ok(true) => BondState::Bonded,
                Ok(false) => BondState::NotBonded,
                Err(e) => {
                    debug!(address = %address, error = %e, "Pairing state unknown");
                    BondState::NotBonded
                }
            };

            devices.push(BondedDevice::new(
                address.to_string(),
                name.as_deref(),
                bond_state,
            ));
        }

        debug!(count = devices.len(), "BlueZ devices enumerated");
        Ok(devices)
    }
}
