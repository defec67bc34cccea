use crate::error::PrinterError;
use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Bonding state as reported by the host wireless stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondState {
    Bonded,
    Bonding,
    NotBonded,
}

/// A device already known to the host wireless stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondedDevice {
    pub address: String,
    pub name: Option<String>,
    pub bond_state: BondState,
}

impl BondedDevice {
    pub fn new(address: impl Into<String>, name: Option<&str>, bond_state: BondState) -> Self {
        Self {
            address: address.into(),
            name: name.map(str::to_string),
            bond_state,
        }
    }
}

/// Enumerates devices the host wireless stack already knows. No active scan.
///
/// Implementations return `PrinterError::AdapterUnavailable` when the adapter is
/// missing or powered off, and `PrinterError::PermissionDenied` when the host
/// refuses access.
#[async_trait]
pub trait BondedDeviceSource: Send + Sync {
    async fn bonded_devices(&self) -> Result<Vec<BondedDevice>, PrinterError>;
}

/// Finds hosts on a local IPv4 range that answer on the raw-print port
#[async_trait]
pub trait NetworkScanner: Send + Sync {
    async fn scan(&self, range: &str) -> Result<Vec<Ipv4Addr>, PrinterError>;
}
