mod entity;
mod source;

pub use entity::{ConnectionType, DiscoveredPrinter, ReachabilityState};
pub use source::{BondState, BondedDevice, BondedDeviceSource, NetworkScanner};
