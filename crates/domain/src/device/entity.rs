use crate::identifier::DeviceIdentifier;
use serde::{Deserialize, Serialize};

/// Coarse reachability reported by discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReachabilityState {
    Ready,
    Offline,
}

impl ReachabilityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Offline => "offline",
        }
    }
}

/// How a discovered printer is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Bluetooth,
    Wifi,
}

impl ConnectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bluetooth => "bluetooth",
            Self::Wifi => "wifi",
        }
    }
}

/// A printer candidate produced fresh by each discovery call. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredPrinter {
    pub identifier: DeviceIdentifier,
    pub name: String,
    pub state: ReachabilityState,
    pub connection_type: ConnectionType,
}

impl DiscoveredPrinter {
    pub fn new(
        identifier: DeviceIdentifier,
        name: impl Into<String>,
        state: ReachabilityState,
        connection_type: ConnectionType,
    ) -> Self {
        Self {
            identifier,
            name: name.into(),
            state,
            connection_type,
        }
    }
}
