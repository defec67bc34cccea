use serde::{Deserialize, Serialize};

/// Concrete kind of a transport. Exactly one per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// RFCOMM socket to a serial-port-profile service
    Bluetooth,
    /// Raw TCP socket on the printer's raw-print port
    Network,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bluetooth => "bluetooth",
            Self::Network => "network",
        }
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_kind_as_str() {
        assert_eq!(TransportKind::Bluetooth.as_str(), "bluetooth");
        assert_eq!(TransportKind::Network.as_str(), "network");
        assert_eq!(format!("{}", TransportKind::Network), "network");
    }
}
