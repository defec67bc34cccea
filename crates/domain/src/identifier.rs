use crate::error::{PrinterError, Result};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Value object identifying a printer
///
/// Either a wireless hardware address (`00:11:22:AA:BB:CC`) or a dotted-quad
/// IPv4 address. Opaque otherwise: it is the only key the registry uses.
///
/// Rules:
/// - Must be non-empty
/// - Kept verbatim: surrounding whitespace is rejected, never trimmed
/// - Max length 64 characters
/// - No whitespace or control characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceIdentifier(String);

impl DeviceIdentifier {
    /// Create a new DeviceIdentifier with validation
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();

        if id.is_empty() {
            return Err(PrinterError::InvalidIdentifier(
                "Identifier cannot be empty".to_string(),
            ));
        }

        if id.len() > 64 {
            return Err(PrinterError::InvalidIdentifier(format!(
                "Identifier too long: {} chars (max 64)",
                id.len()
            )));
        }

        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(PrinterError::InvalidIdentifier(format!(
                "Identifier {id:?} must not contain whitespace or control characters"
            )));
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The IPv4 address this identifier names, if it is a dotted quad.
    ///
    /// Four runs of decimal digits separated by dots; leading zeros are
    /// accepted (`192.168.001.020`), octets above 255 are not.
    pub fn as_ipv4(&self) -> Option<Ipv4Addr> {
        let mut octets = [0u8; 4];
        let mut parts = self.0.split('.');

        for octet in octets.iter_mut() {
            let part = parts.next()?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            *octet = part.parse().ok()?;
        }

        match parts.next() {
            Some(_) => None,
            None => Some(Ipv4Addr::from(octets)),
        }
    }

    pub fn is_network_address(&self) -> bool {
        self.as_ipv4().is_some()
    }
}

impl std::fmt::Display for DeviceIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DeviceIdentifier {
    type Error = PrinterError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DeviceIdentifier {
    type Error = PrinterError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DeviceIdentifier> for String {
    fn from(id: DeviceIdentifier) -> Self {
        id.0
    }
}
