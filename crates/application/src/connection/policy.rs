use domain::{DeviceIdentifier, TransportKind};

/// Transport kinds to try for an identifier, in order. First success wins.
///
/// A dotted-quad IPv4 address (leading zeros allowed) goes to the raw-print TCP port; any other
/// identifier is treated as a wireless hardware address.
pub fn transport_plan(identifier: &DeviceIdentifier) -> Vec<TransportKind> {
    if identifier.is_network_address() {
        vec![TransportKind::Network]
    } else {
        vec![TransportKind::Bluetooth]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DeviceIdentifier {
        DeviceIdentifier::new(s).unwrap()
    }

    #[test]
    fn test_ipv4_selects_network() {
        assert_eq!(transport_plan(&id("192.168.0.20")), vec![TransportKind::Network]);
    }

    #[test]
    fn test_leading_zero_quad_selects_network() {
        assert_eq!(
            transport_plan(&id("192.168.001.020")),
            vec![TransportKind::Network]
        );
    }

    #[test]
    fn test_hardware_address_selects_bluetooth() {
        assert_eq!(
            transport_plan(&id("66:22:B3:04:9F:10")),
            vec![TransportKind::Bluetooth]
        );
    }

    #[test]
    fn test_unrecognised_format_selects_bluetooth() {
        assert_eq!(transport_plan(&id("printer-7")), vec![TransportKind::Bluetooth]);
        assert_eq!(transport_plan(&id("10.0.0")), vec![TransportKind::Bluetooth]);
    }
}
