#[cfg(feature = "bluetooth")]
pub mod bluetooth;
pub mod mock;
pub mod network;

#[cfg(feature = "bluetooth")]
pub use bluetooth::BluetoothConnector;
pub use mock::{MockConnector, MockHandle, MockTransport};
pub use network::{NetworkConnector, NetworkTransport};

use std::sync::Arc;

use domain::TransportConnector;
use tracing::info;

use crate::config::PrinterSettings;

/// Factory for the connectors available in this build
pub struct TransportFactory;

impl TransportFactory {
    /// One connector per supported transport kind. Without the `bluetooth`
    /// feature only the network connector is returned.
    pub fn connectors(settings: &PrinterSettings) -> Vec<Arc<dyn TransportConnector>> {
        #[cfg_attr(not(feature = "bluetooth"), allow(unused_mut))]
        let mut connectors: Vec<Arc<dyn TransportConnector>> =
            vec![Arc::new(NetworkConnector::new(&settings.network))];

        #[cfg(feature = "bluetooth")]
        connectors.push(Arc::new(BluetoothConnector::new(&settings.bluetooth)));

        info!(
            kinds = ?connectors.iter().map(|c| c.kind()).collect::<Vec<_>>(),
            "Transport connectors ready"
        );
        connectors
    }
}
