use std::io::ErrorKind;
use std::net::SocketAddrV4;
use std::time::Duration;

use async_trait::async_trait;
use domain::{
    DeviceIdentifier, PrinterError, Transport, TransportConnector, TransportKind, TransportState,
};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, error, info};

use crate::config::NetworkSettings;

/// Opens raw TCP connections to the printer's raw-print port
pub struct NetworkConnector {
    port: u16,
    connect_timeout: Duration,
    write_timeout: Duration,
}

impl NetworkConnector {
    pub fn new(settings: &NetworkSettings) -> Self {
        Self {
            port: settings.port,
            connect_timeout: settings.connect_timeout(),
            write_timeout: settings.write_timeout(),
        }
    }
}

#[async_trait]
impl TransportConnector for NetworkConnector {
    fn kind(&self) -> TransportKind {
        TransportKind::Network
    }

    async fn open(&self, identifier: &DeviceIdentifier) -> Result<Box<dyn Transport>, PrinterError> {
        let ip = identifier.as_ipv4().ok_or_else(|| {
            PrinterError::ConnectionFailed(format!("{identifier} is not an IPv4 address"))
        })?;
        let address = SocketAddrV4::new(ip, self.port);

        info!("Connecting to printer at {}", address);
        match tokio::time::timeout(self.connect_timeout, TcpStream::connect(address)).await {
            Ok(Ok(stream)) => {
                if let Err(e) = stream.set_nodelay(true) {
                    debug!(peer = %address, error = %e, "Could not disable Nagle");
                }
                info!("Connected to printer at {}", address);
                Ok(Box::new(NetworkTransport {
                    address,
                    stream: Some(stream),
                    state: TransportState::Open,
                    write_timeout: self.write_timeout,
                }))
            }
            Ok(Err(e)) if e.kind() == ErrorKind::PermissionDenied => {
                Err(PrinterError::PermissionDenied(e.to_string()))
            }
            Ok(Err(e)) => Err(PrinterError::ConnectionFailed(e.to_string())),
            Err(_) => Err(PrinterError::ConnectionFailed(format!(
                "Connection to {} timed out",
                address
            ))),
        }
    }
}

/// Open TCP stream to a network printer
pub struct NetworkTransport {
    address: SocketAddrV4,
    stream: Option<TcpStream>,
    state: TransportState,
    write_timeout: Duration,
}

#[async_trait]
impl Transport for NetworkTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Network
    }

    fn state(&self) -> TransportState {
        self.state
    }

    async fn write_and_flush(&mut self, bytes: &[u8]) -> Result<(), PrinterError> {
        let stream = match (&mut self.stream, self.state.can_write()) {
            (Some(stream), true) => stream,
            _ => return Err(PrinterError::WriteFailed("transport is closed".to_string())),
        };

        let write = async {
            stream.write_all(bytes).await?;
            stream.flush().await
        };

        match tokio::time::timeout(self.write_timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                error!("Failed to write to printer {}: {}", self.address, e);
                Err(PrinterError::WriteFailed(e.to_string()))
            }
            Err(_) => {
                error!("Write to printer {} timed out", self.address);
                Err(PrinterError::WriteFailed("write timed out".to_string()))
            }
        }
    }

    async fn close(&mut self) -> Result<(), PrinterError> {
        self.state = self.state.to_closed();
        if let Some(mut stream) = self.stream.take() {
            debug!("Closing connection to {}", self.address);
            stream
                .shutdown()
                .await
                .map_err(|e| PrinterError::ConnectionFailed(e.to_string()))?;
        }
        Ok(())
    }
}
