//! RFCOMM transport to the printer's serial-port service.
//!
//! The device must already be paired. By default the connection is resolved
//! through BlueZ by the Serial Port Profile UUID: a client profile is
//! registered, `connect_profile` asks the daemon to find the service record,
//! and the socket arrives through the profile handle. A configured channel
//! skips the lookup and dials that channel directly.

use std::io::ErrorKind;
use std::time::Duration;

use async_trait::async_trait;
use bluer::rfcomm::{ConnectRequest, Profile, ReqError, Role, SocketAddr, Stream};
use bluer::{Address, Session, Uuid};
use domain::{
    DeviceIdentifier, PrinterError, Transport, TransportConnector, TransportKind, TransportState,
};
use futures::{Stream as FuturesStream, StreamExt};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

use crate::config::{BluetoothSettings, RfcommTarget, SPP_SERVICE_UUID};
use crate::discovery::bluez::map_bluer_error;

/// Serial Port Profile service class
pub const SPP_UUID: Uuid = Uuid::from_u128(SPP_SERVICE_UUID);

pub struct BluetoothConnector {
    target: RfcommTarget,
    connect_timeout: Duration,
    write_timeout: Duration,
}

impl BluetoothConnector {
    pub fn new(settings: &BluetoothSettings) -> Self {
        Self {
            target: settings.target(),
            connect_timeout: settings.connect_timeout(),
            write_timeout: settings.write_timeout(),
        }
    }

    async fn connect(&self, address: Address) -> Result<Stream, PrinterError> {
        match self.target {
            RfcommTarget::Channel(channel) => {
                info!(address = %address, channel, "Opening RFCOMM socket on fixed channel");
                Stream::connect(SocketAddr::new(address, channel))
                    .await
                    .map_err(map_io_error)
            }
            RfcommTarget::Service(uuid) => {
                info!(address = %address, uuid = %Uuid::from_u128(uuid), "Connecting RFCOMM by service");
                connect_service(address, Uuid::from_u128(uuid)).await
            }
        }
    }
}

fn map_io_error(e: std::io::Error) -> PrinterError {
    match e.kind() {
        ErrorKind::PermissionDenied => PrinterError::PermissionDenied(e.to_string()),
        _ => PrinterError::ConnectionFailed(e.to_string()),
    }
}

enum ServiceRace {
    Connected(bluer::Result<()>),
    Requested(Option<ConnectRequest>),
}

/// Register a client profile for `uuid` and let BlueZ resolve the channel
async fn connect_service(address: Address, uuid: Uuid) -> Result<Stream, PrinterError> {
    let session = Session::new().await.map_err(map_bluer_error)?;
    let adapter = session.default_adapter().await.map_err(map_bluer_error)?;
    let device = adapter.device(address).map_err(map_bluer_error)?;

    let profile = Profile {
        uuid,
        role: Some(Role::Client),
        require_authentication: Some(false),
        require_authorization: Some(false),
        auto_connect: Some(false),
        ..Default::default()
    };
    let mut requests = Box::pin(session.register_profile(profile).await.map_err(map_bluer_error)?);
    debug!(address = %address, "Serial-port profile registered");

    // The request may arrive before or after connect_profile returns
    let connect = device.connect_profile(&uuid);
    tokio::pin!(connect);
    let race = tokio::select! {
        result = &mut connect => ServiceRace::Connected(result),
        request = request_from(&mut requests, address) => ServiceRace::Requested(request),
    };
    let request = match race {
        ServiceRace::Requested(request) => request,
        ServiceRace::Connected(result) => {
            result.map_err(map_bluer_error)?;
            request_from(&mut requests, address).await
        }
    };

    let request = request.ok_or_else(|| {
        PrinterError::ConnectionFailed(format!("{address} offered no serial-port connection"))
    })?;
    request.accept().map_err(map_io_error)
}

/// Next connection request from `address`; requests from other devices are rejected
async fn request_from<S>(requests: &mut S, address: Address) -> Option<ConnectRequest>
where
    S: FuturesStream<Item = ConnectRequest> + Unpin,
{
    while let Some(request) = requests.next().await {
        if request.device() == address {
            return Some(request);
        }
        warn!(expected = %address, device = %request.device(), "Rejecting unrelated RFCOMM request");
        request.reject(ReqError::Rejected);
    }
    None
}

#[async_trait]
impl TransportConnector for BluetoothConnector {
    fn kind(&self) -> TransportKind {
        TransportKind::Bluetooth
    }

    async fn open(&self, identifier: &DeviceIdentifier) -> Result<Box<dyn Transport>, PrinterError> {
        let address: Address = identifier.as_str().parse().map_err(|_| {
            PrinterError::ConnectionFailed(format!("{identifier} is not a Bluetooth address"))
        })?;

        match tokio::time::timeout(self.connect_timeout, self.connect(address)).await {
            Ok(Ok(stream)) => {
                info!(address = %address, "Connected to printer over RFCOMM");
                Ok(Box::new(BluetoothTransport {
                    address,
                    stream: Some(stream),
                    state: TransportState::Open,
                    write_timeout: self.write_timeout,
                }))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(PrinterError::ConnectionFailed(format!(
                "RFCOMM connection to {} timed out",
                address
            ))),
        }
    }
}

pub struct BluetoothTransport {
    address: Address,
    stream: Option<Stream>,
    state: TransportState,
    write_timeout: Duration,
}

#[async_trait]
impl Transport for BluetoothTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Bluetooth
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
                error!(address = %self.address, error = %e, "RFCOMM write failed");
                Err(PrinterError::WriteFailed(e.to_string()))
            }
            Err(_) => {
                error!(address = %self.address, "RFCOMM write timed out");
                Err(PrinterError::WriteFailed("write timed out".to_string()))
            }
        }
    }

    async fn close(&mut self) -> Result<(), PrinterError> {
        self.state = self.state.to_closed();
        if let Some(mut stream) = self.stream.take() {
            debug!(address = %self.address, "Closing RFCOMM socket");
            stream
                .shutdown()
                .await
                .map_err(|e| PrinterError::ConnectionFailed(e.to_string()))?;
        }
        Ok(())
    }
}
