use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use domain::PrinterError;
use serde::{Deserialize, Serialize};

/// Raw-print TCP port used by network printers
pub const DEFAULT_NETWORK_PORT: u16 = 9100;

/// Serial Port Profile service class, `00001101-0000-1000-8000-00805F9B34FB`
pub const SPP_SERVICE_UUID: u128 = 0x0000_1101_0000_1000_8000_0080_5F9B_34FB;

/// How the RFCOMM socket finds the printer's serial-port service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfcommTarget {
    /// Resolve the channel from the device's service record for this UUID
    Service(u128),
    /// Dial a fixed channel, skipping the service lookup
    Channel(u8),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    #[serde(default = "default_network_port")]
    pub port: u16,
    #[serde(default = "default_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub write_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BluetoothSettings {
    /// Fixed RFCOMM channel. Unset: connect by the serial-port service UUID.
    #[serde(default)]
    pub channel: Option<u8>,
    #[serde(default = "default_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub write_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Hosts probed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_network_port() -> u16 {
    DEFAULT_NETWORK_PORT
}
fn default_timeout_ms() -> u64 {
    5000
}
fn default_probe_timeout_ms() -> u64 {
    300
}
fn default_concurrency() -> usize {
    64
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            port: default_network_port(),
            connect_timeout_ms: default_timeout_ms(),
            write_timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for BluetoothSettings {
    fn default() -> Self {
        Self {
            channel: None,
            connect_timeout_ms: default_timeout_ms(),
            write_timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            probe_timeout_ms: default_probe_timeout_ms(),
            concurrency: default_concurrency(),
        }
    }
}

impl NetworkSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

impl BluetoothSettings {
    pub fn target(&self) -> RfcommTarget {
        match self.channel {
            Some(channel) => RfcommTarget::Channel(channel),
            None => RfcommTarget::Service(SPP_SERVICE_UUID),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

impl ScanSettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

/// Transport and discovery tuning
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct PrinterSettings {
    #[serde(default)]
    pub network: NetworkSettings,
    #[serde(default)]
    pub bluetooth: BluetoothSettings,
    #[serde(default)]
    pub scan: ScanSettings,
}

impl PrinterSettings {
    /// Layered load: built-in defaults, `<dir>/default`, `<dir>/<RUN_MODE>`,
    /// then `ZYPRINT__SECTION__KEY` environment variables. Every file is optional.
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("network.port", i64::from(DEFAULT_NETWORK_PORT))?
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            .add_source(Environment::with_prefix("ZYPRINT").separator("__"))
            .build()?;

        let settings: Self = s.try_deserialize()?;
        settings
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), PrinterError> {
        if self.network.port == 0 {
            return Err(PrinterError::InvalidConfig(
                "network.port must be non-zero".to_string(),
            ));
        }
        if let Some(channel) = self.bluetooth.channel {
            if !(1..=30).contains(&channel) {
                return Err(PrinterError::InvalidConfig(format!(
                    "bluetooth.channel must be within 1..=30, got {}",
                    channel
                )));
            }
        }
        if self.scan.concurrency == 0 {
            return Err(PrinterError::InvalidConfig(
                "scan.concurrency must be at least 1".to_string(),
            ));
        }

        let timeouts = [
            ("network.connect_timeout_ms", self.network.connect_timeout_ms),
            ("network.write_timeout_ms", self.network.write_timeout_ms),
            ("bluetooth.connect_timeout_ms", self.bluetooth.connect_timeout_ms),
            ("bluetooth.write_timeout_ms", self.bluetooth.write_timeout_ms),
            ("scan.probe_timeout_ms", self.scan.probe_timeout_ms),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, ms)| *ms == 0) {
            return Err(PrinterError::InvalidConfig(format!(
                "{name} must be non-zero"
            )));
        }

        Ok(())
    }
}
