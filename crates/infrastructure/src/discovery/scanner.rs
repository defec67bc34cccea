use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;

use async_trait::async_trait;
use domain::{NetworkScanner, PrinterError};
use futures::stream::{self, StreamExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::config::{NetworkSettings, ScanSettings};

/// Parse a `/24` range: `"192.168.1"`, `"192.168.1.0"` or `"192.168.1.0/24"`.
pub fn parse_range(range: &str) -> Result<[u8; 3], PrinterError> {
    let invalid = || PrinterError::InvalidConfig(format!("Invalid network range {range:?}"));

    let trimmed = range.trim();
    let base = match trimmed.split_once('/') {
        Some((base, "24")) => base,
        Some(_) => return Err(invalid()),
        None => trimmed,
    };

    let octets: Vec<&str> = base.split('.').collect();
    let prefix = match octets.as_slice() {
        [a, b, c] | [a, b, c, "0"] => [*a, *b, *c],
        _ => return Err(invalid()),
    };

    let mut parsed = [0u8; 3];
    for (slot, octet) in parsed.iter_mut().zip(prefix) {
        if octet.is_empty() || !octet.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        *slot = octet.parse().map_err(|_| invalid())?;
    }
    Ok(parsed)
}

/// Finds hosts accepting TCP connections on the raw-print port
pub struct TcpScanner {
    port: u16,
    probe_timeout: Duration,
    concurrency: usize,
}

impl TcpScanner {
    pub fn new(network: &NetworkSettings, scan: &ScanSettings) -> Self {
        Self {
            port: network.port,
            probe_timeout: scan.probe_timeout(),
            concurrency: scan.concurrency.max(1),
        }
    }

    /// Probe an explicit host list. Hosts are returned in ascending order.
    pub async fn probe_hosts(&self, hosts: Vec<Ipv4Addr>) -> Vec<Ipv4Addr> {
        let port = self.port;
        let probe_timeout = self.probe_timeout;

        let mut found: Vec<Ipv4Addr> = stream::iter(hosts)
            .map(|ip| async move {
                let address = SocketAddrV4::new(ip, port);
                match tokio::time::timeout(probe_timeout, TcpStream::connect(address)).await {
                    Ok(Ok(_stream)) => {
                        debug!(host = %ip, "Raw-print port open");
                        Some(ip)
                    }
                    _ => None,
                }
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|hit| async move { hit })
            .collect()
            .await;

        found.sort();
        found
    }
}

#[async_trait]
impl NetworkScanner for TcpScanner {
    async fn scan(&self, range: &str) -> Result<Vec<Ipv4Addr>, PrinterError> {
        let [a, b, c] = parse_range(range)?;
        let hosts: Vec<Ipv4Addr> = (1..=254).map(|d| Ipv4Addr::new(a, b, c, d)).collect();

        info!(range = %format!("{a}.{b}.{c}.0/24"), port = self.port, "Scanning for network printers");
        Ok(self.probe_hosts(hosts).await)
    }
}
