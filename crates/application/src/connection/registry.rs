use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use domain::{DeviceIdentifier, PrinterError, Result, Transport, TransportConnector, TransportKind};

use super::policy::transport_plan;

/// Per-identifier cell. Its mutex serializes every operation on that printer,
/// including the blocking write, so byte streams never interleave on the wire.
type Slot = Arc<Mutex<Option<Box<dyn Transport>>>>;

/// Live identifier → transport mapping
///
/// Holds at most one open transport per identifier. The map itself is only
/// locked for insert/lookup/remove; I/O happens under the per-identifier slot
/// lock, so operations on distinct printers run fully in parallel.
pub struct ConnectionRegistry {
    connectors: HashMap<TransportKind, Arc<dyn TransportConnector>>,
    slots: DashMap<DeviceIdentifier, Slot>,
}

impl ConnectionRegistry {
    pub fn new(connectors: Vec<Arc<dyn TransportConnector>>) -> Self {
        let connectors = connectors
            .into_iter()
            .map(|connector| (connector.kind(), connector))
            .collect();

        Self {
            connectors,
            slots: DashMap::new(),
        }
    }

    /// Open a transport for `identifier` and register it, replacing any previous one.
    ///
    /// On failure the previous entry, if any, is left untouched. No retries.
    pub async fn connect(&self, identifier: &DeviceIdentifier) -> Result<TransportKind> {
        let slot = self.slot_or_insert(identifier);
        let mut current = slot.lock().await;

        let transport = match self.open_first(identifier).await {
            Ok(transport) => transport,
            Err(e) => {
                let unused = current.is_none();
                drop(current);
                drop(slot);
                if unused {
                    self.prune(identifier);
                }
                return Err(e);
            }
        };

        if let Some(mut previous) = current.take() {
            debug!(identifier = %identifier, kind = %previous.kind(), "Closing previous transport");
            if let Err(e) = previous.close().await {
                warn!(identifier = %identifier, error = %e, "Failed to close previous transport");
            }
        }

        let kind = transport.kind();
        *current = Some(transport);
        info!(identifier = %identifier, kind = %kind, "✅ Printer connected");
        Ok(kind)
    }

    /// Remove and close the transport. Close errors are logged and swallowed.
    pub async fn disconnect(&self, identifier: &DeviceIdentifier) -> Result<()> {
        let slot = self.slot(identifier).ok_or(PrinterError::NotConnected)?;

        let was_connected = {
            let mut current = slot.lock().await;
            match current.take() {
                Some(mut transport) => {
                    if let Err(e) = transport.close().await {
                        warn!(identifier = %identifier, error = %e, "Error while closing transport");
                    }
                    true
                }
                None => false,
            }
        };
        drop(slot);
        self.prune(identifier);

        if !was_connected {
            return Err(PrinterError::NotConnected);
        }

        info!(identifier = %identifier, "🔌 Printer disconnected");
        Ok(())
    }

    /// One write-then-flush on the registered transport.
    ///
    /// A failed write leaves the transport registered; the caller decides
    /// whether to retry or disconnect.
    pub async fn send(&self, identifier: &DeviceIdentifier, bytes: &[u8]) -> Result<()> {
        let slot = self.slot(identifier).ok_or(PrinterError::NotConnected)?;
        let result = write_locked(identifier, &slot, bytes).await;

        // A disconnect may have emptied the slot while this call held it
        drop(slot);
        self.prune(identifier);
        result
    }

    pub async fn is_connected(&self, identifier: &DeviceIdentifier) -> bool {
        let Some(slot) = self.slot(identifier) else {
            return false;
        };
        let connected = slot.lock().await.is_some();

        drop(slot);
        if !connected {
            self.prune(identifier);
        }
        connected
    }

    /// Number of identifiers the map tracks, including ones mid-operation
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Identifiers that currently hold a transport
    pub async fn connected(&self) -> Vec<DeviceIdentifier> {
        let mut ids = Vec::new();
        for (id, slot) in self.snapshot() {
            if slot.lock().await.is_some() {
                ids.push(id);
            }
        }
        self.prune_idle();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }

    /// Close every open transport. Used on teardown.
    pub async fn close_all(&self) -> usize {
        let mut closed = 0;
        for (id, slot) in self.snapshot() {
            let removed = slot.lock().await.take();
            if let Some(mut transport) = removed {
                if let Err(e) = transport.close().await {
                    warn!(identifier = %id, error = %e, "Error while closing transport");
                }
                closed += 1;
            }
        }

        self.prune_idle();
        info!(closed, "Closed all printer connections");
        closed
    }

    async fn open_first(&self, identifier: &DeviceIdentifier) -> Result<Box<dyn Transport>> {
        let mut failures = Vec::new();

        for kind in transport_plan(identifier) {
            let Some(connector) = self.connectors.get(&kind) else {
                debug!(identifier = %identifier, kind = %kind, "No connector registered");
                failures.push(format!("{kind}: transport not available"));
                continue;
            };

            match connector.open(identifier).await {
                Ok(transport) => return Ok(transport),
                Err(PrinterError::PermissionDenied(reason)) => {
                    return Err(PrinterError::PermissionDenied(reason));
                }
                Err(e) => {
                    warn!(identifier = %identifier, kind = %kind, error = %e, "Transport attempt failed");
                    failures.push(format!("{kind}: {e}"));
                }
            }
        }

        Err(PrinterError::ConnectionFailed(format!(
            "{identifier}: {}",
            failures.join("; ")
        )))
    }

    fn slot(&self, identifier: &DeviceIdentifier) -> Option<Slot> {
        self.slots.get(identifier).map(|entry| Arc::clone(entry.value()))
    }

    fn slot_or_insert(&self, identifier: &DeviceIdentifier) -> Slot {
        Arc::clone(self.slots.entry(identifier.clone()).or_default().value())
    }

    fn snapshot(&self) -> Vec<(DeviceIdentifier, Slot)> {
        self.slots
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }

    fn prune_idle(&self) {
        self.slots
            .retain(|_, slot| Arc::strong_count(slot) > 1 || !is_idle(slot));
    }

    /// Drop the map entry once nobody holds or waits on an empty slot
    fn prune(&self, identifier: &DeviceIdentifier) {
        self.slots
            .remove_if(identifier, |_, slot| Arc::strong_count(slot) == 1 && is_idle(slot));
    }
}

async fn write_locked(identifier: &DeviceIdentifier, slot: &Slot, bytes: &[u8]) -> Result<()> {
    let mut current = slot.lock().await;
    let transport = current.as_mut().ok_or(PrinterError::NotConnected)?;

    match transport.write_and_flush(bytes).await {
        Ok(()) => {
            debug!(identifier = %identifier, bytes = bytes.len(), "Payload sent");
            Ok(())
        }
        Err(e) => {
            warn!(identifier = %identifier, error = %e, "Write failed, transport kept");
            Err(match e {
                PrinterError::WriteFailed(_) => e,
                other => PrinterError::WriteFailed(other.to_string()),
            })
        }
    }
}

fn is_idle(slot: &Slot) -> bool {
    slot.try_lock().is_ok_and(|current| current.is_none())
}
