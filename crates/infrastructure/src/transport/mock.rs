use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use domain::{
    DeviceIdentifier, PrinterError, Transport, TransportConnector, TransportKind, TransportState,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct Recorded {
    sent: Mutex<Vec<u8>>,
    writes: AtomicUsize,
    closed: AtomicBool,
    fail_writes: AtomicBool,
    fail_close: AtomicBool,
}

/// Test-side view of a [`MockTransport`]. Stays valid after the registry drops the transport.
#[derive(Clone, Default)]
pub struct MockHandle {
    inner: Arc<Recorded>,
}

impl MockHandle {
    /// Every byte written so far, in wire order
    pub fn sent(&self) -> Vec<u8> {
        lock(&self.inner.sent).clone()
    }

    /// Number of write_and_flush calls, failed ones included
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_close(&self, fail: bool) {
        self.inner.fail_close.store(fail, Ordering::SeqCst);
    }
}

/// In-memory transport. Writes byte by byte, yielding in between, so that
/// unsynchronized concurrent writers would visibly interleave.
pub struct MockTransport {
    kind: TransportKind,
    state: TransportState,
    handle: MockHandle,
}

impl MockTransport {
    pub fn new(kind: TransportKind) -> (Self, MockHandle) {
        let handle = MockHandle::default();
        let transport = Self {
            kind,
            state: TransportState::Open,
            handle: handle.clone(),
        };
        (transport, handle)
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    fn state(&self) -> TransportState {
        self.state
    }

    async fn write_and_flush(&mut self, bytes: &[u8]) -> Result<(), PrinterError> {
        let recorded = &self.handle.inner;
        recorded.writes.fetch_add(1, Ordering::SeqCst);

        if !self.state.can_write() {
            return Err(PrinterError::WriteFailed("transport is closed".to_string()));
        }
        if recorded.fail_writes.load(Ordering::SeqCst) {
            return Err(PrinterError::WriteFailed("broken pipe".to_string()));
        }

        for byte in bytes {
            lock(&recorded.sent).push(*byte);
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), PrinterError> {
        self.state = self.state.to_closed();
        self.handle.inner.closed.store(true, Ordering::SeqCst);

        if self.handle.inner.fail_close.load(Ordering::SeqCst) {
            return Err(PrinterError::ConnectionFailed("close failed".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct ConnectorState {
    opened: Mutex<Vec<(DeviceIdentifier, MockHandle)>>,
    open_error: Mutex<Option<PrinterError>>,
    attempts: AtomicUsize,
}

/// Connector producing [`MockTransport`]s and remembering every one it opened
#[derive(Clone)]
pub struct MockConnector {
    kind: TransportKind,
    state: Arc<ConnectorState>,
}

impl MockConnector {
    pub fn new(kind: TransportKind) -> Self {
        Self {
            kind,
            state: Arc::default(),
        }
    }

    /// Make every following `open` fail with `error`; `None` restores success.
    pub fn set_open_error(&self, error: Option<PrinterError>) {
        *lock(&self.state.open_error) = error;
    }

    pub fn attempts(&self) -> usize {
        self.state.attempts.load(Ordering::SeqCst)
    }

    /// Handles of every transport opened so far, oldest first
    pub fn handles(&self) -> Vec<MockHandle> {
        lock(&self.state.opened)
            .iter()
            .map(|(_, handle)| handle.clone())
            .collect()
    }

    pub fn last_handle(&self) -> Option<MockHandle> {
        lock(&self.state.opened).last().map(|(_, handle)| handle.clone())
    }
}

#[async_trait]
impl TransportConnector for MockConnector {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    async fn open(&self, identifier: &DeviceIdentifier) -> Result<Box<dyn Transport>, PrinterError> {
        self.state.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = lock(&self.state.open_error).clone() {
            return Err(error);
        }

        let (transport, handle) = MockTransport::new(self.kind);
        lock(&self.state.opened).push((identifier.clone(), handle));
        Ok(Box::new(transport))
    }
}
