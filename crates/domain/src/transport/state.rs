use serde::{Deserialize, Serialize};

/// Lifecycle of a single transport instance
///
/// A transport is created `Open` by its connector. Closing is terminal: a closed
/// transport is never reopened, a new one is opened instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    Open,
    Closed,
}

impl TransportState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Writes are only accepted while open
    pub fn can_write(&self) -> bool {
        self.is_open()
    }

    /// Transition to closed. Idempotent.
    pub fn to_closed(&self) -> Self {
        Self::Closed
    }
}

impl Default for TransportState {
    fn default() -> Self {
        Self::Open
    }
}
