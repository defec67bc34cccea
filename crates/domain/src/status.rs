use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterState {
    Ready,
    Offline,
    Error,
}

impl PrinterState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Offline => "offline",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperState {
    Ok,
    Unknown,
}

impl PaperState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Unknown => "unknown",
        }
    }
}

/// Coarse printer status
///
/// Derived from whether the status inquiry could be written, not from a parsed
/// printer response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterStatus {
    pub state: PrinterState,
    pub paper_state: PaperState,
    pub connected: bool,
}

impl PrinterStatus {
    /// No transport registered for the identifier
    pub fn offline() -> Self {
        Self {
            state: PrinterState::Offline,
            paper_state: PaperState::Unknown,
            connected: false,
        }
    }

    /// Inquiry written successfully
    pub fn ready() -> Self {
        Self {
            state: PrinterState::Ready,
            paper_state: PaperState::Ok,
            connected: true,
        }
    }

    /// Inquiry write failed; the transport stays registered
    pub fn write_error() -> Self {
        Self {
            state: PrinterState::Error,
            paper_state: PaperState::Unknown,
            connected: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_offline_status_shape() {
        let value = serde_json::to_value(PrinterStatus::offline()).unwrap();
        assert_eq!(
            value,
            json!({"state": "offline", "paperState": "unknown", "connected": false})
        );
    }

    #[test]
    fn test_write_error_is_still_connected() {
        let status = PrinterStatus::write_error();
        assert_eq!(status.state.as_str(), "error");
        assert_eq!(status.paper_state.as_str(), "unknown");
        assert!(status.connected);
    }
}
