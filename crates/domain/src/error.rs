use thiserror::Error;

/// Printer-level errors
///
/// Every failure crossing the core boundary is one of these. None of them is
/// fatal to the process and none of them affects other identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrinterError {
    /// Wireless stack absent or powered off. Discovery recovers from this locally.
    #[error("Wireless adapter unavailable: {0}")]
    AdapterUnavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid printer identifier: {0}")]
    InvalidIdentifier(String),

    /// Every transport attempt for the identifier failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Printer not connected")]
    NotConnected,

    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Malformed print request, raised before any byte is sent.
    #[error("Invalid print request: {0}")]
    Encoding(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PrinterError {
    /// Short machine-readable name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AdapterUnavailable(_) => "adapter_unavailable",
            Self::PermissionDenied(_) => "permission_denied",
            Self::InvalidIdentifier(_) => "invalid_identifier",
            Self::ConnectionFailed(_) => "connection_failed",
            Self::NotConnected => "not_connected",
            Self::WriteFailed(_) => "write_failed",
            Self::Encoding(_) => "encoding",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}

pub type Result<T> = std::result::Result<T, PrinterError>;
