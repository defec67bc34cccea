mod size;
mod template;

pub use size::SizeSetting;
pub use template::{ReceiptFormatting, ReceiptItem, ReceiptSection, ReceiptTemplate, SectionStyle};

use crate::error::{PrinterError, Result};
use serde::{Deserialize, Serialize};

/// What the caller wants printed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum PrintRequest {
    /// Sent verbatim between reset and cut. Control bytes are not sanitized.
    PlainText(String),
    Receipt(ReceiptTemplate),
}

impl PrintRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self::PlainText(text.into())
    }

    pub fn receipt(template: ReceiptTemplate) -> Self {
        Self::Receipt(template)
    }

    /// Parse a receipt template in the host bridge's JSON shape
    pub fn receipt_from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value::<ReceiptTemplate>(value)
            .map(Self::Receipt)
            .map_err(|e| PrinterError::Encoding(e.to_string()))
    }

    pub fn receipt_from_str(json: &str) -> Result<Self> {
        serde_json::from_str::<ReceiptTemplate>(json)
            .map(Self::Receipt)
            .map_err(|e| PrinterError::Encoding(e.to_string()))
    }
}
