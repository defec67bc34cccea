use super::size::SizeSetting;
use serde::{Deserialize, Deserializer, Serialize};

/// One line of the items section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub price: String,
}

impl ReceiptItem {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
        }
    }
}

/// Hosts send prices either as text or as a bare JSON number
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Per-section formatting. Absent options mean normal size, not bold.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReceiptFormatting {
    pub header_size: Option<SizeSetting>,
    pub header_bold: bool,
    pub item_size: Option<SizeSetting>,
    pub item_bold: bool,
    pub total_size: Option<SizeSetting>,
    pub total_bold: bool,
    pub footer_size: Option<SizeSetting>,
    pub footer_bold: bool,
}

/// Receipt sections, in print order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiptSection {
    Header,
    Items,
    Total,
    Footer,
}

/// Resolved formatting for one section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionStyle<'a> {
    pub size: Option<&'a SizeSetting>,
    pub bold: bool,
}

impl ReceiptFormatting {
    pub fn style(&self, section: ReceiptSection) -> SectionStyle<'_> {
        let (size, bold) = match section {
            ReceiptSection::Header => (&self.header_size, self.header_bold),
            ReceiptSection::Items => (&self.item_size, self.item_bold),
            ReceiptSection::Total => (&self.total_size, self.total_bold),
            ReceiptSection::Footer => (&self.footer_size, self.footer_bold),
        };
        SectionStyle {
            size: size.as_ref(),
            bold,
        }
    }
}

/// A structured receipt: optional header, items, total and footer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReceiptTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ReceiptItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default)]
    pub formatting: ReceiptFormatting,
}

impl ReceiptTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_item(mut self, name: impl Into<String>, price: impl Into<String>) -> Self {
        self.items.push(ReceiptItem::new(name, price));
        self
    }

    pub fn with_total(mut self, total: impl Into<String>) -> Self {
        self.total = Some(total.into());
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_formatting(mut self, formatting: ReceiptFormatting) -> Self {
        self.formatting = formatting;
        self
    }

    /// Whether a section contributes any bytes. An empty item list counts as absent.
    pub fn has_section(&self, section: ReceiptSection) -> bool {
        match section {
            ReceiptSection::Header => self.header.is_some(),
            ReceiptSection::Items => !self.items.is_empty(),
            ReceiptSection::Total => self.total.is_some(),
            ReceiptSection::Footer => self.footer.is_some(),
        }
    }
}
