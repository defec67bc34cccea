//! Print request → command bytes
//!
//! Pure functions: no I/O, no shared state. Identical input always yields
//! identical bytes.

use domain::{CommandBytes, PrintRequest, ReceiptSection, ReceiptTemplate, SectionStyle, SizeSetting};

use super::builder::{Alignment, ReceiptBuilder, SIZE_NORMAL, STATUS_INQUIRY};

/// Firmware size codes for `GS ! n`, indexed by level 1-4
const SIZE_CODES: [u8; 4] = [0x00, 0x11, 0x22, 0x33];

const TOTAL_LABEL: &str = "Total: ";

/// Map a requested size to its firmware code. Unknown values select the default.
pub fn map_size(size: &SizeSetting) -> u8 {
    match size {
        SizeSetting::Level(level @ 1..=4) => SIZE_CODES[(*level - 1) as usize],
        SizeSetting::Named(name) => match name.as_str() {
            "normal" => SIZE_CODES[0],
            "large" => SIZE_CODES[1],
            "xlarge" => SIZE_CODES[2],
            _ => SIZE_NORMAL,
        },
        _ => SIZE_NORMAL,
    }
}

pub fn encode(request: &PrintRequest) -> CommandBytes {
    match request {
        PrintRequest::PlainText(text) => encode_text(text),
        PrintRequest::Receipt(template) => encode_receipt(template),
    }
}

/// Reset, the text verbatim, three line feeds, full cut
pub fn encode_text(text: &str) -> CommandBytes {
    ReceiptBuilder::new()
        .initialize()
        .text(text)
        .feed()
        .cut()
        .build()
}

/// Render a receipt template. Absent sections contribute no bytes at all.
pub fn encode_receipt(template: &ReceiptTemplate) -> CommandBytes {
    let mut writer = SectionWriter::new();

    if let Some(header) = &template.header {
        writer.section(
            Alignment::Center,
            template.formatting.style(ReceiptSection::Header),
            |b| b.text(header).newline().newline(),
        );
    }

    if template.has_section(ReceiptSection::Items) {
        writer.section(
            Alignment::Left,
            template.formatting.style(ReceiptSection::Items),
            |b| {
                template
                    .items
                    .iter()
                    .fold(b, |b, item| b.text(&item.name).tab().text_line(&item.price))
            },
        );
    }

    if let Some(total) = &template.total {
        writer.section(
            Alignment::Left,
            template.formatting.style(ReceiptSection::Total),
            |b| b.newline().text(TOTAL_LABEL).text_line(total),
        );
    }

    if let Some(footer) = &template.footer {
        writer.section(
            Alignment::Left,
            template.formatting.style(ReceiptSection::Footer),
            |b| b.text_line(footer),
        );
    }

    writer.finish()
}

/// Fixed three-byte status inquiry
pub fn encode_status_probe() -> CommandBytes {
    ReceiptBuilder::new().raw(&STATUS_INQUIRY).build()
}

/// Tracks alignment so the command is emitted only when it changes
struct SectionWriter {
    builder: ReceiptBuilder,
    alignment: Option<Alignment>,
}

impl SectionWriter {
    fn new() -> Self {
        Self {
            builder: ReceiptBuilder::new().initialize(),
            alignment: None,
        }
    }

    fn section<F>(&mut self, alignment: Alignment, style: SectionStyle<'_>, content: F)
    where
        F: FnOnce(ReceiptBuilder) -> ReceiptBuilder,
    {
        let mut b = std::mem::take(&mut self.builder);

        if self.alignment != Some(alignment) {
            b = b.align(alignment);
            self.alignment = Some(alignment);
        }

        let size = style.size.map(map_size).unwrap_or(SIZE_NORMAL);
        if size != SIZE_NORMAL {
            b = b.size(size);
        }
        if style.bold {
            b = b.bold(true);
        }

        b = content(b);

        if style.bold {
            b = b.bold(false);
        }
        if size != SIZE_NORMAL {
            b = b.size_reset();
        }

        self.builder = b;
    }

    fn finish(self) -> CommandBytes {
        self.builder.feed().cut().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::builder::{ALIGN_CENTER, BOLD_ON, CUT, FEED, RESET};
    use domain::ReceiptFormatting;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_encode_text_exact_bytes() {
        let bytes = encode_text("Hi");
        assert_eq!(
            bytes.as_bytes(),
            &[0x1B, 0x40, b'H', b'i', 0x0A, 0x0A, 0x0A, 0x1D, 0x56, 0x41, 0x10]
        );
    }

    #[test]
    fn test_encode_text_length_formula() {
        let text = "Grüße\n\x1B!";
        let bytes = encode_text(text);
        assert_eq!(
            bytes.len(),
            RESET.len() + text.len() + FEED.len() + CUT.len()
        );
    }

    #[test]
    fn test_encode_text_passes_control_bytes_through() {
        let bytes = encode_text("\x1Bp\x00");
        assert_eq!(&bytes[2..5], &[0x1B, b'p', 0x00]);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let template = ReceiptTemplate::new()
            .with_header("Shop")
            .with_item("Tea", "2.00")
            .with_total("2.00");
        assert_eq!(encode_receipt(&template), encode_receipt(&template.clone()));
        assert_eq!(encode_text("same"), encode_text("same"));
    }

    #[test]
    fn test_map_size_table() {
        assert_eq!(map_size(&SizeSetting::Level(1)), 0x00);
        assert_eq!(map_size(&SizeSetting::Level(2)), 0x11);
        assert_eq!(map_size(&SizeSetting::Level(3)), 0x22);
        assert_eq!(map_size(&SizeSetting::Level(4)), 0x33);
        assert_eq!(map_size(&SizeSetting::normal()), 0x00);
        assert_eq!(map_size(&SizeSetting::large()), 0x11);
        assert_eq!(map_size(&SizeSetting::xlarge()), 0x22);
    }

    #[test]
    fn test_map_size_unknown_values_default() {
        assert_eq!(map_size(&SizeSetting::Level(99)), 0x00);
        assert_eq!(map_size(&SizeSetting::Level(0)), 0x00);
        assert_eq!(map_size(&SizeSetting::from("unknown")), 0x00);
        assert_eq!(map_size(&SizeSetting::from("Large")), 0x00);
        assert_eq!(map_size(&SizeSetting::Other(serde_json::json!(2.5))), 0x00);
    }

    #[test]
    fn test_full_receipt_exact_bytes() {
        let template = ReceiptTemplate::new()
            .with_header("Cafe")
            .with_item("Tea", "2.00")
            .with_total("2.00")
            .with_footer("Bye")
            .with_formatting(ReceiptFormatting {
                header_size: Some(SizeSetting::large()),
                item_bold: true,
                ..Default::default()
            });

        let mut expected = vec![0x1B, 0x40];
        // header: center, large
        expected.extend_from_slice(&[0x1B, 0x61, 0x01, 0x1D, 0x21, 0x11]);
        expected.extend_from_slice(b"Cafe\n\n");
        expected.extend_from_slice(&[0x1D, 0x21, 0x00]);
        // items: left, bold
        expected.extend_from_slice(&[0x1B, 0x61, 0x00, 0x1B, 0x45, 0x01]);
        expected.extend_from_slice(b"Tea\t2.00\n");
        expected.extend_from_slice(&[0x1B, 0x45, 0x00]);
        // total and footer stay left aligned
        expected.extend_from_slice(b"\nTotal: 2.00\n");
        expected.extend_from_slice(b"Bye\n");
        expected.extend_from_slice(&[0x0A, 0x0A, 0x0A, 0x1D, 0x56, 0x41, 0x10]);

        assert_eq!(encode_receipt(&template).as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_size_before_bold_and_reverse_on_close() {
        let template = ReceiptTemplate::new()
            .with_total("9.99")
            .with_formatting(ReceiptFormatting {
                total_size: Some(SizeSetting::Level(4)),
                total_bold: true,
                ..Default::default()
            });

        let mut expected = vec![0x1B, 0x40, 0x1B, 0x61, 0x00];
        expected.extend_from_slice(&[0x1D, 0x21, 0x33, 0x1B, 0x45, 0x01]);
        expected.extend_from_slice(b"\nTotal: 9.99\n");
        expected.extend_from_slice(&[0x1B, 0x45, 0x00, 0x1D, 0x21, 0x00]);
        expected.extend_from_slice(&[0x0A, 0x0A, 0x0A, 0x1D, 0x56, 0x41, 0x10]);

        assert_eq!(encode_receipt(&template).as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_items_only_omits_header_commands() {
        let template = ReceiptTemplate::new()
            .with_item("Coffee", "3.00")
            .with_item("Muffin", "2.50")
            .with_formatting(ReceiptFormatting {
                header_size: Some(SizeSetting::xlarge()),
                header_bold: true,
                total_bold: true,
                ..Default::default()
            });

        let bytes = encode_receipt(&template);
        assert!(!contains(&bytes, &ALIGN_CENTER));
        assert!(!contains(&bytes, &BOLD_ON));
        assert!(!contains(&bytes, &[0x1D, 0x21]));
        assert!(!contains(&bytes, b"Total: "));
        assert!(contains(&bytes, b"Coffee\t3.00\nMuffin\t2.50\n"));
    }

    #[test]
    fn test_items_keep_input_order_untruncated() {
        let long_name = "X".repeat(120);
        let template = ReceiptTemplate::new()
            .with_item("b", "1")
            .with_item(long_name.as_str(), "2")
            .with_item("a", "3");

        let bytes = encode_receipt(&template);
        let mut body = b"b\t1\n".to_vec();
        body.extend_from_slice(long_name.as_bytes());
        body.extend_from_slice(b"\t2\na\t3\n");
        assert!(contains(&bytes, &body));
    }

    #[test]
    fn test_alignment_emitted_once_per_change() {
        let template = ReceiptTemplate::new()
            .with_item("A", "1")
            .with_total("1")
            .with_footer("F");

        let bytes = encode_receipt(&template);
        let left_count = bytes.windows(3).filter(|w| *w == [0x1B, 0x61, 0x00]).count();
        assert_eq!(left_count, 1);
    }

    #[test]
    fn test_every_present_section_is_written() {
        let template = ReceiptTemplate::new()
            .with_header("H")
            .with_item("I", "1")
            .with_total("T")
            .with_footer("F");

        let bytes = encode_receipt(&template);
        let mut expected = vec![0x1B, 0x40, 0x1B, 0x61, 0x01];
        expected.extend_from_slice(b"H\n\n");
        expected.extend_from_slice(&[0x1B, 0x61, 0x00]);
        expected.extend_from_slice(b"I\t1\n\nTotal: T\nF\n");
        expected.extend_from_slice(&[0x0A, 0x0A, 0x0A, 0x1D, 0x56, 0x41, 0x10]);
        assert_eq!(bytes.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_empty_template_is_reset_feed_cut() {
        let bytes = encode_receipt(&ReceiptTemplate::default());
        assert_eq!(
            bytes.as_bytes(),
            &[0x1B, 0x40, 0x0A, 0x0A, 0x0A, 0x1D, 0x56, 0x41, 0x10]
        );
    }

    #[test]
    fn test_normal_size_emits_no_size_command() {
        let template = ReceiptTemplate::new()
            .with_footer("Thanks")
            .with_formatting(ReceiptFormatting {
                footer_size: Some(SizeSetting::Level(1)),
                ..Default::default()
            });

        assert!(!contains(&encode_receipt(&template), &[0x1D, 0x21]));
    }

    #[test]
    fn test_status_probe_is_constant() {
        assert_eq!(encode_status_probe().as_bytes(), &[0x10, 0x04, 0x01]);
        assert_eq!(encode_status_probe(), encode_status_probe());
    }

    #[test]
    fn test_encode_dispatches_on_request() {
        assert_eq!(encode(&PrintRequest::text("Hi")), encode_text("Hi"));
        let template = ReceiptTemplate::new().with_footer("F");
        assert_eq!(
            encode(&PrintRequest::receipt(template.clone())),
            encode_receipt(&template)
        );
    }
}
