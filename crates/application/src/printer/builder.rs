use domain::CommandBytes;

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const DLE: u8 = 0x10;
const EOT: u8 = 0x04;
pub const LF: u8 = 0x0A;
pub const TAB: u8 = 0x09;

/// ESC @: Initialize printer
pub const RESET: [u8; 2] = [ESC, 0x40];
/// ESC a n: Align (0: Left, 1: Center)
pub const ALIGN_LEFT: [u8; 3] = [ESC, 0x61, 0x00];
pub const ALIGN_CENTER: [u8; 3] = [ESC, 0x61, 0x01];
/// ESC E n: Emphasis
pub const BOLD_ON: [u8; 3] = [ESC, 0x45, 0x01];
pub const BOLD_OFF: [u8; 3] = [ESC, 0x45, 0x00];
/// GS ! n: Character size, followed by the size code
pub const SELECT_SIZE: [u8; 2] = [GS, 0x21];
pub const SIZE_NORMAL: u8 = 0x00;
/// Blank lines before cutting
pub const FEED: [u8; 3] = [LF, LF, LF];
/// GS V 65 n: Feed n dots then full cut
pub const CUT: [u8; 4] = [GS, 0x56, 0x41, 0x10];
/// DLE EOT n: Real-time status inquiry
pub const STATUS_INQUIRY: [u8; 3] = [DLE, EOT, 0x01];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

impl Alignment {
    fn command(self) -> [u8; 3] {
        match self {
            Self::Left => ALIGN_LEFT,
            Self::Center => ALIGN_CENTER,
        }
    }
}

/// Byte-level command stream builder
///
/// Every method appends fixed opcodes or raw text; nothing is escaped.
pub struct ReceiptBuilder {
    buffer: Vec<u8>,
}

impl ReceiptBuilder {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn initialize(self) -> Self {
        self.raw(&RESET)
    }

    pub fn align(self, alignment: Alignment) -> Self {
        self.raw(&alignment.command())
    }

    pub fn bold(self, on: bool) -> Self {
        self.raw(if on { &BOLD_ON } else { &BOLD_OFF })
    }

    pub fn size(mut self, code: u8) -> Self {
        self.buffer.extend_from_slice(&SELECT_SIZE);
        self.buffer.push(code);
        self
    }

    pub fn size_reset(self) -> Self {
        self.size(SIZE_NORMAL)
    }

    /// UTF-8 bytes of `text`, verbatim
    pub fn text(self, text: &str) -> Self {
        self.raw(text.as_bytes())
    }

    pub fn text_line(self, text: &str) -> Self {
        self.text(text).newline()
    }

    pub fn tab(mut self) -> Self {
        self.buffer.push(TAB);
        self
    }

    pub fn newline(mut self) -> Self {
        self.buffer.push(LF);
        self
    }

    pub fn feed(self) -> Self {
        self.raw(&FEED)
    }

    pub fn cut(self) -> Self {
        self.raw(&CUT)
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buffer.extend_from_slice(bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn build(self) -> CommandBytes {
        CommandBytes::from(self.buffer)
    }
}

impl Default for ReceiptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
