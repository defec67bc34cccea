pub mod builder;
pub mod encoder;

pub use builder::{Alignment, ReceiptBuilder};
pub use encoder::{encode, encode_receipt, encode_status_probe, encode_text, map_size};
