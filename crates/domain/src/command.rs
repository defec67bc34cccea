use std::ops::Deref;

/// Exact wire payload for one `Transport::write_and_flush` call.
///
/// Immutable once built; produced by the encoder and consumed by a single write.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CommandBytes(Vec<u8>);

impl CommandBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for CommandBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Deref for CommandBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for CommandBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
