use serde::Serialize;

/// Bytes re-encoded as big-endian 64-bit words, the form Cairo proof verifiers read.
///
/// The final word holds the remaining `1..=8` bytes without padding, so the
/// original length has to travel alongside in `bytes_len`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntsSequence {
    pub values: Vec<u64>,
    pub bytes_len: usize,
}

impl IntsSequence {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let values = bytes
            .chunks(8)
            .map(|chunk| chunk.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64))
            .collect();
        Self { values, bytes_len: bytes.len() }
    }
}
