// IPS32 patch container.
//
// Layout (all integers big-endian):
//
//   "IPS32"                      5-byte magic
//   { u32 address, u16 len, [u8; len] payload }*
//   "EEOF"                       4-byte footer
//
// # Modules
//
// - `encoder`: Record serialization
// - `decoder`: Container parsing (inspection and round-trip checks)

pub mod decoder;
pub mod encoder;

pub use decoder::{DecodeError, decode_all};
pub use encoder::{EncodeError, encode_records, encoded_len, write_records};

// ---------------------------------------------------------------------------
// Magic values
// ---------------------------------------------------------------------------

pub const IPS32_MAGIC: [u8; 5] = *b"IPS32";
pub const IPS32_EOF: [u8; 4] = *b"EEOF";

/// Largest payload a single record can carry (16-bit length field).
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Bytes of per-record framing: 4-byte address plus 2-byte length.
pub const RECORD_HEADER_LEN: usize = 6;

// ---------------------------------------------------------------------------
// Patch record
// ---------------------------------------------------------------------------

/// One address/payload pair to be written into the target binary.
///
/// Records have no identity beyond their position: the order of a record
/// list is the order the loader applies them in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatchRecord {
    /// Absolute address, offset shift already applied.
    pub address: u32,
    /// Raw bytes to write at `address`.
    pub payload: Vec<u8>,
}

impl PatchRecord {
    pub fn new(address: u32, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            address,
            payload: payload.into(),
        }
    }

    /// Whether the payload fits the 16-bit length field.
    #[inline]
    pub fn is_encodable(&self) -> bool {
        self.payload.len() <= MAX_PAYLOAD_LEN
    }
}
