// IPS32 decoder: container parsing.
//
// The footer is recognized by peeking 4 bytes at each record boundary, the
// same way loaders read the format. A record whose address bytes spell
// "EEOF" (0x45454F46) is therefore indistinguishable from the footer; this
// is a limitation of the format itself.

use super::{IPS32_EOF, IPS32_MAGIC, PatchRecord, RECORD_HEADER_LEN};

// ---------------------------------------------------------------------------
// Decoder error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid IPS32 magic")]
    BadMagic,
    #[error("truncated container at offset {offset}")]
    Truncated { offset: usize },
    #[error("{len} trailing bytes after footer at offset {offset}")]
    TrailingData { offset: usize, len: usize },
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a whole in-memory container into its records.
pub fn decode_all(data: &[u8]) -> Result<Vec<PatchRecord>, DecodeError> {
    let magic_len = IPS32_MAGIC.len();
    if data.len() < magic_len {
        return Err(DecodeError::Truncated { offset: 0 });
    }
    if data[..magic_len] != IPS32_MAGIC {
        return Err(DecodeError::BadMagic);
    }

    let mut records = Vec::new();
    let mut pos = magic_len;

    loop {
        let rest = &data[pos..];
        if rest.starts_with(&IPS32_EOF) {
            pos += IPS32_EOF.len();
            break;
        }
        if rest.len() < RECORD_HEADER_LEN {
            return Err(DecodeError::Truncated { offset: pos });
        }

        let address = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]);
        let len = u16::from_be_bytes([rest[4], rest[5]]) as usize;
        let body = &rest[RECORD_HEADER_LEN..];
        if body.len() < len {
            return Err(DecodeError::Truncated {
                offset: pos + RECORD_HEADER_LEN,
            });
        }

        records.push(PatchRecord::new(address, &body[..len]));
        pos += RECORD_HEADER_LEN + len;
    }

    if pos != data.len() {
        return Err(DecodeError::TrailingData {
            offset: pos,
            len: data.len() - pos,
        });
    }

    Ok(records)
}
