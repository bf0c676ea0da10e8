// IPS32 encoder: record serialization.
//
// The output is a pure function of the record list. No padding, alignment
// or checksum is emitted, so identical input always yields identical bytes.

use std::io::{self, Write};

use super::{IPS32_EOF, IPS32_MAGIC, MAX_PAYLOAD_LEN, PatchRecord, RECORD_HEADER_LEN};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The payload does not fit the 16-bit length field.
    #[error("record {index} at {address:#010X}: payload of {len} bytes exceeds 65535")]
    PayloadTooLarge { index: usize, address: u32, len: usize },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Total container size for `records`, magic and footer included.
pub fn encoded_len(records: &[PatchRecord]) -> usize {
    IPS32_MAGIC.len()
        + records
            .iter()
            .map(|r| RECORD_HEADER_LEN + r.payload.len())
            .sum::<usize>()
        + IPS32_EOF.len()
}

/// Check every record before any byte is emitted.
fn validate(records: &[PatchRecord]) -> Result<(), EncodeError> {
    match records.iter().position(|r| !r.is_encodable()) {
        Some(index) => Err(EncodeError::PayloadTooLarge {
            index,
            address: records[index].address,
            len: records[index].payload.len(),
        }),
        None => Ok(()),
    }
}

/// Write a complete container to `w`. Returns the number of bytes written.
///
/// All records are validated first, so an oversized payload fails before
/// the writer sees any output.
pub fn write_records<W: Write>(w: &mut W, records: &[PatchRecord]) -> Result<u64, EncodeError> {
    validate(records)?;

    w.write_all(&IPS32_MAGIC)?;
    for record in records {
        // Length fits: checked by `validate`.
        let len = record.payload.len() as u16;
        w.write_all(&record.address.to_be_bytes())?;
        w.write_all(&len.to_be_bytes())?;
        w.write_all(&record.payload)?;
    }
    w.write_all(&IPS32_EOF)?;

    Ok(encoded_len(records) as u64)
}

/// Encode `records` into a freshly allocated buffer.
pub fn encode_records(records: &[PatchRecord]) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(encoded_len(records));
    write_records(&mut out, records)?;
    Ok(out)
}
