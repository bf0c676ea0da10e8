// pchtxt line loop.
//
// Scans top to bottom, tracking the enabled flag and the current offset
// shift. Each patch line is decoded into a `Result`; failures are logged
// and dropped so one bad line never costs the rest of the file.

use std::path::Path;

use log::debug;

use super::directive::{self, Line};
use super::payload;
use super::{LineError, ParsedFile};
use crate::ips32::PatchRecord;

/// Parse pchtxt text.
pub fn parse_str(text: &str) -> ParsedFile {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut parsed = ParsedFile::default();
    let mut active = false;

    // A lone '\r' also ends a line.
    let lines = text
        .lines()
        .enumerate()
        .flat_map(|(index, l)| l.split('\r').map(move |s| (index + 1, s)));

    for (lineno, raw) in lines {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match directive::classify(line) {
            Line::BinaryId(id) => parsed.binary_id = Some(id.to_string()),
            Line::Title(title) => parsed.display_name = title.to_string(),
            Line::OffsetShift(value) => match directive::parse_shift(value) {
                Ok(shift) => parsed.offset_shift = shift,
                Err(e) => debug!("line {lineno}: dropped: {e}"),
            },
            Line::Enabled => active = true,
            Line::Disabled => active = false,
            Line::Stop => break,
            Line::Ignored => {}
            Line::Patch(_) if !active => {}
            Line::Patch(patch) => match parse_line(patch, parsed.offset_shift) {
                Ok(Some(record)) => parsed.records.push(record),
                Ok(None) => debug!("line {lineno}: skipped: no value token"),
                Err(e) => debug!("line {lineno}: dropped: {e}"),
            },
        }
    }

    parsed
}

/// Decode one `<address> <value>` line with `shift` applied.
///
/// Returns `Ok(None)` for a line with a single token, which is skipped
/// rather than treated as malformed.
pub fn parse_line(line: &str, shift: i64) -> Result<Option<PatchRecord>, LineError> {
    let Some((addr_token, value)) = line.split_once(char::is_whitespace) else {
        return Ok(None);
    };
    let value = value.trim_start();
    if value.is_empty() {
        return Ok(None);
    }

    let address = parse_address(addr_token)?;
    let address = shift_address(address, shift)?;
    let payload = payload::decode_value(value)?;

    Ok(Some(PatchRecord { address, payload }))
}

fn parse_address(token: &str) -> Result<u32, LineError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(LineError::BadAddress(token.to_string()));
    }
    u32::from_str_radix(digits, 16).map_err(|_| LineError::BadAddress(token.to_string()))
}

fn shift_address(address: u32, shift: i64) -> Result<u32, LineError> {
    i64::from(address)
        .checked_add(shift)
        .and_then(|a| u32::try_from(a).ok())
        .ok_or(LineError::AddressOverflow { address, shift })
}

/// Read and parse a file. A read failure is recorded on the result, which
/// then carries no records.
pub fn parse_file(path: &Path) -> ParsedFile {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_str(&text),
        Err(e) => ParsedFile {
            error: Some(format!("Could not read file: {e}")),
            ..Default::default()
        },
    }
}
