// pchtxt patch description format.
//
// A pchtxt file is line oriented. `@` directives carry metadata (binary
// identifier, title, address bias) and toggle enabled regions; inside an
// enabled region every other line is an `<address> <value>` patch.
//
// # Modules
//
// - `directive`: Line classification
// - `payload`  : Value token decoding (quoted text / hex bytes)
// - `parser`   : Line loop producing a `ParsedFile`

pub mod directive;
pub mod parser;
pub mod payload;

pub use directive::{Line, classify};
pub use parser::{parse_file, parse_line, parse_str};
pub use payload::decode_value;

use crate::ips32::PatchRecord;

/// Display name used when a file carries no `@title`.
pub const DEFAULT_DISPLAY_NAME: &str = "Unknown Mod";

/// Input file extension, matched case-insensitively.
pub const PCHTXT_EXTENSION: &str = "pchtxt";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a single line was dropped. Never aborts the file.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LineError {
    #[error("invalid address '{0}'")]
    BadAddress(String),
    #[error("invalid hex value '{token}': {source}")]
    BadHex {
        token: String,
        #[source]
        source: hex::FromHexError,
    },
    #[error("address {address:#X} shifted by {shift} does not fit in 32 bits")]
    AddressOverflow { address: u32, shift: i64 },
    #[error("invalid offset shift '{0}'")]
    BadShift(String),
}

// ---------------------------------------------------------------------------
// Parsed file
// ---------------------------------------------------------------------------

/// Everything extracted from one pchtxt file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    /// Hex identifier of the target binary, case preserved.
    pub binary_id: Option<String>,
    /// `@title`, or [`DEFAULT_DISPLAY_NAME`].
    pub display_name: String,
    /// Last offset shift seen. Already folded into every record address.
    pub offset_shift: i64,
    /// Surviving patch records, in file order.
    pub records: Vec<PatchRecord>,
    /// Set when the file could not be read at all.
    pub error: Option<String>,
}

impl Default for ParsedFile {
    fn default() -> Self {
        Self {
            binary_id: None,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            offset_shift: 0,
            records: Vec::new(),
            error: None,
        }
    }
}

impl ParsedFile {
    /// `@title` if one was given, otherwise the binary id.
    pub fn label(&self) -> Option<&str> {
        if self.display_name != DEFAULT_DISPLAY_NAME {
            Some(&self.display_name)
        } else {
            self.binary_id.as_deref()
        }
    }

    /// File name of the container produced for this file.
    pub fn output_file_name(&self) -> Option<String> {
        self.binary_id.as_ref().map(|id| format!("{id}.ips"))
    }
}
