// Line classification for the pchtxt format.
//
// Every trimmed, non-blank line maps to exactly one `Line`. The order of
// the checks in `classify` is significant: metadata directives win over the
// control keywords, which win over patch data.

use super::LineError;

/// Control keyword prefixes.
const ENABLED: &str = "@enabled";
const DISABLED: &str = "@disabled";
const STOP: &str = "@stop";

/// Markers that make a line inert even inside an enabled region.
const COMMENT_MARKERS: [char; 3] = ['/', '#', '@'];

/// A classified pchtxt line, borrowing from the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// `@flag nsobid <hex>` or `@nsobid[- ]<hex>`.
    BinaryId(&'a str),
    /// `@title <text>`, one layer of surrounding quotes removed.
    Title(&'a str),
    /// `@flag offset_shift <value>`; the value is parsed by the caller so a
    /// bad number only drops this line.
    OffsetShift(&'a str),
    Enabled,
    Disabled,
    Stop,
    /// Comment or unrecognized directive.
    Ignored,
    /// Anything else; only meaningful inside an enabled region.
    Patch(&'a str),
}

/// Classify one line. The input must already be trimmed.
pub fn classify(line: &str) -> Line<'_> {
    if let Some(id) = binary_id(line) {
        return Line::BinaryId(id);
    }
    if let Some(title) = title(line) {
        return Line::Title(title);
    }
    if let Some(value) = offset_shift(line) {
        return Line::OffsetShift(value);
    }

    if line.starts_with(ENABLED) {
        Line::Enabled
    } else if line.starts_with(DISABLED) {
        Line::Disabled
    } else if line.starts_with(STOP) {
        Line::Stop
    } else if line.starts_with(COMMENT_MARKERS) {
        Line::Ignored
    } else {
        Line::Patch(line)
    }
}

// ---------------------------------------------------------------------------
// Metadata directives
// ---------------------------------------------------------------------------

/// Strip `keyword` plus at least one whitespace character.
fn keyword_arg<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    let arg = rest.trim_start();
    (arg.len() < rest.len()).then_some(arg)
}

/// Leading run of ASCII hex digits, if non-empty.
fn hex_prefix(s: &str) -> Option<&str> {
    let end = s
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(s.len());
    (end > 0).then(|| &s[..end])
}

/// Both identifier spellings resolve here so the grammar stays in one place.
fn binary_id(line: &str) -> Option<&str> {
    if let Some(id) = keyword_arg(line, "@flag")
        .and_then(|rest| keyword_arg(rest, "nsobid"))
        .and_then(hex_prefix)
    {
        return Some(id);
    }

    let rest = line.strip_prefix("@nsobid")?;
    let rest = rest
        .strip_prefix(['-', ' '])
        .unwrap_or(rest);
    hex_prefix(rest)
}

fn title(line: &str) -> Option<&str> {
    let text = keyword_arg(line, "@title")?;
    if text.is_empty() {
        return None;
    }
    Some(
        text.strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(text),
    )
}

fn offset_shift(line: &str) -> Option<&str> {
    keyword_arg(line, "@flag")
        .and_then(|rest| keyword_arg(rest, "offset_shift"))
        .and_then(|value| value.split_whitespace().next())
}

/// Parse an offset shift value: `0x`-prefixed hex or plain decimal.
pub fn parse_shift(value: &str) -> Result<i64, LineError> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => value.parse::<i64>(),
    };
    parsed.map_err(|_| LineError::BadShift(value.to_string()))
}
