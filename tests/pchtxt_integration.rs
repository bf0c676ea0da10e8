// End-to-end tests for pchtxt -> IPS32 conversion.
//
// These tests verify:
//   - The documented conversion scenarios byte for byte
//   - Region handling (@enabled / @disabled / @stop)
//   - Offset shift ordering
//   - Per-line error recovery

use weave::ips32::{self, PatchRecord};
use weave::pchtxt::{self, ParsedFile};

// ===========================================================================
// Helpers
// ===========================================================================

fn convert(text: &str) -> (ParsedFile, Vec<u8>) {
    let parsed = pchtxt::parse_str(text);
    let container = ips32::encode_records(&parsed.records).unwrap();
    (parsed, container)
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn scenario_single_hex_record() {
    let (parsed, container) = convert("@nsobid 1A2B3C\n@enabled\n100 DEADBEEF\n");
    assert_eq!(parsed.binary_id.as_deref(), Some("1A2B3C"));
    assert_eq!(
        parsed.records,
        vec![PatchRecord::new(0x100, [0xDE, 0xAD, 0xBE, 0xEF])]
    );

    let mut expected = b"IPS32".to_vec();
    expected.extend_from_slice(b"\x00\x00\x01\x00");
    expected.extend_from_slice(b"\x00\x04");
    expected.extend_from_slice(b"\xDE\xAD\xBE\xEF");
    expected.extend_from_slice(b"EEOF");
    assert_eq!(container, expected);
}

#[test]
fn scenario_shifted_text_record() {
    let (parsed, _) = convert("@flag offset_shift 0x10\n@enabled\n10 \"hi\\n\"\n");
    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.records[0].address, 0x20);
    assert_eq!(parsed.records[0].payload, b"hi\n");
}

#[test]
fn scenario_missing_identifier() {
    let (parsed, _) = convert("@enabled\n100 AA\n200 BB\n300 CC\n");
    assert!(parsed.binary_id.is_none());
    assert_eq!(parsed.records.len(), 3);
    assert!(parsed.output_file_name().is_none());
}

#[test]
fn scenario_odd_hex_is_dropped() {
    let (parsed, _) = convert("@nsobid 01\n@enabled\n10 ABC\n20 ABCD\n");
    assert_eq!(parsed.records, vec![PatchRecord::new(0x20, [0xAB, 0xCD])]);
}

// ===========================================================================
// Regions
// ===========================================================================

#[test]
fn nothing_before_first_enabled() {
    let (parsed, container) = convert("@nsobid 01\n10 AA\n20 BB\n");
    assert!(parsed.records.is_empty());
    assert_eq!(container, b"IPS32EEOF");
}

#[test]
fn everything_after_stop_is_inert() {
    let head = "@nsobid 01\n@title Head\n@enabled\n10 AA\n";
    let tail = "@nsobid 02\n@title Tail\n@flag offset_shift 0x1000\n@enabled\n20 BB\n";
    let with_tail = pchtxt::parse_str(&format!("{head}@stop\n{tail}"));
    let without_tail = pchtxt::parse_str(&format!("{head}@stop\n"));
    assert_eq!(with_tail, without_tail);
    assert_eq!(with_tail.binary_id.as_deref(), Some("01"));
    assert_eq!(with_tail.display_name, "Head");
}

#[test]
fn multiple_regions_keep_file_order() {
    let text = "\
@nsobid 01
@enabled
300 03
@disabled
// a disabled alternative
250 FF
@enabled
100 01
";
    let (parsed, _) = convert(text);
    let addrs: Vec<u32> = parsed.records.iter().map(|r| r.address).collect();
    assert_eq!(addrs, [0x300, 0x100]);
}

// ===========================================================================
// Offset shift
// ===========================================================================

#[test]
fn shift_is_not_retroactive() {
    let text = "\
@enabled
1000 AA
@flag offset_shift 0x100
1000 BB
@flag offset_shift 0
1000 CC
";
    let (parsed, _) = convert(text);
    let addrs: Vec<u32> = parsed.records.iter().map(|r| r.address).collect();
    assert_eq!(addrs, [0x1000, 0x1100, 0x1000]);
    assert_eq!(parsed.offset_shift, 0);
}

#[test]
fn decimal_shift() {
    let (parsed, _) = convert("@flag offset_shift 256\n@enabled\n0 00\n");
    assert_eq!(parsed.records[0].address, 0x100);
}

// ===========================================================================
// Realistic file
// ===========================================================================

#[test]
fn realistic_pchtxt() {
    let text = "\
@title \"60 FPS\"
@nsobid-0123456789ABCDEF0123456789ABCDEF

# Frame limiter
@flag offset_shift 0x100

@enabled
// mov w0, #1
0012F3A0 20008052
0012F3A4 C0035FD6
@disabled

@enabled
00200000 \"Weave\\0\"
@stop

Anything down here is free text.
";
    let (parsed, container) = convert(text);
    assert_eq!(
        parsed.binary_id.as_deref(),
        Some("0123456789ABCDEF0123456789ABCDEF")
    );
    assert_eq!(parsed.display_name, "60 FPS");
    assert_eq!(
        parsed.records,
        vec![
            PatchRecord::new(0x0012_F4A0, [0x20, 0x00, 0x80, 0x52]),
            PatchRecord::new(0x0012_F4A4, [0xC0, 0x03, 0x5F, 0xD6]),
            PatchRecord::new(0x0020_0100, b"Weave\0".to_vec()),
        ]
    );
    assert_eq!(container.len(), ips32::encoded_len(&parsed.records));
    assert_eq!(ips32::decode_all(&container).unwrap(), parsed.records);
}
