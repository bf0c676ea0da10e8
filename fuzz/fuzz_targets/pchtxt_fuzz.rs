#![no_main]
use libfuzzer_sys::fuzz_target;
use weave::{ips32, pchtxt};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let parsed = pchtxt::parse_str(&text);

    // Records within the 16-bit length limit must always encode.
    if parsed.records.iter().all(|r| r.is_encodable()) {
        ips32::encode_records(&parsed.records).unwrap();
    }
});
