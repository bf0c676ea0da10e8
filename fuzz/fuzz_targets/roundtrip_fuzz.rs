#![no_main]
use libfuzzer_sys::fuzz_target;
use weave::ips32::{self, PatchRecord};

fuzz_target!(|data: &[u8]| {
    // Carve the input into records: 4-byte address, 1-byte length, payload.
    let mut records = Vec::new();
    let mut rest = data;
    while rest.len() >= 5 {
        let address = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]);
        let len = (rest[4] as usize).min(rest.len() - 5);
        records.push(PatchRecord::new(address, &rest[5..5 + len]));
        rest = &rest[5 + len..];
    }

    let container = ips32::encode_records(&records).unwrap();
    assert_eq!(container.len(), ips32::encoded_len(&records));

    if records.iter().all(|r| r.address.to_be_bytes() != *b"EEOF") {
        let decoded = ips32::decode_all(&container).unwrap();
        assert_eq!(decoded, records);
    }
});
