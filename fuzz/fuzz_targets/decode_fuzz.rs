#![no_main]
use libfuzzer_sys::fuzz_target;
use weave::ips32;

fuzz_target!(|data: &[u8]| {
    // The decoder must never panic, only return errors.
    let _ = ips32::decode_all(data);

    // Also exercise the record loop directly behind a valid magic.
    let mut framed = b"IPS32".to_vec();
    framed.extend_from_slice(data);
    let _ = ips32::decode_all(&framed);
});
