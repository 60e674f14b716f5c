//! Fuzz target for the header cipher.
//!
//! # Invariants
//!
//! - Before install both directions are identity
//! - A mirrored decode state inverts the send recurrence for any key and
//!   any header sequence
//! - Reinstalling the same key never rewinds rolling state

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use hearthlink_proto::HeaderCipher;
use hearthlink_proto::cipher::SESSION_KEY_LEN;

#[derive(Debug, Clone, Arbitrary)]
struct CipherCase {
    key: [u8; SESSION_KEY_LEN],
    headers: Vec<[u8; 6]>,
}

fuzz_target!(|case: CipherCase| {
    // Identity before install.
    let mut uninstalled = HeaderCipher::new();
    for original in &case.headers {
        let mut header = *original;
        uninstalled.encode_send_header(&mut header);
        assert_eq!(&header, original);
    }

    // Paired encode/decode across the whole sequence.
    let mut sender = HeaderCipher::new();
    sender.install(case.key);

    let mut index = 0usize;
    let mut last = 0u8;
    for original in &case.headers {
        let mut wire = *original;
        sender.encode_send_header(&mut wire);

        // Reinstalling mid-stream must not reset the recurrence.
        sender.install(case.key);

        let mut decoded = wire;
        for byte in decoded.iter_mut() {
            let b = *byte;
            *byte = b.wrapping_sub(last) ^ case.key[index];
            index = (index + 1) % SESSION_KEY_LEN;
            last = b;
        }
        assert_eq!(&decoded, original);
    }
});
