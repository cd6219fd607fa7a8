#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything shorter than a full codebook must be rejected without panicking
    match htvq::Codebook::from_bytes(data) {
        Ok(codebook) => {
            assert!(data.len() >= htvq::CODEBOOK_FILE_SIZE);
            let _ = codebook.fingerprint();
        }
        Err(e) => assert_eq!(e.kind(), htvq::ErrorKind::CorruptCodebook),
    }
});
