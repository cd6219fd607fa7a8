#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 || data[0] != b'P' {
        return;
    }

    let _ = htvq::image::pgm::read(data);
});
