#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Malformed streams must fail with an error, never panic or over-allocate
    let _ = htvq::container::read_image(&mut Cursor::new(data));
});
