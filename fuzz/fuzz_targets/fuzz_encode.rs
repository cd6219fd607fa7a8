#![no_main]

use htvq::codebook::{vector_len, NUM_STAGES};
use htvq::{CodebookBuilder, HtvqDecoder, HtvqEncoder, VqEncoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // Codebook seeded from the first byte so tables differ between runs
    let seed = data[0];
    let mut builder = CodebookBuilder::new();
    for stage in 0..NUM_STAGES {
        builder.fill_entries(stage, |cw| vec![cw ^ seed; vector_len(stage)]).unwrap();
        builder.fill_lookup(stage, |a, b| a.wrapping_add(b).wrapping_add(seed)).unwrap();
    }
    let codebook = builder.build();

    let pixels: Vec<i32> = data[1..].iter().map(|&b| b as i32).collect();
    let len = pixels.len().min(32);
    let width = len;

    // Unsupported lengths must come back as errors
    let htvq = HtvqEncoder::new(&codebook).encode(&pixels[..len], width, 1);
    let vq = VqEncoder::new(&codebook).encode(&pixels[..len], width, 1);
    assert_eq!(htvq.is_ok(), vq.is_ok());

    if let Ok(cw) = htvq {
        let block = HtvqDecoder::new(&codebook).decode(cw, width, 1).unwrap();
        assert_eq!(block.len(), len);
    }
});
