#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The format window is 64 KB; clamp the fuzz input to stay encodable.
    let data = &data[..data.len().min(lz4k::MAX_INPUT_SIZE)];

    let mut state = lz4k::CompressState::new_boxed();
    let compressed = lz4k::compress_to_vec(&mut state, data);
    assert!(
        !compressed.is_empty(),
        "bound-sized compression must not fail for {} bytes",
        data.len()
    );

    // Decompress back, supplying the exact original length as capacity.
    let recovered = lz4k::decompress_to_vec(&compressed, data.len());
    assert_eq!(
        recovered,
        data,
        "block round-trip mismatch: {} compressed bytes back to {} bytes (expected {})",
        compressed.len(),
        recovered.len(),
        data.len()
    );
});
