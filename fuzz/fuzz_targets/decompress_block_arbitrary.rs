#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes through the block decompressor.
    // Err results are expected and fine; what we verify is no panics and no
    // out-of-bounds access.

    // Zero-length output buffer.
    {
        let mut dst = vec![0u8; 0];
        let _ = lz4k::decompress(data, &mut dst);
    }

    // 4 KiB output buffer, the page size real callers use.
    {
        let mut dst = vec![0u8; 4096];
        let _ = lz4k::decompress(data, &mut dst);
    }

    // Output buffer as large as the data itself.
    if !data.is_empty() {
        let mut dst = vec![0u8; data.len()];
        let _ = lz4k::decompress(data, &mut dst);
    }

    // Large output buffer to stress the length-claim paths.
    {
        // Cap at 1 MiB so the fuzzer doesn't OOM on tiny inputs that claim
        // huge output.
        let large = (data.len().saturating_mul(255)).min(1 << 20);
        let mut dst = vec![0u8; large];
        let _ = lz4k::decompress(data, &mut dst);
    }
});
