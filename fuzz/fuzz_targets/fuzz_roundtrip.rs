#![no_main]
use libfuzzer_sys::fuzz_target;
use ppm_pack::{Compressor, Decompressor, FrozenModel, ModelConfig};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the order and pruning threshold.
    let max_order = (data[0] % 5) as usize;
    let threshold = u64::from(data[0] >> 3);
    let input = &data[1..];

    let config = ModelConfig::default()
        .with_max_order(max_order)
        .with_prune_threshold(threshold);
    let model = FrozenModel::from_input(input, &config).expect("model build");
    let packed = Compressor::new(&model).compress(input).expect("compress");
    let unpacked = Decompressor::new(&model)
        .decompress(&packed, input.len())
        .expect("decompress");

    assert_eq!(unpacked.as_slice(), input);
});
