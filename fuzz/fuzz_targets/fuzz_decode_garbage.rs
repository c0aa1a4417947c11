#![no_main]
use libfuzzer_sys::fuzz_target;
use ppm_pack::{Decompressor, FrozenModel, ModelConfig};
use std::sync::OnceLock;

const TRAINING: &[u8] = b"It was the best of times, it was the worst of times, \
it was the age of wisdom, it was the age of foolishness, it was the epoch of belief, \
it was the epoch of incredulity, it was the season of Light, it was the season of Darkness";

fn model() -> &'static FrozenModel {
    static MODEL: OnceLock<FrozenModel> = OnceLock::new();
    MODEL.get_or_init(|| {
        FrozenModel::from_input(TRAINING, &ModelConfig::default()).expect("model build")
    })
}

fuzz_target!(|data: &[u8]| {
    // Any byte string decodes to something; it must never panic.
    let decompressor = Decompressor::new(model());
    let _ = decompressor.decompress(data, data.len() * 4);
    let _ = decompressor.decompress_to_end(data);
});
