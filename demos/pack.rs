//! Build a model for a file, compress it, and verify the round trip.
//!
//! Usage:
//!   cargo run --release --example pack -- <file> [--max-order N] [--threshold N] [--bits]
//!
//! Set `RUST_LOG=ppm_pack=debug` to see per-phase model statistics.

use ppm_pack::{Compressor, Decompressor, FrozenModel, ModelConfig};
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!("Usage: pack <file> [--max-order N] [--threshold N] [--bits]");
    eprintln!("  pack ./book.txt --max-order 3");
    std::process::exit(1);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let mut path = None;
    let mut config = ModelConfig::default();
    let mut print_bits = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--max-order" => {
                let value = args.next().unwrap_or_else(|| usage());
                config = config.with_max_order(value.parse()?);
            }
            "--threshold" => {
                let value = args.next().unwrap_or_else(|| usage());
                config = config.with_prune_threshold(value.parse()?);
            }
            "--bits" => print_bits = true,
            _ if path.is_none() => path = Some(arg),
            _ => usage(),
        }
    }
    let path = path.unwrap_or_else(|| usage());

    let input = std::fs::read(&path)?;
    tracing::info!(path = %path, bytes = input.len(), "read input");

    let model = FrozenModel::from_input(&input, &config)?;
    for stats in model.stats() {
        println!("{}", stats);
    }

    let packed = Compressor::new(&model).compress(&input)?;
    if print_bits {
        let bits: String = packed.iter().map(|byte| format!("{:08b}", byte)).collect();
        println!("{}", bits);
    }
    let ratio = if input.is_empty() {
        0.0
    } else {
        packed.len() as f64 / input.len() as f64
    };
    println!(
        "Encoded size: {} bytes ({} input, ratio {:.3}, {:.3} bits/byte)",
        packed.len(),
        input.len(),
        ratio,
        ratio * 8.0
    );

    let unpacked = Decompressor::new(&model).decompress(&packed, input.len())?;
    if unpacked != input {
        return Err("round trip mismatch".into());
    }
    println!("Round trip OK");

    Ok(())
}
