//! A thin demonstration CLI around [`decomp_core::to_pseudo_code`]. This is
//! ambient tooling to exercise the library from a terminal — the real
//! CLI/GUI front end this core is meant to sit behind is out of scope (see
//! SPEC_FULL Non-goals).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use decomp_core::options::Options;

/// Decompile a flat binary function body into C-like pseudocode.
#[derive(Parser, Debug)]
#[command(name = "decomp-core", author, version, about)]
struct Cli {
    /// Path to a flat binary file containing exactly one function's bytes.
    input: PathBuf,

    /// Virtual address of the first byte of `input`, in hex (e.g. `140001000`).
    #[arg(long, value_parser = parse_hex_u64, default_value = "0")]
    base_address: u64,

    /// Name to give the decompiled function in the printed signature.
    #[arg(long, default_value = "sub")]
    name: String,

    /// Cap on how many bytes of `input` are fed to the decoder.
    #[arg(long)]
    max_bytes: Option<usize>,

    /// Suppress the prologue/epilogue-detection comment block.
    #[arg(long)]
    no_header: bool,
}

fn parse_hex_u64(s: &str) -> Result<u64, std::num::ParseIntError> {
    u64::from_str_radix(s.trim_start_matches("0x"), 16)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let bytes = fs::read(&cli.input).with_context(|| format!("reading {}", cli.input.display()))?;

    let options = Options {
        base_address: cli.base_address,
        function_name: cli.name,
        max_bytes: cli.max_bytes,
        emit_header_comment: !cli.no_header,
        ..Options::default()
    };

    let pseudocode = decomp_core::to_pseudo_code(&bytes, &options).context("decompiling input")?;
    print!("{pseudocode}");

    Ok(())
}
