//! # imzo_hash
//! Command line front end for the GOST R 34.11-94 and CRC-32 primitives. Digests go to
//! stdout, logs (`RUST_LOG`) and progress to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use imzo_hash::GostHash;
use indicatif::ProgressBar;
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "imzo_hash", about = "GOST R 34.11-94 and CRC-32 digests", long_about = None)]
struct Cli {
    /// Print the result in upper case, the way legacy clients present it.
    #[arg(long, global = true)]
    upper: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// GOST digest of text.
    Hash { text: String },
    /// GOST digest of hex encoded bytes.
    HashHex { hex: String },
    /// CRC-32 of text, without zero padding.
    Crc32 { text: String },
    /// CRC-32 of hex encoded bytes, padded to 8 digits.
    Crc32Hex { hex: String },
    /// GOST digest of a file's contents.
    HashFile { path: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let out = match &cli.command {
        Command::Hash { text } => imzo_hash::hash(text)?,
        Command::HashHex { hex } => imzo_hash::hash_hex(hex)?,
        Command::Crc32 { text } => imzo_hash::crc32_calc(text),
        Command::Crc32Hex { hex } => imzo_hash::crc32_calc_hex(hex)?,
        Command::HashFile { path } => hash_file(path)?,
    };

    if cli.upper {
        println!("{}", out.to_uppercase());
    } else {
        println!("{}", out);
    }

    Ok(())
}

fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let len = file.metadata()?.len();

    let progress = ProgressBar::new(len);
    let mut hasher = GostHash::new();
    io::copy(&mut progress.wrap_read(file), &mut hasher)
        .with_context(|| format!("failed to read {}", path.display()))?;
    progress.finish_and_clear();

    info!(path = %path.display(), bytes = hasher.len(), "hashed file");
    Ok(hasher.finalize().to_hex())
}
