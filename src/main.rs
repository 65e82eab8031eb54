#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cipher_life::CipherLifeConfig;
use cipher_life::input::{read_ciphertext, resolve_seed};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "cipher-life")]
#[command(version, about = "Decrypt a rotation cipher with a parallel cellular automaton")]
struct Cli {
    /// Input file containing the encrypted string
    #[arg(short, long)]
    input: PathBuf,

    /// Output file for the decrypted string
    #[arg(short, long)]
    output: PathBuf,

    /// Seed pattern over [abc]+, or a file containing one
    #[arg(short, long)]
    seed: String,

    /// Number of workers to split each generation across
    #[arg(short, long, default_value_t = 1)]
    processes: usize,

    /// Upper bound on pool threads (defaults to the worker count)
    #[arg(long)]
    max_threads: Option<usize>,

    /// Log the final grid row by row
    #[arg(long)]
    print_grid: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    if cli.processes == 0 {
        bail!("processes must be greater than 0");
    }

    let ciphertext = read_ciphertext(&cli.input)
        .with_context(|| format!("reading ciphertext from {}", cli.input.display()))?;
    let seed = resolve_seed(&cli.seed).context("resolving seed")?;

    let mut config = CipherLifeConfig::default().worker_count(cli.processes);
    if let Some(n) = cli.max_threads {
        config = config.max_threads(n);
    }

    let start = Instant::now();
    let decryption = cipher_life::decrypt(&ciphertext, &seed, config).context("decrypting")?;
    tracing::info!(
        chars = ciphertext.chars().count(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "decryption complete"
    );

    if cli.print_grid {
        for row in decryption.grid.rows() {
            tracing::info!("{}", row.escape_ascii());
        }
    }

    std::fs::write(&cli.output, &decryption.plaintext)
        .with_context(|| format!("writing plaintext to {}", cli.output.display()))?;
    Ok(())
}
