//! Sample dataset generator.
//!
//! Writes a grouped regions › stores › orders dataset in the line format
//! the viewer reads. A `.br` output path is Brotli-compressed.

use anyhow::{bail, Context, Result};
use rtable::virtual_dataset::{self, VirtualDatasetConfig};
use rtable::write_dataset;
use std::env;
use std::path::PathBuf;

struct Args {
    dataset: VirtualDatasetConfig,
    output: PathBuf,
}

fn next_value<T>(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(value) = args.next() else {
        bail!("{flag} requires an argument");
    };
    value.parse().with_context(|| format!("Invalid value for {flag}: {value}"))
}

fn parse_args() -> Result<Args> {
    let mut dataset = VirtualDatasetConfig::default();
    let mut output = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--regions" => dataset.regions = next_value(&mut args, "--regions")?,
            "--stores" => dataset.max_stores = next_value(&mut args, "--stores")?,
            "--orders" => dataset.max_orders = next_value(&mut args, "--orders")?,
            "--seed" => dataset.seed = next_value(&mut args, "--seed")?,
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("Unknown argument: {flag}"),
            path => {
                if output.replace(PathBuf::from(path)).is_some() {
                    bail!("Only one output path may be given");
                }
            }
        }
    }

    Ok(Args {
        dataset,
        output: output.unwrap_or_else(|| PathBuf::from("dataset.jsonl")),
    })
}

fn print_help() {
    let defaults = VirtualDatasetConfig::default();
    println!("Grouped Dataset Generator");
    println!("Usage: rtable-datagen [OPTIONS] [OUTPUT]");
    println!();
    println!("OPTIONS:");
    println!("  --regions <N>   Number of top-level regions (default: {})", defaults.regions);
    println!("  --stores <N>    Maximum stores per region (default: {})", defaults.max_stores);
    println!("  --orders <N>    Maximum orders per store (default: {})", defaults.max_orders);
    println!("  --seed <N>      Random seed (default: {})", defaults.seed);
    println!();
    println!("OUTPUT defaults to dataset.jsonl; end it in .br for Brotli compression.");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = parse_args()?;
    let dataset = virtual_dataset::generate(&args.dataset);
    write_dataset(&args.output, &dataset)?;

    tracing::info!(
        path = %args.output.display(),
        rows = dataset.total_rows(),
        "dataset written"
    );
    Ok(())
}
