//! Convert a structure dataset (CSV, JSON or Parquet) into a Parquet file.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use skyline_atlas::data::export::write_parquet;
use skyline_atlas::data::loader::load_file;

#[derive(Debug, Parser)]
#[command(
    name = "export-parquet",
    version,
    about = "Convert a structure dataset (CSV, JSON or Parquet) into a Parquet file"
)]
struct Args {
    /// Dataset to convert.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Parquet file to write. Defaults to INPUT with a `.parquet` extension.
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

impl Args {
    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("parquet"))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let output = args.output_path();

    if output == args.input {
        bail!("refusing to overwrite the input file {}", args.input.display());
    }

    let table = load_file(&args.input)?;
    write_parquet(&table, &output)?;

    println!(
        "Wrote {} structures from {} to {}",
        table.len(),
        args.input.display(),
        output.display()
    );
    Ok(())
}
