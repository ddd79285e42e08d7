use std::path::PathBuf;

use clap::Parser;

/// Environment variable naming the dataset to open at startup.
pub const DATA_PATH_ENV: &str = "SKYLINE_ATLAS_DATA";

/// Dataset opened when neither an argument nor the environment names one.
pub const DEFAULT_DATA_PATH: &str = "data/structures.csv";

/// Command-line arguments of the `skyline-atlas` dashboard.
///
/// The startup dataset comes from the positional argument, then
/// [`DATA_PATH_ENV`], then [`DEFAULT_DATA_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "skyline-atlas",
    version,
    about = "Dashboard of the world's tallest freestanding structures"
)]
pub struct DashboardArgs {
    /// Dataset to open at startup (CSV, JSON or Parquet).
    #[arg(value_name = "DATASET", env = DATA_PATH_ENV, default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,
}
