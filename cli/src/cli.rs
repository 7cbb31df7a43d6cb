use std::path::PathBuf;

/// Old/new traffic analysis zone comparison CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "viztaz", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Search around an old zone and print the resulting session state as JSON
    Search(SearchArgs),

    /// Summarize the records and columns of a shapefile
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Old zone system shapefile (.shp)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub old: PathBuf,

    /// New zone system shapefile (.shp)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub new: PathBuf,

    /// Census block shapefile (.shp)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub blocks: PathBuf,

    /// Old zone id to search around
    #[arg(long)]
    pub id: String,

    /// Buffer radius in map units, defaults to the configured radius
    #[arg(long, default_value = "")]
    pub radius: String,

    /// Comma-separated old zone ids to outline
    #[arg(long)]
    pub extra: Option<String>,

    /// Row indices to select in the new zone table
    #[arg(long, value_delimiter = ',')]
    pub select_new: Vec<usize>,

    /// Row indices to select in the block table
    #[arg(long, value_delimiter = ',')]
    pub select_blocks: Vec<usize>,

    /// Copy this panel's extent to the other panels (old, new, combined, blocks)
    #[arg(long)]
    pub match_zoom: Option<String>,

    /// Map background (positron, satellite)
    #[arg(long)]
    pub background: Option<String>,

    /// Session config file (JSON)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Output JSON file, defaults to stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Shapefile to summarize (.shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub path: PathBuf,
}
