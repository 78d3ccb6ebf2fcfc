use std::path::PathBuf;

/// Disparity maps of CS course access (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "csaccess", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Summarize census data over each school's catchment block groups
    Catchment(CatchmentArgs),

    /// Classify one numeric column of a CSV into disparity bins
    Classify(ClassifyArgs),

    /// Render a choropleth map described by a JSON config
    Map(MapArgs),

    /// List the built-in schemes and underlays
    Presets(PresetsArgs),

    /// Count over, parity and under representation in a CSV column
    Represent(RepresentArgs),
}

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Input CSV table with a header row
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Column holding the value to classify, e.g. RI_Black
    #[arg(short, long)]
    pub column: String,

    /// Column holding row ids (row numbers when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Built-in scheme name, e.g. ri_black
    #[arg(short, long, conflicts_with = "config", required_unless_present = "config")]
    pub preset: Option<String>,

    /// JSON file with a custom scheme
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Output CSV, defaults to "./classified.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct MapArgs {
    /// Map configuration (JSON)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Output SVG, overriding the config's "output"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct PresetsArgs {
    /// Print one preset as JSON instead of the summary table
    pub name: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RepresentArgs {
    /// Input CSV table with a header row
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Representation index column, e.g. RI_Female
    #[arg(short, long)]
    pub column: String,

    /// Column to group counts by, e.g. LOCALE
    #[arg(short, long)]
    pub group: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct CatchmentArgs {
    /// School to block-group assignments (school id, GEOID, distance)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub assignments: PathBuf,

    /// Block-group census table keyed by GEOID
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub census: PathBuf,

    /// Output CSV, defaults to "./catchments.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Count column reported as a population percentage (repeatable)
    #[arg(long = "share")]
    pub shares: Vec<String>,

    /// Population group given a harmonic-mean distance (repeatable)
    #[arg(long = "distance-population")]
    pub distance_populations: Vec<String>,

    /// Per-capita income column
    #[arg(long)]
    pub income: Option<String>,
}
