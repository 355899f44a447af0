use clap::{
    Parser,
    Subcommand,
};
use hrmsfeat::ValueSelector;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pick and qualify peaks in intensity matrix files.
    Pick(PickArgs),
    /// Align peak tables and build the feature matrix.
    Align(AlignArgs),
    /// Pick, align and build the feature matrix in one go.
    Run(RunArgs),
    /// Write a template configuration file.
    WriteTemplate(WriteTemplateArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MatrixValue {
    Area,
    Intensity,
}

impl From<MatrixValue> for ValueSelector {
    fn from(value: MatrixValue) -> Self {
        match value {
            MatrixValue::Area => ValueSelector::Area,
            MatrixValue::Intensity => ValueSelector::Intensity,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct PickArgs {
    /// Intensity matrix files (`.json` or dense `.csv`).
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// The path to the json configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the peak tables.
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Number of files processed at the same time.
    #[arg(short, long)]
    pub workers: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct AlignArgs {
    /// Peak tables written by `pick`, in the order they should be pooled.
    #[arg(required = true)]
    pub tables: Vec<PathBuf>,

    /// The path to the json configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the aligned tables and the feature matrix.
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Value reported in the feature matrix.
    #[arg(long, value_enum)]
    pub value: Option<MatrixValue>,

    /// Precomputed isotope ratio table to carry next to the matrix.
    #[arg(long)]
    pub isotope_ratios: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Intensity matrix files (`.json` or dense `.csv`).
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// The path to the json configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for every output table.
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Number of files processed at the same time.
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Value reported in the feature matrix.
    #[arg(long, value_enum)]
    pub value: Option<MatrixValue>,

    /// Precomputed isotope ratio table to carry next to the matrix.
    #[arg(long)]
    pub isotope_ratios: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct WriteTemplateArgs {
    /// The path to the output files.
    #[arg(short, long)]
    pub output_path: PathBuf,
}
