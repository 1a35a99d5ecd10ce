use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(author, version, about = "Monthly steel production report", long_about = None)]
pub struct Cli {
    /// Production CSV to load
    #[arg(short, long, default_value = "steel_production.csv")]
    pub input: PathBuf,

    /// Directory receiving the exported tables and chart series
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Number of table rows shown in console previews
    #[arg(long, default_value_t = 5)]
    pub preview_rows: usize,

    /// Load and generate once, without the interactive menu
    #[arg(long)]
    pub batch: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub preview_rows: usize,
    pub batch: bool,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        Self {
            input: cli.input,
            output_dir: cli.output_dir,
            preview_rows: cli.preview_rows.max(1),
            batch: cli.batch,
        }
    }
}
