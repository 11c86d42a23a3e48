use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use labparse::model::Layout;

#[derive(Parser, Debug)]
#[command(
    name = "labparse",
    version,
    about = "Heuristic extraction of lab protocols and material layouts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a free-text protocol into structured form data.
    Protocol(ProtocolArgs),
    /// Parse a storage grid or material table into placements.
    Materials(MaterialsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ProtocolArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct MaterialsArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LayoutMode::Auto)]
    pub layout: LayoutMode,

    #[arg(long, default_value_t = 0.0)]
    pub min_confidence: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum LayoutMode {
    Auto,
    Grid,
    Tabular,
}

impl LayoutMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Grid => "grid",
            Self::Tabular => "tabular",
        }
    }

    pub fn forced(self) -> Option<Layout> {
        match self {
            Self::Auto => None,
            Self::Grid => Some(Layout::Grid),
            Self::Tabular => Some(Layout::Tabular),
        }
    }
}
