use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "facematch",
    about = "Compare the faces in two images using AWS Rekognition",
    version,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Emit structured JSON to stdout instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (may be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file to use instead of ./facematch.toml or the user config
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Arguments for the default compare run when no subcommand is given
    #[command(flatten)]
    pub compare: CompareArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check both images for faces, then compare them
    Compare(CompareArgs),
    /// Check a single image for faces
    Detect(DetectArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ServiceArgs {
    /// AWS region (falls back to config, then the default provider chain)
    #[arg(long)]
    pub region: Option<String>,

    /// Named AWS profile for credentials
    #[arg(long)]
    pub profile: Option<String>,

    /// Override the Rekognition endpoint (e.g. a local emulator)
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Per-call timeout for remote requests, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct CompareArgs {
    /// Image holding the reference face (defaults to a.png)
    pub source: Option<PathBuf>,

    /// Image to search for the reference face (defaults to b.png)
    pub target: Option<PathBuf>,

    /// Minimum similarity percentage for a match (0-100, defaults to 70)
    #[arg(long, value_parser = parse_threshold)]
    pub threshold: Option<f32>,

    #[command(flatten)]
    pub service: ServiceArgs,
}

#[derive(Debug, Clone, Args)]
pub struct DetectArgs {
    /// Image to check for faces
    pub image: PathBuf,

    #[command(flatten)]
    pub service: ServiceArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl From<bool> for OutputMode {
    fn from(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from(self.json)
    }

    /// The explicit subcommand, or a compare run built from the top-level arguments.
    pub fn into_command(self) -> Commands {
        self.command
            .unwrap_or_else(|| Commands::Compare(self.compare))
    }
}

fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0..=100"))
    }
}
