// Commandline argument parser using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(version, about)]
pub struct RangefinderArgs {
    /// JSON configuration file; built-in calibration is used when absent
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CommandTask,
}

#[derive(Debug, Subcommand, Clone)]
pub enum CommandTask {
    /// Filter, differentiate and plot a recorded run
    Process(ProcessCommand),

    /// Empty the record log and delete the rendered plot
    Clear(ClearCommand),

    /// Append one reading to the record log
    Append(AppendCommand),

    /// Write the default configuration as JSON
    Config(ConfigCommand),
}

#[derive(Debug, Args, Clone)]
pub struct ProcessCommand {
    /// Record log to read (defaults to the configured data path)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// SVG plot to write (defaults to the configured plot path)
    #[arg(short = 'p', long = "plot")]
    pub plot: Option<PathBuf>,

    /// Also export the derived series as CSV
    #[arg(long = "csv")]
    pub csv: Option<PathBuf>,

    /// Also export the derived series as JSON
    #[arg(long = "json")]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ClearCommand {
    /// Record log to empty
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Plot to delete
    #[arg(short = 'p', long = "plot")]
    pub plot: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct AppendCommand {
    /// Rangefinder voltage (V)
    #[arg(short = 'd', long = "distance", allow_negative_numbers = true)]
    pub distance: f64,

    /// Potentiometer voltage (V)
    #[arg(short = 'a', long = "angle", allow_negative_numbers = true)]
    pub angle: f64,

    /// Seconds since acquisition start
    #[arg(short = 't', long = "time")]
    pub time: f64,

    /// Record log to append to
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ConfigCommand {
    /// Destination file
    #[arg(short = 'o', long = "out")]
    pub out: PathBuf,
}
