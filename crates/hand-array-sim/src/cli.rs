//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use hand_array::LayoutKind;

/// Drive the hand-array core through a scripted collect, manipulate and
/// place session against a synthetic floor.
#[derive(Parser, Debug)]
#[command(name = "hand-array-sim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file; built-in defaults when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the layout both arrays start with
    #[arg(short, long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Number of items scattered in front of the left hand
    #[arg(short, long, default_value_t = 5)]
    pub items: usize,

    /// Length of the scripted session in simulated seconds
    #[arg(short, long, default_value_t = 6.0)]
    pub seconds: f32,

    /// Variable (render) frames per simulated second
    #[arg(long, default_value_t = 90)]
    pub fps: u32,

    /// Pace frames in wall-clock time instead of running flat out
    #[arg(long)]
    pub realtime: bool,

    /// Default log level; RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    Linear,
    Circular,
}

impl From<LayoutArg> for LayoutKind {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Linear => LayoutKind::Linear,
            LayoutArg::Circular => LayoutKind::Circular,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
