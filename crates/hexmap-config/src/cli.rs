//! Command-line argument parsing for the hex map tool.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Hex map command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "hexmap", about = "Hex terrain triangulator")]
pub struct CliArgs {
    /// Chunks along the X axis.
    #[arg(long)]
    pub chunks_x: Option<u32>,

    /// Chunks along the Z axis.
    #[arg(long)]
    pub chunks_z: Option<u32>,

    /// Perturbation noise seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Map file to load after the grid is built.
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Map file to write after the last tick.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Run the scripted demo edits (hill, river, road, lake).
    #[arg(long)]
    pub demo: bool,

    /// Write mesh statistics as JSON to this file.
    #[arg(long)]
    pub stats_json: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(x) = args.chunks_x {
            self.map.chunk_count_x = x;
        }
        if let Some(z) = args.chunks_z {
            self.map.chunk_count_z = z;
        }
        if let Some(seed) = args.seed {
            self.terrain.noise_seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
