//! The `hexmap` binary: builds a map, optionally loads or scripts edits,
//! triangulates it and reports mesh statistics.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p hexmap-app -- --demo --stats-json stats.json`.

use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

use clap::Parser;
use hexmap_app::demo::run_demo;
use hexmap_app::{AppError, HexMapSession, PlatformDirs};
use hexmap_config::{CliArgs, Config};
use tracing::info;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "hexmap failed");
            eprintln!("hexmap: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let dirs = match &args.config {
        Some(dir) => PlatformDirs::with_config_dir(dir),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(args);

    hexmap_log::init_logging(Some(&dirs.log_dir), Some(&config));
    info!(config_dir = %dirs.config_dir.display(), "hexmap starting");

    let mut session = HexMapSession::new(&config)?;
    if let Some(path) = &args.load {
        session.load_map(path)?;
    }
    if args.demo {
        let edited = run_demo(&mut session);
        info!(edited, "demo script applied");
    }

    let rebuilt = session.tick();
    let stats = session.stats();
    info!(
        rebuilt,
        triangles = stats.total_triangles(),
        rivers = stats.river_cells,
        roads = stats.road_cells,
        underwater = stats.underwater_cells,
        "triangulation complete"
    );
    for buffer in &stats.buffers {
        info!(
            buffer = buffer.name,
            vertices = buffer.vertices,
            triangles = buffer.triangles
        );
    }

    if let Some(path) = &args.save {
        session.save_map(path)?;
    }
    if let Some(path) = &args.stats_json {
        let file = File::create(path).map_err(|source| AppError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), &stats)?;
        info!(path = %path.display(), "stats written");
    }
    Ok(())
}
