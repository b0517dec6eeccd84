//! Image Tiler - slice an image into a zoomable tile pyramid.
//!
//! This binary parses the command line, sets up logging and runs one job.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_tiler::{
    config::{Cli, Command, SummaryFormat, TileArgs, ZoomArgs},
    NativeZoom, TileReport, Tiler,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Tile(args) => run_tile(args),
        Command::Zoom(args) => run_zoom(args),
    }
}

// =============================================================================
// Tile Command
// =============================================================================

fn run_tile(args: TileArgs) -> ExitCode {
    init_logging(args.verbose);

    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for ignored in args.ignored_inputs() {
        warn!("Ignoring extra input file: {}", ignored.display());
    }

    info!("Configuration:");
    info!("  Output: {}", config.output_dir.display());
    info!("  Format: {}", config.format);
    info!("  Zoom levels: {}", config.zoom_levels);
    info!("  Background: {}", config.bg_color);
    info!("  Tile size: {}px", config.tile_size);

    let tiler = match Tiler::new(config) {
        Ok(tiler) => tiler,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match tiler.make_tiles(args.input()) {
        Ok(report) => exit_code(print_report(&report, args.summary)),
        Err(e) => {
            error!("Tiling failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Print the run summary. Returns `false` if it could not be rendered.
fn print_report(report: &TileReport, format: SummaryFormat) -> bool {
    match format {
        SummaryFormat::Text => {
            println!(
                "Source:  {}x{} px",
                report.source_width, report.source_height
            );
            println!(
                "Canvas:  {}x{} px",
                report.canvas_side, report.canvas_side
            );
            for level in &report.levels {
                println!(
                    "Zoom {:>2}: {}x{} tiles from {}px regions",
                    level.zoom, level.tiles_per_side, level.tiles_per_side, level.tile_length
                );
            }
            println!(
                "Wrote {} {} tiles to {}",
                report.tiles_written,
                report.format,
                report.output_dir.display()
            );
            true
        }
        SummaryFormat::Json => print_json(report),
    }
}

// =============================================================================
// Zoom Command
// =============================================================================

fn run_zoom(args: ZoomArgs) -> ExitCode {
    init_logging(args.verbose);

    let tiler = match args.to_config().and_then(Tiler::new) {
        Ok(tiler) => tiler,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match tiler.native_zoom(&args.input) {
        Ok(estimate) => exit_code(print_estimate(&estimate, args.summary)),
        Err(e) => {
            error!("Failed to estimate zoom: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_estimate(estimate: &NativeZoom, format: SummaryFormat) -> bool {
    match format {
        SummaryFormat::Text => {
            println!("Source:      {}x{} px", estimate.width, estimate.height);
            println!("Canvas:      {}x{} px", estimate.canvas_side, estimate.canvas_side);
            println!("Native zoom: {:.3}", estimate.zoom);
            println!("Use zoom:    {}", estimate.zoom_ceil());
            true
        }
        SummaryFormat::Json => print_json(estimate),
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn print_json<T: serde::Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            error!("Failed to serialize summary: {}", e);
            false
        }
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_tiler=debug"
    } else {
        "image_tiler=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
