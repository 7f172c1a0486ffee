mod app;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use eframe::egui;

use grid_trail::config::{OverlayConfig, DEFAULT_TARGET_CLASS};
use grid_trail::SAMPLE_MARKUP;

use app::TrailApp;

/// Render a markup fragment with a measured grid, a coordinate trail and an
/// element picker on top.
#[derive(Debug, Parser)]
#[command(name = "grid-trail", version, about)]
struct Cli {
    /// Markup file to render instead of the built-in sample
    #[arg(long, value_name = "FILE")]
    markup: Option<PathBuf>,

    /// Grid cell width in pixels
    #[arg(long, default_value_t = 10.0)]
    cell_width: f32,

    /// Grid cell height in pixels
    #[arg(long, default_value_t = 10.0)]
    cell_height: f32,

    /// Class marking the element the grid and trail attach to
    #[arg(long, default_value = DEFAULT_TARGET_CLASS)]
    target_class: String,

    /// Quiet period before re-measuring after a resize, in milliseconds
    #[arg(long, default_value_t = 100)]
    debounce_ms: u64,

    /// Start in full screen mode
    #[arg(long)]
    full_screen: bool,

    /// Start with element detection on
    #[arg(long)]
    detect: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let markup = match cli.markup {
        Some(ref path) => match std::fs::read_to_string(path) {
            Ok(markup) => markup,
            Err(e) => {
                eprintln!("grid-trail: cannot read {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => SAMPLE_MARKUP.to_string(),
    };

    let config = OverlayConfig::default()
        .with_grid(cli.cell_width, cli.cell_height)
        .with_target_class(cli.target_class)
        .with_debounce(Duration::from_millis(cli.debounce_ms));

    let app = match TrailApp::new(config, markup, cli.full_screen, cli.detect) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("grid-trail: {e}");
            return ExitCode::FAILURE;
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    match eframe::run_native(
        "Interactive Code Renderer with Trail",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("window closed with error: {}", e);
            ExitCode::FAILURE
        }
    }
}
