mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui;

use app::DoraApp;
use dora_eda::{DataSource, Session, SplitConfig};
use state::ExplorerState;

/// Explore a tabular dataset: transform features, snapshot, and plot each
/// input against the output column.
#[derive(Parser, Debug)]
#[command(name = "dora", version, about)]
struct Cli {
    /// CSV/TSV file to open at start-up
    data: Option<PathBuf>,

    /// Output (target) column
    #[arg(short, long)]
    output: Option<String>,

    /// Training fraction used by the split preview
    #[arg(long, default_value_t = 0.8)]
    ratio: f64,

    /// Seed for a reproducible split preview
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut session = Session::new();
    session
        .configure(cli.data.clone().map(DataSource::Csv), cli.output.as_deref())
        .with_context(|| match &cli.data {
            Some(path) => format!("loading {}", path.display()),
            None => "configuring session".to_string(),
        })?;

    let split_config = SplitConfig {
        ratio: cli.ratio,
        seed: cli.seed,
    };
    let state = ExplorerState::new(session, split_config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dora – Exploratory Data Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(DoraApp::new(state)))),
    )
    .map_err(|e| anyhow!("running explorer window: {e}"))
}
