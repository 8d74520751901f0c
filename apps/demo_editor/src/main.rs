use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::Context;
use clap::Parser;
use client_core::config::{load_settings_from, DEFAULT_SETTINGS_FILE};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{DemoEditorApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(about = "Edit the demo project and deploy it")]
struct Args {
    /// Deployment endpoint; overrides the settings file and environment.
    #[arg(long)]
    endpoint: Option<String>,
    /// Settings file to read.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings_from(&args.config)?;
    if let Some(endpoint) = args.endpoint {
        settings.endpoint = endpoint;
    }
    settings.endpoint_url()?;

    let startup = StartupConfig {
        endpoint: settings.endpoint.clone(),
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Deploy Demo Editor")
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Deploy Demo Editor",
        options,
        Box::new(|_cc| Ok(Box::new(DemoEditorApp::new(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
    .context("editor window failed")
}
