// src/main.rs
use eframe::egui;
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

mod analysis;
mod api;
mod app;
mod file;
mod settings;
mod state;
mod ui;

use api::ApiClient;
use app::XrayApp;
use settings::Settings;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("xray_assist=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    init_logging();

    let settings = Settings::load().context("Failed to load settings")?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")?;
    let api = ApiClient::new(&settings);
    tracing::info!(backend = %api.base_url(), "starting X-Ray Assist");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_drag_and_drop(true)
            .with_title("X-Ray Assist"),
        ..Default::default()
    };

    eframe::run_native(
        "X-Ray Assist",
        options,
        Box::new(move |_cc| Box::new(XrayApp::new(api, runtime))),
    ).map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}
