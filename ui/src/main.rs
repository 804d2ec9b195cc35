#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use admin_business::AdminConfig;
use admin_ui::routes::default_routes;
use admin_ui::{AdminApp, PageContext};
use anyhow::Context as _;

mod alloc {
    #[global_allocator]
    static MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
}

fn main() -> anyhow::Result<()> {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_module("egui_winit::clipboard", log::LevelFilter::Off)
        .init();

    let config = AdminConfig::init().context("invalid admin configuration")?;
    let routes = default_routes(&config).context("invalid route configuration")?;

    // Remote calls run here; the UI thread only drains their results.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("admin-io")
        .enable_all()
        .build()
        .context("failed to start the tokio runtime")?;
    let ctx = PageContext::new(config, runtime.handle().clone());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 600.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Admin",
        native_options,
        Box::new(move |_cc| Ok(Box::new(AdminApp::new(ctx, routes)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))?;

    drop(runtime);
    Ok(())
}
