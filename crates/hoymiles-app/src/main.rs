mod cli;
mod worker;

use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use hoymiles_common::new_ident;
use hoymiles_widget::{
    FrameContentStore, MirrorModule, RefreshRequest, Widget, WidgetLink,
};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Initialize logging
    let log_directive = args.log_level.as_deref().unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("Mirror-Hoymiles v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load config
    let config = match &args.config {
        Some(path) => hoymiles_config::load_from_path(Path::new(path)),
        None => hoymiles_config::load_config(),
    };
    let mut config = config.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        hoymiles_config::WidgetConfig::default()
    });

    // Assign an ident when the config leaves it to us
    if config.ident.is_empty() {
        config.ident = new_ident();
        tracing::info!("Assigned widget ident: {}", config.ident);
    }
    tracing::info!(
        "Config loaded (ident: {}, frames: {}, interval: {}ms)",
        config.ident,
        config.frames.len(),
        config.update_interval
    );

    if args.show_config {
        println!("{}", hoymiles_config::config_to_json(&config));
        return;
    }

    // Wire widget, worker and the host refresh queue
    let (widget_link, worker_link) = hoymiles_widget::link();
    let WidgetLink {
        requests,
        mut events,
    } = widget_link;
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let store = Arc::new(Mutex::new(FrameContentStore::new()));
    tokio::spawn(worker::run(worker_link, Arc::clone(&store)));

    let mut widget = Widget::new(config, requests, update_tx);
    if let Err(e) = widget.start() {
        tracing::error!("Widget start failed: {e}");
        return;
    }

    // Host loop: forward worker events, re-read the DOM on refresh requests
    let mut renders: u64 = 0;
    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                widget.notification_received(event);
            }
            Some(RefreshRequest) = update_rx.recv() => {
                let dom = widget.get_dom();
                renders += 1;
                tracing::info!(render = renders, "DOM refreshed");
                println!("{}", dom.to_html());

                // What the worker would serve for each html frame
                let store = store.lock().unwrap();
                for frame in widget.frame_handles() {
                    if let Some((mime, body)) = store.resolve(&frame.id().served_path()) {
                        tracing::debug!(
                            frame = %frame.id(),
                            mime,
                            bytes = body.len(),
                            "frame content available"
                        );
                    }
                }

                if args.cycles.is_some_and(|n| renders >= n) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl-C received, shutting down");
                break;
            }
        }
    }
    tracing::info!("Shutdown complete");
}
