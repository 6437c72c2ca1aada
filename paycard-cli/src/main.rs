//! Paycard
//!
//! A terminal payment card for one-time stablecoin invoices.

mod clipboard;
mod config;
mod input;
mod render;
mod shutdown;
mod store;

use clap::Parser;
use clipboard::Osc52Clipboard;
use config::ConfigLoader;
use paycard_core::controller::SessionController;
use paycard_core::events::{session_command_channel, session_update_channel};
use paycard_core::processors::{SessionDriver, SystemClock};
use paycard_core::store::OrderIdStore;
use render::Renderer;
use shutdown::{shutdown_signal, spawn_reload_handler};
use std::path::PathBuf;
use std::sync::Arc;
use store::JsonFileStore;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Paycard - one-time stablecoin payment card
#[derive(Parser, Debug)]
#[command(name = "paycard")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./paycard.toml")]
    config: PathBuf,

    /// Override the order identifier of the invoice
    #[arg(long, env = "PAYCARD_ORDER_ID")]
    order_id: Option<String>,

    /// Override the path of the order identifier store
    #[arg(long)]
    store: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, default_value = "false")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.log_json);

    tracing::info!("Starting paycard v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(
        &args.config,
        args.order_id.clone(),
        args.store.clone(),
    ));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // The host records the invoice it is showing
    let store_path = loaded_config.store_path.clone();
    let mut order_store = JsonFileStore::new(&store_path);
    order_store
        .set_order_id(&loaded_config.params.order_id)
        .map_err(|e| {
            tracing::error!("Failed to persist order id: {}", e);
            e
        })?;

    let mut renderer = Renderer::new(std::io::stdout());
    renderer.invoice(&loaded_config.params)?;

    let mut controller = SessionController::new(
        loaded_config.params,
        loaded_config.settings,
        order_store,
        Osc52Clipboard::stdout(),
        time::OffsetDateTime::now_utc(),
    );
    controller.on_expire(|| tracing::info!("Invoice expired, waiting for a new one"));

    // Wire up channels
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);
    let (command_tx, command_rx) = session_command_channel();
    let (update_tx, mut update_rx) = session_update_channel();

    let driver = SessionDriver::new(controller, SystemClock);
    let driver_handle = tokio::spawn(driver.run(shutdown_rx, command_rx, update_tx));

    // Spawn reload handler (listens for SIGHUP)
    let reload_notify = spawn_reload_handler(config_loader, store_path, command_tx.clone());
    input::spawn_input_reader(command_tx, shutdown_tx.clone())?;

    let signal_shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = signal_shutdown_tx.send(true);
    });

    // Render until the driver drops its sender
    while let Some(update) = update_rx.recv().await {
        if let Err(e) = renderer.render(&update) {
            tracing::warn!("Failed to render update: {}", e);
        }
    }

    // Signal the reload handler to stop
    reload_notify.notify_one();

    let controller = driver_handle.await?;
    let signals = controller.signals();
    tracing::info!(
        order_id = %controller.params().order_id,
        show_reentry_prompt = signals.show_reentry_prompt,
        invoice_generated = signals.invoice_generated,
        "Paycard shutdown complete"
    );

    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr so they do not interleave with the card on stdout.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
