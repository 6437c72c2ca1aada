//! Signal handling for graceful shutdown and invoice reload.

use crate::config::{ConfigLoader, LoadedConfig};
use crate::store::JsonFileStore;
use paycard_core::events::{SessionCommand, SessionCommandSender};
use paycard_core::store::{OrderIdStore, StoreError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::Notify;

/// Creates a future that completes when a shutdown signal is received.
///
/// Listens for SIGTERM and SIGINT (Ctrl+C).
pub async fn shutdown_signal() {
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
    }
}

/// Spawns a task that listens for SIGHUP, reloads the configuration and
/// replaces the running session with the reloaded invoice.
///
/// `store_path` is the store the running session clears on expiry; the
/// replacement invoice is persisted there.
///
/// Returns a Notify that can be used to signal when shutdown is complete.
pub fn spawn_reload_handler(
    config_loader: Arc<ConfigLoader>,
    store_path: PathBuf,
    command_tx: SessionCommandSender,
) -> Arc<Notify> {
    let shutdown_notify = Arc::new(Notify::new());
    let shutdown_notify_clone = shutdown_notify.clone();

    tokio::spawn(async move {
        let mut sighup = signal(SignalKind::hangup()).expect("failed to install SIGHUP handler");

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    tracing::info!("Received SIGHUP, loading a new invoice");
                    let loaded_config = match config_loader.reload() {
                        Ok(loaded_config) => loaded_config,
                        Err(e) => {
                            tracing::error!("Failed to reload configuration: {}", e);
                            continue;
                        }
                    };

                    let order_id = loaded_config.params.order_id.clone();
                    let command = match replacement_command(loaded_config, &store_path) {
                        Ok(command) => command,
                        Err(e) => {
                            tracing::error!("Failed to persist order id: {}", e);
                            continue;
                        }
                    };
                    if command_tx.send(command).await.is_err() {
                        tracing::debug!("Session is gone, reload handler stopping");
                        break;
                    }
                    tracing::info!(%order_id, "Invoice replaced");
                }
                _ = shutdown_notify_clone.notified() => {
                    tracing::debug!("Reload handler shutting down");
                    break;
                }
            }
        }
    });

    shutdown_notify
}

/// Persist the reloaded order id to the running store and build the
/// `Replace` command.
///
/// The store path cannot change while running: the session keeps the store
/// it started with, so a different `[store] path` is ignored with a warning.
fn replacement_command(
    loaded_config: LoadedConfig,
    store_path: &Path,
) -> Result<SessionCommand, StoreError> {
    if loaded_config.store_path.as_path() != store_path {
        tracing::warn!(
            running = %store_path.display(),
            reloaded = %loaded_config.store_path.display(),
            "Store path changed on reload, keeping the running store until restart"
        );
    }

    let mut store = JsonFileStore::new(store_path);
    store.set_order_id(&loaded_config.params.order_id)?;
    Ok(SessionCommand::Replace(Box::new(loaded_config.params)))
}
