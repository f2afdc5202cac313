use crate::{fetch_and_render, Report};
use carbon_client::HistorySource;
use carbon_config::{CarbonConfig, ConfigWatcher};
use carbon_core::Result;
use carbon_renderer::Renderer;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Spawn a background Tokio task that runs [`fetch_and_render`] every
/// `refresh.interval_secs` seconds and forwards each outcome through the
/// returned channel.
///
/// A change to the file at `config_path` reloads the `[api]` and `[refresh]`
/// sections and fetches again right away.  Render targets are fixed for the
/// lifetime of the task.
///
/// The task stops automatically when the receiver is dropped.
pub fn spawn_refresh<S, R>(
    config_path: PathBuf,
    config: CarbonConfig,
    source: S,
    mut renderer: R,
) -> mpsc::Receiver<Result<Report>>
where
    S: HistorySource + Send + Sync + 'static,
    R: Renderer + Send + 'static,
{
    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        let (_watcher, changes) = ConfigWatcher::spawn(&config_path);
        let mut changes = Some(changes);
        let mut config = config;

        loop {
            let outcome = fetch_and_render(&config.api, &source, &mut renderer).await;
            if tx.send(outcome).await.is_err() {
                break; // all receivers dropped
            }

            let sleep = tokio::time::sleep(Duration::from_secs(config.refresh.interval_secs));
            tokio::pin!(sleep);
            loop {
                tokio::select! {
                    _ = &mut sleep => break,
                    _ = tx.closed() => return,
                    changed = next_change(&mut changes) => {
                        if changed {
                            reload(&config_path, &mut config);
                            break;
                        }
                    }
                }
            }
        }
    });

    rx
}

/// Resolve on the next config change.  `false` once the watcher is gone,
/// after which this never resolves again.
async fn next_change(changes: &mut Option<mpsc::Receiver<()>>) -> bool {
    let Some(rx) = changes else {
        return std::future::pending().await;
    };
    if rx.recv().await.is_some() {
        return true;
    }
    *changes = None;
    false
}

fn reload(path: &Path, config: &mut CarbonConfig) {
    match carbon_config::load(path) {
        Ok(fresh) => {
            info!(zone = %fresh.api.zone_code, "Config reloaded");
            config.api = fresh.api;
            config.refresh = fresh.refresh;
        }
        Err(e) => warn!("Keeping previous config: {e}"),
    }
}
