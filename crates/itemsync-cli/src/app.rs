//! Application wiring and run modes.
//!
//! `App` is the composition root: it builds the store, remote source,
//! repository and use-cases with plain constructors and hands the use-cases
//! to an `ItemsViewModel`. Everything it shows comes from the view model's
//! state.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use itemsync_core::utils::format_age;
use itemsync_core::{
    ApiClient, Config, GetItems, ItemRepository, ItemStore, ItemsViewModel, LocalStore,
    OfflineFirstRepository, RefreshItems, UiState,
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::remote::MissingEndpoint;
use crate::render::render;

/// Buffered stdin commands before the reader thread blocks
const COMMAND_BUFFER_SIZE: usize = 16;

pub struct App {
    store: ItemStore,
    repository: Arc<dyn ItemRepository>,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let store_path = config.store_path()?;
        debug!(path = %store_path.display(), "Opening item store");
        let store = ItemStore::open(&store_path, config.update_buffer)
            .await
            .with_context(|| format!("Failed to open item store at {}", store_path.display()))?;

        let repository: Arc<dyn ItemRepository> = match config.endpoint {
            Some(ref endpoint) => {
                let client = ApiClient::new(endpoint, &config.items_path, config.request_timeout())
                    .context("Invalid endpoint configuration")?;
                info!(url = %client.url(), "Using remote endpoint");
                Arc::new(OfflineFirstRepository::new(client, store.clone()))
            }
            None => {
                warn!("No endpoint configured, showing cached items only");
                Arc::new(OfflineFirstRepository::new(MissingEndpoint, store.clone()))
            }
        };

        Ok(Self { store, repository })
    }

    fn view_model(&self) -> ItemsViewModel {
        ItemsViewModel::new(
            GetItems::new(Arc::clone(&self.repository)),
            RefreshItems::new(Arc::clone(&self.repository)),
        )
    }

    fn last_synced(&self) -> Option<String> {
        self.store.last_saved().map(|saved_at| format_age(saved_at, Utc::now()))
    }

    fn print(&self, state: &UiState) {
        print!("{}", render(state, self.last_synced().as_deref()));
    }

    /// Re-render on every state change until `q`, end of input or Ctrl-C.
    pub async fn run_watch(&self) -> Result<()> {
        let view_model = self.view_model();
        let mut state = view_model.subscribe();
        let mut commands = spawn_stdin_reader();

        println!("Commands: r = refresh, q = quit");
        let initial = state.borrow_and_update().clone();
        self.print(&initial);

        loop {
            tokio::select! {
                changed = state.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let current = state.borrow_and_update().clone();
                    println!();
                    self.print(&current);
                }
                command = commands.recv() => {
                    match WatchAction::parse(command.as_deref(), view_model.state().is_loading) {
                        WatchAction::Refresh => view_model.refresh(),
                        WatchAction::Busy => println!("Refresh already in progress"),
                        WatchAction::Quit => break,
                        WatchAction::Nothing => {}
                        WatchAction::Unknown(other) => {
                            println!("Unknown command: {} (r = refresh, q = quit)", other)
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        view_model.close().await;
        Ok(())
    }

    /// Wait for the initial refresh to settle and render once.
    /// Returns false if the final state carries an error.
    pub async fn run_once(&self) -> Result<bool> {
        let view_model = self.view_model();
        let mut state = view_model.subscribe();

        let settled = wait_for(&mut state, |s| !s.is_loading).await?;
        let settled = if settled.error.is_none() {
            // The committed snapshot reaches the state independently of the
            // refresh outcome.
            let expected = self.store.snapshot();
            wait_for(&mut state, |s| s.items == expected || s.error.is_some()).await?
        } else {
            settled
        };

        self.print(&settled);
        view_model.close().await;
        Ok(settled.error.is_none())
    }

    pub async fn clear_cache(&self) -> Result<()> {
        self.store
            .replace_all(Vec::new())
            .await
            .context("Failed to clear item store")?;
        println!("Cleared cached items");
        Ok(())
    }
}

/// What a stdin line asks watch mode to do.
#[derive(Debug, PartialEq)]
enum WatchAction {
    Refresh,
    /// `r` while a refresh is running
    Busy,
    Quit,
    Nothing,
    Unknown(String),
}

impl WatchAction {
    /// `None` is end of input.
    fn parse(line: Option<&str>, is_loading: bool) -> Self {
        match line.map(str::trim) {
            // Overlapping refreshes are the caller's job to avoid
            Some("r") if is_loading => WatchAction::Busy,
            Some("r") => WatchAction::Refresh,
            Some("q") | None => WatchAction::Quit,
            Some("") => WatchAction::Nothing,
            Some(other) => WatchAction::Unknown(other.to_string()),
        }
    }
}

async fn wait_for(
    state: &mut watch::Receiver<UiState>,
    predicate: impl FnMut(&UiState) -> bool,
) -> Result<UiState> {
    let current = state
        .wait_for(predicate)
        .await
        .context("View model stopped")?
        .clone();
    Ok(current)
}

/// Read stdin lines on a dedicated thread; blocking stdin must not hold up
/// runtime shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER_SIZE);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemsync_core::Item;

    fn offline_config(dir: &std::path::Path) -> Config {
        Config {
            endpoint: None,
            cache_dir: Some(dir.to_path_buf()),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_run_once_without_endpoint_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(&offline_config(dir.path())).await.unwrap();

        assert!(!app.run_once().await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_cache_empties_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(dir.path());
        let app = App::new(&config).await.unwrap();
        app.store.replace_all(vec![Item::new(1, "A", "d", "u")]).await.unwrap();

        app.clear_cache().await.unwrap();

        assert!(app.store.snapshot().is_empty());
        assert!(app.last_synced().is_some());
        assert!(config.store_path().unwrap().exists());
    }

    #[test]
    fn test_refresh_ignored_while_loading() {
        assert_eq!(WatchAction::parse(Some("r"), false), WatchAction::Refresh);
        assert_eq!(WatchAction::parse(Some(" r\n"), false), WatchAction::Refresh);
        assert_eq!(WatchAction::parse(Some("r"), true), WatchAction::Busy);
    }

    #[test]
    fn test_watch_commands() {
        assert_eq!(WatchAction::parse(Some("q"), true), WatchAction::Quit);
        assert_eq!(WatchAction::parse(None, false), WatchAction::Quit);
        assert_eq!(WatchAction::parse(Some("  "), false), WatchAction::Nothing);
        assert_eq!(
            WatchAction::parse(Some("x"), false),
            WatchAction::Unknown("x".to_string())
        );
    }

    #[tokio::test]
    async fn test_blank_endpoint_in_config_file_runs_offline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cache_dir = dir.path().join("cache");
        std::fs::write(
            &path,
            format!(
                r#"{{"endpoint": "", "cache_dir": {}}}"#,
                serde_json::to_string(&cache_dir).unwrap()
            ),
        )
        .unwrap();
        let seeded = ItemStore::open(cache_dir.join("items.json"), 4).await.unwrap();
        seeded.replace_all(vec![Item::new(1, "A", "d", "u")]).await.unwrap();
        drop(seeded);

        let config = Config::load_from(&path).unwrap();
        let app = App::new(&config).await.unwrap();

        assert_eq!(app.store.snapshot(), vec![Item::new(1, "A", "d", "u")]);
        assert!(!app.run_once().await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_endpoint_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            endpoint: Some("not a url".to_string()),
            ..offline_config(dir.path())
        };

        let err = App::new(&config).await.err().unwrap();
        assert!(err.to_string().contains("Invalid endpoint configuration"));
    }
}
