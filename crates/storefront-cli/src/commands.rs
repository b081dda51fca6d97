//! Command implementations for the storefront CLI.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::task::JoinHandle;

use storefront_dialogs::{ConfirmationBridge, QueuedDialogHost};
use storefront_types::config::StorefrontConfig;
use storefront_types::config_loader::ConfigLoader;
use storefront_types::errors::StorefrontError;
use storefront_types::outcome::Outcome;
use storefront_users::{AggregateCache, HttpUserBackend, SessionBus};

use crate::presenter::spawn_terminal_presenter;

/// Everything a command needs, wired from configuration.
pub struct App {
    cache: Arc<AggregateCache>,
    bridge: ConfirmationBridge,
    session: SessionBus,
    listener: JoinHandle<()>,
}

impl App {
    /// Load configuration and wire the backend, cache, session bus and dialogs.
    ///
    /// Must run inside the tokio runtime: it spawns the dialog presenter and
    /// the session listener.
    pub fn build(config_dir: Option<&Path>) -> Result<Self> {
        let config = match config_dir {
            Some(dir) => ConfigLoader::load(dir),
            None => ConfigLoader::from_env(),
        }
        .context("failed to load configuration")?;
        Self::from_config(config)
    }

    fn from_config(config: StorefrontConfig) -> Result<Self> {
        let backend = HttpUserBackend::new(&config.backend).context("failed to create backend client")?;
        let cache = Arc::new(AggregateCache::new(Arc::new(backend)));

        let session = SessionBus::new(config.session.bus_capacity);
        let listener = cache.bind_session(session.subscribe());

        let (host, dialogs) = QueuedDialogHost::new();
        spawn_terminal_presenter(dialogs);
        let bridge = ConfirmationBridge::with_defaults(Arc::new(host), config.dialogs);

        tracing::debug!(base_url = %config.backend.base_url, "storefront CLI ready");
        Ok(Self {
            cache,
            bridge,
            session,
            listener,
        })
    }

    pub async fn profile(&self, id: &str) -> Result<()> {
        let record = self
            .cache
            .get_aggregate(id)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load profile of user '{id}': {}", describe(&e)))?;
        print_json(&record)
    }

    pub async fn history(&self, id: &str) -> Result<()> {
        let history = self.cache.fetch_full_history(id).await;
        report_degraded("order history", &history);
        print_json(history.value())
    }

    pub async fn users(&self, role: Option<&str>) -> Result<()> {
        let users = self.cache.list_users(role).await;
        report_degraded("user list", &users);
        print_json(users.value())
    }

    pub async fn delete(&self, id: &str, assume_yes: bool) -> Result<()> {
        if !assume_yes {
            let answer = self.bridge.confirm_delete(&format!("el usuario '{id}'")).await;
            if !answer.is_confirmed() {
                eprintln!("Cancelled.");
                return Ok(());
            }
        }

        match self.cache.delete_subject(id).await.into_result() {
            Ok(_) => {
                println!("User '{id}' deleted.");
                Ok(())
            }
            Err(cause) => anyhow::bail!("failed to delete user '{id}': {}", describe(&cause)),
        }
    }

    /// Log the operator out and wait until the cache has dropped subject data.
    pub async fn end_session(self) -> Result<()> {
        let Self {
            cache: _cache,
            session,
            listener,
            ..
        } = self;
        session.logout();
        // Closing the bus lets the listener drain the logout and exit.
        drop(session);
        listener.await.context("session listener failed")?;
        Ok(())
    }
}

fn describe(error: &StorefrontError) -> String {
    if error.is_transient() {
        format!("{error} (temporary, try again later)")
    } else {
        error.to_string()
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{text}");
    Ok(())
}

fn report_degraded<T>(what: &str, outcome: &Outcome<T>) {
    if let Some(cause) = outcome.cause() {
        eprintln!("warning: {what} unavailable, showing fallback: {}", describe(cause));
    }
}
