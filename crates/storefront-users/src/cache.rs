//! Cached "full user profile" read model.
//!
//! Holds at most one [`AggregateRecord`], the current subject's. The record is
//! fetched once, served from memory afterwards, and patched in place as
//! sub-resources are mutated:
//! - Reads (`get_aggregate`) propagate backend failures; nothing is cached on failure
//! - Mutations never fail: a backend error yields [`Outcome::Degraded`] with a fallback
//! - Concurrent reads for the same subject share one backend fetch
//! - `clear_cache` (wired to logout / session expiry) drops everything

use std::sync::{Arc, Weak};

use futures::FutureExt;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use storefront_types::errors::StorefrontError;
use storefront_types::models::*;
use storefront_types::outcome::Outcome;
use storefront_types::traits::UserBackend;

use crate::coalesce::FetchCoalescer;

type FetchResult = Result<AggregateRecord, StorefrontError>;

struct CacheState {
    record: Option<AggregateRecord>,
    /// Bumped by every clear; fetches started under an older generation are not stored.
    generation: u64,
}

impl CacheState {
    fn reset(&mut self) {
        self.record = None;
        self.generation += 1;
    }
}

/// Process-wide cache of the current subject's aggregate record.
pub struct AggregateCache {
    backend: Arc<dyn UserBackend>,
    state: Mutex<CacheState>,
    inflight: FetchCoalescer<FetchResult>,
}

impl AggregateCache {
    pub fn new(backend: Arc<dyn UserBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(CacheState {
                record: None,
                generation: 0,
            }),
            inflight: FetchCoalescer::new(),
        }
    }

    /// Return the cached record, fetching it if the cache is empty.
    ///
    /// Any cached record is returned as-is, whichever subject it belongs to.
    /// Callers arriving while a fetch for the same subject is in flight wait
    /// for that fetch instead of starting another. A failed fetch is returned
    /// to every waiter and leaves the cache empty.
    pub async fn get_aggregate(&self, subject_id: &str) -> Result<AggregateRecord, StorefrontError> {
        let generation = {
            let state = self.state.lock().await;
            if let Some(record) = &state.record {
                tracing::debug!(subject_id, cached = %record.subject_id(), "aggregate cache hit");
                return Ok(record.clone());
            }
            state.generation
        };

        tracing::debug!(subject_id, "aggregate cache miss, fetching summary");
        let backend = Arc::clone(&self.backend);
        let id = subject_id.to_string();
        let record = self
            .inflight
            .run(subject_id, move || {
                async move { backend.fetch_summary(&id).await }.boxed()
            })
            .await
            .inspect_err(|e| {
                tracing::warn!(subject_id, error = %e, "aggregate fetch failed");
            })?;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!(subject_id, "cache cleared during fetch, not storing result");
        } else if state.record.is_none() {
            tracing::debug!(subject_id, name = %record.profile.full_name(), "aggregate cached");
            state.record = Some(record.clone());
        }
        Ok(record)
    }

    /// Update basic profile fields.
    ///
    /// On success the cached profile is replaced by the stored one; addresses,
    /// activity, stats and security settings are left untouched. On failure
    /// the fallback is the current profile with `update` applied locally; the
    /// cache is not modified.
    pub async fn update_basic_info(
        &self,
        subject_id: &str,
        update: ProfileUpdate,
    ) -> Outcome<UserProfile> {
        match self.backend.update_basic_info(subject_id, &update).await {
            Ok(profile) => {
                self.patch(subject_id, |record| record.profile = profile.clone())
                    .await;
                Outcome::Applied(profile)
            }
            Err(e) => {
                tracing::warn!(subject_id, error = %e, "basic info update failed, returning unsaved values");
                let mut fallback = self
                    .cached_for(subject_id)
                    .await
                    .map(|record| record.profile)
                    .unwrap_or_else(|| UserProfile::with_id(subject_id));
                update.apply_to(&mut fallback);
                Outcome::degraded(fallback, e)
            }
        }
    }

    /// Create (no id) or update (with id) an address.
    ///
    /// On success the cached address list is replaced wholesale by the list the
    /// backend returns. On failure the fallback is an empty list.
    pub async fn upsert_address(&self, subject_id: &str, address: Address) -> Outcome<Vec<Address>> {
        let creating = address.is_new();
        match self.backend.save_address(subject_id, &address).await {
            Ok(addresses) => {
                tracing::debug!(subject_id, creating, count = addresses.len(), "address saved");
                self.patch(subject_id, |record| record.addresses = addresses.clone())
                    .await;
                Outcome::Applied(addresses)
            }
            Err(e) => {
                tracing::warn!(subject_id, creating, error = %e, "address save failed");
                Outcome::degraded(Vec::new(), e)
            }
        }
    }

    /// Full purchase history. Never cached; failure yields an empty list.
    pub async fn fetch_full_history(&self, subject_id: &str) -> Outcome<Vec<OrderSummary>> {
        match self.backend.fetch_order_history(subject_id).await {
            Ok(history) => Outcome::Applied(history),
            Err(e) => {
                tracing::warn!(subject_id, error = %e, "order history fetch failed");
                Outcome::degraded(Vec::new(), e)
            }
        }
    }

    /// Replace the security settings. Failure echoes `config` back.
    pub async fn update_security_config(
        &self,
        subject_id: &str,
        config: SecurityConfig,
    ) -> Outcome<SecurityConfig> {
        match self.backend.update_security(subject_id, &config).await {
            Ok(stored) => {
                self.patch(subject_id, |record| record.security_config = stored.clone())
                    .await;
                Outcome::Applied(stored)
            }
            Err(e) => {
                tracing::warn!(subject_id, error = %e, "security settings update failed");
                Outcome::degraded(config, e)
            }
        }
    }

    /// List subjects, optionally by role. Never cached; failure yields an empty list.
    pub async fn list_users(&self, role_id: Option<&str>) -> Outcome<Vec<UserProfile>> {
        match self.backend.list_users(role_id).await {
            Ok(users) => Outcome::Applied(users),
            Err(e) => {
                tracing::warn!(role_id, error = %e, "user listing failed");
                Outcome::degraded(Vec::new(), e)
            }
        }
    }

    /// Delete a subject. Clears the cache when it held that subject.
    pub async fn delete_subject(&self, subject_id: &str) -> Outcome<DeleteAck> {
        match self.backend.delete_user(subject_id).await {
            Ok(()) => {
                let cleared = {
                    let mut state = self.state.lock().await;
                    let held = state
                        .record
                        .as_ref()
                        .is_some_and(|record| record.subject_id() == subject_id);
                    if held {
                        state.reset();
                    }
                    held
                };
                if cleared {
                    self.inflight.forget_all().await;
                    tracing::info!(subject_id, "aggregate cache cleared after deletion");
                }
                tracing::info!(subject_id, "subject deleted");
                Outcome::Applied(DeleteAck { success: true })
            }
            Err(e) => {
                tracing::warn!(subject_id, error = %e, "subject deletion failed");
                Outcome::degraded(DeleteAck { success: false }, e)
            }
        }
    }

    /// Drop the cached record and forget in-flight fetches.
    ///
    /// Must run on logout so a new session never sees the previous subject.
    pub async fn clear_cache(&self) {
        self.state.lock().await.reset();
        self.inflight.forget_all().await;
        tracing::info!("aggregate cache cleared");
    }

    /// Snapshot of the cached record, if any.
    pub async fn cached(&self) -> Option<AggregateRecord> {
        self.state.lock().await.record.clone()
    }

    /// Clear the cache on every session event until the bus closes.
    ///
    /// The task holds only a weak reference and stops once the cache is dropped.
    pub fn bind_session(
        self: &Arc<Self>,
        mut events: broadcast::Receiver<SessionEvent>,
    ) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                let event = events.recv().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                match event {
                    Ok(event) => {
                        tracing::info!(?event, "session boundary reached");
                        cache.clear_cache().await;
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "session events lagged, clearing cache");
                        cache.clear_cache().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// The cached record, only if it belongs to `subject_id`.
    async fn cached_for(&self, subject_id: &str) -> Option<AggregateRecord> {
        self.state
            .lock()
            .await
            .record
            .as_ref()
            .filter(|record| record.subject_id() == subject_id)
            .cloned()
    }

    /// Apply `f` to the cached record if it belongs to `subject_id`.
    async fn patch(&self, subject_id: &str, f: impl FnOnce(&mut AggregateRecord)) {
        let mut state = self.state.lock().await;
        match state.record.as_mut() {
            Some(record) if record.subject_id() == subject_id => f(record),
            Some(record) => {
                tracing::debug!(
                    subject_id,
                    cached = %record.subject_id(),
                    "cached record belongs to another subject, not patching"
                );
            }
            None => {}
        }
    }
}
