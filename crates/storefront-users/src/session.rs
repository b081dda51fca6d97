//! Session boundary signals.
//!
//! Broadcasts logout and expiry so subject-scoped caches can drop their data.
//! Wire a cache with [`AggregateCache::bind_session`](crate::cache::AggregateCache::bind_session).

use tokio::sync::broadcast;

use storefront_types::models::SessionEvent;

/// Publisher side of the session signal.
#[derive(Debug, Clone)]
pub struct SessionBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionBus {
    /// `capacity` is how many unread events a subscriber may fall behind by.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Returns how many subscribers received it.
    pub fn publish(&self, event: SessionEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::info!(?event, receivers, "session event published");
                receivers
            }
            Err(_) => {
                tracing::debug!(?event, "session event published with no subscribers");
                0
            }
        }
    }

    pub fn logout(&self) -> usize {
        self.publish(SessionEvent::LoggedOut)
    }

    pub fn expire(&self) -> usize {
        self.publish(SessionEvent::Expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use storefront_types::errors::StorefrontError;
    use storefront_types::models::*;
    use storefront_types::traits::UserBackend;

    use crate::cache::AggregateCache;

    struct StaticBackend;

    #[async_trait]
    impl UserBackend for StaticBackend {
        async fn fetch_summary(&self, subject_id: &str) -> Result<AggregateRecord, StorefrontError> {
            Ok(AggregateRecord {
                profile: UserProfile::with_id(subject_id),
                ..AggregateRecord::default()
            })
        }

        async fn update_basic_info(
            &self,
            subject_id: &str,
            _update: &ProfileUpdate,
        ) -> Result<UserProfile, StorefrontError> {
            Ok(UserProfile::with_id(subject_id))
        }

        async fn save_address(
            &self,
            _subject_id: &str,
            _address: &Address,
        ) -> Result<Vec<Address>, StorefrontError> {
            Ok(vec![])
        }

        async fn fetch_order_history(
            &self,
            _subject_id: &str,
        ) -> Result<Vec<OrderSummary>, StorefrontError> {
            Ok(vec![])
        }

        async fn update_security(
            &self,
            _subject_id: &str,
            config: &SecurityConfig,
        ) -> Result<SecurityConfig, StorefrontError> {
            Ok(config.clone())
        }

        async fn list_users(
            &self,
            _role_id: Option<&str>,
        ) -> Result<Vec<UserProfile>, StorefrontError> {
            Ok(vec![])
        }

        async fn delete_user(&self, _subject_id: &str) -> Result<(), StorefrontError> {
            Ok(())
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let bus = SessionBus::new(4);
        assert_eq!(bus.logout(), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_sees_event() {
        let bus = SessionBus::new(4);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.expire(), 2);
        assert_eq!(a.recv().await.unwrap(), SessionEvent::Expired);
        assert_eq!(b.recv().await.unwrap(), SessionEvent::Expired);
    }

    #[tokio::test]
    async fn test_logout_clears_bound_cache() {
        let bus = SessionBus::new(4);
        let cache = Arc::new(AggregateCache::new(Arc::new(StaticBackend)));
        let _task = cache.bind_session(bus.subscribe());

        cache.get_aggregate("u1").await.unwrap();
        assert!(cache.cached().await.is_some());

        bus.logout();
        for _ in 0..50 {
            if cache.cached().await.is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert!(cache.cached().await.is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscriber_still_clears() {
        let bus = SessionBus::new(1);
        let cache = Arc::new(AggregateCache::new(Arc::new(StaticBackend)));
        cache.get_aggregate("u1").await.unwrap();

        // Overflow the receiver before the task ever runs.
        let rx = bus.subscribe();
        bus.logout();
        bus.expire();
        bus.logout();
        let _task = cache.bind_session(rx);

        for _ in 0..50 {
            if cache.cached().await.is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert!(cache.cached().await.is_none());
    }
}
