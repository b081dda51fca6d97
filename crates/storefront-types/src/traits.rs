/// Trait contracts between the storefront core and its collaborators.
///
/// The core never renders UI and never speaks HTTP directly: it codes against
/// these interfaces, and the concrete dialog host and backend client are
/// injected as trait objects.
use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::errors::StorefrontError;
use crate::models::*;

// ============================================================
// Dialog Host
// ============================================================

/// A dialog the host is asked to render, together with the way to answer it.
#[derive(Debug)]
pub struct DialogRequest {
    /// Identifier of this dialog instance.
    pub id: DialogId,
    /// Fully resolved content of the dialog.
    pub options: ConfirmationOptions,
    /// Answer channel. Consumed when the dialog closes.
    pub responder: DialogResponder,
}

/// One-shot answer handle for an open dialog.
///
/// `close` consumes the responder, so a dialog can be answered at most once.
/// Dropping it without calling `close` is the same as closing without an
/// answer.
#[derive(Debug)]
pub struct DialogResponder {
    tx: oneshot::Sender<Option<ConfirmationResult>>,
}

impl DialogResponder {
    pub fn new(tx: oneshot::Sender<Option<ConfirmationResult>>) -> Self {
        Self { tx }
    }

    /// Report that the dialog closed, with the user's answer if there was one.
    pub fn close(self, payload: Option<ConfirmationResult>) {
        // The requester may have stopped waiting; nothing left to notify.
        let _ = self.tx.send(payload);
    }

    pub fn confirm(self) {
        self.close(Some(ConfirmationResult::confirmed()));
    }

    pub fn cancel(self) {
        self.close(Some(ConfirmationResult::cancelled()));
    }

    /// Backdrop click, escape key, programmatic close.
    pub fn dismiss(self) {
        self.close(None);
    }

    /// Whether anyone is still waiting for the answer.
    pub fn is_awaited(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Renders modal dialogs on behalf of the core.
///
/// `open` is fire-and-forget. The host guarantees the request's responder is
/// either closed exactly once or dropped.
pub trait DialogHost: Send + Sync {
    fn open(&self, request: DialogRequest);
}

// ============================================================
// User Backend
// ============================================================

/// Remote source of truth for subjects and their sub-resources.
#[async_trait]
pub trait UserBackend: Send + Sync {
    /// Fetch the composite read model for a subject.
    async fn fetch_summary(&self, subject_id: &str) -> Result<AggregateRecord, StorefrontError>;

    /// Update basic profile fields. Returns the stored profile.
    async fn update_basic_info(
        &self,
        subject_id: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, StorefrontError>;

    /// Create (no id) or update (with id) an address. Returns the full address list.
    async fn save_address(
        &self,
        subject_id: &str,
        address: &Address,
    ) -> Result<Vec<Address>, StorefrontError>;

    /// Complete purchase history for a subject.
    async fn fetch_order_history(
        &self,
        subject_id: &str,
    ) -> Result<Vec<OrderSummary>, StorefrontError>;

    /// Replace the security settings of a subject. Returns the stored settings.
    async fn update_security(
        &self,
        subject_id: &str,
        config: &SecurityConfig,
    ) -> Result<SecurityConfig, StorefrontError>;

    /// List subjects, optionally restricted to one role.
    async fn list_users(&self, role_id: Option<&str>) -> Result<Vec<UserProfile>, StorefrontError>;

    /// Delete a subject.
    async fn delete_user(&self, subject_id: &str) -> Result<(), StorefrontError>;
}
