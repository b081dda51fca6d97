//! Modal confirmation bridge.
//!
//! Turns "open a yes/no dialog" into a future that resolves exactly once:
//! - Resolves the request against the configured defaults
//! - Hands the dialog to the injected [`DialogHost`]
//! - Resolves with the host's answer, or with a cancellation when the dialog
//!   closes without one
//!
//! A [`Confirmation`] never fails. The worst outcome is a cancelled result.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use storefront_types::config::ConfirmationDefaults;
use storefront_types::models::{ConfirmationRequest, ConfirmationResult, DialogId};
use storefront_types::traits::{DialogHost, DialogRequest, DialogResponder};

/// Asks the user yes/no questions through a dialog host.
///
/// Each call to [`confirm`](Self::confirm) opens an independent dialog with its
/// own answer channel; concurrent confirmations share no state.
pub struct ConfirmationBridge {
    host: Arc<dyn DialogHost>,
    defaults: ConfirmationDefaults,
}

impl ConfirmationBridge {
    /// Create a bridge using the built-in defaults ("Confirmar", "Cancelar", warning, 450px).
    pub fn new(host: Arc<dyn DialogHost>) -> Self {
        Self::with_defaults(host, ConfirmationDefaults::default())
    }

    /// Create a bridge with configured defaults.
    pub fn with_defaults(host: Arc<dyn DialogHost>, defaults: ConfirmationDefaults) -> Self {
        Self { host, defaults }
    }

    pub fn defaults(&self) -> &ConfirmationDefaults {
        &self.defaults
    }

    /// Open a confirmation dialog and return the pending answer.
    ///
    /// The dialog is opened before this returns; awaiting the returned
    /// [`Confirmation`] only waits for the answer.
    pub fn confirm(&self, request: ConfirmationRequest) -> Confirmation {
        let id = DialogId::new();
        let options = self.defaults.resolve(request);
        let (tx, rx) = oneshot::channel();

        tracing::debug!(
            dialog_id = %id,
            title = %options.title,
            severity = ?options.severity,
            "opening confirmation dialog"
        );

        self.host.open(DialogRequest {
            id,
            options,
            responder: DialogResponder::new(tx),
        });

        Confirmation { id, rx }
    }
}

/// The pending answer to one confirmation dialog.
///
/// Resolves to the host's payload verbatim, or to
/// [`ConfirmationResult::dismissed`] if the dialog closed without one or the
/// host dropped it. Dropping a `Confirmation` discards the answer but does not
/// close the dialog.
#[must_use = "a confirmation does nothing useful unless awaited"]
#[derive(Debug)]
pub struct Confirmation {
    id: DialogId,
    rx: oneshot::Receiver<Option<ConfirmationResult>>,
}

impl Confirmation {
    /// Identifier of the dialog this confirmation is waiting on.
    pub fn id(&self) -> DialogId {
        self.id
    }
}

impl Future for Confirmation {
    type Output = ConfirmationResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let id = self.id;
        Pin::new(&mut self.rx).poll(cx).map(|answer| match answer {
            Ok(Some(result)) => {
                tracing::debug!(dialog_id = %id, confirmed = result.confirmed, "dialog answered");
                result
            }
            Ok(None) => {
                tracing::debug!(dialog_id = %id, "dialog dismissed without an answer");
                ConfirmationResult::dismissed()
            }
            Err(_) => {
                tracing::debug!(dialog_id = %id, "dialog host dropped the dialog");
                ConfirmationResult::dismissed()
            }
        })
    }
}
