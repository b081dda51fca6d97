//! Channel-backed dialog host.
//!
//! For front-ends that render dialogs elsewhere (a terminal prompt, a test
//! harness): `open` queues the dialog, and a presenter drains the queue and
//! answers each dialog through its responder.

use tokio::sync::mpsc;

use storefront_types::traits::{DialogHost, DialogRequest};

/// Queues dialogs for an external presenter.
#[derive(Debug, Clone)]
pub struct QueuedDialogHost {
    tx: mpsc::UnboundedSender<DialogRequest>,
}

impl QueuedDialogHost {
    /// Create the host and the receiver the presenter reads dialogs from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DialogRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DialogHost for QueuedDialogHost {
    fn open(&self, request: DialogRequest) {
        if let Err(mpsc::error::SendError(request)) = self.tx.send(request) {
            tracing::warn!(
                dialog_id = %request.id,
                title = %request.options.title,
                "no dialog presenter attached, dismissing dialog"
            );
            request.responder.dismiss();
        }
    }
}
