/// Confirmation dialogs for the storefront admin screens.
///
/// - **Confirmation**: the bridge from "open a dialog" to a single awaited answer
/// - **Presets**: delete / exit / save / generic action confirmations
/// - **Host**: a queue-backed dialog host for headless presenters
pub mod confirmation;
pub mod host;
pub mod presets;

pub use confirmation::{Confirmation, ConfirmationBridge};
pub use host::QueuedDialogHost;
