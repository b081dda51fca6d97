//! Canned confirmations used across the admin screens.
//!
//! Each preset is a plain [`ConfirmationRequest`] fed to
//! [`ConfirmationBridge::confirm`]; no preset changes how answers are produced.

use storefront_types::models::{ConfirmationRequest, Severity};

use crate::confirmation::{Confirmation, ConfirmationBridge};

/// Deleting `item` (a user, a product, an address). Irreversible.
pub fn delete_request(item: &str) -> ConfirmationRequest {
    ConfirmationRequest::new(
        "Confirmar eliminación",
        format!("¿Está seguro de que desea eliminar {item}? Esta acción no se puede deshacer."),
    )
    .confirm_label("Eliminar")
    .severity(Severity::Danger)
}

/// Leaving a form with unsaved changes.
pub fn exit_request() -> ConfirmationRequest {
    ConfirmationRequest::new(
        "Cambios sin guardar",
        "Tiene cambios sin guardar. ¿Desea salir de todas formas?",
    )
    .confirm_label("Salir")
    .cancel_label("Quedarme")
    .severity(Severity::Warning)
}

/// Saving edited data.
pub fn save_request() -> ConfirmationRequest {
    ConfirmationRequest::new("Guardar cambios", "¿Desea guardar los cambios realizados?")
        .confirm_label("Guardar")
        .severity(Severity::Info)
}

/// Any other action that deserves a second click.
pub fn action_request(
    title: &str,
    description: &str,
    confirm_label: &str,
    severity: Severity,
) -> ConfirmationRequest {
    ConfirmationRequest::new(title, description)
        .confirm_label(confirm_label)
        .severity(severity)
}

impl ConfirmationBridge {
    pub fn confirm_delete(&self, item: &str) -> Confirmation {
        self.confirm(delete_request(item))
    }

    pub fn confirm_exit(&self) -> Confirmation {
        self.confirm(exit_request())
    }

    pub fn confirm_save(&self) -> Confirmation {
        self.confirm(save_request())
    }

    pub fn confirm_action(
        &self,
        title: &str,
        description: &str,
        confirm_label: &str,
        severity: Severity,
    ) -> Confirmation {
        self.confirm(action_request(title, description, confirm_label, severity))
    }
}
