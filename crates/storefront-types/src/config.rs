/// Configuration types for the storefront admin core.
///
/// Parsed from `storefront.yaml`. Every section is optional and falls back to
/// its `Default`.
///
/// ```yaml
/// backend:
///   base_url: http://localhost:8080/api
///   connect_timeout_secs: 5
///   request_timeout_secs: 15
/// dialogs:
///   confirm_label: Confirmar
///   severity: warning
/// session:
///   bus_capacity: 16
/// ```
use serde::{Deserialize, Serialize};

use crate::models::{ConfirmationOptions, ConfirmationRequest, Severity};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub dialogs: ConfirmationDefaults,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Where the admin backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the REST API; endpoint paths are appended to it.
    pub base_url: String,
    /// Timeout for establishing a connection (in seconds).
    pub connect_timeout_secs: u64,
    /// Timeout for a whole request including the body (in seconds).
    pub request_timeout_secs: u64,
    /// Bearer token sent with every request.
    pub auth_token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 15,
            auth_token: None,
        }
    }
}

/// Values applied to every omitted field of a [`ConfirmationRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationDefaults {
    pub confirm_label: String,
    pub cancel_label: String,
    pub severity: Severity,
    pub show_icon: bool,
    pub width: String,
}

impl Default for ConfirmationDefaults {
    fn default() -> Self {
        Self {
            confirm_label: "Confirmar".to_string(),
            cancel_label: "Cancelar".to_string(),
            severity: Severity::Warning,
            show_icon: true,
            width: "450px".to_string(),
        }
    }
}

impl ConfirmationDefaults {
    /// Fill every omitted field of `request` from these defaults.
    pub fn resolve(&self, request: ConfirmationRequest) -> ConfirmationOptions {
        ConfirmationOptions {
            title: request.title,
            description: request.description,
            confirm_label: request
                .confirm_label
                .unwrap_or_else(|| self.confirm_label.clone()),
            cancel_label: request
                .cancel_label
                .unwrap_or_else(|| self.cancel_label.clone()),
            severity: request.severity.unwrap_or(self.severity),
            show_icon: request.show_icon.unwrap_or(self.show_icon),
            width: request.width.unwrap_or_else(|| self.width.clone()),
        }
    }
}

/// Session signal settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Buffered events per subscriber before it is reported as lagging.
    pub bus_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { bus_capacity: 16 }
    }
}
