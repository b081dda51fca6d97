/// Config directory loader with validation and environment overrides.
///
/// Reads `storefront.yaml` from a config directory, applies `STOREFRONT_*`
/// environment overrides, and validates the result before anything is built
/// from it.
use std::path::Path;

use crate::config::*;
use crate::errors::StorefrontError;

/// Name of the config file inside the config directory.
pub const CONFIG_FILE: &str = "storefront.yaml";

/// Overrides `backend.base_url`.
pub const ENV_API_URL: &str = "STOREFRONT_API_URL";

/// Overrides `backend.auth_token`.
pub const ENV_API_TOKEN: &str = "STOREFRONT_API_TOKEN";

/// Loads and validates configuration.
///
/// Expected directory structure:
/// ```text
/// config/
/// └── storefront.yaml
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `storefront.yaml` from `config_dir`, apply environment overrides, validate.
    pub fn load(config_dir: &Path) -> Result<StorefrontConfig, StorefrontError> {
        let mut config = Self::load_file(config_dir)?;
        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());
        Self::validate(&config)?;
        tracing::debug!(dir = %config_dir.display(), "configuration loaded");
        Ok(config)
    }

    /// Built-in defaults with environment overrides, for running without a config directory.
    pub fn from_env() -> Result<StorefrontConfig, StorefrontError> {
        let mut config = StorefrontConfig::default();
        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());
        Self::validate(&config)?;
        Ok(config)
    }

    /// Parse `storefront.yaml` without overrides or validation.
    pub fn load_file(config_dir: &Path) -> Result<StorefrontConfig, StorefrontError> {
        let path = config_dir.join(CONFIG_FILE);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| StorefrontError::Config(format!("failed to read {}: {e}", path.display())))?;
        if content.trim().is_empty() {
            return Ok(StorefrontConfig::default());
        }
        serde_yaml::from_str(&content)
            .map_err(|e| StorefrontError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Apply `STOREFRONT_*` overrides using `lookup` to read variables.
    pub fn apply_overrides(
        config: &mut StorefrontConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config.backend.base_url = url.trim().to_string();
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.trim().is_empty()) {
            config.backend.auth_token = Some(token.trim().to_string());
        }
    }

    /// Validate the aggregate config for internal consistency.
    ///
    /// Checks:
    /// - Backend base URL is an http(s) URL
    /// - Timeouts are positive
    /// - Dialog labels are non-empty and the width is a CSS length
    /// - Session bus capacity is positive
    pub fn validate(config: &StorefrontConfig) -> Result<(), StorefrontError> {
        Self::validate_backend(&config.backend)?;
        Self::validate_dialogs(&config.dialogs)?;
        if config.session.bus_capacity == 0 {
            return Err(StorefrontError::Config(
                "session.bus_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_backend(backend: &BackendConfig) -> Result<(), StorefrontError> {
        let url = backend.base_url.trim();
        if url.is_empty() {
            return Err(StorefrontError::Config(
                "backend.base_url must not be empty".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(StorefrontError::Config(format!(
                "backend.base_url must start with http:// or https://, got '{url}'"
            )));
        }
        if backend.connect_timeout_secs == 0 {
            return Err(StorefrontError::Config(
                "backend.connect_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if backend.request_timeout_secs == 0 {
            return Err(StorefrontError::Config(
                "backend.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_dialogs(dialogs: &ConfirmationDefaults) -> Result<(), StorefrontError> {
        if dialogs.confirm_label.trim().is_empty() {
            return Err(StorefrontError::Config(
                "dialogs.confirm_label must not be empty".to_string(),
            ));
        }
        if dialogs.cancel_label.trim().is_empty() {
            return Err(StorefrontError::Config(
                "dialogs.cancel_label must not be empty".to_string(),
            ));
        }
        if !is_css_length(&dialogs.width) {
            return Err(StorefrontError::Config(format!(
                "dialogs.width must be a length in px or %, got '{}'",
                dialogs.width
            )));
        }
        Ok(())
    }
}

/// `"450px"`, `"80%"`, `"12.5%"`.
fn is_css_length(value: &str) -> bool {
    let number = value
        .strip_suffix("px")
        .or_else(|| value.strip_suffix('%'));
    match number {
        Some(n) => n.parse::<f64>().is_ok_and(|v| v > 0.0),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use std::fs;

    fn write_config(dir: &Path, yaml: &str) {
        fs::write(dir.join(CONFIG_FILE), yaml).unwrap();
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
backend:
  base_url: https://admin.example.com/api
  connect_timeout_secs: 3
  request_timeout_secs: 20
  auth_token: secret
dialogs:
  confirm_label: Aceptar
  cancel_label: Volver
  severity: danger
  show_icon: false
  width: 80%
session:
  bus_capacity: 4
"#,
        );

        let config = ConfigLoader::load_file(dir.path()).unwrap();
        ConfigLoader::validate(&config).unwrap();

        assert_eq!(config.backend.base_url, "https://admin.example.com/api");
        assert_eq!(config.backend.request_timeout_secs, 20);
        assert_eq!(config.backend.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.dialogs.confirm_label, "Aceptar");
        assert_eq!(config.dialogs.severity, Severity::Danger);
        assert!(!config.dialogs.show_icon);
        assert_eq!(config.session.bus_capacity, 4);
    }

    #[test]
    fn test_partial_sections_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "backend:\n  base_url: http://10.0.0.5:9000\n");

        let config = ConfigLoader::load_file(dir.path()).unwrap();
        assert_eq!(config.backend.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.backend.connect_timeout_secs, 5);
        assert_eq!(config.dialogs, ConfirmationDefaults::default());
    }

    #[test]
    fn test_empty_file_is_default_config() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "");
        assert_eq!(
            ConfigLoader::load_file(dir.path()).unwrap(),
            StorefrontConfig::default()
        );
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::load_file(dir.path()).unwrap_err();
        assert!(matches!(err, StorefrontError::Config(msg) if msg.contains("failed to read")));
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "backend: [unterminated");
        let err = ConfigLoader::load_file(dir.path()).unwrap_err();
        assert!(matches!(err, StorefrontError::Config(msg) if msg.contains("failed to parse")));
    }

    #[test]
    fn test_env_overrides_replace_backend_fields() {
        let mut config = StorefrontConfig::default();
        ConfigLoader::apply_overrides(&mut config, |key| match key {
            ENV_API_URL => Some(" https://staging.example.com/api ".to_string()),
            ENV_API_TOKEN => Some("tok".to_string()),
            _ => None,
        });

        assert_eq!(config.backend.base_url, "https://staging.example.com/api");
        assert_eq!(config.backend.auth_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_blank_env_override_is_ignored() {
        let mut config = StorefrontConfig::default();
        ConfigLoader::apply_overrides(&mut config, |_| Some("   ".to_string()));
        assert_eq!(config.backend.base_url, BackendConfig::default().base_url);
        assert!(config.backend.auth_token.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = StorefrontConfig::default();
        config.backend.base_url = "ftp://example.com".to_string();
        assert!(ConfigLoader::validate(&config).is_err());

        let mut config = StorefrontConfig::default();
        config.backend.request_timeout_secs = 0;
        assert!(ConfigLoader::validate(&config).is_err());

        let mut config = StorefrontConfig::default();
        config.dialogs.cancel_label = " ".to_string();
        assert!(ConfigLoader::validate(&config).is_err());

        let mut config = StorefrontConfig::default();
        config.dialogs.width = "wide".to_string();
        assert!(ConfigLoader::validate(&config).is_err());

        let mut config = StorefrontConfig::default();
        config.session.bus_capacity = 0;
        assert!(ConfigLoader::validate(&config).is_err());

        assert!(ConfigLoader::validate(&StorefrontConfig::default()).is_ok());
    }

    #[test]
    fn test_css_length() {
        assert!(is_css_length("450px"));
        assert!(is_css_length("12.5%"));
        assert!(!is_css_length("px"));
        assert!(!is_css_length("0px"));
        assert!(!is_css_length("450"));
    }
}
