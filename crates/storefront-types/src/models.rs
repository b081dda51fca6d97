/// Shared data types used across the storefront admin crates.
///
/// Confirmation types are consumed by `storefront-dialogs`, aggregate types by
/// `storefront-users`. Wire payloads are camelCase JSON as served by the
/// backend.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================
// Confirmation Types
// ============================================================

/// Visual severity of a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral information.
    Info,
    /// Something the user may regret.
    #[default]
    Warning,
    /// Destructive and irreversible.
    Danger,
    /// Positive confirmation (saving, publishing).
    Success,
}

/// A yes/no question to put in front of the user.
///
/// Only `title` and `description` are required. Every `None` field is filled in
/// from [`ConfirmationDefaults`](crate::config::ConfirmationDefaults) when the
/// request is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    /// Dialog heading.
    pub title: String,
    /// Body text explaining what is being confirmed.
    pub description: String,
    /// Label of the accept button.
    pub confirm_label: Option<String>,
    /// Label of the reject button.
    pub cancel_label: Option<String>,
    /// Visual severity.
    pub severity: Option<Severity>,
    /// Whether the dialog shows a severity icon.
    pub show_icon: Option<bool>,
    /// CSS width of the dialog (e.g. `"450px"`).
    pub width: Option<String>,
}

impl ConfirmationRequest {
    /// Request with a title and description; everything else defaulted.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = Some(label.into());
        self
    }

    pub fn cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = Some(label.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn show_icon(mut self, show: bool) -> Self {
        self.show_icon = Some(show);
        self
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }
}

/// A confirmation request with every default applied, as handed to the dialog host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationOptions {
    pub title: String,
    pub description: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub severity: Severity,
    pub show_icon: bool,
    pub width: String,
}

/// The single answer produced for a confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationResult {
    pub confirmed: bool,
    pub cancelled: bool,
}

impl ConfirmationResult {
    /// The user clicked the accept button.
    pub fn confirmed() -> Self {
        Self {
            confirmed: true,
            cancelled: false,
        }
    }

    /// The user clicked the reject button.
    pub fn cancelled() -> Self {
        Self {
            confirmed: false,
            cancelled: true,
        }
    }

    /// The dialog closed without an explicit answer. Always a cancellation.
    pub fn dismissed() -> Self {
        Self::cancelled()
    }

    /// Whether the caller may go ahead with the confirmed action.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed && !self.cancelled
    }
}

/// Identifier of one opened dialog instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogId(pub Uuid);

impl DialogId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DialogId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================
// Aggregate Types
// ============================================================

/// Basic information about a subject (the user being administered).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Blank profile carrying only an id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Partial update of a [`UserProfile`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

impl ProfileUpdate {
    /// Overwrite the fields of `profile` that this update carries.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(first_name) = &self.first_name {
            profile.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            profile.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            profile.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            profile.phone = Some(phone.clone());
        }
        if let Some(document_id) = &self.document_id {
            profile.document_id = Some(document_id.clone());
        }
    }
}

/// A shipping address. `id` is `None` until the backend has stored it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub alias: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Whether saving this address creates a new one rather than updating.
    pub fn is_new(&self) -> bool {
        self.id.as_deref().is_none_or(str::is_empty)
    }
}

/// One order as shown in activity lists and the full purchase history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub placed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub item_count: u32,
}

/// Purchase statistics for a subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_spent: f64,
    #[serde(default)]
    pub average_order_value: f64,
    #[serde(default)]
    pub last_order_at: Option<DateTime<Utc>>,
}

/// Account security settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    #[serde(default)]
    pub two_factor_enabled: bool,
    #[serde(default)]
    pub login_alerts: bool,
    #[serde(default)]
    pub session_timeout_minutes: Option<u32>,
    #[serde(default)]
    pub last_password_change: Option<DateTime<Utc>>,
}

/// The composite "full user profile" read model.
///
/// Fetched as one unit; either absent from the cache or fully populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRecord {
    pub profile: UserProfile,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub recent_activity: Vec<OrderSummary>,
    #[serde(default)]
    pub stats: UserStats,
    #[serde(default)]
    pub security_config: SecurityConfig,
}

impl AggregateRecord {
    pub fn subject_id(&self) -> &str {
        &self.profile.id
    }
}

/// Acknowledgement of a subject deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub success: bool,
}

// ============================================================
// Session Types
// ============================================================

/// Session boundary signals. Any of these must drop cached subject data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The operator logged out explicitly.
    LoggedOut,
    /// The session token expired.
    Expired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismissed_is_cancellation() {
        let result = ConfirmationResult::dismissed();
        assert!(!result.confirmed);
        assert!(result.cancelled);
        assert!(!result.is_confirmed());
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(Severity::Danger).unwrap(),
            serde_json::json!("danger")
        );
        assert_eq!(Severity::default(), Severity::Warning);
    }

    #[test]
    fn test_profile_update_applies_only_present_fields() {
        let mut profile = UserProfile {
            id: "u1".into(),
            first_name: "Ana".into(),
            last_name: "Pérez".into(),
            email: "ana@example.com".into(),
            ..UserProfile::default()
        };
        let update = ProfileUpdate {
            email: Some("ana.perez@example.com".into()),
            phone: Some("555-0101".into()),
            ..ProfileUpdate::default()
        };
        update.apply_to(&mut profile);

        assert_eq!(profile.first_name, "Ana");
        assert_eq!(profile.email, "ana.perez@example.com");
        assert_eq!(profile.phone.as_deref(), Some("555-0101"));
        assert_eq!(profile.full_name(), "Ana Pérez");
    }

    #[test]
    fn test_profile_update_skips_absent_fields_on_the_wire() {
        let update = ProfileUpdate {
            first_name: Some("Luis".into()),
            ..ProfileUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"firstName": "Luis"}));
        let empty = serde_json::to_value(ProfileUpdate::default()).unwrap();
        assert_eq!(empty, serde_json::json!({}));
    }

    #[test]
    fn test_address_without_id_is_new() {
        let mut address = Address {
            alias: "Casa".into(),
            ..Address::default()
        };
        assert!(address.is_new());
        address.id = Some(String::new());
        assert!(address.is_new());
        address.id = Some("  ".into());
        assert!(!address.is_new());
        address.id = Some("a1".into());
        assert!(!address.is_new());
    }

    #[test]
    fn test_aggregate_decodes_partial_payload() {
        let record: AggregateRecord = serde_json::from_value(serde_json::json!({
            "profile": {"id": "u1", "firstName": "Ana", "active": true},
            "addresses": [{"id": "a1", "alias": "Casa", "isDefault": true}]
        }))
        .unwrap();

        assert_eq!(record.subject_id(), "u1");
        assert!(record.recent_activity.is_empty());
        assert_eq!(record.stats, UserStats::default());
        assert!(record.addresses[0].is_default);
    }
}
