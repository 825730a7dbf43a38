//! User profile and stored user record.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Wods;

/// Profile delivered to the UI once sign-in completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    /// Display name reported by the identity provider
    pub display_name: String,
    /// Profile picture URL (may not be shared)
    pub profile_pic: Option<String>,
    /// E-mail address, or the subject id when the provider shares no e-mail
    pub identifier: String,
    /// Opaque subject id assigned by the identity provider
    pub user_uid: String,
    /// Gender as reported by the provider, if shared
    pub gender: Option<String>,
}

/// Stored user record.
///
/// Fields are written independently of each other; an absent field has never
/// been saved for this subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Wods>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}
