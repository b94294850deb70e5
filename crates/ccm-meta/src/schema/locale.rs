//! Locale definitions
//!
//! Every attribute except `code` is optional: an absent attribute means
//! "leave the remote value alone" when the locale already exists.
//! `fallbackCode` also distinguishes an explicit `null`, which clears the
//! remote fallback.

use serde::{Deserialize, Deserializer, Serialize};

/// Desired state of a locale, keyed by `code`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    /// Language/region code, e.g. `en-US`
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    /// `None` when absent, `Some(None)` when explicitly `null`
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub fallback_code: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_delivery_api: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_management_api: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

impl Locale {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: None,
            default: None,
            fallback_code: None,
            content_delivery_api: None,
            content_management_api: None,
            optional: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_fallback(mut self, code: impl Into<String>) -> Self {
        self.fallback_code = Some(Some(code.into()));
        self
    }

    /// Clear any fallback the remote locale has
    pub fn without_fallback(mut self) -> Self {
        self.fallback_code = Some(None);
        self
    }

    /// Fallback code, if one is set
    pub fn fallback(&self) -> Option<&str> {
        self.fallback_code.as_ref().and_then(|code| code.as_deref())
    }

    /// Enabled for both delivery and management, not optional
    pub fn active(mut self) -> Self {
        self.content_delivery_api = Some(true);
        self.content_management_api = Some(true);
        self.optional = Some(false);
        self
    }
}

/// Present keys land in `Some`, so a `null` value becomes `Some(None)`
fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
