//! Wire types of the management API
//!
//! Every remote resource carries a `sys` object with its identifier and
//! version stamp. Bodies are flattened next to `sys`, exactly as the API
//! returns them, and keep unknown attributes in an `extra` map so that a
//! fetch-modify-write cycle never drops data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use ccm_meta::{ContentModel, EditorInterfaceConfig, Field, Locale};

/// System metadata shared by all resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sys {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub sys_type: Option<String>,
    /// Optimistic-concurrency counter, required on every write
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<Link>,
    /// Environment processing status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Link>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sys {
    pub fn new(id: impl Into<String>, version: u64) -> Self {
        Self {
            id: id.into(),
            sys_type: None,
            version,
            published_version: None,
            published_at: None,
            content_type: None,
            status: None,
            extra: Map::new(),
        }
    }

    pub fn is_published(&self) -> bool {
        self.published_version.is_some()
    }
}

/// Reference to another resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub sys: LinkSys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSys {
    #[serde(rename = "type", default = "link_type_tag")]
    pub sys_type: String,
    pub link_type: String,
    pub id: String,
}

fn link_type_tag() -> String {
    "Link".to_string()
}

impl Link {
    pub fn new(link_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            sys: LinkSys {
                sys_type: link_type_tag(),
                link_type: link_type.into(),
                id: id.into(),
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.sys.id
    }
}

/// Paginated collection envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: usize,
}

impl<T> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}

/// Writable body of a content type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentTypeDraft {
    /// Shell used to create a content type before its fields are written
    pub fn shell(model: &ContentModel) -> Self {
        Self {
            name: model.name.clone(),
            description: model.description.clone(),
            display_field: None,
            fields: Vec::new(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteContentType {
    pub sys: Sys,
    #[serde(flatten)]
    pub body: ContentTypeDraft,
}

impl RemoteContentType {
    pub fn id(&self) -> &str {
        &self.sys.id
    }

    pub fn version(&self) -> u64 {
        self.sys.version
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.body.fields.iter().find(|f| f.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEditorInterface {
    pub sys: Sys,
    #[serde(flatten)]
    pub body: EditorInterfaceConfig,
}

impl RemoteEditorInterface {
    /// Id of the content type this editor interface belongs to
    pub fn content_type_id(&self) -> Option<&str> {
        self.sys.content_type.as_ref().map(Link::id)
    }

    pub fn version(&self) -> u64 {
        self.sys.version
    }
}

/// Server-managed locale attribute that must not be sent back on writes
pub const INTERNAL_CODE: &str = "internal_code";

/// Full body of a remote locale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleBody {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub fallback_code: Option<String>,
    #[serde(default)]
    pub content_delivery_api: bool,
    #[serde(default)]
    pub content_management_api: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocaleBody {
    /// Copy of the body without server-managed attributes
    pub fn writable(&self) -> Self {
        let mut body = self.clone();
        body.extra.remove(INTERNAL_CODE);
        body
    }

    /// Copy of the body disabled for delivery and management
    pub fn deactivated(&self) -> Self {
        Self {
            content_delivery_api: false,
            content_management_api: false,
            optional: true,
            ..self.writable()
        }
    }
}

impl From<&Locale> for LocaleBody {
    fn from(locale: &Locale) -> Self {
        Self {
            code: locale.code.clone(),
            name: locale.name.clone().unwrap_or_else(|| locale.code.clone()),
            default: locale.default.unwrap_or(false),
            fallback_code: locale.fallback().map(str::to_string),
            content_delivery_api: locale.content_delivery_api.unwrap_or(true),
            content_management_api: locale.content_management_api.unwrap_or(true),
            optional: locale.optional.unwrap_or(false),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteLocale {
    pub sys: Sys,
    #[serde(flatten)]
    pub body: LocaleBody,
}

impl RemoteLocale {
    pub fn id(&self) -> &str {
        &self.sys.id
    }

    pub fn code(&self) -> &str {
        &self.body.code
    }

    pub fn version(&self) -> u64 {
        self.sys.version
    }
}

/// Environment status reported once cloning has finished
pub const ENVIRONMENT_READY: &str = "ready";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub sys: Sys,
    #[serde(default)]
    pub name: String,
}

impl Environment {
    pub fn id(&self) -> &str {
        &self.sys.id
    }

    /// Processing status (`queued`, `ready`, `failed`), if reported
    pub fn status(&self) -> Option<&str> {
        self.sys.status.as_ref().map(Link::id)
    }

    pub fn is_ready(&self) -> bool {
        self.status() == Some(ENVIRONMENT_READY)
    }
}
