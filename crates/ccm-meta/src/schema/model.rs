//! Content model and field definitions
//!
//! A [`ContentModel`] is the desired state of one remote content type. It is
//! written in the management API's JSON shape so that the same files can be
//! produced by a sync from the remote space.
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "id": "blog",
//!   "name": "Blog Post",
//!   "description": "A single article",
//!   "displayField": "title",
//!   "fields": [
//!     { "id": "title", "name": "Title", "type": "Symbol", "required": true },
//!     { "id": "author", "name": "Author", "type": "Link", "linkType": "Entry",
//!       "validations": [{ "linkContentType": ["person"] }] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::editor::EditorInterfaceConfig;

/// Desired state of a single content type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModel {
    /// Stable identifier, immutable once the content type exists remotely
    pub id: String,
    /// Human-readable name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field used as the entry title. `None` lets the reconciler pick one.
    #[serde(default)]
    pub display_field: Option<String>,
    /// Ordered field definitions
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_interface: Option<EditorInterfaceConfig>,
}

impl ContentModel {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            display_field: None,
            fields: Vec::new(),
            editor_interface: None,
        }
    }

    /// Builder-style field append
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_display_field(mut self, field_id: impl Into<String>) -> Self {
        self.display_field = Some(field_id.into());
        self
    }

    pub fn with_editor_interface(mut self, editor_interface: EditorInterfaceConfig) -> Self {
        self.editor_interface = Some(editor_interface);
        self
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn has_field(&self, id: &str) -> bool {
        self.field(id).is_some()
    }

    /// The display field written back to the remote content type.
    ///
    /// An explicit display field wins; otherwise the first `Symbol` field is
    /// used, and an empty string when there is none.
    pub fn effective_display_field(&self) -> String {
        if let Some(display_field) = &self.display_field {
            return display_field.clone();
        }
        self.fields
            .iter()
            .find(|f| f.field_type == FieldType::Symbol)
            .map(|f| f.id.clone())
            .unwrap_or_default()
    }
}

/// A single field of a content type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub localized: bool,
    /// Hidden from the editing UI but kept for data compatibility
    #[serde(default)]
    pub omitted: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    /// Opaque validation documents (`in`, `unique`, `linkContentType`, ...)
    #[serde(default)]
    pub validations: Vec<Value>,
    /// Default value keyed by locale code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<BTreeMap<String, Value>>,
    /// Attributes not modelled above (`allowedResources`, `deleted`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Field {
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
            required: false,
            localized: false,
            omitted: false,
            disabled: false,
            link_type: None,
            items: None,
            validations: Vec::new(),
            default_value: None,
            extra: Map::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn localized(mut self) -> Self {
        self.localized = true;
        self
    }

    pub fn link_to(mut self, link_type: LinkType) -> Self {
        self.link_type = Some(link_type);
        self
    }

    pub fn with_items(mut self, items: Items) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_validation(mut self, validation: Value) -> Self {
        self.validations.push(validation);
        self
    }

    /// Copy of this field hidden from the editing UI
    pub fn as_omitted(&self) -> Self {
        Self {
            omitted: true,
            ..self.clone()
        }
    }
}

/// Field type tags supported by the management API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Short text
    Symbol,
    /// Long text
    Text,
    RichText,
    Integer,
    Number,
    Date,
    Location,
    Boolean,
    Object,
    Array,
    Link,
    ResourceLink,
}

/// Target of a link field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    Entry,
    Asset,
}

/// Item descriptor of an `Array` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Items {
    #[serde(rename = "type")]
    pub item_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
    #[serde(default)]
    pub validations: Vec<Value>,
}

impl Items {
    pub fn of(item_type: FieldType) -> Self {
        Self {
            item_type,
            link_type: None,
            validations: Vec::new(),
        }
    }

    pub fn links(link_type: LinkType) -> Self {
        Self {
            item_type: FieldType::Link,
            link_type: Some(link_type),
            validations: Vec::new(),
        }
    }
}
