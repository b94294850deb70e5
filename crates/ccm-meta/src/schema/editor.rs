//! Editor interface configuration
//!
//! Describes which widget renders each field of a content type. Only the
//! `controls` list is interpreted; every other attribute (`editors`,
//! `sidebar`, `groupControls`, `editorLayout`) is carried through verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Desired editor interface of a content type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorInterfaceConfig {
    #[serde(default)]
    pub controls: Vec<Control>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EditorInterfaceConfig {
    pub fn with_control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    pub fn control(&self, field_id: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.field_id == field_id)
    }
}

/// Widget assignment for a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub field_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Control {
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            widget_id: None,
            widget_namespace: None,
            settings: None,
            extra: Map::new(),
        }
    }

    pub fn widget(mut self, namespace: impl Into<String>, widget_id: impl Into<String>) -> Self {
        self.widget_namespace = Some(namespace.into());
        self.widget_id = Some(widget_id.into());
        self
    }

    pub fn builtin(field_id: impl Into<String>, widget_id: impl Into<String>) -> Self {
        Self::new(field_id).widget("builtin", widget_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_editor_interface_keeps_unknown_sections() {
        let config: EditorInterfaceConfig = serde_json::from_value(json!({
            "controls": [
                { "fieldId": "title", "widgetId": "singleLine", "widgetNamespace": "builtin" }
            ],
            "editors": [{ "widgetId": "default-editor", "widgetNamespace": "editor-builtin" }]
        }))
        .unwrap();

        assert_eq!(config.controls.len(), 1);
        assert_eq!(
            config.control("title").and_then(|c| c.widget_id.as_deref()),
            Some("singleLine")
        );
        assert!(config.extra.contains_key("editors"));
    }

    #[test]
    fn test_control_builder() {
        let control = Control::builtin("slug", "slugEditor");
        let value = serde_json::to_value(&control).unwrap();
        assert_eq!(
            value,
            json!({ "fieldId": "slug", "widgetId": "slugEditor", "widgetNamespace": "builtin" })
        );
    }
}
