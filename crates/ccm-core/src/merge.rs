//! Desired-over-remote merging

use serde_json::{Map, Value};

use ccm_meta::{Control, EditorInterfaceConfig};

/// Recursively merge `other` into `base`.
///
/// Objects are merged key by key; any other value in `other` replaces the
/// one in `base`.
pub fn deep_merge_value(base: &mut Value, other: &Value) {
    match (base, other) {
        (Value::Object(base_map), Value::Object(other_map)) => {
            for (key, other_val) in other_map {
                if let Some(base_val) = base_map.get_mut(key) {
                    deep_merge_value(base_val, other_val);
                } else {
                    base_map.insert(key.clone(), other_val.clone());
                }
            }
        }
        (base, other) => {
            *base = other.clone();
        }
    }
}

fn merge_maps(base: &Map<String, Value>, other: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, other_val) in other {
        match merged.get_mut(key) {
            Some(base_val) => deep_merge_value(base_val, other_val),
            None => {
                merged.insert(key.clone(), other_val.clone());
            }
        }
    }
    merged
}

/// Merge a desired editor interface onto the remote one.
///
/// Controls are matched by field id: a desired control updates the remote
/// control of the same field, or is appended when there is none. Remote
/// controls for other fields are kept. Every other attribute is deep-merged
/// with the desired value winning.
pub fn merge_editor_interface(
    remote: &EditorInterfaceConfig,
    desired: &EditorInterfaceConfig,
) -> EditorInterfaceConfig {
    let mut controls = remote.controls.clone();
    for control in &desired.controls {
        match controls.iter_mut().find(|c| c.field_id == control.field_id) {
            Some(existing) => *existing = merge_control(existing, control),
            None => controls.push(control.clone()),
        }
    }

    EditorInterfaceConfig {
        controls,
        extra: merge_maps(&remote.extra, &desired.extra),
    }
}

fn merge_control(remote: &Control, desired: &Control) -> Control {
    let settings = match (&remote.settings, &desired.settings) {
        (Some(remote), Some(desired)) => Some(merge_maps(remote, desired)),
        (remote, desired) => desired.clone().or_else(|| remote.clone()),
    };

    Control {
        field_id: remote.field_id.clone(),
        widget_id: desired.widget_id.clone().or_else(|| remote.widget_id.clone()),
        widget_namespace: desired
            .widget_namespace
            .clone()
            .or_else(|| remote.widget_namespace.clone()),
        settings,
        extra: merge_maps(&remote.extra, &desired.extra),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn deep_merge_keeps_base_only_keys() {
        let mut base = json!({ "name": "English", "flags": { "a": true, "b": false } });
        deep_merge_value(&mut base, &json!({ "flags": { "b": true } }));

        assert_eq!(base, json!({ "name": "English", "flags": { "a": true, "b": true } }));
    }

    #[test]
    fn deep_merge_replaces_arrays() {
        let mut base = json!({ "items": [1, 2, 3] });
        deep_merge_value(&mut base, &json!({ "items": [4] }));

        assert_eq!(base, json!({ "items": [4] }));
    }

    #[test]
    fn editor_interface_controls_merge_by_field() {
        let remote: EditorInterfaceConfig = serde_json::from_value(json!({
            "controls": [
                { "fieldId": "title", "widgetId": "singleLine", "widgetNamespace": "builtin" },
                { "fieldId": "slug", "widgetId": "slugEditor", "widgetNamespace": "builtin",
                  "settings": { "helpText": "URL" } }
            ],
            "sidebar": [{ "widgetId": "publication-widget" }]
        }))
        .unwrap();
        let desired: EditorInterfaceConfig = serde_json::from_value(json!({
            "controls": [
                { "fieldId": "slug", "settings": { "trackingFieldId": "title" } },
                { "fieldId": "body", "widgetId": "markdown", "widgetNamespace": "builtin" }
            ]
        }))
        .unwrap();

        let merged = merge_editor_interface(&remote, &desired);
        let value = serde_json::to_value(&merged).unwrap();

        assert_eq!(
            value,
            json!({
                "controls": [
                    { "fieldId": "title", "widgetId": "singleLine", "widgetNamespace": "builtin" },
                    { "fieldId": "slug", "widgetId": "slugEditor", "widgetNamespace": "builtin",
                      "settings": { "helpText": "URL", "trackingFieldId": "title" } },
                    { "fieldId": "body", "widgetId": "markdown", "widgetNamespace": "builtin" }
                ],
                "sidebar": [{ "widgetId": "publication-widget" }]
            })
        );
    }
}
