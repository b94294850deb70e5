//! Model and locale fixtures shared by test suites

use ccm_meta::{ContentModel, Control, EditorInterfaceConfig, Field, FieldType, LinkType, Locale};

/// `blog` with a `title` Symbol and a `body` Text field, no explicit
/// display field
pub fn blog() -> ContentModel {
    ContentModel::new("blog", "Blog Post")
        .with_field(Field::new("title", "Title", FieldType::Symbol).required())
        .with_field(Field::new("body", "Body", FieldType::Text))
}

/// `author` linking to nothing, displayed by `name`
pub fn author() -> ContentModel {
    ContentModel::new("author", "Author")
        .with_field(Field::new("name", "Name", FieldType::Symbol).required())
        .with_field(Field::new("photo", "Photo", FieldType::Link).link_to(LinkType::Asset))
        .with_display_field("name")
}

/// A model with a single Symbol field
pub fn simple(id: &str) -> ContentModel {
    ContentModel::new(id, id.to_uppercase())
        .with_field(Field::new("title", "Title", FieldType::Symbol))
}

/// Editor interface assigning a widget to one field
pub fn editor_interface(field_id: &str, widget_id: &str) -> EditorInterfaceConfig {
    EditorInterfaceConfig::default().with_control(Control::builtin(field_id, widget_id))
}

/// The space's default locale
pub fn default_locale(code: &str) -> Locale {
    let mut locale = Locale::new(code).named(code).active();
    locale.default = Some(true);
    locale
}

pub fn locale(code: &str, name: &str) -> Locale {
    Locale::new(code).named(name).active()
}
