//! Structural validation of loaded model sets

use std::collections::HashSet;

use crate::schema::{ContentModel, FieldType, Locale};
use crate::{Error, Result};

/// Validate a model set before it is handed to a migration.
///
/// Checks:
/// - model ids are non-empty and unique
/// - field ids are unique within a model
/// - an explicit display field names one of the model's fields
/// - `Link` fields declare a link type, `Array` fields declare their items
/// - locale codes are unique
pub fn validate_models(models: &[ContentModel], locales: &[Locale]) -> Result<()> {
    let mut model_ids = HashSet::new();

    for model in models {
        if model.id.trim().is_empty() {
            return Err(invalid(&model.id, "model id must not be empty"));
        }
        if !model_ids.insert(model.id.as_str()) {
            return Err(invalid(&model.id, "duplicate model id"));
        }
        validate_fields(model)?;
    }

    let mut codes = HashSet::new();
    for locale in locales {
        if !codes.insert(locale.code.as_str()) {
            return Err(Error::InvalidModel {
                id: locale.code.clone(),
                message: "duplicate locale code".to_string(),
            });
        }
    }

    Ok(())
}

fn validate_fields(model: &ContentModel) -> Result<()> {
    let mut field_ids = HashSet::new();

    for field in &model.fields {
        if !field_ids.insert(field.id.as_str()) {
            return Err(invalid(
                &model.id,
                format!("duplicate field id '{}'", field.id),
            ));
        }
        if field.field_type == FieldType::Link && field.link_type.is_none() {
            return Err(invalid(
                &model.id,
                format!("link field '{}' has no linkType", field.id),
            ));
        }
        if field.field_type == FieldType::Array && field.items.is_none() {
            return Err(invalid(
                &model.id,
                format!("array field '{}' has no items", field.id),
            ));
        }
    }

    if let Some(display_field) = &model.display_field
        && !model.has_field(display_field)
    {
        return Err(invalid(
            &model.id,
            format!("display field '{}' is not one of its fields", display_field),
        ));
    }

    Ok(())
}

fn invalid(id: &str, message: impl Into<String>) -> Error {
    Error::InvalidModel {
        id: id.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, Items, LinkType};

    fn blog() -> ContentModel {
        ContentModel::new("blog", "Blog")
            .with_field(Field::new("title", "Title", FieldType::Symbol))
    }

    #[test]
    fn test_valid_set_passes() {
        let tags = Field::new("tags", "Tags", FieldType::Array).with_items(Items::of(FieldType::Symbol));
        let author = Field::new("author", "Author", FieldType::Link).link_to(LinkType::Entry);
        let model = blog().with_field(tags).with_field(author).with_display_field("title");

        assert!(validate_models(&[model], &[Locale::new("en-US")]).is_ok());
    }

    #[test]
    fn test_duplicate_model_id_rejected() {
        let err = validate_models(&[blog(), blog()], &[]).unwrap_err();
        assert!(err.to_string().contains("duplicate model id"));
    }

    #[test]
    fn test_duplicate_field_id_rejected() {
        let model = blog().with_field(Field::new("title", "Again", FieldType::Text));
        let err = validate_models(&[model], &[]).unwrap_err();
        assert!(err.to_string().contains("duplicate field id 'title'"));
    }

    #[test]
    fn test_unknown_display_field_rejected() {
        let model = blog().with_display_field("headline");
        assert!(validate_models(&[model], &[]).is_err());
    }

    #[test]
    fn test_link_without_link_type_rejected() {
        let model = blog().with_field(Field::new("hero", "Hero", FieldType::Link));
        let err = validate_models(&[model], &[]).unwrap_err();
        assert!(err.to_string().contains("linkType"));
    }

    #[test]
    fn test_duplicate_locale_rejected() {
        let locales = [Locale::new("en-US"), Locale::new("en-US")];
        assert!(validate_models(&[], &locales).is_err());
    }
}
