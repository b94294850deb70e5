//! Content type reconciliation
//!
//! A run moves through four phases:
//!
//! 1. snapshot the remote content types and editor interfaces (kept as the
//!    rollback baseline)
//! 2. create an empty shell for every desired model missing remotely
//! 3. update every desired model with its fields and display field
//! 4. publish every desired model, then apply desired editor interfaces
//!
//! Remote fields missing from a model are kept with `omitted: true`; fields
//! are never deleted. Every write carries the version last observed for that
//! resource. A failure in any phase rolls back what the run changed.

use std::collections::{HashMap, HashSet};

use ccm_client::{Client, ContentTypeDraft, RemoteContentType, RemoteEditorInterface};
use ccm_meta::ContentModel;

use super::outcome::{Outcome, RollbackReport};
use crate::merge::merge_editor_interface;
use crate::{Error, Result};

/// Page size for snapshot fetches
pub const FETCH_LIMIT: usize = 1000;

/// Result of a content type reconciliation run
#[derive(Debug)]
pub struct ContentTypeReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub published: Vec<String>,
    pub editor_interfaces_updated: Vec<String>,
    /// Models with a desired editor interface but none remotely
    pub editor_interfaces_missing: Vec<String>,
    pub outcome: Outcome,
}

impl ContentTypeReport {
    fn new() -> Self {
        Self {
            created: Vec::new(),
            updated: Vec::new(),
            published: Vec::new(),
            editor_interfaces_updated: Vec::new(),
            editor_interfaces_missing: Vec::new(),
            outcome: Outcome::Applied,
        }
    }

    fn skipped() -> Self {
        Self {
            outcome: Outcome::Skipped,
            ..Self::new()
        }
    }
}

/// Bring the remote content types in line with `desired`.
///
/// Every desired model is updated and published on every run, changed or
/// not. Failures never propagate: the run is rolled back and reported through
/// [`ContentTypeReport::outcome`].
pub async fn reconcile_content_types(client: &Client, desired: &[ContentModel]) -> ContentTypeReport {
    if desired.is_empty() {
        tracing::info!("No models to migrate, skipping");
        return ContentTypeReport::skipped();
    }

    let mut run = ContentTypeRun::new(client);
    let mut report = ContentTypeReport::new();

    if let Err(error) = run.apply(desired, &mut report).await {
        tracing::warn!(%error, "Content type migration failed, rolling back");
        let rollback = run.rollback(desired).await;
        report.outcome = Outcome::failed(error, rollback);
    }

    report
}

/// Merge a desired model onto its remote content type.
///
/// Desired fields come first, in order, followed by remote-only fields marked
/// omitted. A missing description clears the remote one; other remote
/// attributes the model does not set are preserved.
pub fn merged_body(model: &ContentModel, remote: &RemoteContentType) -> ContentTypeDraft {
    let mut fields = model.fields.clone();
    fields.extend(
        remote
            .body
            .fields
            .iter()
            .filter(|f| !model.has_field(&f.id))
            .map(|f| f.as_omitted()),
    );

    ContentTypeDraft {
        name: model.name.clone(),
        description: Some(model.description.clone().unwrap_or_default()),
        display_field: Some(model.effective_display_field()),
        fields,
        extra: remote.body.extra.clone(),
    }
}

/// Mutable state of one run, kept for rollback
struct ContentTypeRun<'a> {
    client: &'a Client,
    baseline_types: HashMap<String, RemoteContentType>,
    baseline_interfaces: HashMap<String, RemoteEditorInterface>,
    /// Latest known content type version, by id
    versions: HashMap<String, u64>,
    /// Latest known editor interface version, by content type id
    interface_versions: HashMap<String, u64>,
    created: HashSet<String>,
    published: HashSet<String>,
}

impl<'a> ContentTypeRun<'a> {
    fn new(client: &'a Client) -> Self {
        Self {
            client,
            baseline_types: HashMap::new(),
            baseline_interfaces: HashMap::new(),
            versions: HashMap::new(),
            interface_versions: HashMap::new(),
            created: HashSet::new(),
            published: HashSet::new(),
        }
    }

    async fn apply(&mut self, desired: &[ContentModel], report: &mut ContentTypeReport) -> Result<()> {
        self.snapshot().await?;
        self.create_missing(desired, report).await?;
        self.update_all(desired, report).await?;
        self.publish_all(desired, report).await?;
        self.apply_editor_interfaces(desired, report).await
    }

    async fn snapshot(&mut self) -> Result<()> {
        let content_types = self.client.content_types(FETCH_LIMIT).await?;
        let editor_interfaces = self.client.editor_interfaces(FETCH_LIMIT).await?;
        tracing::debug!(
            content_types = content_types.len(),
            editor_interfaces = editor_interfaces.len(),
            "Fetched remote snapshot"
        );

        self.versions = content_types
            .iter()
            .map(|ct| (ct.id().to_string(), ct.version()))
            .collect();
        self.baseline_types = content_types
            .into_iter()
            .map(|ct| (ct.id().to_string(), ct))
            .collect();
        self.baseline_interfaces = editor_interfaces
            .into_iter()
            .filter_map(|ei| Some((ei.content_type_id()?.to_string(), ei)))
            .collect();
        Ok(())
    }

    async fn create_missing(&mut self, desired: &[ContentModel], report: &mut ContentTypeReport) -> Result<()> {
        for model in desired {
            if self.baseline_types.contains_key(&model.id) {
                continue;
            }

            let created = self
                .client
                .create_content_type(&model.id, &ContentTypeDraft::shell(model))
                .await?;
            tracing::info!(content_type = %model.id, "Created content type");

            self.versions.insert(model.id.clone(), created.version());
            self.created.insert(model.id.clone());
            report.created.push(model.id.clone());
        }
        Ok(())
    }

    async fn update_all(&mut self, desired: &[ContentModel], report: &mut ContentTypeReport) -> Result<()> {
        let current: HashMap<String, RemoteContentType> = self
            .client
            .content_types(FETCH_LIMIT)
            .await?
            .into_iter()
            .map(|ct| (ct.id().to_string(), ct))
            .collect();

        for model in desired {
            let remote = current.get(&model.id).ok_or_else(|| {
                Error::Inconsistent(format!(
                    "content type '{}' is missing after creation",
                    model.id
                ))
            })?;

            let updated = self
                .client
                .update_content_type(&model.id, remote.version(), &merged_body(model, remote))
                .await?;
            tracing::info!(
                content_type = %model.id,
                version = updated.version(),
                "Updated content type"
            );

            self.versions.insert(model.id.clone(), updated.version());
            report.updated.push(model.id.clone());
        }
        Ok(())
    }

    async fn publish_all(&mut self, desired: &[ContentModel], report: &mut ContentTypeReport) -> Result<()> {
        for model in desired {
            let Some(&version) = self.versions.get(&model.id) else {
                continue;
            };

            let published = self.client.publish_content_type(&model.id, version).await?;
            tracing::info!(
                content_type = %model.id,
                version = published.version(),
                "Published content type"
            );

            self.versions.insert(model.id.clone(), published.version());
            self.published.insert(model.id.clone());
            report.published.push(model.id.clone());
        }
        Ok(())
    }

    async fn apply_editor_interfaces(
        &mut self,
        desired: &[ContentModel],
        report: &mut ContentTypeReport,
    ) -> Result<()> {
        for model in desired {
            let Some(config) = &model.editor_interface else {
                continue;
            };
            let Some(remote) = self.baseline_interfaces.get(&model.id) else {
                tracing::info!(content_type = %model.id, "No editor interface for {}", model.id);
                report.editor_interfaces_missing.push(model.id.clone());
                continue;
            };

            // Publishing bumped the editor interface once
            let version = remote.version() + 1;
            let merged = merge_editor_interface(&remote.body, config);
            let updated = self
                .client
                .update_editor_interface(&model.id, version, &merged)
                .await?;
            tracing::info!(
                content_type = %model.id,
                version = updated.version(),
                "Updated editor interface"
            );

            self.interface_versions
                .insert(model.id.clone(), updated.version());
            report.editor_interfaces_updated.push(model.id.clone());
        }
        Ok(())
    }

    /// Undo the run for every desired model, best effort
    async fn rollback(&mut self, desired: &[ContentModel]) -> RollbackReport {
        let mut report = RollbackReport::default();

        for model in desired {
            if self.created.contains(&model.id) {
                self.remove_created(&model.id, &mut report).await;
            } else if self.baseline_types.contains_key(&model.id) {
                if model.editor_interface.is_some() {
                    self.restore_editor_interface(&model.id, &mut report).await;
                }
                self.restore_content_type(&model.id, &mut report).await;
            }
        }

        report
    }

    async fn remove_created(&mut self, id: &str, report: &mut RollbackReport) {
        if self.published.contains(id) {
            let version = self.versions.get(id).copied().unwrap_or_default();
            match self.client.unpublish_content_type(id, version).await {
                Ok(unpublished) => {
                    self.versions.insert(id.to_string(), unpublished.version());
                }
                Err(e) => {
                    report.record_failure(format!("unpublish content type '{}'", id), &e);
                }
            }
        }

        match self.client.delete_content_type(id).await {
            Ok(()) => {
                tracing::info!(content_type = %id, "Deleted new content type as part of rollback");
                report.deleted.push(id.to_string());
            }
            Err(e) => report.record_failure(format!("delete content type '{}'", id), &e),
        }
    }

    async fn restore_editor_interface(&mut self, id: &str, report: &mut RollbackReport) {
        let Some(original) = self.baseline_interfaces.get(id) else {
            return;
        };

        let version = match self.interface_versions.get(id) {
            Some(&version) => version,
            None if self.published.contains(id) => original.version() + 1,
            None => original.version(),
        };

        match self
            .client
            .update_editor_interface(id, version, &original.body)
            .await
        {
            Ok(restored) => {
                tracing::info!(content_type = %id, "Rolled back editor interface");
                self.interface_versions
                    .insert(id.to_string(), restored.version());
            }
            Err(e) => report.record_failure(format!("restore editor interface of '{}'", id), &e),
        }
    }

    async fn restore_content_type(&mut self, id: &str, report: &mut RollbackReport) {
        let Some(original) = self.baseline_types.get(id) else {
            return;
        };
        let was_published = original.sys.is_published();
        let body = original.body.clone();
        let version = self.versions.get(id).copied().unwrap_or(original.version());

        let restored = match self.client.update_content_type(id, version, &body).await {
            Ok(restored) => restored,
            Err(e) => {
                report.record_failure(format!("restore content type '{}'", id), &e);
                return;
            }
        };
        self.versions.insert(id.to_string(), restored.version());

        if was_published {
            match self
                .client
                .publish_content_type(id, restored.version())
                .await
            {
                Ok(published) => {
                    self.versions.insert(id.to_string(), published.version());
                }
                Err(e) => {
                    report.record_failure(format!("republish content type '{}'", id), &e);
                    return;
                }
            }
        }

        tracing::info!(content_type = %id, "Rolled back content type");
        report.restored.push(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccm_client::Sys;
    use ccm_meta::{Field, FieldType};
    use pretty_assertions::assert_eq;
    use serde_json::{Map, json};

    fn remote(fields: Vec<Field>) -> RemoteContentType {
        let mut extra = Map::new();
        extra.insert("metadata".to_string(), json!({ "annotations": {} }));
        RemoteContentType {
            sys: Sys::new("blog", 5),
            body: ContentTypeDraft {
                name: "Old".to_string(),
                description: Some("Remote description".to_string()),
                display_field: Some("legacy".to_string()),
                fields,
                extra,
            },
        }
    }

    #[test]
    fn merged_body_keeps_remote_only_fields_as_omitted() {
        let model = ContentModel::new("blog", "Blog")
            .with_field(Field::new("title", "Title", FieldType::Symbol));
        let remote = remote(vec![
            Field::new("legacy", "Legacy", FieldType::Text),
            Field::new("title", "Old Title", FieldType::Symbol),
        ]);

        let body = merged_body(&model, &remote);

        let ids: Vec<_> = body.fields.iter().map(|f| (f.id.as_str(), f.omitted)).collect();
        assert_eq!(ids, vec![("title", false), ("legacy", true)]);
        assert_eq!(body.fields[0].name, "Title");
        assert_eq!(body.display_field.as_deref(), Some("title"));
        assert_eq!(body.description.as_deref(), Some(""));
        assert!(body.extra.contains_key("metadata"));
    }

    #[test]
    fn merged_body_display_field_without_symbol_is_empty() {
        let model = ContentModel::new("blog", "Blog")
            .with_field(Field::new("count", "Count", FieldType::Integer));

        let body = merged_body(&model, &remote(Vec::new()));
        assert_eq!(body.display_field.as_deref(), Some(""));
    }
}
