//! Sync remote content types to local model files
//!
//! Writes one `<id>.json` per remote content type plus an `index.json`
//! listing them with the space's locales. A model file that already exists
//! is merged with the remote model, so keys only present locally survive.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use ccm_client::{Client, RemoteContentType, RemoteEditorInterface};
use ccm_meta::{ContentModel, DefinitionStore};

use crate::Result;
use crate::merge::deep_merge_value;
use crate::reconcile::FETCH_LIMIT;

/// Bookkeeping content type of migration tooling, never synced
pub const MIGRATIONS_CONTENT_TYPE: &str = "contentful-migrations";

pub const INDEX_FILE: &str = "index.json";

/// Files written by a sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub directory: PathBuf,
    /// Model files, in remote order
    pub models: Vec<PathBuf>,
    pub index: PathBuf,
    pub locales: usize,
}

/// Write the remote content model of `client`'s environment into `dir`.
pub async fn sync_to_local(client: &Client, dir: impl AsRef<Path>) -> Result<SyncSummary> {
    let dir = dir.as_ref();
    tracing::info!(
        environment = %client.environment_id(),
        directory = %dir.display(),
        "Syncing content types to local files"
    );

    let content_types: Vec<RemoteContentType> = client
        .content_types(FETCH_LIMIT)
        .await?
        .into_iter()
        .filter(|ct| ct.id() != MIGRATIONS_CONTENT_TYPE)
        .collect();
    let mut editor_interfaces: HashMap<String, RemoteEditorInterface> = client
        .editor_interfaces(FETCH_LIMIT)
        .await?
        .into_iter()
        .filter_map(|ei| Some((ei.content_type_id()?.to_string(), ei)))
        .collect();
    let locales = client.locales().await?;

    let store = DefinitionStore::new();
    let mut models = Vec::with_capacity(content_types.len());
    let mut files = Vec::with_capacity(content_types.len());

    for content_type in content_types {
        let id = content_type.id().to_string();
        let model = to_model(content_type, editor_interfaces.remove(&id));
        let file = format!("{}.json", id);
        let path = dir.join(&file);

        let mut document = serde_json::to_value(&model)?;
        if path.is_file() {
            tracing::debug!(path = %path.display(), "Merging with existing model file");
            let mut local: Value = store.load(&path)?;
            deep_merge_value(&mut local, &document);
            document = local;
        }

        store.save(&path, &document)?;
        tracing::info!(content_type = %id, path = %path.display(), "Wrote model");
        models.push(path);
        files.push(file);
    }

    let locale_bodies: Vec<_> = locales.iter().map(|l| l.body.writable()).collect();
    let index = dir.join(INDEX_FILE);
    store.save(&index, &json!({ "models": files, "locales": locale_bodies }))?;

    Ok(SyncSummary {
        directory: dir.to_path_buf(),
        models,
        index,
        locales: locale_bodies.len(),
    })
}

fn to_model(
    content_type: RemoteContentType,
    editor_interface: Option<RemoteEditorInterface>,
) -> ContentModel {
    let body = content_type.body;
    ContentModel {
        id: content_type.sys.id,
        name: body.name,
        description: body.description,
        display_field: body.display_field.filter(|f| !f.is_empty()),
        fields: body.fields,
        editor_interface: editor_interface.map(|ei| ei.body),
    }
}
