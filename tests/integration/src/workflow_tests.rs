//! End-to-end workflows across loader, engine and sync
//!
//! These follow a models directory through sync, local edits, trial and
//! migration, the way a team would use the tool.

use std::time::Duration;

use ccm_core::{Migrator, ModelSource, TrialRunner, sync_to_local};
use ccm_meta::{ContentModel, Field, FieldType, ModelLoader};
use ccm_test_utils::fixtures::{author, blog, default_locale, locale};
use ccm_test_utils::{FakeSpace, TestModelsDir};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn synced_models_migrate_into_an_empty_space() {
    let source = FakeSpace::shared();
    source.seed_content_type(&blog());
    source.seed_content_type(&author());
    source.seed_locale(&default_locale("en-US"));
    let dir = TestModelsDir::new();

    sync_to_local(&source.client(), dir.root()).await.unwrap();

    let target = FakeSpace::shared();
    target.seed_locale(&default_locale("en-US"));
    let migration = Migrator::new(target.gateway())
        .migrate(&target.options(), ModelSource::Path(dir.root().to_path_buf()))
        .await
        .unwrap();

    assert!(migration.is_success());
    assert_eq!(target.content_type_ids(), vec!["blog", "author"]);
    for id in ["blog", "author"] {
        let expected = source.content_type(id).unwrap();
        let actual = target.content_type(id).unwrap();
        assert_eq!(actual.body.fields, expected.body.fields);
        assert_eq!(actual.body.display_field, expected.body.display_field);
        assert!(actual.sys.is_published());
    }
}

#[tokio::test]
async fn local_edit_is_tried_then_migrated() {
    let fake = FakeSpace::shared();
    fake.seed_content_type(&blog());
    fake.seed_locale(&default_locale("en-US"));
    let dir = TestModelsDir::new();
    sync_to_local(&fake.client(), dir.root()).await.unwrap();

    // Add a field and a locale locally
    let mut model = dir.read_json("blog.json");
    model["fields"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "id": "summary", "name": "Summary", "type": "Text" }));
    dir.write_json("blog.json", &model);
    let mut index = dir.read_json("index.json");
    index["locales"]
        .as_array_mut()
        .unwrap()
        .push(serde_json::to_value(locale("de-DE", "German")).unwrap());
    dir.write_json("index.json", &index);

    let trial = TrialRunner::new(fake.gateway())
        .with_poll_interval(Duration::ZERO)
        .run(&fake.options(), ModelSource::Path(dir.root().to_path_buf()))
        .await
        .unwrap();
    assert!(trial.is_success(), "{}", trial);
    assert!(!fake.content_type("blog").unwrap().body.fields.iter().any(|f| f.id == "summary"));
    assert!(fake.locale("de-DE").is_none());

    let migration = Migrator::new(fake.gateway())
        .migrate(&fake.options(), ModelSource::Path(dir.root().to_path_buf()))
        .await
        .unwrap();
    assert!(migration.is_success());
    assert_eq!(migration.locales.created, vec!["de-DE"]);

    let remote = fake.content_type("blog").unwrap();
    let ids: Vec<_> = remote.body.fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["title", "body", "summary"]);
}

#[tokio::test]
async fn resync_after_migration_keeps_local_annotations() {
    let fake = FakeSpace::shared();
    let dir = TestModelsDir::new();
    let model = ContentModel::new("page", "Page")
        .with_field(Field::new("heading", "Heading", FieldType::Symbol));
    dir.write_models(&[model], &[]);
    let mut local = dir.read_json("page.json");
    local["x-reviewed-by"] = json!("content-team");
    dir.write_json("page.json", &local);

    Migrator::new(fake.gateway())
        .migrate(&fake.options(), ModelSource::Path(dir.root().to_path_buf()))
        .await
        .unwrap();
    sync_to_local(&fake.client(), dir.root()).await.unwrap();

    let synced = dir.read_json("page.json");
    assert_eq!(synced["x-reviewed-by"], "content-team");
    assert_eq!(synced["displayField"], "heading");

    let loaded = ModelLoader::new().load(dir.root()).unwrap();
    assert_eq!(loaded.count, 1);
}
