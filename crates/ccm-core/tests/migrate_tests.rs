//! Tests for migration orchestration

use ccm_client::ClientOptions;
use ccm_core::{Error, Migrator, ModelSource};
use ccm_test_utils::fixtures::{author, blog, default_locale, locale};
use ccm_test_utils::{Call, FakeOp, FakeSpace, TestModelsDir};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_migrates_models_directory() {
    let fake = FakeSpace::shared();
    fake.seed_locale(&default_locale("en-US"));
    let dir = TestModelsDir::new();
    dir.write_models(
        &[blog(), author()],
        &[default_locale("en-US"), locale("de-DE", "German")],
    );

    let migration = Migrator::new(fake.gateway())
        .migrate(&fake.options(), ModelSource::Path(dir.root().to_path_buf()))
        .await
        .unwrap();

    assert!(migration.is_success());
    assert_eq!(migration.locales.created, vec!["de-DE"]);
    assert_eq!(migration.content_types.created, vec!["blog", "author"]);
    assert_eq!(fake.content_type_ids(), vec!["blog", "author"]);
    assert_eq!(migration.client.environment_id(), "master");
}

#[tokio::test]
async fn test_locales_are_reconciled_before_content_types() {
    let fake = FakeSpace::shared();
    let source = ModelSource::Definitions {
        models: vec![blog()],
        locales: vec![default_locale("en-US")],
    };

    Migrator::new(fake.gateway())
        .migrate(&fake.options(), source)
        .await
        .unwrap();

    let calls = fake.calls();
    let first_locale = calls
        .iter()
        .position(|c| matches!(c, Call::GetLocales { .. }))
        .unwrap();
    let first_content_type = calls
        .iter()
        .position(|c| matches!(c, Call::GetContentTypes { .. }))
        .unwrap();
    assert!(first_locale < first_content_type);
}

#[tokio::test]
async fn test_locale_failure_does_not_stop_content_types() {
    let fake = FakeSpace::shared();
    fake.fail_all(FakeOp::GetLocales);
    let source = ModelSource::Definitions {
        models: vec![blog()],
        locales: vec![default_locale("en-US")],
    };

    let migration = Migrator::new(fake.gateway())
        .migrate(&fake.options(), source)
        .await
        .unwrap();

    assert!(!migration.is_success());
    assert!(migration.locales.outcome.is_failed());
    assert!(!migration.content_types.outcome.is_failed());
    assert_eq!(migration.failures().len(), 1);
    assert!(fake.content_type("blog").is_some());
}

#[tokio::test]
async fn test_missing_credentials_fail_before_any_call() {
    let fake = FakeSpace::shared();
    let options = ClientOptions::new("", fake.space_id(), "master");

    let err = Migrator::new(fake.gateway())
        .migrate(&options, ModelSource::models(vec![blog()]))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Client(ccm_client::Error::Configuration(_))));
    assert!(err.to_string().contains("accessToken"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_missing_index_is_a_load_error() {
    let fake = FakeSpace::shared();
    let dir = TestModelsDir::new();

    let err = Migrator::new(fake.gateway())
        .migrate(&fake.options(), ModelSource::Path(dir.root().to_path_buf()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Meta(ccm_meta::Error::IndexNotFound { .. })));
    assert!(fake.calls().is_empty());
}
