//! Reconciliation scenarios against an in-memory space
//!
//! Each test sets up a remote state, runs the engine the way the `ccm`
//! binary does, and checks both the report and the resulting remote state.

use std::time::Duration;

use ccm_core::reconcile::{Outcome, reconcile_content_types, reconcile_locales};
use ccm_core::trial::DEFAULT_MAX_ATTEMPTS;
use ccm_core::{ModelSource, TrialRunner};
use ccm_meta::{ContentModel, Field, FieldType};
use ccm_test_utils::fixtures::{blog, default_locale, locale, simple};
use ccm_test_utils::{Call, FakeOp, FakeSpace, Readiness};
use pretty_assertions::assert_eq;

// =============================================================================
// Content types
// =============================================================================

#[tokio::test]
async fn scenario_blog_against_empty_space() {
    let fake = FakeSpace::shared();

    let report = reconcile_content_types(&fake.client(), &[blog()]).await;
    assert!(matches!(report.outcome, Outcome::Applied));

    let creates = fake.count_calls(|c| {
        matches!(c, Call::CreateContentType { id, draft } if id == "blog" && draft.fields.is_empty())
    });
    let updates = fake.count_calls(|c| {
        matches!(c, Call::UpdateContentType { draft, .. }
            if draft.display_field.as_deref() == Some("title")
                && draft.fields.iter().any(|f| f.id == "title"))
    });
    let publishes = fake.count_calls(|c| {
        matches!(c, Call::PublishContentType { id, version: 2 } if id == "blog")
    });
    assert_eq!((creates, updates, publishes), (1, 1, 1));
}

#[tokio::test]
async fn scenario_display_field_falls_back_to_first_symbol() {
    let fake = FakeSpace::shared();
    let with_symbol = ContentModel::new("product", "Product")
        .with_field(Field::new("n", "Count", FieldType::Number))
        .with_field(Field::new("t", "Title", FieldType::Symbol));
    let without_symbol = ContentModel::new("stats", "Stats")
        .with_field(Field::new("n", "Count", FieldType::Number));

    reconcile_content_types(&fake.client(), &[with_symbol, without_symbol]).await;

    let display = |id: &str| fake.content_type(id).unwrap().body.display_field;
    assert_eq!(display("product").as_deref(), Some("t"));
    assert_eq!(display("stats").as_deref(), Some(""));
}

#[tokio::test]
async fn scenario_consecutive_runs_converge() {
    let fake = FakeSpace::shared();
    let client = fake.client();

    reconcile_content_types(&client, &[blog()]).await;
    let first = fake.content_type("blog").unwrap();
    let report = reconcile_content_types(&client, &[blog()]).await;
    let second = fake.content_type("blog").unwrap();

    assert_eq!(report.updated, vec!["blog"]);
    assert_eq!(first.body.fields, second.body.fields);
    assert_eq!(first.body.display_field, second.body.display_field);
    assert!(second.version() > first.version());
}

#[tokio::test]
async fn scenario_remote_field_removed_locally_is_omitted() {
    let fake = FakeSpace::shared();
    let remote = blog().with_field(Field::new("legacy", "Legacy", FieldType::Symbol));
    fake.seed_content_type(&remote);

    reconcile_content_types(&fake.client(), &[blog()]).await;

    let legacy = fake
        .content_type("blog")
        .unwrap()
        .body
        .fields
        .into_iter()
        .find(|f| f.id == "legacy")
        .unwrap();
    assert!(legacy.omitted);
}

#[tokio::test]
async fn scenario_failed_create_removes_earlier_creations() {
    let fake = FakeSpace::shared();
    fake.fail_on(FakeOp::CreateContentType, "b");

    let report = reconcile_content_types(&fake.client(), &[simple("a"), simple("b")]).await;

    assert!(report.outcome.is_failed());
    assert_eq!(report.outcome.rollback().unwrap().deleted, vec!["a"]);
    assert!(fake.content_type("a").is_none());
    assert!(fake.content_type("b").is_none());
}

// =============================================================================
// Locales
// =============================================================================

#[tokio::test]
async fn scenario_locale_create_and_deactivate() {
    let fake = FakeSpace::shared();
    fake.seed_locale(&default_locale("en-US"));
    fake.seed_locale(&locale("fr-FR", "French"));
    let untouched = fake.locale("en-US").unwrap();

    let desired = vec![default_locale("en-US"), locale("es-ES", "Spanish")];
    let report = reconcile_locales(&fake.client(), &desired).await;

    assert_eq!(report.created, vec!["es-ES"]);
    assert_eq!(report.deactivated, vec!["fr-FR"]);
    assert_eq!(fake.locale("en-US").unwrap(), untouched);
    assert!(!fake.locale("fr-FR").unwrap().body.content_delivery_api);
}

#[tokio::test]
async fn scenario_empty_locale_list_keeps_default() {
    let fake = FakeSpace::shared();
    fake.seed_locale(&default_locale("en-US"));

    let report = reconcile_locales(&fake.client(), &[]).await;

    assert!(matches!(report.outcome, Outcome::Skipped));
    assert!(fake.locale("en-US").unwrap().body.content_management_api);
}

// =============================================================================
// Trial
// =============================================================================

#[tokio::test]
async fn scenario_trial_environment_never_ready() {
    let fake = FakeSpace::shared();
    fake.set_readiness(Readiness::Never);

    let result = TrialRunner::new(fake.gateway())
        .with_poll_interval(Duration::ZERO)
        .run(&fake.options(), ModelSource::models(vec![blog()]))
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Trial migration failed: "));
    assert_eq!(
        fake.count_calls(|c| matches!(c, Call::GetEnvironment { .. })),
        DEFAULT_MAX_ATTEMPTS as usize
    );
    assert_eq!(
        fake.count_calls(|c| matches!(c, Call::CreateContentType { .. } | Call::UpdateContentType { .. })),
        0
    );
    assert_eq!(
        fake.count_calls(|c| matches!(c, Call::DeleteEnvironment { .. })),
        1
    );
}
