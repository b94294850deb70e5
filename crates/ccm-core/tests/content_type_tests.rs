//! Tests for content type reconciliation against the in-memory space

use ccm_client::ContentTypeDraft;
use ccm_core::reconcile::{Outcome, reconcile_content_types};
use ccm_meta::{ContentModel, Control, EditorInterfaceConfig, Field, FieldType};
use ccm_test_utils::fixtures::{blog, editor_interface, simple};
use ccm_test_utils::{Call, FakeOp, FakeSpace};

fn field_ids(draft: &ContentTypeDraft) -> Vec<(&str, bool)> {
    draft
        .fields
        .iter()
        .map(|f| (f.id.as_str(), f.omitted))
        .collect()
}

mod create_update_publish {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_new_model_is_created_updated_and_published() {
        let fake = FakeSpace::shared();

        let report = reconcile_content_types(&fake.client(), &[blog()]).await;

        assert!(matches!(report.outcome, Outcome::Applied));
        assert_eq!(report.created, vec!["blog"]);
        assert_eq!(report.updated, vec!["blog"]);
        assert_eq!(report.published, vec!["blog"]);

        let writes: Vec<Call> = fake
            .calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::GetContentTypes { .. } | Call::GetEditorInterfaces { .. }))
            .collect();
        assert_eq!(writes.len(), 3);
        match &writes[0] {
            Call::CreateContentType { id, draft } => {
                assert_eq!(id, "blog");
                assert_eq!(draft.name, "Blog Post");
                assert!(draft.fields.is_empty());
            }
            other => panic!("expected create, got {:?}", other),
        }
        match &writes[1] {
            Call::UpdateContentType { version, draft, .. } => {
                assert_eq!(*version, 1);
                assert_eq!(draft.display_field.as_deref(), Some("title"));
                assert_eq!(field_ids(draft), vec![("title", false), ("body", false)]);
            }
            other => panic!("expected update, got {:?}", other),
        }
        assert_eq!(
            writes[2],
            Call::PublishContentType {
                id: "blog".to_string(),
                version: 2
            }
        );

        let remote = fake.content_type("blog").unwrap();
        assert_eq!(remote.sys.published_version, Some(2));
        assert_eq!(remote.version(), 3);
    }

    #[tokio::test]
    async fn test_explicit_display_field_is_kept() {
        let fake = FakeSpace::shared();
        let model = blog().with_display_field("body");

        reconcile_content_types(&fake.client(), &[model]).await;

        let remote = fake.content_type("blog").unwrap();
        assert_eq!(remote.body.display_field.as_deref(), Some("body"));
    }

    #[tokio::test]
    async fn test_remote_only_fields_are_omitted_not_deleted() {
        let fake = FakeSpace::shared();
        let remote_model = blog().with_field(Field::new("legacy", "Legacy", FieldType::Text));
        fake.seed_content_type(&remote_model);

        let report = reconcile_content_types(&fake.client(), &[blog()]).await;

        assert!(matches!(report.outcome, Outcome::Applied));
        assert!(report.created.is_empty());
        let remote = fake.content_type("blog").unwrap();
        assert_eq!(
            field_ids(&remote.body),
            vec![("title", false), ("body", false), ("legacy", true)]
        );
    }

    #[tokio::test]
    async fn test_missing_description_clears_remote_description() {
        let fake = FakeSpace::shared();
        fake.seed_content_type(&blog().with_description("Old description"));

        reconcile_content_types(&fake.client(), &[blog()]).await;

        let remote = fake.content_type("blog").unwrap();
        assert_eq!(remote.body.description.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_desired_description_replaces_remote_description() {
        let fake = FakeSpace::shared();
        fake.seed_content_type(&blog().with_description("Old description"));

        reconcile_content_types(&fake.client(), &[blog().with_description("Posts")]).await;

        let remote = fake.content_type("blog").unwrap();
        assert_eq!(remote.body.description.as_deref(), Some("Posts"));
    }

    #[tokio::test]
    async fn test_second_run_creates_nothing() {
        let fake = FakeSpace::shared();
        let client = fake.client();
        reconcile_content_types(&client, &[blog()]).await;
        fake.clear_calls();

        let report = reconcile_content_types(&client, &[blog()]).await;

        assert!(matches!(report.outcome, Outcome::Applied));
        assert!(report.created.is_empty());
        assert_eq!(report.updated, vec!["blog"]);
        assert_eq!(
            fake.count_calls(|c| matches!(c, Call::CreateContentType { .. })),
            0
        );
        assert_eq!(fake.content_type("blog").unwrap().sys.published_version, Some(4));
    }

    #[tokio::test]
    async fn test_empty_model_list_is_skipped() {
        let fake = FakeSpace::shared();

        let report = reconcile_content_types(&fake.client(), &[]).await;

        assert!(matches!(report.outcome, Outcome::Skipped));
        assert!(fake.calls().is_empty());
    }
}

mod rollback {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_failed_publish_deletes_models_created_by_the_run() {
        let fake = FakeSpace::shared();
        fake.fail_on(FakeOp::PublishContentType, "beta");

        let report =
            reconcile_content_types(&fake.client(), &[simple("alpha"), simple("beta")]).await;

        let Outcome::Failed { error, rollback } = &report.outcome else {
            panic!("expected a failed outcome, got {}", report.outcome);
        };
        assert!(error.to_string().starts_with("Failed to publish beta"));
        assert_eq!(rollback.deleted, vec!["alpha", "beta"]);
        assert!(rollback.is_clean());

        // alpha was published and had to be unpublished first
        assert_eq!(
            fake.count_calls(|c| matches!(c, Call::UnpublishContentType { id, .. } if id == "alpha")),
            1
        );
        assert!(fake.content_type_ids().is_empty());
    }

    #[tokio::test]
    async fn test_failed_run_restores_existing_model() {
        let fake = FakeSpace::shared();
        fake.seed_content_type(&blog());
        fake.fail_on(FakeOp::PublishContentType, "zeta");

        let changed = blog().with_field(Field::new("summary", "Summary", FieldType::Text));
        let report = reconcile_content_types(&fake.client(), &[changed, simple("zeta")]).await;

        let rollback = report.outcome.rollback().unwrap();
        assert_eq!(rollback.restored, vec!["blog"]);
        assert_eq!(rollback.deleted, vec!["zeta"]);
        assert!(rollback.is_clean());

        let remote = fake.content_type("blog").unwrap();
        assert_eq!(field_ids(&remote.body), vec![("title", false), ("body", false)]);
        assert!(remote.sys.is_published());
        assert!(fake.content_type("zeta").is_none());
    }

    #[tokio::test]
    async fn test_failed_snapshot_writes_nothing() {
        let fake = FakeSpace::shared();
        fake.fail_all(FakeOp::GetEditorInterfaces);

        let report = reconcile_content_types(&fake.client(), &[blog()]).await;

        let rollback = report.outcome.rollback().unwrap();
        assert!(rollback.restored.is_empty() && rollback.deleted.is_empty());
        assert!(rollback.is_clean());
        assert!(fake.content_type_ids().is_empty());
    }
}

mod editor_interfaces {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_desired_controls_merge_into_remote_interface() {
        let fake = FakeSpace::shared();
        fake.seed_content_type(&blog());
        let mut remote = EditorInterfaceConfig::default()
            .with_control(Control::builtin("title", "singleLine"))
            .with_control(Control::builtin("body", "markdown"));
        remote
            .extra
            .insert("sidebar".to_string(), serde_json::json!([]));
        fake.seed_editor_interface("blog", remote);

        let model = ContentModel {
            editor_interface: Some(editor_interface("title", "slugEditor")),
            ..blog()
        };
        let report = reconcile_content_types(&fake.client(), &[model]).await;

        assert!(matches!(report.outcome, Outcome::Applied));
        assert_eq!(report.editor_interfaces_updated, vec!["blog"]);

        // Seeded at 1, bumped by publishing
        assert_eq!(
            fake.count_calls(|c| matches!(c, Call::UpdateEditorInterface { version: 2, .. })),
            1
        );

        let ei = fake.editor_interface("blog").unwrap();
        assert_eq!(
            ei.body.control("title").unwrap().widget_id.as_deref(),
            Some("slugEditor")
        );
        assert_eq!(
            ei.body.control("body").unwrap().widget_id.as_deref(),
            Some("markdown")
        );
        assert!(ei.body.extra.contains_key("sidebar"));
    }

    #[tokio::test]
    async fn test_missing_remote_interface_is_reported() {
        let fake = FakeSpace::shared();
        fake.seed_content_type(&blog());
        fake.remove_editor_interface("blog");

        let model = ContentModel {
            editor_interface: Some(editor_interface("title", "singleLine")),
            ..blog()
        };
        let report = reconcile_content_types(&fake.client(), &[model]).await;

        assert!(matches!(report.outcome, Outcome::Applied));
        assert_eq!(report.editor_interfaces_missing, vec!["blog"]);
        assert_eq!(
            fake.count_calls(|c| matches!(c, Call::UpdateEditorInterface { .. })),
            0
        );
    }

    #[tokio::test]
    async fn test_failed_interface_update_restores_content_type() {
        let fake = FakeSpace::shared();
        fake.seed_content_type(&blog());
        fake.fail_on(FakeOp::UpdateEditorInterface, "blog");

        let model = ContentModel {
            editor_interface: Some(editor_interface("title", "singleLine")),
            ..blog().with_field(Field::new("summary", "Summary", FieldType::Text))
        };
        let report = reconcile_content_types(&fake.client(), &[model]).await;

        let rollback = report.outcome.rollback().unwrap();
        assert_eq!(rollback.restored, vec!["blog"]);
        assert_eq!(rollback.failures.len(), 1);
        assert_eq!(
            rollback.failures[0].action,
            "restore editor interface of 'blog'"
        );

        let remote = fake.content_type("blog").unwrap();
        assert_eq!(field_ids(&remote.body), vec![("title", false), ("body", false)]);
        assert!(remote.sys.is_published());
    }
}
