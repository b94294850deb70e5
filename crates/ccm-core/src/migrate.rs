//! Migration orchestration: locales first, then content types

use std::path::PathBuf;

use ccm_client::{Client, ClientOptions, Gateway};
use ccm_meta::{ContentModel, Locale, ModelLoader};

use crate::reconcile::{
    ContentTypeReport, LocaleReport, reconcile_content_types, reconcile_locales,
};
use crate::{Error, Result};

/// Where the desired definitions come from
#[derive(Debug, Clone)]
pub enum ModelSource {
    Definitions {
        models: Vec<ContentModel>,
        locales: Vec<Locale>,
    },
    /// A models directory with an index file
    Path(PathBuf),
}

/// Definitions ready to migrate
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    pub models: Vec<ContentModel>,
    pub locales: Vec<Locale>,
}

impl ModelSource {
    pub fn models(models: Vec<ContentModel>) -> Self {
        Self::Definitions {
            models,
            locales: Vec::new(),
        }
    }

    /// Load the definitions, reading the models directory if needed.
    pub fn load(self) -> Result<Definitions> {
        match self {
            Self::Definitions { models, locales } => Ok(Definitions { models, locales }),
            Self::Path(path) => {
                let loaded = ModelLoader::new().load(&path)?;
                Ok(Definitions {
                    models: loaded.models,
                    locales: loaded.locales,
                })
            }
        }
    }
}

/// A loosely specified model source, as accepted from callers
#[derive(Debug, Clone, Default)]
pub struct MigrateRequest {
    pub models: Option<Vec<ContentModel>>,
    pub locales: Option<Vec<Locale>>,
    pub models_path: Option<PathBuf>,
}

impl MigrateRequest {
    /// Resolve into a [`ModelSource`]; a path wins over inline models.
    pub fn resolve(self) -> Result<ModelSource> {
        match (self.models_path, self.models) {
            (Some(path), _) => Ok(ModelSource::Path(path)),
            (None, Some(models)) => Ok(ModelSource::Definitions {
                models,
                locales: self.locales.unwrap_or_default(),
            }),
            (None, None) => Err(Error::Configuration(
                "Either 'modelsPath' or 'models' must be provided".to_string(),
            )),
        }
    }
}

/// Result of a migration run
#[derive(Debug)]
pub struct Migration {
    /// Handle the migration ran against
    pub client: Client,
    pub locales: LocaleReport,
    pub content_types: ContentTypeReport,
}

impl Migration {
    pub fn is_success(&self) -> bool {
        self.failures().is_empty()
    }

    /// Errors of the reconcilers that failed, locales first
    pub fn failures(&self) -> Vec<&Error> {
        [
            self.locales.outcome.error(),
            self.content_types.outcome.error(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Runs migrations through a [`Gateway`]
#[derive(Debug, Clone, Default)]
pub struct Migrator {
    gateway: Gateway,
}

impl Migrator {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Migrate the definitions of `source` into the environment of `options`.
    ///
    /// # Errors
    ///
    /// Only client construction and model loading fail the call; reconciler
    /// failures are rolled back and reported in the returned [`Migration`].
    pub async fn migrate(&self, options: &ClientOptions, source: ModelSource) -> Result<Migration> {
        let client = self.gateway.create_client(options)?;
        let definitions = source.load()?;
        Ok(run_migration(client, &definitions).await)
    }
}

/// Migrate with the default HTTP gateway
pub async fn migrate(options: &ClientOptions, source: ModelSource) -> Result<Migration> {
    Migrator::default().migrate(options, source).await
}

/// Run both reconcilers against a bound client.
///
/// Content types are reconciled even when the locale run failed.
pub async fn run_migration(client: Client, definitions: &Definitions) -> Migration {
    tracing::info!(
        environment = %client.environment_id(),
        models = definitions.models.len(),
        locales = definitions.locales.len(),
        "Starting migration"
    );

    let locales = reconcile_locales(&client, &definitions.locales).await;
    let content_types = reconcile_content_types(&client, &definitions.models).await;

    Migration {
        client,
        locales,
        content_types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_without_source_is_rejected() {
        let err = MigrateRequest::default().resolve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Either 'modelsPath' or 'models' must be provided"
        );
    }

    #[test]
    fn request_path_wins_over_models() {
        let request = MigrateRequest {
            models: Some(vec![ContentModel::new("blog", "Blog")]),
            locales: None,
            models_path: Some(PathBuf::from("models")),
        };

        assert!(matches!(request.resolve().unwrap(), ModelSource::Path(p) if p == PathBuf::from("models")));
    }

    #[test]
    fn request_with_models_keeps_locales() {
        let request = MigrateRequest {
            models: Some(Vec::new()),
            locales: Some(vec![Locale::new("en-US")]),
            models_path: None,
        };

        let definitions = request.resolve().unwrap().load().unwrap();
        assert!(definitions.models.is_empty());
        assert_eq!(definitions.locales.len(), 1);
    }
}
