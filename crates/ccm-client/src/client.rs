//! Bound client handles and the gateway that builds them

use std::fmt;
use std::sync::Arc;

use ccm_meta::{EditorInterfaceConfig, Locale};

use crate::api::{ManagementApi, Scope};
use crate::http::{DEFAULT_BASE_URL, HttpManagementApi};
use crate::types::{
    ContentTypeDraft, Environment, LocaleBody, RemoteContentType, RemoteEditorInterface,
    RemoteLocale,
};
use crate::{Error, Result};

/// Raw credentials a client is built from
#[derive(Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub access_token: String,
    pub space_id: String,
    pub environment_id: String,
}

impl ClientOptions {
    pub fn new(
        access_token: impl Into<String>,
        space_id: impl Into<String>,
        environment_id: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            space_id: space_id.into(),
            environment_id: environment_id.into(),
        }
    }

    /// Same credentials, another environment of the same space
    pub fn with_environment(&self, environment_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            ..self.clone()
        }
    }

    /// Check that no option is empty.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("accessToken", &self.access_token),
            ("spaceId", &self.space_id),
            ("environmentId", &self.environment_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Configuration(format!(
                "Missing required client option(s): {}",
                missing.join(", ")
            )))
        }
    }

    pub fn scope(&self) -> Scope {
        Scope::new(&self.space_id, &self.environment_id)
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("access_token", &"<redacted>")
            .field("space_id", &self.space_id)
            .field("environment_id", &self.environment_id)
            .finish()
    }
}

/// Selects the backend client handles are built against
#[derive(Clone)]
pub enum Gateway {
    /// Management API over HTTP
    Http { base_url: String },
    /// An existing implementation shared by every handle
    Shared(Arc<dyn ManagementApi>),
}

impl Default for Gateway {
    fn default() -> Self {
        Self::http(DEFAULT_BASE_URL)
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { base_url } => f.debug_struct("Http").field("base_url", base_url).finish(),
            Self::Shared(_) => f.write_str("Shared"),
        }
    }
}

impl Gateway {
    pub fn http(base_url: impl Into<String>) -> Self {
        Self::Http {
            base_url: base_url.into(),
        }
    }

    pub fn shared(api: Arc<dyn ManagementApi>) -> Self {
        Self::Shared(api)
    }

    /// Validate `options` and build a handle bound to their space and
    /// environment.
    pub fn create_client(&self, options: &ClientOptions) -> Result<Client> {
        options.validate()?;

        let api: Arc<dyn ManagementApi> = match self {
            Self::Http { base_url } => {
                Arc::new(HttpManagementApi::new(&options.access_token, base_url)?)
            }
            Self::Shared(api) => Arc::clone(api),
        };

        tracing::debug!(
            space = %options.space_id,
            environment = %options.environment_id,
            "Created management client"
        );

        Ok(Client {
            api,
            scope: options.scope(),
        })
    }
}

/// Build a handle against the public management API
pub fn create_client(options: &ClientOptions) -> Result<Client> {
    Gateway::default().create_client(options)
}

/// A handle bound to one environment of one space.
///
/// Cheap to clone; clones share the underlying connection.
#[derive(Clone)]
pub struct Client {
    api: Arc<dyn ManagementApi>,
    scope: Scope,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("scope", &self.scope).finish()
    }
}

impl Client {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn space_id(&self) -> &str {
        &self.scope.space_id
    }

    pub fn environment_id(&self) -> &str {
        &self.scope.environment_id
    }

    /// Rebind to another environment of the same space
    pub fn for_environment(&self, environment_id: impl Into<String>) -> Self {
        Self {
            api: Arc::clone(&self.api),
            scope: Scope::new(&self.scope.space_id, environment_id),
        }
    }

    pub async fn content_types(&self, limit: usize) -> Result<Vec<RemoteContentType>> {
        Ok(self.api.get_content_types(&self.scope, limit).await?.items)
    }

    pub async fn create_content_type(
        &self,
        id: &str,
        draft: &ContentTypeDraft,
    ) -> Result<RemoteContentType> {
        self.api.create_content_type(&self.scope, id, draft).await
    }

    pub async fn update_content_type(
        &self,
        id: &str,
        version: u64,
        draft: &ContentTypeDraft,
    ) -> Result<RemoteContentType> {
        self.api
            .update_content_type(&self.scope, id, version, draft)
            .await
    }

    pub async fn publish_content_type(&self, id: &str, version: u64) -> Result<RemoteContentType> {
        self.api.publish_content_type(&self.scope, id, version).await
    }

    pub async fn unpublish_content_type(
        &self,
        id: &str,
        version: u64,
    ) -> Result<RemoteContentType> {
        self.api
            .unpublish_content_type(&self.scope, id, version)
            .await
    }

    pub async fn delete_content_type(&self, id: &str) -> Result<()> {
        self.api.delete_content_type(&self.scope, id).await
    }

    pub async fn editor_interfaces(&self, limit: usize) -> Result<Vec<RemoteEditorInterface>> {
        Ok(self.api.get_editor_interfaces(&self.scope, limit).await?.items)
    }

    pub async fn update_editor_interface(
        &self,
        content_type_id: &str,
        version: u64,
        body: &EditorInterfaceConfig,
    ) -> Result<RemoteEditorInterface> {
        self.api
            .update_editor_interface(&self.scope, content_type_id, version, body)
            .await
    }

    pub async fn locales(&self) -> Result<Vec<RemoteLocale>> {
        Ok(self.api.get_locales(&self.scope).await?.items)
    }

    pub async fn create_locale(&self, locale: &Locale) -> Result<RemoteLocale> {
        self.api.create_locale(&self.scope, locale).await
    }

    pub async fn update_locale(
        &self,
        locale_id: &str,
        version: u64,
        body: &LocaleBody,
    ) -> Result<RemoteLocale> {
        self.api
            .update_locale(&self.scope, locale_id, version, body)
            .await
    }

    pub async fn delete_locale(&self, locale_id: &str) -> Result<()> {
        self.api.delete_locale(&self.scope, locale_id).await
    }

    /// Create an environment in this space, cloned from the bound one
    pub async fn create_environment(&self, environment_id: &str) -> Result<Environment> {
        self.api
            .create_environment(
                &self.scope.space_id,
                environment_id,
                environment_id,
                Some(&self.scope.environment_id),
            )
            .await
    }

    pub async fn environment(&self, environment_id: &str) -> Result<Environment> {
        self.api
            .get_environment(&self.scope.space_id, environment_id)
            .await
    }

    pub async fn delete_environment(&self, environment_id: &str) -> Result<()> {
        self.api
            .delete_environment(&self.scope.space_id, environment_id)
            .await
    }
}
