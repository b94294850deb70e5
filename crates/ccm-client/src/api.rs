//! The management API seam
//!
//! [`ManagementApi`] is the typed surface the migration engine needs from the
//! remote service. [`HttpManagementApi`](crate::HttpManagementApi) speaks HTTP;
//! tests plug in an in-memory implementation through
//! [`Gateway::Shared`](crate::Gateway::Shared).

use async_trait::async_trait;

use ccm_meta::{EditorInterfaceConfig, Locale};

use crate::Result;
use crate::types::{
    Collection, ContentTypeDraft, Environment, LocaleBody, RemoteContentType,
    RemoteEditorInterface, RemoteLocale,
};

/// Space and environment a call operates on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    pub space_id: String,
    pub environment_id: String,
}

impl Scope {
    pub fn new(space_id: impl Into<String>, environment_id: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            environment_id: environment_id.into(),
        }
    }
}

/// Typed operations on content types, editor interfaces, locales and
/// environments.
///
/// Every write that takes a `version` must be given the version stamp last
/// observed for that resource; implementations reject stale versions with a
/// [`RemoteWrite`](crate::Error::RemoteWrite) error and never retry.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    // Content types

    async fn get_content_types(
        &self,
        scope: &Scope,
        limit: usize,
    ) -> Result<Collection<RemoteContentType>>;

    /// Create a content type with a caller-chosen id
    async fn create_content_type(
        &self,
        scope: &Scope,
        id: &str,
        draft: &ContentTypeDraft,
    ) -> Result<RemoteContentType>;

    async fn update_content_type(
        &self,
        scope: &Scope,
        id: &str,
        version: u64,
        draft: &ContentTypeDraft,
    ) -> Result<RemoteContentType>;

    async fn publish_content_type(
        &self,
        scope: &Scope,
        id: &str,
        version: u64,
    ) -> Result<RemoteContentType>;

    async fn unpublish_content_type(
        &self,
        scope: &Scope,
        id: &str,
        version: u64,
    ) -> Result<RemoteContentType>;

    async fn delete_content_type(&self, scope: &Scope, id: &str) -> Result<()>;

    // Editor interfaces

    async fn get_editor_interfaces(
        &self,
        scope: &Scope,
        limit: usize,
    ) -> Result<Collection<RemoteEditorInterface>>;

    async fn update_editor_interface(
        &self,
        scope: &Scope,
        content_type_id: &str,
        version: u64,
        body: &EditorInterfaceConfig,
    ) -> Result<RemoteEditorInterface>;

    // Locales

    async fn get_locales(&self, scope: &Scope) -> Result<Collection<RemoteLocale>>;

    async fn create_locale(&self, scope: &Scope, locale: &Locale) -> Result<RemoteLocale>;

    async fn update_locale(
        &self,
        scope: &Scope,
        locale_id: &str,
        version: u64,
        body: &LocaleBody,
    ) -> Result<RemoteLocale>;

    async fn delete_locale(&self, scope: &Scope, locale_id: &str) -> Result<()>;

    // Environments

    /// Create `environment_id`, cloned from `source` when given
    async fn create_environment(
        &self,
        space_id: &str,
        environment_id: &str,
        name: &str,
        source: Option<&str>,
    ) -> Result<Environment>;

    async fn get_environment(&self, space_id: &str, environment_id: &str) -> Result<Environment>;

    async fn delete_environment(&self, space_id: &str, environment_id: &str) -> Result<()>;
}
