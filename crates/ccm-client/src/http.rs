//! HTTP implementation of [`ManagementApi`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use ccm_meta::{EditorInterfaceConfig, Locale};

use crate::api::{ManagementApi, Scope};
use crate::error::Operation;
use crate::types::{
    Collection, ContentTypeDraft, Environment, LocaleBody, RemoteContentType,
    RemoteEditorInterface, RemoteLocale,
};
use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.contentful.com";

/// Vendor media type required on request bodies
pub const MANAGEMENT_MEDIA_TYPE: &str = "application/vnd.contentful.management.v1+json";

const VERSION_HEADER: &str = "X-Contentful-Version";
const SOURCE_ENVIRONMENT_HEADER: &str = "X-Contentful-Source-Environment";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Management API client speaking HTTP with a bearer token
pub struct HttpManagementApi {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl HttpManagementApi {
    pub fn new(access_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("ccm/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.access_token)
            .header(CONTENT_TYPE, MANAGEMENT_MEDIA_TYPE)
    }

    /// Send a read and decode the body; 404 becomes [`Error::NotFound`].
    async fn read<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
        id: &str,
    ) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::not_found(resource, id));
        }
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        Ok(response.json().await?)
    }

    /// Send a write and decode the body; any failure becomes
    /// [`Error::RemoteWrite`].
    async fn write<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: Operation,
        target: &str,
    ) -> Result<T> {
        let response = self.send_write(request, operation, target).await?;
        response
            .json()
            .await
            .map_err(|e| Error::remote_write(operation, target, None, e.to_string()))
    }

    async fn send_write(
        &self,
        request: RequestBuilder,
        operation: Operation,
        target: &str,
    ) -> Result<Response> {
        tracing::debug!(%operation, target, "Sending write");

        let response = request
            .send()
            .await
            .map_err(|e| Error::remote_write(operation, target, None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::remote_write(
                operation,
                target,
                Some(status.as_u16()),
                error_message(response).await,
            ));
        }
        Ok(response)
    }
}

/// Extract a readable message from an error response.
///
/// Error bodies look like `{"sys": {"id": "VersionMismatch"}, "message": "..."}`.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    match serde_json::from_str::<Value>(&text) {
        Ok(body) => {
            let kind = body.pointer("/sys/id").and_then(Value::as_str);
            let message = body.get("message").and_then(Value::as_str);
            match (kind, message) {
                (Some(kind), Some(message)) => format!("{}: {}", kind, message),
                (None, Some(message)) => message.to_string(),
                (Some(kind), None) => kind.to_string(),
                (None, None) => status.to_string(),
            }
        }
        Err(_) if text.trim().is_empty() => status.to_string(),
        Err(_) => text,
    }
}

fn environment_path(scope: &Scope, tail: &str) -> String {
    format!(
        "/spaces/{}/environments/{}{}",
        scope.space_id, scope.environment_id, tail
    )
}

fn content_type_target(id: &str) -> String {
    format!("content type '{}'", id)
}

fn locale_target(id: &str) -> String {
    format!("locale '{}'", id)
}

#[async_trait]
impl ManagementApi for HttpManagementApi {
    async fn get_content_types(
        &self,
        scope: &Scope,
        limit: usize,
    ) -> Result<Collection<RemoteContentType>> {
        let request = self
            .request(Method::GET, &environment_path(scope, "/content_types"))
            .query(&[("limit", limit)]);
        self.read(request, "content types of environment", &scope.environment_id)
            .await
    }

    async fn create_content_type(
        &self,
        scope: &Scope,
        id: &str,
        draft: &ContentTypeDraft,
    ) -> Result<RemoteContentType> {
        let path = environment_path(scope, &format!("/content_types/{}", id));
        let request = self.request(Method::PUT, &path).json(draft);
        self.write(request, Operation::Create, &content_type_target(id))
            .await
    }

    async fn update_content_type(
        &self,
        scope: &Scope,
        id: &str,
        version: u64,
        draft: &ContentTypeDraft,
    ) -> Result<RemoteContentType> {
        let path = environment_path(scope, &format!("/content_types/{}", id));
        let request = self
            .request(Method::PUT, &path)
            .header(VERSION_HEADER, version)
            .json(draft);
        self.write(request, Operation::Update, &content_type_target(id))
            .await
    }

    async fn publish_content_type(
        &self,
        scope: &Scope,
        id: &str,
        version: u64,
    ) -> Result<RemoteContentType> {
        let path = environment_path(scope, &format!("/content_types/{}/published", id));
        let request = self
            .request(Method::PUT, &path)
            .header(VERSION_HEADER, version);
        self.write(request, Operation::Publish, &content_type_target(id))
            .await
    }

    async fn unpublish_content_type(
        &self,
        scope: &Scope,
        id: &str,
        version: u64,
    ) -> Result<RemoteContentType> {
        let path = environment_path(scope, &format!("/content_types/{}/published", id));
        let request = self
            .request(Method::DELETE, &path)
            .header(VERSION_HEADER, version);
        self.write(request, Operation::Unpublish, &content_type_target(id))
            .await
    }

    async fn delete_content_type(&self, scope: &Scope, id: &str) -> Result<()> {
        let path = environment_path(scope, &format!("/content_types/{}", id));
        let request = self.request(Method::DELETE, &path);
        self.send_write(request, Operation::Delete, &content_type_target(id))
            .await?;
        Ok(())
    }

    async fn get_editor_interfaces(
        &self,
        scope: &Scope,
        limit: usize,
    ) -> Result<Collection<RemoteEditorInterface>> {
        let request = self
            .request(Method::GET, &environment_path(scope, "/editor_interfaces"))
            .query(&[("limit", limit)]);
        self.read(
            request,
            "editor interfaces of environment",
            &scope.environment_id,
        )
        .await
    }

    async fn update_editor_interface(
        &self,
        scope: &Scope,
        content_type_id: &str,
        version: u64,
        body: &EditorInterfaceConfig,
    ) -> Result<RemoteEditorInterface> {
        let path = environment_path(
            scope,
            &format!("/content_types/{}/editor_interface", content_type_id),
        );
        let request = self
            .request(Method::PUT, &path)
            .header(VERSION_HEADER, version)
            .json(body);
        let target = format!("editor interface of '{}'", content_type_id);
        self.write(request, Operation::Update, &target).await
    }

    async fn get_locales(&self, scope: &Scope) -> Result<Collection<RemoteLocale>> {
        let request = self.request(Method::GET, &environment_path(scope, "/locales"));
        self.read(request, "locales of environment", &scope.environment_id)
            .await
    }

    async fn create_locale(&self, scope: &Scope, locale: &Locale) -> Result<RemoteLocale> {
        let request = self
            .request(Method::POST, &environment_path(scope, "/locales"))
            .json(locale);
        self.write(request, Operation::Create, &locale_target(&locale.code))
            .await
    }

    async fn update_locale(
        &self,
        scope: &Scope,
        locale_id: &str,
        version: u64,
        body: &LocaleBody,
    ) -> Result<RemoteLocale> {
        let path = environment_path(scope, &format!("/locales/{}", locale_id));
        let request = self
            .request(Method::PUT, &path)
            .header(VERSION_HEADER, version)
            .json(body);
        self.write(request, Operation::Update, &locale_target(&body.code))
            .await
    }

    async fn delete_locale(&self, scope: &Scope, locale_id: &str) -> Result<()> {
        let path = environment_path(scope, &format!("/locales/{}", locale_id));
        let request = self.request(Method::DELETE, &path);
        self.send_write(request, Operation::Delete, &locale_target(locale_id))
            .await?;
        Ok(())
    }

    async fn create_environment(
        &self,
        space_id: &str,
        environment_id: &str,
        name: &str,
        source: Option<&str>,
    ) -> Result<Environment> {
        let path = format!("/spaces/{}/environments/{}", space_id, environment_id);
        let mut request = self.request(Method::PUT, &path).json(&json!({ "name": name }));
        if let Some(source) = source {
            request = request.header(SOURCE_ENVIRONMENT_HEADER, source);
        }
        let target = format!("environment '{}'", environment_id);
        self.write(request, Operation::Create, &target).await
    }

    async fn get_environment(&self, space_id: &str, environment_id: &str) -> Result<Environment> {
        let path = format!("/spaces/{}/environments/{}", space_id, environment_id);
        self.read(self.request(Method::GET, &path), "environment", environment_id)
            .await
    }

    async fn delete_environment(&self, space_id: &str, environment_id: &str) -> Result<()> {
        let path = format!("/spaces/{}/environments/{}", space_id, environment_id);
        let target = format!("environment '{}'", environment_id);
        self.send_write(self.request(Method::DELETE, &path), Operation::Delete, &target)
            .await?;
        Ok(())
    }
}
