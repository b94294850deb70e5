//! [`FakeSpace`], an in-memory management API.
//!
//! Behaves like the remote service where the migration engine depends on it:
//!
//! - creates start at version 1; update, publish and unpublish require the
//!   current version and advance it by one (stale versions fail with 409)
//! - publishing a content type bumps its editor interface, creating one at
//!   version 1 if none exists yet
//! - published content types cannot be deleted; the default locale cannot
//!   be deleted; locale writes reject the server-managed `internal_code`
//! - environments are cloned from their source and become ready according
//!   to a scripted [`Readiness`]
//!
//! Every call is recorded, and any operation can be made to fail for a given
//! target.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};

use ccm_client::{
    Client, ClientOptions, Collection, ContentTypeDraft, Environment, Error, Gateway,
    INTERNAL_CODE, Link, LocaleBody, ManagementApi, Operation, RemoteContentType,
    RemoteEditorInterface, RemoteLocale, Result, Scope, Sys,
};
use ccm_meta::{ContentModel, Control, EditorInterfaceConfig, Locale};

pub const FAKE_TOKEN: &str = "fake-token";
pub const MASTER: &str = "master";

/// Status reported for an environment that is not ready yet
pub const PROCESSING: &str = "processing";

/// A recorded management API call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetContentTypes { environment: String },
    CreateContentType { id: String, draft: ContentTypeDraft },
    UpdateContentType { id: String, version: u64, draft: ContentTypeDraft },
    PublishContentType { id: String, version: u64 },
    UnpublishContentType { id: String, version: u64 },
    DeleteContentType { id: String },
    GetEditorInterfaces { environment: String },
    UpdateEditorInterface { content_type_id: String, version: u64, body: EditorInterfaceConfig },
    GetLocales { environment: String },
    CreateLocale { code: String },
    UpdateLocale { id: String, version: u64, body: LocaleBody },
    DeleteLocale { id: String },
    CreateEnvironment { id: String, source: Option<String> },
    GetEnvironment { id: String },
    DeleteEnvironment { id: String },
}

/// Operations that can be scripted to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeOp {
    GetContentTypes,
    CreateContentType,
    UpdateContentType,
    PublishContentType,
    UnpublishContentType,
    DeleteContentType,
    GetEditorInterfaces,
    UpdateEditorInterface,
    GetLocales,
    CreateLocale,
    UpdateLocale,
    DeleteLocale,
    CreateEnvironment,
    GetEnvironment,
    DeleteEnvironment,
}

/// When a newly created environment reports `ready`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Immediate,
    /// Ready on the n-th status poll
    AfterPolls(u32),
    Never,
}

#[derive(Debug, Clone)]
struct Failure {
    op: FakeOp,
    /// `None` fails every call of `op`
    target: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct EnvironmentState {
    content_types: Vec<RemoteContentType>,
    editor_interfaces: BTreeMap<String, RemoteEditorInterface>,
    locales: Vec<RemoteLocale>,
    polls: u32,
}

#[derive(Debug)]
struct State {
    environments: BTreeMap<String, EnvironmentState>,
    calls: Vec<Call>,
    failures: Vec<Failure>,
    readiness: Readiness,
    next_locale_id: u64,
}

/// In-memory space with one `master` environment
#[derive(Debug)]
pub struct FakeSpace {
    space_id: String,
    state: Mutex<State>,
}

impl FakeSpace {
    pub fn new(space_id: impl Into<String>) -> Self {
        let mut environments = BTreeMap::new();
        environments.insert(MASTER.to_string(), EnvironmentState::default());

        Self {
            space_id: space_id.into(),
            state: Mutex::new(State {
                environments,
                calls: Vec::new(),
                failures: Vec::new(),
                readiness: Readiness::Immediate,
                next_locale_id: 1,
            }),
        }
    }

    /// A fake behind an `Arc`, ready to hand to a [`Gateway`]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new("fake-space"))
    }

    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    /// Gateway whose handles all talk to this fake
    pub fn gateway(self: &Arc<Self>) -> Gateway {
        Gateway::shared(Arc::clone(self) as Arc<dyn ManagementApi>)
    }

    /// Options bound to `master`
    pub fn options(&self) -> ClientOptions {
        ClientOptions::new(FAKE_TOKEN, &self.space_id, MASTER)
    }

    /// Client bound to `master`
    pub fn client(self: &Arc<Self>) -> Client {
        self.gateway()
            .create_client(&self.options())
            .unwrap_or_else(|e| panic!("FakeSpace::client: {e}"))
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // Scripting

    pub fn set_readiness(&self, readiness: Readiness) {
        self.lock().readiness = readiness;
    }

    /// Fail every `op` call whose target (content type id, locale code,
    /// locale id or environment id) equals `target`
    pub fn fail_on(&self, op: FakeOp, target: impl Into<String>) {
        self.lock().failures.push(Failure {
            op,
            target: Some(target.into()),
        });
    }

    /// Fail every `op` call
    pub fn fail_all(&self, op: FakeOp) {
        self.lock().failures.push(Failure { op, target: None });
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    // Seeding

    /// Seed a published content type (version 2) with a default editor
    /// interface into `master`
    pub fn seed_content_type(&self, model: &ContentModel) -> RemoteContentType {
        self.seed_content_type_in(MASTER, model)
    }

    pub fn seed_content_type_in(&self, environment: &str, model: &ContentModel) -> RemoteContentType {
        let mut state = self.lock();
        let env = state.environments.entry(environment.to_string()).or_default();

        let mut sys = Sys::new(&model.id, 2);
        sys.sys_type = Some("ContentType".to_string());
        sys.published_version = Some(1);
        let content_type = RemoteContentType {
            sys,
            body: ContentTypeDraft {
                name: model.name.clone(),
                description: model.description.clone(),
                display_field: Some(model.effective_display_field()),
                fields: model.fields.clone(),
                extra: Map::new(),
            },
        };

        env.content_types.retain(|ct| ct.id() != model.id);
        env.content_types.push(content_type.clone());
        let editor_interface = default_editor_interface(&content_type, 1);
        env.editor_interfaces
            .insert(model.id.clone(), editor_interface);

        content_type
    }

    /// Replace the editor interface body of a seeded content type
    pub fn seed_editor_interface(&self, content_type_id: &str, body: EditorInterfaceConfig) {
        let mut state = self.lock();
        if let Some(env) = state.environments.get_mut(MASTER)
            && let Some(ei) = env.editor_interfaces.get_mut(content_type_id)
        {
            ei.body = body;
        }
    }

    /// Drop the editor interface of a seeded content type
    pub fn remove_editor_interface(&self, content_type_id: &str) {
        let mut state = self.lock();
        if let Some(env) = state.environments.get_mut(MASTER) {
            env.editor_interfaces.remove(content_type_id);
        }
    }

    /// Seed a locale into `master`
    pub fn seed_locale(&self, locale: &Locale) -> RemoteLocale {
        let mut state = self.lock();
        let id = state.next_locale_id();
        let remote = new_remote_locale(&id, locale);
        let env = state.environments.entry(MASTER.to_string()).or_default();
        env.locales.push(remote.clone());
        remote
    }

    // Inspection

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn count_calls(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn content_type(&self, id: &str) -> Option<RemoteContentType> {
        self.content_type_in(MASTER, id)
    }

    pub fn content_type_in(&self, environment: &str, id: &str) -> Option<RemoteContentType> {
        self.lock()
            .environments
            .get(environment)
            .and_then(|env| env.content_types.iter().find(|ct| ct.id() == id).cloned())
    }

    pub fn content_type_ids(&self) -> Vec<String> {
        self.lock()
            .environments
            .get(MASTER)
            .map(|env| env.content_types.iter().map(|ct| ct.id().to_string()).collect())
            .unwrap_or_default()
    }

    pub fn editor_interface(&self, content_type_id: &str) -> Option<RemoteEditorInterface> {
        self.lock()
            .environments
            .get(MASTER)
            .and_then(|env| env.editor_interfaces.get(content_type_id).cloned())
    }

    pub fn locale(&self, code: &str) -> Option<RemoteLocale> {
        self.locales().into_iter().find(|l| l.code() == code)
    }

    pub fn locales(&self) -> Vec<RemoteLocale> {
        self.lock()
            .environments
            .get(MASTER)
            .map(|env| env.locales.clone())
            .unwrap_or_default()
    }

    pub fn environment_ids(&self) -> Vec<String> {
        self.lock().environments.keys().cloned().collect()
    }
}

impl State {
    fn record(&mut self, call: Call) {
        self.calls.push(call);
    }

    fn next_locale_id(&mut self) -> String {
        let id = format!("locale-{}", self.next_locale_id);
        self.next_locale_id += 1;
        id
    }

    /// Scripted failure for `op` on any of `targets`
    fn injected(&self, op: FakeOp, operation: Operation, targets: &[&str]) -> Result<()> {
        let hit = self.failures.iter().any(|f| {
            f.op == op
                && match &f.target {
                    None => true,
                    Some(target) => targets.contains(&target.as_str()),
                }
        });
        if hit {
            let target = targets.first().copied().unwrap_or_default();
            return Err(Error::remote_write(
                operation,
                target,
                None,
                format!("injected failure on {:?}", op),
            ));
        }
        Ok(())
    }

    fn injected_read(&self, op: FakeOp, target: &str) -> Result<()> {
        let hit = self
            .failures
            .iter()
            .any(|f| f.op == op && f.target.as_deref().is_none_or(|t| t == target));
        if hit {
            return Err(Error::Api {
                status: 500,
                message: format!("injected failure on {:?}", op),
            });
        }
        Ok(())
    }

    fn env(&self, scope: &Scope) -> Result<&EnvironmentState> {
        self.environments
            .get(&scope.environment_id)
            .ok_or_else(|| Error::not_found("environment", &scope.environment_id))
    }

    fn env_mut(&mut self, scope: &Scope) -> Result<&mut EnvironmentState> {
        self.environments
            .get_mut(&scope.environment_id)
            .ok_or_else(|| Error::not_found("environment", &scope.environment_id))
    }

    fn status(&self, polls: u32) -> &'static str {
        let ready = match self.readiness {
            Readiness::Immediate => true,
            Readiness::AfterPolls(n) => polls >= n,
            Readiness::Never => false,
        };
        if ready { ccm_client::ENVIRONMENT_READY } else { PROCESSING }
    }
}

fn conflict(operation: Operation, target: &str, expected: u64, got: u64) -> Error {
    Error::remote_write(
        operation,
        target,
        Some(409),
        format!("VersionMismatch: expected version {}, got {}", expected, got),
    )
}

fn missing(operation: Operation, target: &str) -> Error {
    Error::remote_write(operation, target, Some(404), "NotFound: The resource could not be found.")
}

fn new_remote_locale(id: &str, locale: &Locale) -> RemoteLocale {
    let mut body = LocaleBody::from(locale);
    body.extra
        .insert(INTERNAL_CODE.to_string(), Value::String(locale.code.clone()));
    let mut sys = Sys::new(id, 1);
    sys.sys_type = Some("Locale".to_string());
    RemoteLocale { sys, body }
}

fn default_editor_interface(content_type: &RemoteContentType, version: u64) -> RemoteEditorInterface {
    let mut sys = Sys::new("default", version);
    sys.sys_type = Some("EditorInterface".to_string());
    sys.content_type = Some(Link::new("ContentType", content_type.id()));

    let controls = content_type
        .body
        .fields
        .iter()
        .map(|f| Control::new(&f.id))
        .collect();

    RemoteEditorInterface {
        sys,
        body: EditorInterfaceConfig {
            controls,
            extra: Map::new(),
        },
    }
}

fn environment(id: &str, status: &str) -> Environment {
    let mut sys = Sys::new(id, 1);
    sys.sys_type = Some("Environment".to_string());
    sys.status = Some(Link::new("Status", status));
    Environment {
        sys,
        name: id.to_string(),
    }
}

#[async_trait]
impl ManagementApi for FakeSpace {
    async fn get_content_types(
        &self,
        scope: &Scope,
        limit: usize,
    ) -> Result<Collection<RemoteContentType>> {
        let mut state = self.lock();
        state.record(Call::GetContentTypes {
            environment: scope.environment_id.clone(),
        });
        state.injected_read(FakeOp::GetContentTypes, &scope.environment_id)?;

        let items = state.env(scope)?.content_types.iter().take(limit).cloned().collect();
        Ok(Collection::new(items))
    }

    async fn create_content_type(
        &self,
        scope: &Scope,
        id: &str,
        draft: &ContentTypeDraft,
    ) -> Result<RemoteContentType> {
        let mut state = self.lock();
        state.record(Call::CreateContentType {
            id: id.to_string(),
            draft: draft.clone(),
        });
        state.injected(FakeOp::CreateContentType, Operation::Create, &[id])?;

        let env = state.env_mut(scope)?;
        if env.content_types.iter().any(|ct| ct.id() == id) {
            return Err(Error::remote_write(
                Operation::Create,
                id,
                Some(422),
                "Content type already exists",
            ));
        }

        let mut sys = Sys::new(id, 1);
        sys.sys_type = Some("ContentType".to_string());
        let created = RemoteContentType {
            sys,
            body: draft.clone(),
        };
        env.content_types.push(created.clone());
        Ok(created)
    }

    async fn update_content_type(
        &self,
        scope: &Scope,
        id: &str,
        version: u64,
        draft: &ContentTypeDraft,
    ) -> Result<RemoteContentType> {
        let mut state = self.lock();
        state.record(Call::UpdateContentType {
            id: id.to_string(),
            version,
            draft: draft.clone(),
        });
        state.injected(FakeOp::UpdateContentType, Operation::Update, &[id])?;

        let env = state.env_mut(scope)?;
        let ct = env
            .content_types
            .iter_mut()
            .find(|ct| ct.id() == id)
            .ok_or_else(|| missing(Operation::Update, id))?;
        if ct.sys.version != version {
            return Err(conflict(Operation::Update, id, ct.sys.version, version));
        }

        ct.body = draft.clone();
        ct.sys.version += 1;
        Ok(ct.clone())
    }

    async fn publish_content_type(
        &self,
        scope: &Scope,
        id: &str,
        version: u64,
    ) -> Result<RemoteContentType> {
        let mut state = self.lock();
        state.record(Call::PublishContentType {
            id: id.to_string(),
            version,
        });
        state.injected(FakeOp::PublishContentType, Operation::Publish, &[id])?;

        let env = state.env_mut(scope)?;
        let ct = env
            .content_types
            .iter_mut()
            .find(|ct| ct.id() == id)
            .ok_or_else(|| missing(Operation::Publish, id))?;
        if ct.sys.version != version {
            return Err(conflict(Operation::Publish, id, ct.sys.version, version));
        }

        ct.sys.published_version = Some(version);
        ct.sys.version += 1;
        let published = ct.clone();

        match env.editor_interfaces.get_mut(id) {
            Some(ei) => ei.sys.version += 1,
            None => {
                env.editor_interfaces
                    .insert(id.to_string(), default_editor_interface(&published, 1));
            }
        }

        Ok(published)
    }

    async fn unpublish_content_type(
        &self,
        scope: &Scope,
        id: &str,
        version: u64,
    ) -> Result<RemoteContentType> {
        let mut state = self.lock();
        state.record(Call::UnpublishContentType {
            id: id.to_string(),
            version,
        });
        state.injected(FakeOp::UnpublishContentType, Operation::Unpublish, &[id])?;

        let env = state.env_mut(scope)?;
        let ct = env
            .content_types
            .iter_mut()
            .find(|ct| ct.id() == id)
            .ok_or_else(|| missing(Operation::Unpublish, id))?;
        if ct.sys.version != version {
            return Err(conflict(Operation::Unpublish, id, ct.sys.version, version));
        }
        if !ct.sys.is_published() {
            return Err(Error::remote_write(
                Operation::Unpublish,
                id,
                Some(400),
                "Content type is not published",
            ));
        }

        ct.sys.published_version = None;
        ct.sys.version += 1;
        Ok(ct.clone())
    }

    async fn delete_content_type(&self, scope: &Scope, id: &str) -> Result<()> {
        let mut state = self.lock();
        state.record(Call::DeleteContentType { id: id.to_string() });
        state.injected(FakeOp::DeleteContentType, Operation::Delete, &[id])?;

        let env = state.env_mut(scope)?;
        let position = env
            .content_types
            .iter()
            .position(|ct| ct.id() == id)
            .ok_or_else(|| missing(Operation::Delete, id))?;
        if env.content_types[position].sys.is_published() {
            return Err(Error::remote_write(
                Operation::Delete,
                id,
                Some(400),
                "Cannot delete a published content type",
            ));
        }

        env.content_types.remove(position);
        env.editor_interfaces.remove(id);
        Ok(())
    }

    async fn get_editor_interfaces(
        &self,
        scope: &Scope,
        limit: usize,
    ) -> Result<Collection<RemoteEditorInterface>> {
        let mut state = self.lock();
        state.record(Call::GetEditorInterfaces {
            environment: scope.environment_id.clone(),
        });
        state.injected_read(FakeOp::GetEditorInterfaces, &scope.environment_id)?;

        let env = state.env(scope)?;
        // Listed in content type order
        let items = env
            .content_types
            .iter()
            .filter_map(|ct| env.editor_interfaces.get(ct.id()).cloned())
            .take(limit)
            .collect();
        Ok(Collection::new(items))
    }

    async fn update_editor_interface(
        &self,
        scope: &Scope,
        content_type_id: &str,
        version: u64,
        body: &EditorInterfaceConfig,
    ) -> Result<RemoteEditorInterface> {
        let mut state = self.lock();
        state.record(Call::UpdateEditorInterface {
            content_type_id: content_type_id.to_string(),
            version,
            body: body.clone(),
        });
        state.injected(
            FakeOp::UpdateEditorInterface,
            Operation::Update,
            &[content_type_id],
        )?;

        let env = state.env_mut(scope)?;
        let ei = env
            .editor_interfaces
            .get_mut(content_type_id)
            .ok_or_else(|| missing(Operation::Update, content_type_id))?;
        if ei.sys.version != version {
            return Err(conflict(
                Operation::Update,
                content_type_id,
                ei.sys.version,
                version,
            ));
        }

        ei.body = body.clone();
        ei.sys.version += 1;
        Ok(ei.clone())
    }

    async fn get_locales(&self, scope: &Scope) -> Result<Collection<RemoteLocale>> {
        let mut state = self.lock();
        state.record(Call::GetLocales {
            environment: scope.environment_id.clone(),
        });
        state.injected_read(FakeOp::GetLocales, &scope.environment_id)?;

        Ok(Collection::new(state.env(scope)?.locales.clone()))
    }

    async fn create_locale(&self, scope: &Scope, locale: &Locale) -> Result<RemoteLocale> {
        let mut state = self.lock();
        state.record(Call::CreateLocale {
            code: locale.code.clone(),
        });
        state.injected(FakeOp::CreateLocale, Operation::Create, &[locale.code.as_str()])?;

        if state.env(scope)?.locales.iter().any(|l| l.code() == locale.code) {
            return Err(Error::remote_write(
                Operation::Create,
                &locale.code,
                Some(422),
                "Locale code already exists",
            ));
        }

        let id = state.next_locale_id();
        let created = new_remote_locale(&id, locale);
        state.env_mut(scope)?.locales.push(created.clone());
        Ok(created)
    }

    async fn update_locale(
        &self,
        scope: &Scope,
        locale_id: &str,
        version: u64,
        body: &LocaleBody,
    ) -> Result<RemoteLocale> {
        let mut state = self.lock();
        state.record(Call::UpdateLocale {
            id: locale_id.to_string(),
            version,
            body: body.clone(),
        });
        state.injected(
            FakeOp::UpdateLocale,
            Operation::Update,
            &[body.code.as_str(), locale_id],
        )?;

        if body.extra.contains_key(INTERNAL_CODE) {
            return Err(Error::remote_write(
                Operation::Update,
                &body.code,
                Some(422),
                "internal_code is read-only",
            ));
        }

        let env = state.env_mut(scope)?;
        let locale = env
            .locales
            .iter_mut()
            .find(|l| l.id() == locale_id)
            .ok_or_else(|| missing(Operation::Update, locale_id))?;
        if locale.sys.version != version {
            return Err(conflict(Operation::Update, locale_id, locale.sys.version, version));
        }

        let internal_code = locale.body.extra.get(INTERNAL_CODE).cloned();
        locale.body = body.clone();
        if let Some(internal_code) = internal_code {
            locale.body.extra.insert(INTERNAL_CODE.to_string(), internal_code);
        }
        locale.sys.version += 1;
        Ok(locale.clone())
    }

    async fn delete_locale(&self, scope: &Scope, locale_id: &str) -> Result<()> {
        let mut state = self.lock();
        state.record(Call::DeleteLocale {
            id: locale_id.to_string(),
        });

        let code = state
            .env(scope)?
            .locales
            .iter()
            .find(|l| l.id() == locale_id)
            .map(|l| l.code().to_string())
            .unwrap_or_default();
        state.injected(FakeOp::DeleteLocale, Operation::Delete, &[code.as_str(), locale_id])?;

        let env = state.env_mut(scope)?;
        let position = env
            .locales
            .iter()
            .position(|l| l.id() == locale_id)
            .ok_or_else(|| missing(Operation::Delete, locale_id))?;
        if env.locales[position].body.default {
            return Err(Error::remote_write(
                Operation::Delete,
                locale_id,
                Some(422),
                "The default locale cannot be deleted",
            ));
        }

        env.locales.remove(position);
        Ok(())
    }

    async fn create_environment(
        &self,
        space_id: &str,
        environment_id: &str,
        _name: &str,
        source: Option<&str>,
    ) -> Result<Environment> {
        let mut state = self.lock();
        state.record(Call::CreateEnvironment {
            id: environment_id.to_string(),
            source: source.map(str::to_string),
        });
        state.injected(
            FakeOp::CreateEnvironment,
            Operation::Create,
            &[environment_id],
        )?;

        if space_id != self.space_id {
            return Err(missing(Operation::Create, space_id));
        }
        if state.environments.contains_key(environment_id) {
            return Err(Error::remote_write(
                Operation::Create,
                environment_id,
                Some(422),
                "Environment already exists",
            ));
        }

        let mut cloned = match source {
            Some(source) => state
                .environments
                .get(source)
                .cloned()
                .ok_or_else(|| missing(Operation::Create, source))?,
            None => EnvironmentState::default(),
        };
        cloned.polls = 0;
        state
            .environments
            .insert(environment_id.to_string(), cloned);

        let status = state.status(0);
        Ok(environment(environment_id, status))
    }

    async fn get_environment(&self, space_id: &str, environment_id: &str) -> Result<Environment> {
        let mut state = self.lock();
        state.record(Call::GetEnvironment {
            id: environment_id.to_string(),
        });
        state.injected_read(FakeOp::GetEnvironment, environment_id)?;

        if space_id != self.space_id {
            return Err(Error::not_found("space", space_id));
        }
        let env = state
            .environments
            .get_mut(environment_id)
            .ok_or_else(|| Error::not_found("environment", environment_id))?;
        env.polls += 1;
        let polls = env.polls;

        Ok(environment(environment_id, state.status(polls)))
    }

    async fn delete_environment(&self, space_id: &str, environment_id: &str) -> Result<()> {
        let mut state = self.lock();
        state.record(Call::DeleteEnvironment {
            id: environment_id.to_string(),
        });
        state.injected(
            FakeOp::DeleteEnvironment,
            Operation::Delete,
            &[environment_id],
        )?;

        if space_id != self.space_id || state.environments.remove(environment_id).is_none() {
            return Err(missing(Operation::Delete, environment_id));
        }
        Ok(())
    }
}
