//! Management API gateway for content model migrations.
//!
//! All remote access goes through a [`Client`], a handle bound to one
//! environment of one space. Handles are built by a [`Gateway`], which
//! validates the credentials and selects the backend:
//!
//! ```text
//! ClientOptions ──> Gateway::create_client ──> Client ──> dyn ManagementApi
//!                                                          ├─ HttpManagementApi
//!                                                          └─ in-memory (tests)
//! ```
//!
//! Writes carry the resource's version stamp and fail with
//! [`Error::RemoteWrite`] when it is stale. Nothing is retried.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use api::{ManagementApi, Scope};
pub use client::{Client, ClientOptions, Gateway, create_client};
pub use error::{Error, Operation, Result};
pub use http::{DEFAULT_BASE_URL, HttpManagementApi, MANAGEMENT_MEDIA_TYPE};
pub use types::{
    Collection, ContentTypeDraft, ENVIRONMENT_READY, Environment, INTERNAL_CODE, Link, LinkSys,
    LocaleBody, RemoteContentType, RemoteEditorInterface, RemoteLocale, Sys,
};
