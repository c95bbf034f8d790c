//! # contract: interface to the source-control hosting service
//!
//! This module defines the [`HostingApi`] trait and the plain data it moves:
//! identities, repository descriptors, existing-file probes and content
//! writes. The publisher in [`crate::publisher`] only talks to the hosting
//! service through this trait.
//!
//! ## Interface & Extensibility
//! - Every method takes the bearer token explicitly; the trait holds no
//!   credential state of its own.
//! - `get_file` answers `Ok(None)` for a missing file. Every other failure
//!   is a [`PublishError`].
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so tests get `MockHostingApi`
//!   (exported behind the `test-export-mocks` feature).

use async_trait::async_trait;
#[allow(unused_imports)]
use mockall::{automock, predicate::*};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// The account behind the current credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A repository owned by (or accessible to) the current credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub id: u64,
    /// `owner/name`
    pub full_name: String,
    #[serde(rename = "private")]
    pub is_private: bool,
}

/// An existing file in a repository, as reported by the contents API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFile {
    /// Revision marker required to overwrite the file.
    pub sha: String,
}

/// Body of a create-or-update content write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PutFileBody {
    pub message: String,
    /// Base64 of the raw UTF-8 bytes.
    pub content: String,
    /// Present only when overwriting an existing file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShaRef {
    pub sha: String,
}

/// What the hosting service answers after a successful write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PutFileResponse {
    #[serde(default)]
    pub content: Option<ShaRef>,
    #[serde(default)]
    pub commit: Option<ShaRef>,
}

/// Errors surfaced by the hosting service or by the credential store.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("no GitHub credential is stored")]
    NoCredential,

    /// The token was rejected; the caller should ask for a new one.
    #[error("GitHub rejected the credential (HTTP {status})")]
    Unauthorized { status: u16 },

    /// The write was refused because the revision marker was stale or missing.
    #[error("GitHub refused the write (HTTP {status}): {body}")]
    Conflict { status: u16, body: String },

    #[error("not found: {what}")]
    NotFound { what: String },

    #[error("GitHub returned HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// Network failure or timeout; retrying later may succeed.
    #[error("transient failure talking to GitHub: {0}")]
    Transient(String),

    /// The client settings are unusable; retrying will not help.
    #[error("invalid GitHub client configuration: {0}")]
    Config(String),

    #[error("could not decode GitHub response: {0}")]
    Decode(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PublishError {
    /// Maps a non-success HTTP status to an error. `what` names the resource
    /// for 404s.
    pub fn from_status(status: u16, what: &str, body: String) -> Self {
        match status {
            401 | 403 => PublishError::Unauthorized { status },
            404 => PublishError::NotFound {
                what: what.to_string(),
            },
            409 | 422 => PublishError::Conflict { status, body },
            _ => PublishError::Remote { status, body },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PublishError::Unauthorized { .. })
    }
}

/// Trait for the source-control hosting service (GitHub's REST API in
/// production, `MockHostingApi` in tests).
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// `GET /user`
    async fn current_user(&self, token: &str) -> Result<Identity, PublishError>;

    /// `GET /user/repos?sort=updated&per_page=100`; first page only.
    async fn list_repositories(
        &self,
        token: &str,
    ) -> Result<Vec<RepositoryDescriptor>, PublishError>;

    /// `GET /repos/{repository}/contents/{path}`; `Ok(None)` on 404.
    async fn get_file(
        &self,
        token: &str,
        repository: &str,
        path: &str,
    ) -> Result<Option<RemoteFile>, PublishError>;

    /// `PUT /repos/{repository}/contents/{path}`
    async fn put_file(
        &self,
        token: &str,
        repository: &str,
        path: &str,
        body: &PutFileBody,
    ) -> Result<PutFileResponse, PublishError>;
}
