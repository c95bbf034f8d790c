//! Publishing pipeline: commits a rendered solution file to a GitHub repository.
//!
//! [`RemotePublisher`] owns the single stored credential and drives the
//! two-phase write protocol against a [`HostingApi`]:
//!   - **Probe**: look up the file at the target path. A hit yields its
//!     revision marker (`sha`), a 404 means the file is absent.
//!   - **Upsert**: write the new content, carrying the marker only when the
//!     probe found an existing file.
//!
//! # Error Handling
//! Nothing is mutated remotely before the upsert, so a failed probe aborts
//! the publish and leaves the repository untouched. Only a 404 counts as
//! "absent"; an outage during the probe is reported as an error instead of
//! falling through to a create.
//!
//! # Navigation
//! - Main entrypoint: [`RemotePublisher::publish`]
//! - Supporting types: [`PublishRequest`], [`Probe`], [`PublishOutcome`].

use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, error, info, warn};

use crate::contract::{HostingApi, Identity, PublishError, PutFileBody, RepositoryDescriptor};
use crate::encoding::encode_content;
use crate::problem::ProblemRecord;
use crate::store::KeyValueStore;
use crate::template::{join_repo_path, solution_file_name};

/// Store key holding the bearer token.
pub const CREDENTIAL_KEY: &str = "github_access_token";

/// One file write, built fresh for every publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// `owner/name`
    pub repository: String,
    pub path: String,
    pub content: String,
    pub message: String,
}

impl PublishRequest {
    /// Builds the request for a problem: the path is the configured directory
    /// plus `{Identifier}.{extension}`, the message is today's
    /// [`format_commit_message`].
    pub fn for_problem(
        record: &ProblemRecord,
        repository: &str,
        directory: Option<&str>,
        extension: &str,
        content: String,
    ) -> Self {
        let file_name = solution_file_name(&record.title, extension);
        Self {
            repository: repository.to_string(),
            path: join_repo_path(directory, &file_name),
            content,
            message: format_commit_message(&record.title),
        }
    }
}

/// Result of the probe phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Absent,
    Existing { sha: String },
}

impl Probe {
    pub fn sha(&self) -> Option<&str> {
        match self {
            Probe::Absent => None,
            Probe::Existing { sha } => Some(sha),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishKind {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub kind: PublishKind,
    pub content_sha: Option<String>,
    pub commit_sha: Option<String>,
}

/// `"Add solution for {title} - {MM}/{DD}"` for today's local date.
pub fn format_commit_message(title: &str) -> String {
    format_commit_message_on(title, Local::now().date_naive())
}

pub fn format_commit_message_on(title: &str, date: NaiveDate) -> String {
    format!(
        "Add solution for {title} - {:02}/{:02}",
        date.month(),
        date.day()
    )
}

/// Publishes solution files through a [`HostingApi`], authenticating with the
/// credential held in a [`KeyValueStore`].
pub struct RemotePublisher<A, S> {
    api: A,
    store: S,
}

impl<A, S> RemotePublisher<A, S>
where
    A: HostingApi,
    S: KeyValueStore,
{
    pub fn new(api: A, store: S) -> Self {
        Self { api, store }
    }

    /// Stores `token` as the active credential, replacing any previous one.
    /// The token is not validated here; see [`Self::fetch_identity`].
    pub fn set_credential(&self, token: &str) -> Result<(), PublishError> {
        self.store.set(CREDENTIAL_KEY, token)?;
        info!(token_len = token.len(), "[AUTH] Credential stored");
        Ok(())
    }

    pub fn credential(&self) -> Result<Option<String>, PublishError> {
        Ok(self.store.get(CREDENTIAL_KEY)?)
    }

    pub fn clear_credential(&self) -> Result<(), PublishError> {
        self.store.delete(CREDENTIAL_KEY)?;
        info!("[AUTH] Credential removed");
        Ok(())
    }

    fn require_credential(&self) -> Result<String, PublishError> {
        match self.credential()? {
            Some(token) if !token.is_empty() => Ok(token),
            _ => {
                warn!("[AUTH] No credential stored");
                Err(PublishError::NoCredential)
            }
        }
    }

    pub async fn fetch_identity(&self) -> Result<Identity, PublishError> {
        let token = self.require_credential()?;
        match self.api.current_user(&token).await {
            Ok(identity) => {
                info!(login = %identity.login, "[AUTH] Fetched current identity");
                Ok(identity)
            }
            Err(e) => {
                error!(error = %e, "[AUTH][ERROR] Fetching identity failed");
                Err(e)
            }
        }
    }

    /// Most recently updated repositories, at most one page of 100.
    pub async fn list_repositories(&self) -> Result<Vec<RepositoryDescriptor>, PublishError> {
        let token = self.require_credential()?;
        match self.api.list_repositories(&token).await {
            Ok(repos) => {
                info!(count = repos.len(), "[REPOS] Listed repositories");
                Ok(repos)
            }
            Err(e) => {
                error!(error = %e, "[REPOS][ERROR] Listing repositories failed");
                Err(e)
            }
        }
    }

    /// Phase one: find out whether `request.path` already exists.
    pub async fn probe(&self, request: &PublishRequest) -> Result<Probe, PublishError> {
        let token = self.require_credential()?;
        self.probe_with(&token, request).await
    }

    /// Phase two: write the content, overwriting when `probe` carries a sha.
    pub async fn upsert(
        &self,
        request: &PublishRequest,
        probe: &Probe,
    ) -> Result<PublishOutcome, PublishError> {
        let token = self.require_credential()?;
        self.upsert_with(&token, request, probe).await
    }

    /// Probes then upserts. Either phase failing fails the publish; there is
    /// no retry.
    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishOutcome, PublishError> {
        let token = self.require_credential()?;
        info!(
            repository = %request.repository,
            path = %request.path,
            bytes = request.content.len(),
            "[PUBLISH] Starting publish"
        );
        let probe = self.probe_with(&token, request).await?;
        self.upsert_with(&token, request, &probe).await
    }

    async fn probe_with(
        &self,
        token: &str,
        request: &PublishRequest,
    ) -> Result<Probe, PublishError> {
        match self
            .api
            .get_file(token, &request.repository, &request.path)
            .await
        {
            Ok(Some(existing)) => {
                info!(path = %request.path, sha = %existing.sha, "[PUBLISH][PROBE] File exists, will update");
                Ok(Probe::Existing { sha: existing.sha })
            }
            Ok(None) => {
                info!(path = %request.path, "[PUBLISH][PROBE] File absent, will create");
                Ok(Probe::Absent)
            }
            Err(e) => {
                error!(path = %request.path, error = %e, "[PUBLISH][ERROR] Probe failed, nothing written");
                Err(e)
            }
        }
    }

    async fn upsert_with(
        &self,
        token: &str,
        request: &PublishRequest,
        probe: &Probe,
    ) -> Result<PublishOutcome, PublishError> {
        let body = PutFileBody {
            message: request.message.clone(),
            content: encode_content(&request.content),
            sha: probe.sha().map(str::to_string),
        };
        debug!(message = %body.message, has_sha = body.sha.is_some(), "[PUBLISH][UPSERT] Prepared body");

        match self
            .api
            .put_file(token, &request.repository, &request.path, &body)
            .await
        {
            Ok(resp) => {
                let kind = match probe {
                    Probe::Absent => PublishKind::Created,
                    Probe::Existing { .. } => PublishKind::Updated,
                };
                let outcome = PublishOutcome {
                    kind,
                    content_sha: resp.content.map(|c| c.sha),
                    commit_sha: resp.commit.map(|c| c.sha),
                };
                info!(
                    repository = %request.repository,
                    path = %request.path,
                    kind = ?outcome.kind,
                    commit = outcome.commit_sha.as_deref().unwrap_or("-"),
                    "[PUBLISH] Upsert succeeded"
                );
                Ok(outcome)
            }
            Err(e) => {
                error!(path = %request.path, error = %e, "[PUBLISH][ERROR] Upsert failed");
                Err(e)
            }
        }
    }
}
