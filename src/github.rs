#![doc = "GitHub REST client: the production implementation of the core `HostingApi` trait."]
//
//! # GitHub integration (CLI <-> Core)
//!
//! This module wires [`prep_organizer_core::contract::HostingApi`] to GitHub's
//! REST API over `reqwest`. The publisher in the core crate decides *what* to
//! call; this client only knows *how*: URLs, headers, status codes and JSON.
//!
//! ## Client Usage
//!
//! - Construct [`GithubClient`] from the `github` section of the config
//!   (base URL and request timeout).
//! - Every call sends `Authorization: Bearer <token>` plus GitHub's v3 accept
//!   header and a user agent.
//! - Non-2xx responses are mapped through `PublishError::from_status`;
//!   transport failures and timeouts become `PublishError::Transient`.
//! - Unusable settings (bad base URL, zero timeout) are `PublishError::Config`.

use async_trait::async_trait;
use prep_organizer_core::config::GithubConfig;
use prep_organizer_core::contract::{
    HostingApi, Identity, PublishError, PutFileBody, PutFileResponse, RemoteFile,
    RepositoryDescriptor,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const REPOS_PER_PAGE: &str = "100";

pub struct GithubClient {
    http: Client,
    base_url: Url,
}

impl GithubClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PublishError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            tracing::error!(error = ?e, base_url, "Invalid GitHub API base URL");
            PublishError::Config(format!("invalid GitHub API base URL {base_url}: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PublishError::Config(format!(
                "GitHub API base URL {base_url} cannot carry a path"
            )));
        }
        if timeout.is_zero() {
            return Err(PublishError::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!(error = ?e, "Failed to build HTTP client");
                PublishError::Config(format!("failed to build HTTP client: {e}"))
            })?;

        tracing::info!(
            base_url = %base_url,
            timeout_secs = timeout.as_secs(),
            "Initialized GithubClient"
        );
        Ok(GithubClient { http, base_url })
    }

    pub fn from_config(config: &GithubConfig) -> Result<Self, PublishError> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments.into_iter().filter(|s| !s.is_empty()));
        }
        url
    }

    fn contents_url(&self, repository: &str, path: &str) -> Url {
        self.endpoint(
            ["repos"]
                .into_iter()
                .chain(repository.split('/'))
                .chain(["contents"])
                .chain(path.split('/')),
        )
    }

    fn request(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.http.request(method, url).bearer_auth(token)
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response, PublishError> {
        builder.send().await.map_err(|e| {
            tracing::error!(error = ?e, what, timeout = e.is_timeout(), "GitHub request failed");
            PublishError::Transient(format!("{what}: {e}"))
        })
    }

    async fn error_for(response: Response, what: &str) -> PublishError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
        tracing::error!(status = %status, what, body = %body, "GitHub returned an error");
        PublishError::from_status(status.as_u16(), what, body)
    }

    async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, PublishError> {
        let text = response
            .text()
            .await
            .map_err(|e| PublishError::Transient(format!("{what}: reading body: {e}")))?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(error = ?e, what, "Failed to decode GitHub JSON");
            PublishError::Decode(format!("{what}: {e}"))
        })
    }
}

#[async_trait]
impl HostingApi for GithubClient {
    async fn current_user(&self, token: &str) -> Result<Identity, PublishError> {
        let url = self.endpoint(["user"]);
        tracing::info!(url = %url, "Fetching current GitHub user");
        let response = self
            .send(self.request(Method::GET, url, token), "current user")
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response, "current user").await);
        }
        Self::decode(response, "current user").await
    }

    async fn list_repositories(
        &self,
        token: &str,
    ) -> Result<Vec<RepositoryDescriptor>, PublishError> {
        let mut url = self.endpoint(["user", "repos"]);
        url.query_pairs_mut()
            .append_pair("sort", "updated")
            .append_pair("per_page", REPOS_PER_PAGE);
        tracing::info!(url = %url, "Listing GitHub repositories");
        let response = self
            .send(self.request(Method::GET, url, token), "repositories")
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response, "repositories").await);
        }
        Self::decode(response, "repositories").await
    }

    async fn get_file(
        &self,
        token: &str,
        repository: &str,
        path: &str,
    ) -> Result<Option<RemoteFile>, PublishError> {
        let url = self.contents_url(repository, path);
        tracing::debug!(url = %url, "Probing for existing file");
        let what = format!("{repository}/{path}");
        let response = self
            .send(self.request(Method::GET, url, token), &what)
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Self::decode(response, &what).await.map(Some),
            _ => Err(Self::error_for(response, &what).await),
        }
    }

    async fn put_file(
        &self,
        token: &str,
        repository: &str,
        path: &str,
        body: &PutFileBody,
    ) -> Result<PutFileResponse, PublishError> {
        let url = self.contents_url(repository, path);
        tracing::info!(
            url = %url,
            has_sha = body.sha.is_some(),
            "Writing file contents"
        );
        let what = format!("{repository}/{path}");
        let response = self
            .send(self.request(Method::PUT, url, token).json(body), &what)
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response, &what).await);
        }
        Self::decode(response, &what).await
    }
}
