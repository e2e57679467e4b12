//! GitHub REST client for repository provisioning

use crate::error::{Result, TcacheError};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

const API_BASE: &str = "https://api.github.com";
const CLIENT_ID: &str = "task-cache-sync";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Description given to repositories created by `github create-repo`
pub const REPOSITORY_DESCRIPTION: &str = "Task Cache - Developer Task Logs";

/// `owner/name` pair identifying a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryId {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepositoryId {
    type Err = TcacheError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            TcacheError::Configuration(format!(
                "Invalid repository '{}': expected 'owner/name'",
                s
            ))
        };

        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }

        Ok(RepositoryId {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Status and body of an API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }
}

/// Repository hosting calls. Can be mocked in tests.
#[cfg_attr(test, automock)]
pub trait HostingApi {
    /// GET the repository resource.
    fn get_repository(&self, repo: &RepositoryId, token: &str) -> Result<ApiResponse>;

    /// POST a new private repository owned by the token's user.
    fn create_repository(
        &self,
        name: &str,
        description: &str,
        token: &str,
    ) -> Result<ApiResponse>;
}

#[derive(Serialize)]
struct CreateRepositoryRequest<'a> {
    name: &'a str,
    private: bool,
    description: &'a str,
}

/// GitHub REST implementation of HostingApi
pub struct GitHubClient {
    base_url: String,
    client: Client,
}

impl GitHubClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(GitHubClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl HostingApi for GitHubClient {
    fn get_repository(&self, repo: &RepositoryId, token: &str) -> Result<ApiResponse> {
        let url = format!("{}/repos/{}/{}", self.base_url, repo.owner, repo.name);
        debug!(%url, "checking repository");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("token {}", token))
            .header(USER_AGENT, CLIENT_ID)
            .send()?;

        let status = response.status().as_u16();
        Ok(ApiResponse::new(status, response.text()?))
    }

    fn create_repository(
        &self,
        name: &str,
        description: &str,
        token: &str,
    ) -> Result<ApiResponse> {
        let url = format!("{}/user/repos", self.base_url);
        debug!(%url, name, "creating repository");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("token {}", token))
            .header(USER_AGENT, CLIENT_ID)
            .json(&CreateRepositoryRequest {
                name,
                private: true,
                description,
            })
            .send()?;

        let status = response.status().as_u16();
        Ok(ApiResponse::new(status, response.text()?))
    }
}
