//! Hosted directory client using `reqwest`.
//!
//! Reads the member table from a Supabase-style REST endpoint:
//!
//! ```text
//! GET {base_url}/rest/v1/{table}?select=*
//! apikey: <anon key>
//! Authorization: Bearer <anon key>
//! ```

use std::time::Duration;

use taskflow_protocol::Member;

use crate::{Directory, DirectoryError};

/// Connection settings for [`RestDirectory`].
#[derive(Debug, Clone)]
pub struct RestDirectoryConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`. A trailing slash is
    /// tolerated.
    pub base_url: String,
    /// Anonymous API key sent as both `apikey` and bearer token.
    pub anon_key: String,
    /// Table holding team members.
    pub table: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for RestDirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            anon_key: String::new(),
            table: "team_members".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// A [`Directory`] backed by the hosted REST API.
#[derive(Debug, Clone)]
pub struct RestDirectory {
    http: reqwest::Client,
    members_url: String,
    anon_key: String,
}

impl RestDirectory {
    /// Builds a client for the given endpoint.
    ///
    /// # Errors
    /// Returns [`DirectoryError::InvalidConfig`] if the base URL or key
    /// is empty, or the HTTP client can't be constructed.
    pub fn new(config: RestDirectoryConfig) -> Result<Self, DirectoryError> {
        if config.base_url.trim().is_empty() {
            return Err(DirectoryError::InvalidConfig("base_url is empty".into()));
        }
        if config.anon_key.trim().is_empty() {
            return Err(DirectoryError::InvalidConfig("anon_key is empty".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DirectoryError::InvalidConfig(e.to_string()))?;

        let members_url = format!(
            "{}/rest/v1/{}?select=*",
            config.base_url.trim_end_matches('/'),
            config.table
        );
        tracing::debug!(url = %members_url, "directory client configured");

        Ok(Self {
            http,
            members_url,
            anon_key: config.anon_key,
        })
    }

    /// The URL member reads are sent to.
    pub fn members_url(&self) -> &str {
        &self.members_url
    }
}

impl Directory for RestDirectory {
    async fn get_members(&self) -> Result<Vec<Member>, DirectoryError> {
        let response = self
            .http
            .get(&self.members_url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| DirectoryError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DirectoryError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "directory request rejected");
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let members: Vec<Member> =
            serde_json::from_str(&body).map_err(DirectoryError::Malformed)?;
        tracing::debug!(count = members.len(), "fetched members from directory");
        Ok(members)
    }
}
