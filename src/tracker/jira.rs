//! tracker::jira
//!
//! JIRA implementation of the tracker traits, using the core REST API and
//! the Structure plugin's REST API.
//!
//! # Endpoints
//!
//! - `rest/api/2/issue/{key}` - single-issue fetch ([`IssueLookup::find_by_key`])
//! - `rest/api/2/search?jql=...` - JQL query ([`IssueLookup::find_by_query`])
//! - `rest/structure/1.0/structure` - Structure board index
//! - `rest/structure/1.0/structure/{id}/forest` - a board's forest formula
//!
//! # Authentication
//!
//! Basic auth with a username and password/API token from
//! [`TrackerConfig`]. Anonymous access is used when no username is
//! configured.
//!
//! # "Not found" mapping
//!
//! Per the trait contract, a 404 on an issue fetch yields `Ok(None)` and a
//! 400 on a JQL query (JIRA rejects `key=X` for unknown issues with a
//! client error) yields `Ok(vec![])`. All other non-success statuses map
//! to [`TrackerError`] variants.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::traits::{IssueLookup, IssueSummary, StructureSource, TrackerError};
use crate::core::config::TrackerConfig;
use crate::core::types::{IssueKey, StructureId};

/// Issue fields the core consumes.
const ISSUE_FIELDS: &str = "summary,issuetype,description,fixVersions";

/// JIRA tracker client.
///
/// Cheap to clone is not a goal; wrap it in an `Arc` (see
/// [`create_tracker`]) to share between tasks.
///
/// [`create_tracker`]: crate::tracker::create_tracker
pub struct JiraTracker {
    /// HTTP client for making requests
    client: Client,
    /// Tracker base URL, without a trailing slash
    base_url: String,
    /// Basic-auth username; `None` means anonymous access
    username: Option<String>,
    /// Basic-auth password or API token
    password: Option<String>,
}

// Custom Debug to avoid exposing the password
impl std::fmt::Debug for JiraTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraTracker")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("has_password", &self.password.is_some())
            .finish()
    }
}

impl JiraTracker {
    /// Create a client for a tracker base URL with optional credentials.
    pub fn new(
        base_url: impl Into<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
            username,
            password,
        }
    }

    /// Create a client from resolved configuration.
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(
            config.url.clone(),
            config.username.clone(),
            config.password.clone(),
        )
    }

    /// The tracker base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET request with auth and JSON accept headers.
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response, TrackerError> {
        debug!(url, "tracker request");
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .query(query);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }
        request
            .send()
            .await
            .map_err(|e| TrackerError::Network(e.to_string()))
    }

    /// Handle a response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, TrackerError> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| TrackerError::Malformed(e.to_string()))
        } else {
            Err(Self::error_for(status, Self::error_message(response).await))
        }
    }

    /// Extract the error message from a JIRA error body.
    async fn error_message(response: Response) -> String {
        match response.json::<JiraErrorResponse>().await {
            Ok(body) if !body.error_messages.is_empty() => body.error_messages.join("; "),
            _ => "Unknown error".to_string(),
        }
    }

    /// Map a non-success status to a tracker error.
    fn error_for(status: StatusCode, message: String) -> TrackerError {
        match status {
            StatusCode::UNAUTHORIZED => TrackerError::AuthFailed("invalid credentials".into()),
            StatusCode::FORBIDDEN => {
                TrackerError::AuthFailed(format!("permission denied: {}", message))
            }
            StatusCode::TOO_MANY_REQUESTS => TrackerError::RateLimited,
            _ => TrackerError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl IssueLookup for JiraTracker {
    async fn find_by_key(&self, key: &IssueKey) -> Result<Option<IssueSummary>, TrackerError> {
        let url = format!("{}/rest/api/2/issue/{}", self.base_url, key);
        let response = self
            .get(
                &url,
                &[("fields", ISSUE_FIELDS), ("expand", "renderedFields")],
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(%key, "issue not found");
            return Ok(None);
        }
        let issue: IssueResponse = self.handle_response(response).await?;
        issue.into_summary().map(Some)
    }

    async fn find_by_query(&self, query: &str) -> Result<Vec<IssueSummary>, TrackerError> {
        let url = format!("{}/rest/api/2/search", self.base_url);
        let response = self
            .get(
                &url,
                &[
                    ("jql", query),
                    ("fields", ISSUE_FIELDS),
                    ("expand", "renderedFields"),
                ],
            )
            .await?;
        // JIRA rejects JQL naming an unknown issue with a client error;
        // that is a legal "no result" outcome per the trait contract.
        if response.status() == StatusCode::BAD_REQUEST {
            debug!(query, "query matched no issue");
            return Ok(Vec::new());
        }
        let results: SearchResponse = self.handle_response(response).await?;
        results
            .issues
            .into_iter()
            .map(IssueResponse::into_summary)
            .collect()
    }
}

#[async_trait]
impl StructureSource for JiraTracker {
    async fn list_structure_ids(&self) -> Result<Vec<StructureId>, TrackerError> {
        let url = format!("{}/rest/structure/1.0/structure", self.base_url);
        let response = self.get(&url, &[]).await?;
        let index: StructureIndexResponse = self.handle_response(response).await?;
        index
            .structures
            .into_iter()
            .map(|entry| entry.id.into_structure_id())
            .collect()
    }

    async fn formula(&self, structure_id: StructureId) -> Result<String, TrackerError> {
        let url = format!(
            "{}/rest/structure/1.0/structure/{}/forest",
            self.base_url, structure_id
        );
        let response = self.get(&url, &[]).await?;
        let forest: ForestResponse = self.handle_response(response).await?;
        Ok(forest.formula)
    }
}

/// JIRA error body shape.
#[derive(Debug, Deserialize)]
struct JiraErrorResponse {
    #[serde(rename = "errorMessages", default)]
    error_messages: Vec<String>,
}

/// One issue as returned by the issue and search endpoints.
#[derive(Debug, Deserialize)]
struct IssueResponse {
    key: String,
    fields: IssueFieldsResponse,
    #[serde(rename = "renderedFields")]
    rendered_fields: Option<RenderedFieldsResponse>,
}

#[derive(Debug, Default, Deserialize)]
struct IssueFieldsResponse {
    summary: Option<String>,
    issuetype: Option<NamedResponse>,
    description: Option<String>,
    #[serde(rename = "fixVersions", default)]
    fix_versions: Vec<NamedResponse>,
}

#[derive(Debug, Deserialize)]
struct NamedResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RenderedFieldsResponse {
    description: Option<String>,
}

impl IssueResponse {
    /// Build the flat summary the core consumes.
    ///
    /// The rendered description is preferred over the raw markup when the
    /// tracker supplies it.
    fn into_summary(self) -> Result<IssueSummary, TrackerError> {
        let key = IssueKey::new(self.key).map_err(|e| TrackerError::Malformed(e.to_string()))?;
        let description = self
            .rendered_fields
            .and_then(|rendered| rendered.description)
            .or(self.fields.description)
            .unwrap_or_default();
        Ok(IssueSummary {
            key,
            issue_type: self
                .fields
                .issuetype
                .map(|issue_type| issue_type.name)
                .unwrap_or_default(),
            summary: self.fields.summary.unwrap_or_default(),
            description,
            fix_versions: self
                .fields
                .fix_versions
                .into_iter()
                .map(|version| version.name)
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<IssueResponse>,
}

#[derive(Debug, Deserialize)]
struct StructureIndexResponse {
    #[serde(default)]
    structures: Vec<StructureEntry>,
}

#[derive(Debug, Deserialize)]
struct StructureEntry {
    id: StructureIdValue,
}

/// The Structure plugin serializes ids as numbers or strings depending on
/// version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StructureIdValue {
    Number(i64),
    Text(String),
}

impl StructureIdValue {
    fn into_structure_id(self) -> Result<StructureId, TrackerError> {
        let id = match self {
            StructureIdValue::Number(id) => id,
            StructureIdValue::Text(raw) => raw.parse::<i64>().map_err(|_| {
                TrackerError::Malformed(format!("structure id '{}' is not an integer", raw))
            })?,
        };
        StructureId::new(id).map_err(|e| TrackerError::Malformed(e.to_string()))
    }
}

/// The forest endpoint's response.
#[derive(Debug, Deserialize)]
struct ForestResponse {
    formula: String,
}
