//! Core records for TaskFlow.
//!
//! These are the structures the hosted directory returns and the client
//! caches or renders. Field names serialize camelCase, the shape the
//! browser client stored under its session keys; snake_case column names
//! from the REST API are accepted as aliases.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Unique identifier of a team member.
///
/// Directory ids are opaque strings, so this wraps a `String` rather than
/// an integer. `#[serde(transparent)]` keeps the JSON form a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M-{}", self.0)
    }
}

/// Unique identifier of a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PR-{}", self.0)
    }
}

/// Unique identifier of a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

/// A team member as stored in the hosted directory.
///
/// The directory is the only source of truth for identity and
/// credentials; the client never edits a member. The password is the
/// directory's plaintext column and is compared verbatim at login.
///
/// `Debug` is implemented by hand so the password never reaches a log
/// line through `{:?}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default, alias = "avatar_url")]
    pub avatar_url: String,
    #[serde(default)]
    pub role: String,
}

impl Member {
    /// Checks the invariants a decoded record must hold before the
    /// session layer trusts it as an identity.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidRecord`] for an empty id.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.id.0.trim().is_empty() {
            return Err(ProtocolError::InvalidRecord(
                "member id is empty".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("avatar_url", &self.avatar_url)
            .field("role", &self.role)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Statuses and priorities
// ---------------------------------------------------------------------------

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Review")]
    Review,
    #[serde(rename = "Done")]
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todo => write!(f, "To Do"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Review => write!(f, "Review"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planning => write!(f, "Planning"),
            Self::Active => write!(f, "Active"),
            Self::OnHold => write!(f, "On Hold"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Task priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Urgent => write!(f, "Urgent"),
        }
    }
}

// ---------------------------------------------------------------------------
// Task / Project
// ---------------------------------------------------------------------------

/// A unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(alias = "project_id")]
    pub project_id: ProjectId,
    #[serde(default)]
    pub status: TaskStatus,
    /// ISO-8601 date, rendered as-is; `None` shows as a dash.
    #[serde(default, alias = "due_date")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, alias = "assignee_ids")]
    pub assignee_ids: Vec<MemberId>,
}

/// A project grouping tasks, optionally led by a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, alias = "due_date")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub budget: f64,
    #[serde(default, alias = "lead_id")]
    pub lead_id: Option<MemberId>,
}
