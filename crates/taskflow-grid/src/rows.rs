//! Row derivation for each grid kind.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use taskflow_protocol::{
    Member, MemberId, Priority, Project, ProjectId, ProjectStatus, Task, TaskId, TaskStatus,
};

use crate::{GridError, Lookup, UNASSIGNED};

/// Which record list a grid shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridKind {
    Tasks,
    Projects,
    Team,
}

impl GridKind {
    /// Derives the rows for this kind. `tasks` is only read for
    /// [`GridKind::Tasks`]; the other kinds read the lookup's own lists.
    pub fn rows(self, lookup: &Lookup, tasks: &[Task]) -> Vec<GridRow> {
        match self {
            Self::Tasks => tasks
                .iter()
                .map(|t| GridRow::Task(TaskRow::derive(t, lookup)))
                .collect(),
            Self::Projects => lookup
                .projects()
                .iter()
                .map(|p| GridRow::Project(ProjectRow::derive(p, lookup)))
                .collect(),
            Self::Team => lookup
                .members()
                .iter()
                .map(|m| GridRow::Member(MemberRow::from(m)))
                .collect(),
        }
    }
}

impl FromStr for GridKind {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tasks" => Ok(Self::Tasks),
            "projects" => Ok(Self::Projects),
            "team" => Ok(Self::Team),
            _ => Err(GridError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tasks => f.write_str("tasks"),
            Self::Projects => f.write_str("projects"),
            Self::Team => f.write_str("team"),
        }
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A team member as a grid cell shows it. Never carries the password.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRow {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar_url: String,
}

impl From<&Member> for MemberRow {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            email: m.email.clone(),
            role: m.role.clone(),
            avatar_url: m.avatar_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRow {
    pub id: TaskId,
    pub title: String,
    pub project_name: String,
    pub status: TaskStatus,
    pub due_date: Option<String>,
    pub priority: Priority,
    /// Resolved assignees in the task's order. Unknown ids are dropped.
    pub assignees: Vec<MemberRow>,
}

impl TaskRow {
    pub fn derive(task: &Task, lookup: &Lookup) -> Self {
        let assignees = task
            .assignee_ids
            .iter()
            .filter_map(|id| lookup.member(id))
            .map(MemberRow::from)
            .collect();

        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            project_name: lookup.project_name(&task.project_id).to_string(),
            status: task.status,
            due_date: task.due_date.clone(),
            priority: task.priority,
            assignees,
        }
    }

    /// Comma-separated assignee names, or [`UNASSIGNED`] when none resolve.
    pub fn assignee_label(&self) -> String {
        if self.assignees.is_empty() {
            UNASSIGNED.to_string()
        } else {
            self.assignees
                .iter()
                .map(|m| m.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRow {
    pub id: ProjectId,
    pub name: String,
    pub status: ProjectStatus,
    pub due_date: Option<String>,
    pub budget: f64,
    pub lead: Option<MemberRow>,
    /// Lead name, or [`UNASSIGNED`].
    pub lead_name: String,
}

impl ProjectRow {
    pub fn derive(project: &Project, lookup: &Lookup) -> Self {
        let lead_id = project.lead_id.as_ref();
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            status: project.status,
            due_date: project.due_date.clone(),
            budget: project.budget,
            lead: lead_id.and_then(|id| lookup.member(id)).map(MemberRow::from),
            lead_name: lookup.member_name(lead_id).to_string(),
        }
    }
}

/// One row of any grid kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GridRow {
    Task(TaskRow),
    Project(ProjectRow),
    Member(MemberRow),
}
