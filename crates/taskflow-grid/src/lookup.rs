//! Cross references between records.

use std::collections::HashMap;

use taskflow_protocol::{Member, MemberId, Project, ProjectId};

/// Shown when a task points at a project that is not loaded.
pub const UNKNOWN_PROJECT: &str = "Unknown Project";

/// Shown when a lead or assignee cannot be resolved, or there is none.
pub const UNASSIGNED: &str = "Unassigned";

/// Id-indexed view over the loaded members and projects.
///
/// Owns both lists in their original order so the `Projects` and `Team`
/// grids can page over them directly.
#[derive(Debug, Clone, Default)]
pub struct Lookup {
    members: Vec<Member>,
    projects: Vec<Project>,
    member_index: HashMap<MemberId, usize>,
    project_index: HashMap<ProjectId, usize>,
}

impl Lookup {
    pub fn new(members: Vec<Member>, projects: Vec<Project>) -> Self {
        // First occurrence wins on duplicate ids, like a linear find.
        let mut member_index = HashMap::with_capacity(members.len());
        for (i, m) in members.iter().enumerate() {
            member_index.entry(m.id.clone()).or_insert(i);
        }
        let mut project_index = HashMap::with_capacity(projects.len());
        for (i, p) in projects.iter().enumerate() {
            project_index.entry(p.id.clone()).or_insert(i);
        }

        Self {
            members,
            projects,
            member_index,
            project_index,
        }
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.member_index.get(id).map(|&i| &self.members[i])
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.project_index.get(id).map(|&i| &self.projects[i])
    }

    /// Project name, or [`UNKNOWN_PROJECT`].
    pub fn project_name(&self, id: &ProjectId) -> &str {
        self.project(id).map_or(UNKNOWN_PROJECT, |p| p.name.as_str())
    }

    /// Member name, or [`UNASSIGNED`] when `id` is absent or unknown.
    pub fn member_name(&self, id: Option<&MemberId>) -> &str {
        id.and_then(|id| self.member(id))
            .map_or(UNASSIGNED, |m| m.name.as_str())
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }
}
