//! Member directory abstraction for TaskFlow.
//!
//! The directory is the remote store of team-member records and the
//! sole source of truth for credentials. The session layer only sees
//! the [`Directory`] trait; this crate provides:
//!
//! - [`StaticDirectory`]: a fixed in-memory member list
//! - [`RestDirectory`]: the hosted table read over REST with an anon key
//!
//! # Feature Flags
//!
//! - `rest` (default): REST client via `reqwest`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "rest")]
mod rest;

pub use error::DirectoryError;
#[cfg(feature = "rest")]
pub use rest::{RestDirectory, RestDirectoryConfig};

use std::sync::Arc;

use taskflow_protocol::{Member, MemberId};

/// Read access to the team-member directory.
///
/// One method, no filtering or pagination: callers fetch the full member
/// set and search it locally.
///
/// # Example
///
/// ```rust
/// use taskflow_directory::{Directory, DirectoryError};
/// use taskflow_protocol::Member;
///
/// /// A directory that is always offline.
/// struct Offline;
///
/// impl Directory for Offline {
///     async fn get_members(&self) -> Result<Vec<Member>, DirectoryError> {
///         Err(DirectoryError::Unreachable("offline".into()))
///     }
/// }
/// ```
pub trait Directory: Send + Sync + 'static {
    /// Returns every member in the directory.
    ///
    /// # Errors
    /// Any [`DirectoryError`] means the directory is unavailable for
    /// this call.
    fn get_members(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Member>, DirectoryError>> + Send;
}

impl<D: Directory> Directory for Arc<D> {
    fn get_members(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Member>, DirectoryError>> + Send {
        self.as_ref().get_members()
    }
}

/// Finds a member by id in a fetched member list.
pub fn find_by_id<'a>(members: &'a [Member], id: &MemberId) -> Option<&'a Member> {
    members.iter().find(|m| &m.id == id)
}

/// Finds a member by exact, case-sensitive email.
pub fn find_by_email<'a>(members: &'a [Member], email: &str) -> Option<&'a Member> {
    members.iter().find(|m| m.email == email)
}

// ---------------------------------------------------------------------------
// StaticDirectory
// ---------------------------------------------------------------------------

/// A [`Directory`] backed by a fixed list, for offline use and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    members: Vec<Member>,
}

impl StaticDirectory {
    /// Creates a directory that always returns `members`.
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    /// Number of members held.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the directory holds no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Directory for StaticDirectory {
    async fn get_members(&self) -> Result<Vec<Member>, DirectoryError> {
        Ok(self.members.clone())
    }
}
