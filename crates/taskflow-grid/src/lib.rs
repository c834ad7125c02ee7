//! Grid presenter for TaskFlow.
//!
//! Turns an in-memory list of tasks, projects, or members into the
//! paginated, cross-referenced rows a table view shows.
//!
//! # Key types
//!
//! - [`Paginator`]: current page, page size, page slice
//! - [`PageSize`]: the fixed set of page sizes (20 / 50 / 100)
//! - [`Lookup`]: member and project cross references
//! - [`GridKind`], [`GridRow`]: per-kind row derivation

mod error;
mod lookup;
mod page;
mod rows;

pub use error::GridError;
pub use lookup::{Lookup, UNASSIGNED, UNKNOWN_PROJECT};
pub use page::{PageSize, Paginator};
pub use rows::{GridKind, GridRow, MemberRow, ProjectRow, TaskRow};
