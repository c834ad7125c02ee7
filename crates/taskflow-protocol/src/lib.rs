//! Domain records for TaskFlow.
//!
//! This crate defines the data that flows between the member directory,
//! the persisted session store, and the grid presenter:
//!
//! - **Types** ([`Member`], [`Task`], [`Project`], ids and statuses):
//!   the records the hosted directory returns and the client caches.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how a record is turned
//!   into the string stored under a session key, and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! ```text
//! Directory (REST rows) → Protocol (Member) → Session (cached identity)
//!                                          → Grid (paginated rows)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Member, MemberId, Priority, Project, ProjectId, ProjectStatus, Task,
    TaskId, TaskStatus,
};
