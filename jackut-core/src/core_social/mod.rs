//! Social network model
//!
//! Users, sessions and communities, owned by a single [`SocialSystem`].
//!
//! ## Architecture
//!
//! - **User**: account, profile, relation sets and two message queues
//! - **Community**: named group with an owner and ordered members
//! - **Session**: token bound to one user's login
//! - **SocialSystem**: the only place where cross-entity rules run
//! - **SnapshotStore**: whole-state persistence between runs
//!
//! Entities refer to each other by login or community name, never by
//! reference, so removal and persistence only deal with keys.

pub mod community;
pub mod format;
pub mod manager;
pub mod password;
pub mod session;
pub mod snapshot;
pub mod types;
pub mod user;

pub use community::Community;
pub use format::format_set;
pub use manager::SocialSystem;
pub use password::PasswordPolicy;
pub use session::Session;
pub use snapshot::{Snapshot, SnapshotFormat, SnapshotMetadata, SnapshotStore, SNAPSHOT_VERSION};
pub use types::{CommunityName, Login, MessageQueue, Relation, SessionId, Timestamp};
pub use user::{User, NAME_ATTRIBUTE};
