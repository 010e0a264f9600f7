//! Jackut: an in-memory social network
//!
//! Users register, log in, befriend each other through an invite
//! handshake, exchange queued messages, gather in communities and mark
//! idols, crushes and enemies. The whole state is persisted as a single
//! snapshot between runs.
//!
//! Start from [`Facade`] for the string-based API, or use
//! [`SocialSystem`] directly with typed identifiers.

pub mod config;
pub mod core_social;
pub mod errors;
pub mod facade;
pub mod logging;
pub mod metrics;

pub use config::Config;
pub use core_social::{SnapshotFormat, SnapshotStore, SocialSystem};
pub use errors::{JackutError, JackutResult, SnapshotError};
pub use facade::Facade;
pub use logging::{init_logging, LogLevel};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = LogLevel::Info;
        let _ = SnapshotFormat::default();
        assert_eq!(SocialSystem::new().user_count(), 0);
    }
}
