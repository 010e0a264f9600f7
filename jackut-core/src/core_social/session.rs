//! Authenticated sessions

use super::types::{Login, SessionId, Timestamp};
use serde::{Deserialize, Serialize};

/// A login session bound to exactly one user.
///
/// Sessions hold the user's login rather than the user itself; the
/// [`SocialSystem`](super::manager::SocialSystem) resolves it on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub login: Login,
    pub opened_at: Timestamp,
}

impl Session {
    /// Open a session with a freshly generated token
    pub fn open(login: Login) -> Self {
        Session {
            id: SessionId::generate(),
            login,
            opened_at: Timestamp::now(),
        }
    }
}
