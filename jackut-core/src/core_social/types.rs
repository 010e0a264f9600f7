//! Identifier and tag types shared by users, communities and sessions

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp representing the current time
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_millis() as u64)
    }

    /// Get milliseconds since epoch
    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique, immutable key of a user account
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Login(pub String);

impl Login {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased copy, used when resolving enemy targets
    pub fn to_lowercase(&self) -> Self {
        Login(self.0.to_lowercase())
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for Login {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Login {
    fn from(login: &str) -> Self {
        Login(login.to_string())
    }
}

/// Opaque session token handed out by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a fresh random token
    pub fn generate() -> Self {
        SessionId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        SessionId(id.to_string())
    }
}

/// Unique name of a community
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommunityName(pub String);

impl CommunityName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommunityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for CommunityName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CommunityName {
    fn from(name: &str) -> Self {
        CommunityName(name.to_string())
    }
}

/// Kind of user-to-user relation an operation acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// Confirmed friendship
    Friend,
    /// Pending friend invite
    FriendInvite,
    Idol,
    /// Romantic interest ("paquera")
    Crush,
    Enemy,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Relation::Friend => "friend",
            Relation::FriendInvite => "friend-invite",
            Relation::Idol => "idol",
            Relation::Crush => "crush",
            Relation::Enemy => "enemy",
        };
        f.write_str(name)
    }
}

/// The two per-user message queues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageQueue {
    /// Direct messages between two users
    Direct,
    /// Broadcasts received through community membership
    Community,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_session_id_generation() {
        let id1 = SessionId::generate();
        let id2 = SessionId::generate();
        assert_ne!(id1, id2, "Generated session ids should be unique");
    }

    #[test]
    fn test_login_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Login::from("alice"), 1);
        assert_eq!(map.get("alice"), Some(&1));
        assert_eq!(map.get("bob"), None);
    }

    #[test]
    fn test_login_lowercase() {
        assert_eq!(Login::from("BoB").to_lowercase(), Login::from("bob"));
    }

    #[test]
    fn test_relation_display() {
        assert_eq!(Relation::Crush.to_string(), "crush");
        assert_eq!(Relation::FriendInvite.to_string(), "friend-invite");
    }
}
