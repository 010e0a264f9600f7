//! Community data structures and operations

use super::types::{CommunityName, Login};
use crate::errors::{JackutError, JackutResult};
use hashlink::LinkedHashSet;
use serde::{Deserialize, Serialize};

/// A named group of users with a single owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    /// Unique identifier
    name: CommunityName,

    description: String,

    /// Creator of the community, always a member
    owner: Login,

    /// Members in join order, owner first
    members: LinkedHashSet<Login>,
}

impl Community {
    /// Create a community whose first member is its owner
    pub fn new(name: CommunityName, description: String, owner: Login) -> Self {
        let mut members = LinkedHashSet::new();
        members.insert(owner.clone());

        Community {
            name,
            description,
            owner,
            members,
        }
    }

    pub fn name(&self) -> &CommunityName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn owner(&self) -> &Login {
        &self.owner
    }

    pub fn members(&self) -> impl Iterator<Item = &Login> {
        self.members.iter()
    }

    pub fn is_member(&self, login: &Login) -> bool {
        self.members.contains(login)
    }

    pub fn is_owned_by(&self, login: &Login) -> bool {
        &self.owner == login
    }

    /// Add a member to the community
    pub fn add_member(&mut self, login: Login) -> JackutResult<()> {
        if self.members.contains(&login) {
            return Err(JackutError::AlreadyMember);
        }
        self.members.insert(login);
        Ok(())
    }

    /// Remove a member; absent logins are ignored
    pub fn remove_member(&mut self, login: &Login) {
        self.members.remove(login);
    }
}
