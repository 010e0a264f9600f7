//! User account data and its per-user mutators
//!
//! A [`User`] only ever changes its own sets. Rules that span two users
//! (invite handshakes, idol/fan mirroring, enemy blocking) live in
//! [`SocialSystem`](super::manager::SocialSystem).

use super::password::verify_password;
use super::types::{CommunityName, Login};
use hashlink::LinkedHashSet;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Attribute that always resolves to the display name
pub const NAME_ATTRIBUTE: &str = "name";

/// A registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    login: Login,
    /// Argon2 PHC string
    password_hash: String,
    display_name: String,

    /// Free-form profile attributes
    profile: HashMap<String, String>,

    /// Confirmed friends, in confirmation order
    friends: LinkedHashSet<Login>,
    sent_invites: HashSet<Login>,
    received_invites: HashSet<Login>,

    /// Direct messages ("recados"), oldest first
    direct_messages: VecDeque<String>,
    /// Community broadcasts, oldest first
    community_messages: VecDeque<String>,

    /// Users this user admires
    idols: HashSet<Login>,
    /// Users admiring this user; mirror of their `idols`
    fans: HashSet<Login>,
    crushes: HashSet<Login>,
    enemies: HashSet<Login>,

    /// Communities joined, in join order
    communities: LinkedHashSet<CommunityName>,
}

impl User {
    /// Create a user with an empty profile and no relations
    pub fn new(login: Login, password_hash: String, display_name: String) -> Self {
        Self {
            login,
            password_hash,
            display_name,
            profile: HashMap::new(),
            friends: LinkedHashSet::new(),
            sent_invites: HashSet::new(),
            received_invites: HashSet::new(),
            direct_messages: VecDeque::new(),
            community_messages: VecDeque::new(),
            idols: HashSet::new(),
            fans: HashSet::new(),
            crushes: HashSet::new(),
            enemies: HashSet::new(),
            communities: LinkedHashSet::new(),
        }
    }

    pub fn login(&self) -> &Login {
        &self.login
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn password_matches(&self, password: &str) -> bool {
        verify_password(&self.password_hash, password)
    }

    // --- profile ---

    /// Look up a profile attribute. `"name"` always yields the display name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        if name == NAME_ATTRIBUTE {
            return Some(&self.display_name);
        }
        self.profile.get(name).map(String::as_str)
    }

    /// Write or overwrite a profile attribute
    pub fn set_attribute(&mut self, name: String, value: String) {
        self.profile.insert(name, value);
    }

    // --- friendship ---

    pub fn is_friend(&self, login: &Login) -> bool {
        self.friends.contains(login)
    }

    pub fn friends(&self) -> impl Iterator<Item = &Login> {
        self.friends.iter()
    }

    pub fn has_sent_invite(&self, to: &Login) -> bool {
        self.sent_invites.contains(to)
    }

    pub fn has_received_invite(&self, from: &Login) -> bool {
        self.received_invites.contains(from)
    }

    pub fn record_sent_invite(&mut self, to: Login) {
        self.sent_invites.insert(to);
    }

    pub fn record_received_invite(&mut self, from: Login) {
        self.received_invites.insert(from);
    }

    /// Turn a pending exchange with `other` into a friendship, clearing both invite sides
    pub fn confirm_friendship(&mut self, other: Login) {
        self.sent_invites.remove(&other);
        self.received_invites.remove(&other);
        if !self.friends.contains(&other) {
            self.friends.insert(other);
        }
    }

    /// Drop the friendship and any pending invite with `login`
    pub fn remove_friend(&mut self, login: &Login) {
        self.friends.remove(login);
        self.sent_invites.remove(login);
        self.received_invites.remove(login);
    }

    // --- messages ---

    pub fn push_direct_message(&mut self, text: String) {
        self.direct_messages.push_back(text);
    }

    pub fn pop_direct_message(&mut self) -> Option<String> {
        self.direct_messages.pop_front()
    }

    pub fn pending_direct_messages(&self) -> usize {
        self.direct_messages.len()
    }

    pub fn clear_direct_messages(&mut self) {
        self.direct_messages.clear();
    }

    pub fn push_community_message(&mut self, text: String) {
        self.community_messages.push_back(text);
    }

    pub fn pop_community_message(&mut self) -> Option<String> {
        self.community_messages.pop_front()
    }

    pub fn pending_community_messages(&self) -> usize {
        self.community_messages.len()
    }

    // --- idols / fans ---

    pub fn has_idol(&self, login: &Login) -> bool {
        self.idols.contains(login)
    }

    pub fn idols(&self) -> impl Iterator<Item = &Login> {
        self.idols.iter()
    }

    pub fn add_idol(&mut self, login: Login) {
        self.idols.insert(login);
    }

    pub fn remove_idol(&mut self, login: &Login) {
        self.idols.remove(login);
    }

    pub fn has_fan(&self, login: &Login) -> bool {
        self.fans.contains(login)
    }

    pub fn fans(&self) -> impl Iterator<Item = &Login> {
        self.fans.iter()
    }

    pub fn add_fan(&mut self, login: Login) {
        self.fans.insert(login);
    }

    pub fn remove_fan(&mut self, login: &Login) {
        self.fans.remove(login);
    }

    // --- crushes ---

    pub fn has_crush(&self, login: &Login) -> bool {
        self.crushes.contains(login)
    }

    pub fn crushes(&self) -> impl Iterator<Item = &Login> {
        self.crushes.iter()
    }

    pub fn add_crush(&mut self, login: Login) {
        self.crushes.insert(login);
    }

    pub fn remove_crush(&mut self, login: &Login) {
        self.crushes.remove(login);
    }

    // --- enemies ---

    pub fn has_enemy(&self, login: &Login) -> bool {
        self.enemies.contains(login)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Login> {
        self.enemies.iter()
    }

    pub fn add_enemy(&mut self, login: Login) {
        self.enemies.insert(login);
    }

    pub fn remove_enemy(&mut self, login: &Login) {
        self.enemies.remove(login);
    }

    /// Remove `login` from every relation set (friends, invites, idols, fans, crushes, enemies)
    pub fn purge_relations_with(&mut self, login: &Login) {
        self.remove_friend(login);
        self.remove_idol(login);
        self.remove_fan(login);
        self.remove_crush(login);
        self.remove_enemy(login);
    }

    // --- communities ---

    pub fn communities(&self) -> impl Iterator<Item = &CommunityName> {
        self.communities.iter()
    }

    pub fn is_in_community(&self, name: &CommunityName) -> bool {
        self.communities.contains(name)
    }

    /// Append `name` unless already joined; an existing entry keeps its position
    pub fn join_community(&mut self, name: CommunityName) {
        if !self.communities.contains(&name) {
            self.communities.insert(name);
        }
    }

    pub fn leave_community(&mut self, name: &CommunityName) {
        self.communities.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::new(Login::from("alice"), "pw1".to_string(), "Alice".to_string())
    }

    #[test]
    fn test_name_attribute_is_display_name() {
        let user = alice();
        assert_eq!(user.attribute(NAME_ATTRIBUTE), Some("Alice"));
        assert_eq!(user.attribute("city"), None);
    }

    #[test]
    fn test_set_attribute_overwrites() {
        let mut user = alice();
        user.set_attribute("city".to_string(), "Maceió".to_string());
        user.set_attribute("city".to_string(), "Recife".to_string());
        assert_eq!(user.attribute("city"), Some("Recife"));
    }

    #[test]
    fn test_confirm_friendship_clears_invites() {
        let mut user = alice();
        let bob = Login::from("bob");
        user.record_sent_invite(bob.clone());
        user.record_received_invite(bob.clone());

        user.confirm_friendship(bob.clone());

        assert!(user.is_friend(&bob));
        assert!(!user.has_sent_invite(&bob));
        assert!(!user.has_received_invite(&bob));
    }

    #[test]
    fn test_friends_keep_insertion_order() {
        let mut user = alice();
        for name in ["carol", "bob", "dave"] {
            user.confirm_friendship(Login::from(name));
        }
        let order: Vec<&str> = user.friends().map(Login::as_str).collect();
        assert_eq!(order, vec!["carol", "bob", "dave"]);
    }

    #[test]
    fn test_direct_messages_are_fifo() {
        let mut user = alice();
        user.push_direct_message("m1".to_string());
        user.push_direct_message("m2".to_string());
        assert_eq!(user.pop_direct_message().as_deref(), Some("m1"));
        assert_eq!(user.pop_direct_message().as_deref(), Some("m2"));
        assert_eq!(user.pop_direct_message(), None);
    }

    #[test]
    fn test_queues_are_independent() {
        let mut user = alice();
        user.push_community_message("hello".to_string());
        assert_eq!(user.pop_direct_message(), None);
        assert_eq!(user.pop_community_message().as_deref(), Some("hello"));
    }

    #[test]
    fn test_removals_are_noops_when_absent() {
        let mut user = alice();
        let ghost = Login::from("ghost");
        user.remove_friend(&ghost);
        user.remove_idol(&ghost);
        user.remove_fan(&ghost);
        user.remove_crush(&ghost);
        user.remove_enemy(&ghost);
        user.leave_community(&CommunityName::from("nowhere"));
        assert_eq!(user.friends().count(), 0);
    }

    #[test]
    fn test_purge_relations_with() {
        let mut user = alice();
        let bob = Login::from("bob");
        user.confirm_friendship(bob.clone());
        user.add_idol(bob.clone());
        user.add_fan(bob.clone());
        user.add_crush(bob.clone());
        user.add_enemy(bob.clone());
        user.record_sent_invite(bob.clone());

        user.purge_relations_with(&bob);

        assert!(!user.is_friend(&bob));
        assert!(!user.has_idol(&bob));
        assert!(!user.has_fan(&bob));
        assert!(!user.has_crush(&bob));
        assert!(!user.has_enemy(&bob));
        assert!(!user.has_sent_invite(&bob));
    }

    #[test]
    fn test_communities_keep_join_order() {
        let mut user = alice();
        user.join_community(CommunityName::from("rust"));
        user.join_community(CommunityName::from("java"));
        user.join_community(CommunityName::from("rust"));
        let names: Vec<&str> = user.communities().map(CommunityName::as_str).collect();
        assert_eq!(names, vec!["rust", "java"]);
    }
}
