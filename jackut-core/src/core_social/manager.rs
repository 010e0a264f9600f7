//! The system manager: single owner of all users, sessions and communities
//!
//! Every rule that touches more than one entity lives here:
//!
//! - **Friendship handshake**: an invite is recorded on both sides; when the
//!   target already invited the caller, the friendship is confirmed in the
//!   same call.
//! - **Enemy blocking**: a user who lists the caller as an enemy cannot be
//!   befriended, messaged, idolized or crushed on by that caller.
//! - **Idol/fan mirroring**: both sets are written together.
//! - **Mutual crushes**: both parties get a direct message on the match.
//! - **User removal**: cascades through communities and every other user.
//!
//! Guards run in a fixed order per operation and nothing is mutated before
//! the last guard passes.

use super::community::Community;
use super::format::format_set;
use super::password::PasswordPolicy;
use super::session::Session;
use super::types::{CommunityName, Login, MessageQueue, Relation, SessionId};
use super::user::User;
use crate::errors::{JackutError, JackutResult};
use crate::metrics::{self as counters, record_counter, record_gauge};
use std::collections::HashMap;
use tracing::{debug, info};

/// In-memory social network state
#[derive(Debug, Default, Clone)]
pub struct SocialSystem {
    users: HashMap<Login, User>,
    sessions: HashMap<SessionId, Session>,
    communities: HashMap<CommunityName, Community>,
    password_policy: PasswordPolicy,
}

impl SocialSystem {
    /// Create an empty system
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty system hashing new passwords with `policy`
    pub fn with_password_policy(policy: PasswordPolicy) -> Self {
        Self {
            password_policy: policy,
            ..Self::default()
        }
    }

    /// Applies to passwords registered from now on
    pub fn set_password_policy(&mut self, policy: PasswordPolicy) {
        self.password_policy = policy;
    }

    /// Rebuild a system from persisted maps, dropping sessions of missing users
    pub(crate) fn from_parts(
        users: HashMap<Login, User>,
        mut sessions: HashMap<SessionId, Session>,
        communities: HashMap<CommunityName, Community>,
    ) -> Self {
        sessions.retain(|_, session| users.contains_key(&session.login));
        Self {
            users,
            sessions,
            communities,
            password_policy: PasswordPolicy::default(),
        }
    }

    pub(crate) fn users(&self) -> &HashMap<Login, User> {
        &self.users
    }

    pub(crate) fn sessions(&self) -> &HashMap<SessionId, Session> {
        &self.sessions
    }

    pub(crate) fn communities(&self) -> &HashMap<CommunityName, Community> {
        &self.communities
    }

    /// Look up a user by login
    pub fn user(&self, login: &str) -> Option<&User> {
        self.users.get(login)
    }

    /// Look up a community by name
    pub fn community(&self, name: &str) -> Option<&Community> {
        self.communities.get(name)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn community_count(&self) -> usize {
        self.communities.len()
    }

    /// Drop every user, session and community
    pub fn reset(&mut self) {
        self.users.clear();
        self.sessions.clear();
        self.communities.clear();
        info!("Social system reset");
    }

    // ------------------------------------------------------------------
    // Lookups shared by the operations below
    // ------------------------------------------------------------------

    fn existing_user(&self, login: &str) -> JackutResult<&User> {
        self.users.get(login).ok_or(JackutError::UserNotFound)
    }

    fn existing_user_mut(&mut self, login: &str) -> JackutResult<&mut User> {
        self.users.get_mut(login).ok_or(JackutError::UserNotFound)
    }

    fn existing_community(&self, name: &str) -> JackutResult<&Community> {
        self.communities
            .get(name)
            .ok_or(JackutError::CommunityNotFound)
    }

    /// Resolve a session to the login of its (still registered) user
    fn session_login(&self, session: &SessionId) -> JackutResult<Login> {
        let session = self
            .sessions
            .get(session)
            .ok_or(JackutError::InvalidSession)?;
        if !self.users.contains_key(&session.login) {
            return Err(JackutError::InvalidSession);
        }
        Ok(session.login.clone())
    }

    /// Resolve `target` and fail if it lists `caller` as an enemy
    fn reachable_target(&self, caller: &Login, target: &str) -> JackutResult<&User> {
        let target_user = self.existing_user(target)?;
        if target_user.has_enemy(caller) {
            return Err(JackutError::EnemyBlock {
                name: target_user.display_name().to_string(),
            });
        }
        Ok(target_user)
    }

    // ------------------------------------------------------------------
    // Accounts and sessions
    // ------------------------------------------------------------------

    /// Register a new account
    pub fn register_user(
        &mut self,
        login: &str,
        password: &str,
        display_name: &str,
    ) -> JackutResult<()> {
        if login.is_empty() {
            return Err(JackutError::InvalidArgument("Login inválido.".to_string()));
        }
        if password.is_empty() {
            return Err(JackutError::InvalidArgument("Senha inválida.".to_string()));
        }
        if self.users.contains_key(login) {
            return Err(JackutError::DuplicateAccount);
        }

        let password_hash = self.password_policy.hash(password)?;
        let login = Login::from(login);
        self.users.insert(
            login.clone(),
            User::new(login.clone(), password_hash, display_name.to_string()),
        );

        info!(%login, "User registered");
        record_counter(counters::USERS_REGISTERED, 1);
        record_gauge(counters::USERS_ACTIVE, self.users.len() as f64);
        Ok(())
    }

    /// Authenticate and open a new session; a user may hold several
    pub fn open_session(&mut self, login: &str, password: &str) -> JackutResult<SessionId> {
        let user = self
            .users
            .get(login)
            .filter(|user| user.password_matches(password))
            .ok_or(JackutError::InvalidCredentials)?;

        let session = Session::open(user.login().clone());
        let id = session.id.clone();
        info!(login = %session.login, "Session opened");
        self.sessions.insert(id.clone(), session);

        record_counter(counters::SESSIONS_OPENED, 1);
        Ok(id)
    }

    /// Read a profile attribute; `"name"` always answers with the display name
    pub fn profile_attribute(&self, login: &str, attribute: &str) -> JackutResult<String> {
        self.existing_user(login)?
            .attribute(attribute)
            .map(str::to_string)
            .ok_or(JackutError::AttributeNotSet)
    }

    /// Write or overwrite a profile attribute of the session's user
    pub fn edit_profile(
        &mut self,
        session: &SessionId,
        attribute: &str,
        value: &str,
    ) -> JackutResult<()> {
        let caller = self.session_login(session)?;
        self.existing_user_mut(caller.as_str())?
            .set_attribute(attribute.to_string(), value.to_string());
        debug!(%caller, attribute, "Profile attribute updated");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Friendship
    // ------------------------------------------------------------------

    /// Invite `target` as a friend, confirming the friendship when `target`
    /// has already invited the caller.
    pub fn add_friend(&mut self, session: &SessionId, target: &str) -> JackutResult<()> {
        let caller = self.session_login(session)?;
        let target_user = self.reachable_target(&caller, target)?;
        if caller.as_str() == target {
            return Err(JackutError::SelfReference(Relation::Friend));
        }

        let target = target_user.login().clone();
        let reciprocal = target_user.has_sent_invite(&caller);

        let caller_user = self.existing_user(caller.as_str())?;
        if caller_user.is_friend(&target) {
            return Err(JackutError::DuplicateRelation(Relation::Friend));
        }
        if caller_user.has_sent_invite(&target) {
            return Err(JackutError::DuplicateRelation(Relation::FriendInvite));
        }

        self.existing_user_mut(caller.as_str())?
            .record_sent_invite(target.clone());
        self.existing_user_mut(target.as_str())?
            .record_received_invite(caller.clone());

        if reciprocal {
            self.existing_user_mut(caller.as_str())?
                .confirm_friendship(target.clone());
            self.existing_user_mut(target.as_str())?
                .confirm_friendship(caller.clone());
            info!(%caller, to = %target, "Friendship confirmed");
            record_counter(counters::FRIENDSHIPS_CONFIRMED, 1);
        } else {
            debug!(%caller, to = %target, "Friend invite sent");
        }
        Ok(())
    }

    /// Whether `login` has a confirmed friendship with `other`
    pub fn is_friend(&self, login: &str, other: &str) -> JackutResult<bool> {
        let user = self.existing_user(login)?;
        let other = self.existing_user(other)?;
        Ok(user.is_friend(other.login()))
    }

    /// Confirmed friends of `login`, in confirmation order
    pub fn list_friends(&self, login: &str) -> JackutResult<String> {
        Ok(format_set(self.existing_user(login)?.friends()))
    }

    // ------------------------------------------------------------------
    // Direct messages
    // ------------------------------------------------------------------

    /// Queue a direct message on `target`
    pub fn send_message(
        &mut self,
        session: &SessionId,
        target: &str,
        text: &str,
    ) -> JackutResult<()> {
        let caller = self.session_login(session)?;
        self.reachable_target(&caller, target)?;
        if caller.as_str() == target {
            return Err(JackutError::SelfMessage);
        }

        self.existing_user_mut(target)?
            .push_direct_message(text.to_string());
        debug!(%caller, to = target, "Direct message queued");
        record_counter(counters::MESSAGES_SENT, 1);
        Ok(())
    }

    /// Dequeue the oldest direct message of the session's user
    pub fn read_message(&mut self, session: &SessionId) -> JackutResult<String> {
        let caller = self.session_login(session)?;
        self.existing_user_mut(caller.as_str())?
            .pop_direct_message()
            .ok_or(JackutError::NoMessages(MessageQueue::Direct))
    }

    // ------------------------------------------------------------------
    // Communities
    // ------------------------------------------------------------------

    /// Create a community owned by the session's user
    pub fn create_community(
        &mut self,
        session: &SessionId,
        name: &str,
        description: &str,
    ) -> JackutResult<()> {
        let owner = self.session_login(session)?;
        if self.communities.contains_key(name) {
            return Err(JackutError::DuplicateCommunity);
        }

        let name = CommunityName::from(name);
        self.communities.insert(
            name.clone(),
            Community::new(name.clone(), description.to_string(), owner.clone()),
        );
        self.existing_user_mut(owner.as_str())?
            .join_community(name.clone());

        info!(community = %name, %owner, "Community created");
        record_counter(counters::COMMUNITIES_CREATED, 1);
        Ok(())
    }

    /// Add `login` to the community `name`
    pub fn add_community_member(&mut self, name: &str, login: &str) -> JackutResult<()> {
        self.existing_community(name)?;
        let member = self.existing_user(login)?.login().clone();

        let community = self
            .communities
            .get_mut(name)
            .ok_or(JackutError::CommunityNotFound)?;
        community.add_member(member.clone())?;
        let community_name = community.name().clone();

        self.existing_user_mut(member.as_str())?
            .join_community(community_name.clone());
        debug!(community = %community_name, %member, "Member added");
        Ok(())
    }

    /// Add the session's user to the community `name`
    pub fn join_community(&mut self, session: &SessionId, name: &str) -> JackutResult<()> {
        let caller = self.session_login(session)?;
        self.add_community_member(name, caller.as_str())
    }

    pub fn community_description(&self, name: &str) -> JackutResult<String> {
        Ok(self.existing_community(name)?.description().to_string())
    }

    pub fn community_owner(&self, name: &str) -> JackutResult<String> {
        Ok(self.existing_community(name)?.owner().to_string())
    }

    /// Members of `name`, owner first, then in join order
    pub fn community_members(&self, name: &str) -> JackutResult<String> {
        Ok(format_set(self.existing_community(name)?.members()))
    }

    /// Communities of `login`, in join order
    pub fn user_communities(&self, login: &str) -> JackutResult<String> {
        Ok(format_set(self.existing_user(login)?.communities()))
    }

    /// Queue `text` on the community queue of every member, sender included
    pub fn broadcast(
        &mut self,
        session: &SessionId,
        community: &str,
        text: &str,
    ) -> JackutResult<()> {
        let caller = self.session_login(session)?;
        let community = self
            .communities
            .get(community)
            .ok_or(JackutError::CommunityNotFound)?;

        for member in community.members() {
            if let Some(user) = self.users.get_mut(member) {
                user.push_community_message(text.to_string());
            }
        }

        debug!(%caller, community = %community.name(), "Community broadcast");
        record_counter(counters::COMMUNITY_BROADCASTS, 1);
        Ok(())
    }

    /// Dequeue the oldest community message of the session's user
    pub fn read_community_message(&mut self, session: &SessionId) -> JackutResult<String> {
        let caller = self.session_login(session)?;
        self.existing_user_mut(caller.as_str())?
            .pop_community_message()
            .ok_or(JackutError::NoMessages(MessageQueue::Community))
    }

    // ------------------------------------------------------------------
    // Idols and fans
    // ------------------------------------------------------------------

    /// Record `target` as an idol of the caller and the caller as a fan of `target`
    pub fn add_idol(&mut self, session: &SessionId, target: &str) -> JackutResult<()> {
        let caller = self.session_login(session)?;
        let target = self.reachable_target(&caller, target)?.login().clone();
        if caller == target {
            return Err(JackutError::SelfReference(Relation::Idol));
        }

        let caller_user = self.existing_user(caller.as_str())?;
        // A user cannot idolize one of their own fans
        if caller_user.has_fan(&target) {
            return Err(JackutError::AlreadyFan);
        }
        if caller_user.has_idol(&target) {
            return Err(JackutError::DuplicateRelation(Relation::Idol));
        }

        self.existing_user_mut(caller.as_str())?
            .add_idol(target.clone());
        self.existing_user_mut(target.as_str())?
            .add_fan(caller.clone());
        debug!(%caller, to = %target, "Idol added");
        Ok(())
    }

    /// Whether `login` is a fan of `idol`
    pub fn is_fan(&self, login: &str, idol: &str) -> JackutResult<bool> {
        let user = self.existing_user(login)?;
        let idol = self.existing_user(idol)?;
        Ok(user.has_idol(idol.login()))
    }

    pub fn list_fans(&self, login: &str) -> JackutResult<String> {
        Ok(format_set(self.existing_user(login)?.fans()))
    }

    pub fn list_idols(&self, login: &str) -> JackutResult<String> {
        Ok(format_set(self.existing_user(login)?.idols()))
    }

    // ------------------------------------------------------------------
    // Crushes
    // ------------------------------------------------------------------

    /// Add `target` as a crush; when the interest is mutual both users get a notice
    pub fn add_crush(&mut self, session: &SessionId, target: &str) -> JackutResult<()> {
        let caller = self.session_login(session)?;
        let target_user = self.reachable_target(&caller, target)?;
        if caller.as_str() == target {
            return Err(JackutError::SelfReference(Relation::Crush));
        }
        let target = target_user.login().clone();
        let target_name = target_user.display_name().to_string();
        let mutual = target_user.has_crush(&caller);

        let caller_user = self.existing_user(caller.as_str())?;
        if caller_user.has_crush(&target) {
            return Err(JackutError::DuplicateRelation(Relation::Crush));
        }
        let caller_name = caller_user.display_name().to_string();

        let caller_user = self.existing_user_mut(caller.as_str())?;
        caller_user.add_crush(target.clone());

        if mutual {
            caller_user.push_direct_message(crush_notice(&target_name));
            self.existing_user_mut(target.as_str())?
                .push_direct_message(crush_notice(&caller_name));
            info!(%caller, to = %target, "Mutual crush");
        } else {
            debug!(%caller, to = %target, "Crush added");
        }
        Ok(())
    }

    /// Whether `login` has `other` as a crush
    pub fn is_crush(&self, login: &str, other: &str) -> JackutResult<bool> {
        let user = self.existing_user(login)?;
        let other = self.existing_user(other)?;
        Ok(user.has_crush(other.login()))
    }

    pub fn list_crushes(&self, login: &str) -> JackutResult<String> {
        Ok(format_set(self.existing_user(login)?.crushes()))
    }

    // ------------------------------------------------------------------
    // Enemies
    // ------------------------------------------------------------------

    /// Declare `target` (compared lowercased) an enemy of the caller
    pub fn add_enemy(&mut self, session: &SessionId, target: &str) -> JackutResult<()> {
        let caller = self.session_login(session)?;
        let target = Login::from(target).to_lowercase();

        self.existing_user(target.as_str())?;
        let caller_user = self.existing_user(caller.as_str())?;
        if caller_user.has_enemy(&target) {
            return Err(JackutError::DuplicateRelation(Relation::Enemy));
        }
        if caller == target {
            return Err(JackutError::SelfReference(Relation::Enemy));
        }

        self.existing_user_mut(caller.as_str())?
            .add_enemy(target.clone());
        debug!(%caller, to = %target, "Enemy added");
        Ok(())
    }

    /// Whether `login` lists `other` as an enemy
    pub fn is_enemy(&self, login: &str, other: &str) -> JackutResult<bool> {
        let user = self.existing_user(login)?;
        let other = self.existing_user(other)?;
        Ok(user.has_enemy(other.login()))
    }

    pub fn list_enemies(&self, login: &str) -> JackutResult<String> {
        Ok(format_set(self.existing_user(login)?.enemies()))
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Delete the session's user and everything that points at them.
    ///
    /// Owned communities are deleted and dropped from their members; other
    /// communities lose the user as a member; every remaining user forgets the
    /// login in all relation sets and has their direct-message queue cleared;
    /// every session of the user is closed.
    pub fn remove_user(&mut self, session: &SessionId) -> JackutResult<()> {
        let login = self.session_login(session)?;
        self.users.remove(&login);

        let users = &mut self.users;
        let mut deleted = 0usize;
        self.communities.retain(|name, community| {
            if community.is_owned_by(&login) {
                for member in community.members() {
                    if let Some(user) = users.get_mut(member) {
                        user.leave_community(name);
                    }
                }
                deleted += 1;
                false
            } else {
                community.remove_member(&login);
                true
            }
        });

        for user in self.users.values_mut() {
            user.purge_relations_with(&login);
            user.clear_direct_messages();
        }

        self.sessions.retain(|_, session| session.login != login);

        info!(%login, communities_deleted = deleted, "User removed");
        record_counter(counters::USERS_REMOVED, 1);
        record_gauge(counters::USERS_ACTIVE, self.users.len() as f64);
        Ok(())
    }
}

/// Equal when the persisted state matches; the password policy is not state
impl PartialEq for SocialSystem {
    fn eq(&self, other: &Self) -> bool {
        self.users == other.users
            && self.sessions == other.sessions
            && self.communities == other.communities
    }
}

fn crush_notice(display_name: &str) -> String {
    format!("{} é seu paquera - Recado do Jackut.", display_name)
}
