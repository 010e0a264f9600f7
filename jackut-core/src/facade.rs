//! Public entry point over the social model
//!
//! The facade owns the process lifecycle: [`Facade::open`] loads the snapshot
//! named by the configuration and [`Facade::shutdown`] writes it back. Every
//! other call takes plain strings, wraps session tokens and delegates to
//! [`SocialSystem`].

use crate::config::Config;
use crate::core_social::{SessionId, SnapshotStore, SocialSystem};
use crate::errors::JackutResult;
use crate::metrics;
use tracing::info;

pub struct Facade {
    system: SocialSystem,
    store: SnapshotStore,
    save_on_shutdown: bool,
}

impl Facade {
    /// Load the configured snapshot, or start empty if there is none
    pub fn open(config: &Config) -> JackutResult<Self> {
        metrics::init_metrics();
        let store = config.store.snapshot_store();
        let mut system = store.load()?;
        system.set_password_policy(config.security);
        info!(
            path = %store.path().display(),
            users = system.user_count(),
            "Jackut opened"
        );
        Ok(Self {
            system,
            store,
            save_on_shutdown: config.store.save_on_shutdown,
        })
    }

    /// Wrap an existing system; nothing is loaded
    pub fn with_system(system: SocialSystem, store: SnapshotStore, save_on_shutdown: bool) -> Self {
        Self {
            system,
            store,
            save_on_shutdown,
        }
    }

    pub fn system(&self) -> &SocialSystem {
        &self.system
    }

    /// Drop all state
    pub fn reset(&mut self) {
        self.system.reset();
    }

    /// Write the snapshot now
    pub fn save(&self) -> JackutResult<()> {
        self.store.save(&self.system)
    }

    /// Persist (when configured) and close
    pub fn shutdown(self) -> JackutResult<()> {
        if self.save_on_shutdown {
            self.save()?;
        }
        info!("Jackut shut down");
        Ok(())
    }

    pub fn create_user(&mut self, login: &str, password: &str, name: &str) -> JackutResult<()> {
        self.system.register_user(login, password, name)
    }

    /// Returns the new session token
    pub fn open_session(&mut self, login: &str, password: &str) -> JackutResult<String> {
        self.system
            .open_session(login, password)
            .map(|id| id.as_str().to_string())
    }

    pub fn user_attribute(&self, login: &str, attribute: &str) -> JackutResult<String> {
        self.system.profile_attribute(login, attribute)
    }

    pub fn edit_profile(&mut self, session: &str, attribute: &str, value: &str) -> JackutResult<()> {
        self.system
            .edit_profile(&SessionId::from(session), attribute, value)
    }

    pub fn add_friend(&mut self, session: &str, friend: &str) -> JackutResult<()> {
        self.system.add_friend(&SessionId::from(session), friend)
    }

    pub fn is_friend(&self, login: &str, friend: &str) -> JackutResult<bool> {
        self.system.is_friend(login, friend)
    }

    pub fn friends(&self, login: &str) -> JackutResult<String> {
        self.system.list_friends(login)
    }

    pub fn send_message(&mut self, session: &str, to: &str, text: &str) -> JackutResult<()> {
        self.system.send_message(&SessionId::from(session), to, text)
    }

    pub fn read_message(&mut self, session: &str) -> JackutResult<String> {
        self.system.read_message(&SessionId::from(session))
    }

    pub fn create_community(
        &mut self,
        session: &str,
        name: &str,
        description: &str,
    ) -> JackutResult<()> {
        self.system
            .create_community(&SessionId::from(session), name, description)
    }

    pub fn community_description(&self, name: &str) -> JackutResult<String> {
        self.system.community_description(name)
    }

    pub fn community_owner(&self, name: &str) -> JackutResult<String> {
        self.system.community_owner(name)
    }

    pub fn community_members(&self, name: &str) -> JackutResult<String> {
        self.system.community_members(name)
    }

    /// Add the session's user to a community
    pub fn join_community(&mut self, session: &str, name: &str) -> JackutResult<()> {
        self.system.join_community(&SessionId::from(session), name)
    }

    pub fn add_community_member(&mut self, name: &str, login: &str) -> JackutResult<()> {
        self.system.add_community_member(name, login)
    }

    pub fn communities(&self, login: &str) -> JackutResult<String> {
        self.system.user_communities(login)
    }

    pub fn send_community_message(
        &mut self,
        session: &str,
        community: &str,
        text: &str,
    ) -> JackutResult<()> {
        self.system
            .broadcast(&SessionId::from(session), community, text)
    }

    pub fn read_community_message(&mut self, session: &str) -> JackutResult<String> {
        self.system.read_community_message(&SessionId::from(session))
    }

    pub fn add_idol(&mut self, session: &str, idol: &str) -> JackutResult<()> {
        self.system.add_idol(&SessionId::from(session), idol)
    }

    pub fn is_fan(&self, login: &str, idol: &str) -> JackutResult<bool> {
        self.system.is_fan(login, idol)
    }

    pub fn fans(&self, login: &str) -> JackutResult<String> {
        self.system.list_fans(login)
    }

    pub fn idols(&self, login: &str) -> JackutResult<String> {
        self.system.list_idols(login)
    }

    pub fn add_crush(&mut self, session: &str, crush: &str) -> JackutResult<()> {
        self.system.add_crush(&SessionId::from(session), crush)
    }

    pub fn is_crush(&self, login: &str, crush: &str) -> JackutResult<bool> {
        self.system.is_crush(login, crush)
    }

    pub fn crushes(&self, login: &str) -> JackutResult<String> {
        self.system.list_crushes(login)
    }

    pub fn add_enemy(&mut self, session: &str, enemy: &str) -> JackutResult<()> {
        self.system.add_enemy(&SessionId::from(session), enemy)
    }

    pub fn is_enemy(&self, login: &str, enemy: &str) -> JackutResult<bool> {
        self.system.is_enemy(login, enemy)
    }

    pub fn enemies(&self, login: &str) -> JackutResult<String> {
        self.system.list_enemies(login)
    }

    pub fn remove_user(&mut self, session: &str) -> JackutResult<()> {
        self.system.remove_user(&SessionId::from(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_social::{PasswordPolicy, SnapshotFormat};
    use crate::errors::JackutError;
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.store.data_file = dir.join("dados.ser");
        config.security = PasswordPolicy::new(8, 1);
        config
    }

    #[test]
    fn test_open_without_snapshot_is_empty() {
        let dir = tempdir().unwrap();
        let facade = Facade::open(&config_in(dir.path())).unwrap();
        assert_eq!(facade.system().user_count(), 0);
    }

    #[test]
    fn test_shutdown_persists_state() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());

        let mut facade = Facade::open(&config).unwrap();
        facade.create_user("jpsl", "senha", "João").unwrap();
        facade.shutdown().unwrap();

        let mut facade = Facade::open(&config).unwrap();
        assert_eq!(facade.user_attribute("jpsl", "name").unwrap(), "João");
        assert!(facade.open_session("jpsl", "senha").is_ok());
    }

    #[test]
    fn test_shutdown_without_save() {
        let dir = tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.store.save_on_shutdown = false;

        let mut facade = Facade::open(&config).unwrap();
        facade.create_user("jpsl", "senha", "João").unwrap();
        facade.shutdown().unwrap();

        assert!(!config.store.data_file.exists());
    }

    #[test]
    fn test_reset_then_shutdown_persists_empty_state() {
        let dir = tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.store.format = SnapshotFormat::Json;

        let mut facade = Facade::open(&config).unwrap();
        facade.create_user("jpsl", "senha", "João").unwrap();
        facade.save().unwrap();
        facade.reset();
        facade.shutdown().unwrap();

        let facade = Facade::open(&config).unwrap();
        assert!(matches!(
            facade.user_attribute("jpsl", "name"),
            Err(JackutError::UserNotFound)
        ));
    }

    #[test]
    fn test_unknown_session_string() {
        let dir = tempdir().unwrap();
        let mut facade = Facade::open(&config_in(dir.path())).unwrap();
        assert_eq!(
            facade.read_message("").unwrap_err().to_string(),
            "Sessão inválida."
        );
    }
}
