//! Shared fixtures for the integration tests

use jackut_core::core_social::PasswordPolicy;
use jackut_core::{Config, Facade};
use std::path::Path;

/// Facade over an empty system whose snapshot lives in `dir`
pub fn open_facade(dir: &Path) -> Facade {
    Facade::open(&config_in(dir)).expect("open facade")
}

pub fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.store.data_file = dir.join("dados.ser");
    config.security = cheap_passwords();
    config
}

/// Minimum argon2 costs, so tests do not spend their time hashing
pub fn cheap_passwords() -> PasswordPolicy {
    PasswordPolicy::new(8, 1)
}

/// Register `login` with password `"pw"` and return a fresh session
pub fn user_with_session(facade: &mut Facade, login: &str, name: &str) -> String {
    facade.create_user(login, "pw", name).expect("register");
    facade.open_session(login, "pw").expect("login")
}
