//! Metrics collection for the social model
//!
//! Counters are emitted through the `metrics` facade; nothing is recorded
//! unless the host process installs a recorder.

use metrics::{counter, describe_counter, describe_gauge, gauge};

pub const USERS_REGISTERED: &str = "jackut.users.registered";
pub const USERS_REMOVED: &str = "jackut.users.removed";
pub const SESSIONS_OPENED: &str = "jackut.sessions.opened";
pub const FRIENDSHIPS_CONFIRMED: &str = "jackut.friendships.confirmed";
pub const MESSAGES_SENT: &str = "jackut.messages.sent";
pub const COMMUNITY_BROADCASTS: &str = "jackut.community.broadcasts";
pub const COMMUNITIES_CREATED: &str = "jackut.communities.created";
pub const USERS_ACTIVE: &str = "jackut.users.active";

/// Initialize metrics with descriptions
pub fn init_metrics() {
    describe_counter!(USERS_REGISTERED, "Number of accounts registered");
    describe_counter!(USERS_REMOVED, "Number of accounts removed");
    describe_counter!(SESSIONS_OPENED, "Number of successful logins");
    describe_counter!(FRIENDSHIPS_CONFIRMED, "Number of friendships confirmed");
    describe_counter!(MESSAGES_SENT, "Number of direct messages delivered");
    describe_counter!(COMMUNITY_BROADCASTS, "Number of community broadcasts");
    describe_counter!(COMMUNITIES_CREATED, "Number of communities created");
    describe_gauge!(USERS_ACTIVE, "Number of registered accounts");
}

/// Record a counter metric
pub fn record_counter(name: &'static str, value: u64) {
    counter!(name).increment(value);
}

/// Record a gauge metric
pub fn record_gauge(name: &'static str, value: f64) {
    gauge!(name).set(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        init_metrics();
        record_counter(USERS_REGISTERED, 1);
        record_gauge(USERS_ACTIVE, 3.0);
    }
}
