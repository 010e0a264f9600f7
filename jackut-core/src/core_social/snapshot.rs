/*
    snapshot.rs - Whole-state persistence

    The entire social system is written to a single file on shutdown and
    read back on startup.

    Features:
    - Atomic save (write to temp, fsync, then rename)
    - Versioned snapshots with metadata
    - Bincode or JSON encoding
    - A file written under another schema version is discarded and the
      system starts empty; a damaged file is reported, never discarded
*/

use super::community::Community;
use super::manager::SocialSystem;
use super::session::Session;
use super::types::{CommunityName, Login, SessionId, Timestamp};
use super::user::User;
use crate::errors::{JackutResult, SnapshotError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Current on-disk schema version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Encoding of the snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    #[default]
    Bincode,
    Json,
}

impl fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotFormat::Bincode => f.write_str("bincode"),
            SnapshotFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for SnapshotFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bincode" => Ok(SnapshotFormat::Bincode),
            "json" => Ok(SnapshotFormat::Json),
            other => Err(format!("Unknown snapshot format: {}", other)),
        }
    }
}

/// Snapshot metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub version: u32,

    /// Milliseconds since epoch when written
    pub timestamp: u64,

    pub users_count: usize,
    pub sessions_count: usize,
    pub communities_count: usize,
}

/// Leading part of every snapshot, readable across schema versions.
/// `metadata.version` is the first field written, so both encodings can
/// decode it without touching the rest.
#[derive(Deserialize)]
struct SnapshotHeader {
    metadata: VersionTag,
}

#[derive(Deserialize)]
struct VersionTag {
    version: u32,
}

/// Borrowed view written by [`SnapshotStore::save`]
#[derive(Serialize)]
struct SnapshotRef<'a> {
    metadata: SnapshotMetadata,
    users: &'a HashMap<Login, User>,
    sessions: &'a HashMap<SessionId, Session>,
    communities: &'a HashMap<CommunityName, Community>,
}

/// Snapshot data as read back from disk
#[derive(Debug, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub users: HashMap<Login, User>,
    pub sessions: HashMap<SessionId, Session>,
    pub communities: HashMap<CommunityName, Community>,
}

/// Reads and writes the snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    format: SnapshotFormat,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>, format: SnapshotFormat) -> Self {
        SnapshotStore {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    /// Load the persisted system.
    ///
    /// A missing file yields an empty system. So does a file written under
    /// another schema version, after a warning. A file that cannot be decoded
    /// is returned as [`SnapshotError::Corrupt`] and left on disk, as are
    /// other I/O failures.
    pub fn load(&self) -> JackutResult<SocialSystem> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No snapshot found, starting empty");
                return Ok(SocialSystem::new());
            }
            Err(e) => return Err(self.io_error(e).into()),
        };

        let snapshot = match self.decode(&data) {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_schema_mismatch() => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Snapshot does not match current schema, starting empty"
                );
                return Ok(SocialSystem::new());
            }
            Err(e) => return Err(e.into()),
        };

        let system =
            SocialSystem::from_parts(snapshot.users, snapshot.sessions, snapshot.communities);
        info!(
            path = %self.path.display(),
            users = system.user_count(),
            sessions = system.session_count(),
            communities = system.community_count(),
            "Snapshot loaded"
        );
        Ok(system)
    }

    /// Persist the whole system
    pub fn save(&self, system: &SocialSystem) -> JackutResult<()> {
        let snapshot = SnapshotRef {
            metadata: SnapshotMetadata {
                version: SNAPSHOT_VERSION,
                timestamp: Timestamp::now().as_millis(),
                users_count: system.user_count(),
                sessions_count: system.session_count(),
                communities_count: system.community_count(),
            },
            users: system.users(),
            sessions: system.sessions(),
            communities: system.communities(),
        };
        let data = self.encode(&snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        // Write to temporary file first
        let temp_path = self.temp_path();
        if let Err(e) = write_synced(&temp_path, &data) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.io_error(e).into());
        }

        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;

        info!(
            path = %self.path.display(),
            format = %self.format,
            bytes = data.len(),
            "Snapshot saved"
        );
        Ok(())
    }

    fn encode(&self, snapshot: &SnapshotRef<'_>) -> Result<Vec<u8>, SnapshotError> {
        match self.format {
            SnapshotFormat::Bincode => {
                bincode::serialize(snapshot).map_err(|e| SnapshotError::Encode(e.to_string()))
            }
            SnapshotFormat::Json => serde_json::to_vec_pretty(snapshot)
                .map_err(|e| SnapshotError::Encode(e.to_string())),
        }
    }

    fn decode(&self, data: &[u8]) -> Result<Snapshot, SnapshotError> {
        let header: SnapshotHeader = self.decode_as(data)?;
        if header.metadata.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                actual: header.metadata.version,
            });
        }

        let snapshot: Snapshot = self.decode_as(data)?;
        debug!(
            version = snapshot.metadata.version,
            written_at = snapshot.metadata.timestamp,
            "Snapshot decoded"
        );
        Ok(snapshot)
    }

    fn decode_as<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, SnapshotError> {
        match self.format {
            SnapshotFormat::Bincode => {
                bincode::deserialize(data).map_err(|e| SnapshotError::Corrupt(e.to_string()))
            }
            SnapshotFormat::Json => {
                serde_json::from_slice(data).map_err(|e| SnapshotError::Corrupt(e.to_string()))
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
