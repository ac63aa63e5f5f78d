use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::message::Session;
use crate::constants::SNAPSHOT_FILE_NAME;
use crate::utils::ProcuraError;

/// Storage for the full session snapshot.
///
/// Implementations persist the ordered session list as one document.
/// `load` must never fail loudly: missing or malformed data is treated
/// as empty history so a corrupt snapshot can't brick the client.
pub trait SnapshotRepository: Send {
    /// Read the persisted snapshot, or an empty list if there is none
    fn load(&self) -> Vec<Session>;

    /// Overwrite the snapshot with the given session list
    fn save(&self, sessions: &[Session]) -> Result<(), ProcuraError>;
}

/// Durable repository writing a JSON document under the app data directory
pub struct FileSnapshotRepository {
    path: PathBuf,
}

impl FileSnapshotRepository {
    /// Create a repository rooted at the given storage directory
    pub fn new(storage_dir: impl AsRef<Path>) -> Result<Self, ProcuraError> {
        let storage_dir = storage_dir.as_ref();
        fs::create_dir_all(storage_dir)?;

        Ok(Self {
            path: storage_dir.join(SNAPSHOT_FILE_NAME),
        })
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotRepository for FileSnapshotRepository {
    fn load(&self) -> Vec<Session> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                debug!("No session snapshot at {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&json) {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!("Discarding malformed session snapshot: {}", e);
                Vec::new()
            }
        }
    }

    fn save(&self, sessions: &[Session]) -> Result<(), ProcuraError> {
        let json = serde_json::to_string_pretty(sessions)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory repository for tests and ephemeral runs
#[derive(Default)]
pub struct MemorySnapshotRepository {
    snapshot: Mutex<Vec<Session>>,
}

impl MemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotRepository for MemorySnapshotRepository {
    fn load(&self) -> Vec<Session> {
        self.snapshot.lock().unwrap().clone()
    }

    fn save(&self, sessions: &[Session]) -> Result<(), ProcuraError> {
        *self.snapshot.lock().unwrap() = sessions.to_vec();
        Ok(())
    }
}
