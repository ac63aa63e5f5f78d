use tracing::{debug, warn};

use super::message::{Message, Session};
use super::repository::SnapshotRepository;

/// Ordered collection of sessions (most-recent-first) backed by a
/// snapshot repository.
///
/// Every mutation persists the full snapshot as a side effect. A failed
/// write is logged and otherwise ignored; the in-memory history stays
/// authoritative for the running process.
pub struct SessionStore {
    sessions: Vec<Session>,
    repository: Box<dyn SnapshotRepository>,
}

impl SessionStore {
    /// Create a store over the given repository, loading whatever
    /// snapshot it holds
    pub fn new(repository: Box<dyn SnapshotRepository>) -> Self {
        let sessions = repository.load();
        debug!("Loaded {} session(s) from snapshot", sessions.len());

        Self {
            sessions,
            repository,
        }
    }

    /// All sessions, most recent first
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Id of the head session, if any
    pub fn first_id(&self) -> Option<&str> {
        self.sessions.first().map(|s| s.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Create a new session at the head of the list and return its id
    pub fn create(&mut self) -> String {
        let session = Session::new();
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.persist();
        id
    }

    /// Remove the session with the given id; unknown ids are a no-op
    pub fn delete(&mut self, id: &str) {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);

        if self.sessions.len() != before {
            self.persist();
        }
    }

    /// Append a message to the identified session.
    ///
    /// The target may have been deleted while a request was in flight,
    /// in which case the reply is dropped with a log line.
    pub fn append_message(&mut self, id: &str, message: Message) {
        match self.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.messages.push(message);
                self.persist();
            }
            None => debug!("Dropping message for deleted session {}", id),
        }
    }

    fn persist(&self) {
        if let Err(e) = self.repository.save(&self.sessions) {
            warn!("Failed to persist session snapshot: {}", e);
        }
    }
}
