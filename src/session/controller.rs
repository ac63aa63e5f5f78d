use tracing::debug;

use super::message::Message;
use super::repository::SnapshotRepository;
use super::store::SessionStore;
use crate::gateway::{QueryGateway, QueryResponse, StatsResponse};
use crate::utils::GatewayError;

/// A request that has been dispatched but not yet answered.
///
/// Carries the id of the session that originated it, captured at send
/// time, so the reply lands in that session even if the user has
/// switched threads in the meantime.
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub session_id: String,
    pub question: String,
}

/// Orchestrates the conversation flow: routes user input into sessions,
/// dispatches backend requests, and merges replies or failures back
/// into the thread that asked.
///
/// At most one request is outstanding at a time; the `loading` flag
/// gates the only user-facing mutating entry point.
pub struct ConversationController {
    store: SessionStore,
    current_id: String,
    input: String,
    loading: bool,
    stats: Option<StatsResponse>,
}

impl ConversationController {
    /// Build a controller over the given repository. Restores persisted
    /// history; an empty store immediately self-heals with a fresh
    /// session so there is always a current thread.
    pub fn new(repository: Box<dyn SnapshotRepository>) -> Self {
        let mut store = SessionStore::new(repository);
        let current_id = match store.first_id() {
            Some(id) => id.to_string(),
            None => store.create(),
        };

        Self {
            store,
            current_id,
            input: String::new(),
            loading: false,
            stats: None,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn current_id(&self) -> &str {
        &self.current_id
    }

    /// The session the user is looking at
    pub fn current_session(&self) -> &super::message::Session {
        // The store is never empty: deletion self-heals and every
        // constructor path creates a session
        self.store
            .get(&self.current_id)
            .expect("current session must exist")
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn stats(&self) -> Option<&StatsResponse> {
        self.stats.as_ref()
    }

    /// Record the startup stats fetch. A failure leaves stats absent;
    /// it is never surfaced as an error.
    pub fn set_stats(&mut self, stats: Result<StatsResponse, GatewayError>) {
        match stats {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => debug!("Stats unavailable: {}", e),
        }
    }

    /// Start a new conversation and make it current
    pub fn new_chat(&mut self) {
        self.current_id = self.store.create();
    }

    /// Switch the current thread; unknown ids are ignored
    pub fn select_session(&mut self, id: &str) {
        if self.store.contains(id) {
            self.current_id = id.to_string();
        }
    }

    /// Delete a session. Deleting the current one promotes the first
    /// remaining session, or creates a fresh one if none remain.
    pub fn delete_session(&mut self, id: &str) {
        self.store.delete(id);

        if id == self.current_id {
            self.current_id = match self.store.first_id() {
                Some(first) => first.to_string(),
                None => self.store.create(),
            };
        }
    }

    /// First half of the send flow: validate, append the user message
    /// to the current session, and hand back the dispatched query.
    ///
    /// Returns `None` (a complete no-op) when the trimmed input is
    /// empty or a request is already in flight. The returned
    /// `PendingQuery` captures the originating session id; replies must
    /// be delivered through [`finish_send`](Self::finish_send) with
    /// that id, never re-resolved against whatever is current later.
    pub fn begin_send(&mut self) -> Option<PendingQuery> {
        let question = self.input.trim().to_string();
        if question.is_empty() || self.loading {
            return None;
        }

        let target_id = self.current_id.clone();
        self.store.append_message(&target_id, Message::user(question.as_str()));
        self.input.clear();
        self.loading = true;

        Some(PendingQuery {
            session_id: target_id,
            question,
        })
    }

    /// Second half of the send flow: merge the gateway outcome into the
    /// originating session. Clears the loading flag on every path so a
    /// failure can never wedge the input.
    pub fn finish_send(
        &mut self,
        session_id: &str,
        outcome: Result<QueryResponse, GatewayError>,
    ) {
        let message = match outcome {
            Ok(response) => Message::from_response(response),
            Err(e) => Message::from_failure(&e),
        };

        self.store.append_message(session_id, message);
        self.loading = false;
    }

    /// Complete send flow against a gateway. The TUI splits this into
    /// `begin_send` plus a spawned request so its event loop stays
    /// responsive; the behavior is identical.
    pub async fn send_message(&mut self, gateway: &dyn QueryGateway, text: &str) {
        self.set_input(text);

        if let Some(pending) = self.begin_send() {
            let outcome = gateway.ask(&pending.question).await;
            self.finish_send(&pending.session_id, outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GREETING_MESSAGE;
    use crate::gateway::MockQueryGateway;
    use crate::session::repository::MemorySnapshotRepository;
    use crate::session::Role;
    use pretty_assertions::assert_eq;

    fn controller() -> ConversationController {
        ConversationController::new(Box::new(MemorySnapshotRepository::new()))
    }

    #[test]
    fn test_empty_store_self_heals_with_greeted_session() {
        let ctl = controller();
        assert_eq!(ctl.store().sessions().len(), 1);

        let session = ctl.current_session();
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].role, Role::Assistant);
        assert_eq!(session.messages[0].content, GREETING_MESSAGE);
    }

    #[test]
    fn test_new_chat_becomes_current_head() {
        let mut ctl = controller();
        let first = ctl.current_id().to_string();

        ctl.new_chat();
        assert_ne!(ctl.current_id(), first);
        assert_eq!(ctl.store().first_id(), Some(ctl.current_id()));
    }

    #[test]
    fn test_delete_non_current_keeps_current() {
        let mut ctl = controller();
        let older = ctl.current_id().to_string();
        ctl.new_chat();
        let newer = ctl.current_id().to_string();

        ctl.delete_session(&older);

        assert_eq!(ctl.current_id(), newer);
        assert_eq!(ctl.store().sessions().len(), 1);
    }

    #[test]
    fn test_delete_current_promotes_first_remaining() {
        let mut ctl = controller();
        let older = ctl.current_id().to_string();
        ctl.new_chat();
        let newer = ctl.current_id().to_string();

        ctl.delete_session(&newer);

        assert_eq!(ctl.current_id(), older);
    }

    #[test]
    fn test_delete_last_session_creates_replacement() {
        let mut ctl = controller();
        let only = ctl.current_id().to_string();

        ctl.delete_session(&only);

        assert_eq!(ctl.store().sessions().len(), 1);
        assert_ne!(ctl.current_id(), only);
        assert_eq!(ctl.current_session().messages.len(), 1);
    }

    #[test]
    fn test_select_unknown_session_is_ignored() {
        let mut ctl = controller();
        let current = ctl.current_id().to_string();
        ctl.select_session("no-such-id");
        assert_eq!(ctl.current_id(), current);
    }

    #[test]
    fn test_begin_send_rejects_blank_input() {
        let mut ctl = controller();

        ctl.set_input("");
        assert!(ctl.begin_send().is_none());

        ctl.set_input("   ");
        assert!(ctl.begin_send().is_none());

        assert_eq!(ctl.current_session().messages.len(), 1);
        assert!(!ctl.is_loading());
    }

    #[test]
    fn test_begin_send_while_loading_is_noop() {
        let mut ctl = controller();
        ctl.set_input("first question");
        let pending = ctl.begin_send().unwrap();
        assert!(ctl.is_loading());

        ctl.set_input("second question");
        assert!(ctl.begin_send().is_none());

        // Only the first user message landed
        assert_eq!(ctl.current_session().messages.len(), 2);
        assert_eq!(pending.question, "first question");
    }

    #[test]
    fn test_begin_send_trims_and_clears_input() {
        let mut ctl = controller();
        ctl.set_input("  Show LPA contracts  ");

        let pending = ctl.begin_send().unwrap();

        assert_eq!(pending.question, "Show LPA contracts");
        assert_eq!(ctl.input(), "");
        let last = ctl.current_session().messages.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, "Show LPA contracts");
    }

    #[tokio::test]
    async fn test_send_message_success_appends_user_then_assistant() {
        let mut ctl = controller();

        let mut gateway = MockQueryGateway::new();
        gateway.expect_ask().times(1).returning(|_| {
            Ok(QueryResponse {
                answer: "There were 52,941 purchases in 2014.".to_string(),
                data: None,
                query_used: Some(r#"{"fiscal_year": "2014-2015"}"#.to_string()),
            })
        });

        ctl.send_message(&gateway, "How many purchases in 2014?").await;

        let messages = &ctl.current_session().messages;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, "There were 52,941 purchases in 2014.");
        assert!(!messages[2].is_error);
        assert!(!ctl.is_loading());
    }

    #[tokio::test]
    async fn test_send_message_failure_appends_error_reply() {
        let mut ctl = controller();

        let mut gateway = MockQueryGateway::new();
        gateway.expect_ask().times(1).returning(|_| {
            Err(GatewayError::Api {
                status: 500,
                message: "Failed to get answer".to_string(),
            })
        });

        ctl.send_message(&gateway, "Top 5 departments by spending").await;

        let messages = &ctl.current_session().messages;
        assert_eq!(messages.len(), 3);
        assert!(messages[2].is_error);
        assert!(messages[2].content.contains("Failed to get answer"));
        assert!(!ctl.is_loading());
    }

    #[tokio::test]
    async fn test_stub_data_answer_scenario() {
        // Empty store, one greeted session, then a data-carrying answer
        let mut ctl = controller();
        assert_eq!(ctl.current_session().messages.len(), 1);

        let mut gateway = MockQueryGateway::new();
        gateway.expect_ask().times(1).returning(|_| {
            let row = serde_json::from_str(r#"{"dept": "IT"}"#).unwrap();
            Ok(QueryResponse {
                answer: "IT leads departmental spending.".to_string(),
                data: Some(vec![row]),
                query_used: None,
            })
        });

        ctl.send_message(&gateway, "Top 5 departments by spending").await;

        let messages = &ctl.current_session().messages;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].data.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_reply_attaches_to_originating_session() {
        let mut ctl = controller();
        let origin = ctl.current_id().to_string();

        ctl.set_input("How many purchases in 2014?");
        let pending = ctl.begin_send().unwrap();
        assert_eq!(pending.session_id, origin);

        // User switches threads while the request is in flight
        ctl.new_chat();
        let switched = ctl.current_id().to_string();
        assert_ne!(switched, origin);

        ctl.finish_send(
            &pending.session_id,
            Ok(QueryResponse {
                answer: "52,941".to_string(),
                data: None,
                query_used: None,
            }),
        );

        // Reply landed in the originator, not the new current session
        let origin_session = ctl.store().get(&origin).unwrap();
        assert_eq!(origin_session.messages.len(), 3);
        assert_eq!(ctl.store().get(&switched).unwrap().messages.len(), 1);
        assert!(!ctl.is_loading());
    }

    #[test]
    fn test_reply_for_deleted_session_still_clears_loading() {
        let mut ctl = controller();
        let origin = ctl.current_id().to_string();

        ctl.set_input("Show LPA contracts");
        let pending = ctl.begin_send().unwrap();

        ctl.delete_session(&origin);
        ctl.finish_send(
            &pending.session_id,
            Err(GatewayError::Api {
                status: 502,
                message: "bad gateway".to_string(),
            }),
        );

        assert!(!ctl.is_loading());
        // The replacement session is untouched
        assert_eq!(ctl.current_session().messages.len(), 1);
    }

    #[test]
    fn test_stats_failure_is_recovered_locally() {
        let mut ctl = controller();

        ctl.set_stats(Err(GatewayError::Api {
            status: 500,
            message: "stats exploded".to_string(),
        }));
        assert!(ctl.stats().is_none());

        ctl.set_stats(Ok(StatsResponse {
            total_records: 346_018,
            departments: 52,
            suppliers: 4_913,
        }));
        assert_eq!(ctl.stats().unwrap().total_records, 346_018);
    }

    #[test]
    fn test_history_restores_across_controllers() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let repo = || {
            Box::new(
                crate::session::repository::FileSnapshotRepository::new(temp_dir.path()).unwrap(),
            )
        };

        let first_current;
        {
            let mut ctl = ConversationController::new(repo());
            ctl.new_chat();
            first_current = ctl.current_id().to_string();
            ctl.set_input("IT purchases over $10,000");
            let pending = ctl.begin_send().unwrap();
            ctl.finish_send(
                &pending.session_id,
                Ok(QueryResponse {
                    answer: "Found 231 purchases.".to_string(),
                    data: None,
                    query_used: None,
                }),
            );
        }

        let restored = ConversationController::new(repo());
        assert_eq!(restored.store().sessions().len(), 2);
        // Head of the ordered list becomes current again
        assert_eq!(restored.current_id(), first_current);
        assert_eq!(restored.current_session().messages.len(), 3);
    }
}
