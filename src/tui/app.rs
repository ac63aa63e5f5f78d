use crate::constants::EXAMPLE_QUESTIONS;
use crate::session::ConversationController;

/// Input focus for the chat screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Typing into the input line
    Insert,
    /// Navigating the session sidebar and scrollback
    Normal,
}

/// UI state wrapped around the conversation controller.
///
/// Everything that mutates sessions goes through the controller; this
/// struct only holds presentation concerns (focus, scroll, sidebar).
pub struct TuiApp {
    pub controller: ConversationController,
    pub mode: Mode,
    pub running: bool,
    /// Lines scrolled up from the bottom of the transcript
    pub scroll_offset: u16,
    pub show_sidebar: bool,
    /// Highlighted row in the session list
    pub sidebar_selected: usize,
}

impl TuiApp {
    pub fn new(controller: ConversationController, show_sidebar: bool) -> Self {
        Self {
            controller,
            mode: Mode::Insert,
            running: true,
            scroll_offset: 0,
            show_sidebar,
            sidebar_selected: 0,
        }
    }

    /// Example questions are offered while the current session only
    /// holds the greeting
    pub fn show_examples(&self) -> bool {
        self.controller.current_session().messages.len() == 1
    }

    /// Fill the input line with one of the example questions
    pub fn use_example(&mut self, index: usize) {
        if self.show_examples() {
            if let Some(question) = EXAMPLE_QUESTIONS.get(index) {
                self.controller.set_input(*question);
                self.mode = Mode::Insert;
            }
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.show_sidebar = !self.show_sidebar;
    }

    /// Move the sidebar highlight, clamped to the session list
    pub fn sidebar_move(&mut self, delta: isize) {
        let len = self.controller.store().sessions().len();
        if len == 0 {
            self.sidebar_selected = 0;
            return;
        }

        let selected = self.sidebar_selected as isize + delta;
        self.sidebar_selected = selected.clamp(0, len as isize - 1) as usize;
    }

    /// Id of the session under the sidebar highlight
    pub fn sidebar_selected_id(&self) -> Option<String> {
        self.controller
            .store()
            .sessions()
            .get(self.sidebar_selected)
            .map(|s| s.id.clone())
    }

    /// Switch to the highlighted session
    pub fn select_highlighted(&mut self) {
        if let Some(id) = self.sidebar_selected_id() {
            self.controller.select_session(&id);
            self.scroll_offset = 0;
        }
    }

    /// Delete the highlighted session and keep the highlight in range
    pub fn delete_highlighted(&mut self) {
        if let Some(id) = self.sidebar_selected_id() {
            self.controller.delete_session(&id);
            self.sidebar_move(0);
        }
    }

    /// Start a fresh conversation and jump to it
    pub fn new_chat(&mut self) {
        self.controller.new_chat();
        self.sidebar_selected = 0;
        self.scroll_offset = 0;
        self.mode = Mode::Insert;
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }

    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySnapshotRepository;

    fn app() -> TuiApp {
        let controller = ConversationController::new(Box::new(MemorySnapshotRepository::new()));
        TuiApp::new(controller, true)
    }

    #[test]
    fn test_examples_offered_only_with_bare_greeting() {
        let mut app = app();
        assert!(app.show_examples());

        app.use_example(1);
        assert_eq!(app.controller.input(), EXAMPLE_QUESTIONS[1]);

        let pending = app.controller.begin_send().unwrap();
        app.controller.finish_send(
            &pending.session_id,
            Err(crate::utils::GatewayError::Api {
                status: 500,
                message: "down".to_string(),
            }),
        );
        assert!(!app.show_examples());
    }

    #[test]
    fn test_sidebar_selection_clamps() {
        let mut app = app();
        app.new_chat();
        app.new_chat();

        app.sidebar_move(-5);
        assert_eq!(app.sidebar_selected, 0);

        app.sidebar_move(10);
        assert_eq!(app.sidebar_selected, 2);
    }

    #[test]
    fn test_delete_highlighted_keeps_selection_in_range() {
        let mut app = app();
        app.new_chat();
        app.sidebar_move(10); // highlight the last of 2 sessions
        assert_eq!(app.sidebar_selected, 1);

        app.delete_highlighted();
        assert_eq!(app.sidebar_selected, 0);
        assert_eq!(app.controller.store().sessions().len(), 1);
    }
}
