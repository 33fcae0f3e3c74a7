// TUI application state
//
// Holds the session controller, the judge client and everything the
// renderer needs: which screen is visible, fetched catalog data, the
// three editable areas and the console. All persistent state lives in
// the session core; this struct can be thrown away at any time.

use super::editor::{CodeArea, EditSurface};
use super::modal::Modal;
use super::theme::Tone;
use crate::api::models::{Card, ProblemDetail, ProblemSummary, RunRequest, SubmitRequest};
use crate::api::{JudgeClient, SearchQuery};
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::session::store::KvStore;
use crate::session::{ConsolePane, ReturnView, SessionController, SessionError, Tab};
use std::time::Instant;

/// Topic filters offered on the dashboard, mirroring the judge's tags
pub const TOPICS: [&str; 10] = [
    "array",
    "map",
    "two_pointers",
    "string",
    "dp",
    "tree",
    "graph",
    "binary_search",
    "maths",
    "recursion",
];

/// Screens the client can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    List,
    Editor,
}

impl View {
    /// Display name for the status bar
    pub fn name(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::List => "Problems",
            View::Editor => "Editor",
        }
    }
}

/// Which editable area receives plain keystrokes in the editor view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Code,
    Notes,
    Input,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Code => Focus::Notes,
            Focus::Notes => Focus::Input,
            Focus::Input => Focus::Code,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Focus::Code => "code",
            Focus::Notes => "notes",
            Focus::Input => "input",
        }
    }
}

/// Inline input modes on the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Free-text search, buffer typed so far
    Search(String),
    /// Topic picker, digit selects from TOPICS
    Topic,
}

/// Console output with a display tone
#[derive(Debug, Clone, Default)]
pub struct ConsoleOutput {
    pub text: String,
    pub tone: Tone,
}

impl ConsoleOutput {
    fn message(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

pub struct App {
    pub config: Config,
    pub client: JudgeClient,
    pub session: SessionController,
    pub log_buffer: LogBuffer,
    pub should_quit: bool,

    pub view: View,
    pub modal: Option<Modal>,
    /// Transient status-bar notice (network errors, degraded storage)
    pub notice: Option<String>,

    // Dashboard state
    pub cards: Vec<Card>,
    pub selected_card: usize,
    pub prompt: Option<Prompt>,

    // Problem list state
    pub problems: Vec<ProblemSummary>,
    pub list_title: String,
    pub selected_problem: usize,

    // Editor state
    pub detail: Option<ProblemDetail>,
    pub code: CodeArea,
    pub notes: CodeArea,
    pub custom_input: CodeArea,
    pub focus: Focus,
    pub console: ConsoleOutput,
    /// Set when an autosave flushed, for the status-bar "saved" flash
    pub last_autosave: Option<Instant>,
}

impl App {
    pub fn new(config: Config, log_buffer: LogBuffer, store: KvStore) -> Self {
        let client = JudgeClient::new(config.judge_url.clone());
        // The TUI gates the destructive reset behind its own modal, so
        // the injected capability answers yes; tests inject real gates.
        let session = SessionController::new(
            store,
            config.default_language,
            config.autosave_delay,
            Box::new(|_| true),
        );

        Self {
            config,
            client,
            session,
            log_buffer,
            should_quit: false,
            view: View::Dashboard,
            modal: None,
            notice: None,
            cards: Vec::new(),
            selected_card: 0,
            prompt: None,
            problems: Vec::new(),
            list_title: String::new(),
            selected_problem: 0,
            detail: None,
            code: CodeArea::new(),
            notes: CodeArea::new(),
            custom_input: CodeArea::new(),
            focus: Focus::Code,
            console: ConsoleOutput::default(),
            last_autosave: None,
        }
    }

    // ── Periodic work ────────────────────────────────────────────────

    /// Tick from the event loop: drives the autosave deadline and pulls
    /// the one-shot storage notice.
    pub fn on_tick(&mut self) {
        let now = Instant::now();
        if self.session.tick(now) {
            self.last_autosave = Some(now);
        }
        if let Some(notice) = self.session.storage_notice() {
            tracing::warn!("{}", notice);
            self.notice = Some(notice.to_string());
        }
    }

    // ── Navigation actions ───────────────────────────────────────────

    pub async fn load_dashboard(&mut self) {
        match self.client.cards().await {
            Ok(cards) => {
                self.session.record_list_view(ReturnView::Dashboard);
                self.selected_card = self.selected_card.min(cards.len().saturating_sub(1));
                self.cards = cards;
                self.view = View::Dashboard;
                self.notice = None;
            }
            Err(e) => self.report_error("load dashboard", e),
        }
    }

    pub async fn open_selected_card(&mut self) {
        let Some(card) = self.cards.get(self.selected_card) else {
            return;
        };
        let (id, title) = (card.id, card.title.clone());
        match self.client.card_questions(id).await {
            Ok(problems) => self.enter_list(title, problems),
            Err(e) => self.report_error("load card", e),
        }
    }

    pub async fn run_search(&mut self, query: SearchQuery) {
        match self.client.search(&query).await {
            Ok(problems) => self.enter_list(query.title(), problems),
            Err(e) => self.report_error("search", e),
        }
    }

    fn enter_list(&mut self, title: String, problems: Vec<ProblemSummary>) {
        self.session.record_list_view(ReturnView::List);
        self.list_title = title;
        self.problems = problems;
        self.selected_problem = 0;
        self.view = View::List;
        self.notice = None;
    }

    /// Fetch and open the selected problem. A failed fetch reports and
    /// leaves both the view and the session state untouched.
    pub async fn open_selected_problem(&mut self) {
        let Some(summary) = self.problems.get(self.selected_problem) else {
            return;
        };
        let id = summary.id;

        let detail = match self.client.question(id).await {
            Ok(detail) => detail,
            Err(e) => {
                self.report_error("load problem", e);
                return;
            }
        };

        match self.session.open_problem(id, detail.boilerplate_set()) {
            Ok(opened) => {
                self.code.load(&opened.buffer, opened.language);
                self.notes.load(&opened.notes, opened.language);
                self.custom_input.load("", opened.language);
                self.console = ConsoleOutput::default();
                self.focus = Focus::Code;
                self.detail = Some(detail);
                self.view = View::Editor;
                self.notice = None;
            }
            Err(e) => self.report_error("open problem", e),
        }
    }

    /// Leave the editor toward wherever the user came from
    pub async fn go_back(&mut self) {
        match self.session.go_back() {
            ReturnView::Dashboard => self.load_dashboard().await,
            ReturnView::List => self.view = View::List,
        }
        self.detail = None;
    }

    // ── Editor actions ───────────────────────────────────────────────

    /// Route a content change out of the focused area into the core
    pub fn on_content_changed(&mut self) {
        let result = match self.focus {
            Focus::Code => self
                .session
                .on_edit(Instant::now(), &self.code.contents()),
            Focus::Notes => self.session.on_notes_edit(&self.notes.contents()),
            // The custom input pane is scratch space, never persisted
            Focus::Input => Ok(()),
        };
        if let Err(e) = result {
            tracing::error!("Edit event rejected: {}", e);
        }
    }

    pub fn cycle_language(&mut self) {
        let next = self.session.current_language().next();
        match self.session.switch_language(next) {
            Ok(buffer) => {
                self.code.load(&buffer, next);
            }
            Err(SessionError::MissingBoilerplate(language)) => {
                self.console = ConsoleOutput::message(
                    format!("No boilerplate code found for {language}."),
                    Tone::Warning,
                );
            }
            Err(e) => self.report_error("switch language", e),
        }
    }

    pub fn cycle_tab(&mut self) {
        let next = self.session.current_tab().next();
        self.session.switch_tab(next);
        // Typing follows the tab: the notes tab edits notes. The area is
        // refreshed from the store, which is authoritative for notes.
        self.focus = if next == Tab::Notes {
            let notes = self.session.current_notes();
            let language = self.session.current_language();
            self.notes.load(&notes, language);
            Focus::Notes
        } else {
            Focus::Code
        };
    }

    pub fn toggle_console_pane(&mut self) {
        let next = self.session.current_pane().toggle();
        self.session.switch_console_pane(next);
        self.focus = if next == ConsolePane::Input {
            Focus::Input
        } else {
            Focus::Code
        };
    }

    /// Confirmed reset from the modal: restore boilerplate and reload
    /// the editing surface.
    pub fn apply_reset(&mut self) {
        match self.session.reset_buffer() {
            Ok(Some(content)) => {
                let language = self.session.current_language();
                self.code.load(&content, language);
                self.console =
                    ConsoleOutput::message("Code reset to boilerplate.", Tone::Warning);
            }
            Ok(None) => {}
            Err(SessionError::MissingBoilerplate(language)) => {
                self.console = ConsoleOutput::message(
                    format!("No boilerplate code found for {language}."),
                    Tone::Warning,
                );
            }
            Err(e) => self.report_error("reset buffer", e),
        }
    }

    // ── Judge actions ────────────────────────────────────────────────

    /// Submit the active buffer against the problem's test cases
    pub async fn submit(&mut self) {
        let Some(problem) = self.session.current_problem() else {
            return;
        };
        self.session.switch_console_pane(ConsolePane::Output);
        self.console = ConsoleOutput::message("Running tests...", Tone::Normal);

        let request = SubmitRequest {
            question_id: problem,
            language: self.session.current_language(),
            code: self.code.contents(),
        };

        match self.client.submit(&request).await {
            Ok(result) => {
                if let Err(e) = self.session.record_submission_outcome(result.accepted()) {
                    tracing::error!("Could not record submission outcome: {}", e);
                }
                self.console = if result.accepted() {
                    ConsoleOutput::message(
                        format!(
                            "Accepted!\nTime: {}ms\nPassed: {}/{}",
                            result.runtime, result.total_passed, result.total_tests
                        ),
                        Tone::Success,
                    )
                } else {
                    let mut text = format!(
                        "{}\nPassed: {}/{}\n",
                        result.status, result.total_passed, result.total_tests
                    );
                    if let Some(case) = result.first_failure() {
                        text.push_str(&format!(
                            "\n[Case {} Failed]\nExpected:\n{}\nActual:\n{}",
                            case.test_case, case.expected, case.actual
                        ));
                    }
                    ConsoleOutput::message(text, Tone::Error)
                };
            }
            Err(e) => {
                self.console = ConsoleOutput::message("Server Error", Tone::Error);
                tracing::error!("Submit failed: {}", e);
            }
        }
    }

    /// Run the active buffer against the custom input pane
    pub async fn run_custom(&mut self) {
        if self.session.current_problem().is_none() {
            return;
        }
        self.session.switch_console_pane(ConsolePane::Output);
        self.focus = Focus::Code;
        self.console = ConsoleOutput::message("Running...", Tone::Normal);

        let request = RunRequest {
            language: self.session.current_language(),
            code: self.code.contents(),
            input_data: self.custom_input.contents(),
        };

        match self.client.run(&request).await {
            Ok(result) => {
                let tone = if result.is_error {
                    Tone::Error
                } else {
                    Tone::Normal
                };
                self.console = ConsoleOutput::message(result.output, tone);
            }
            Err(e) => {
                self.console = ConsoleOutput::message("Error", Tone::Error);
                tracing::error!("Run failed: {}", e);
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// The area plain keystrokes currently edit
    pub fn focused_area(&mut self) -> &mut CodeArea {
        match self.focus {
            Focus::Code => &mut self.code,
            Focus::Notes => &mut self.notes,
            Focus::Input => &mut self.custom_input,
        }
    }

    pub fn select_next(&mut self) {
        match self.view {
            View::Dashboard => {
                if self.selected_card + 1 < self.cards.len() {
                    self.selected_card += 1;
                }
            }
            View::List => {
                if self.selected_problem + 1 < self.problems.len() {
                    self.selected_problem += 1;
                }
            }
            View::Editor => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.view {
            View::Dashboard => self.selected_card = self.selected_card.saturating_sub(1),
            View::List => self.selected_problem = self.selected_problem.saturating_sub(1),
            View::Editor => {}
        }
    }

    fn report_error(&mut self, operation: &str, e: SessionError) {
        if e.is_recoverable() {
            tracing::warn!("Failed to {}: {}", operation, e);
        } else {
            tracing::error!("Failed to {}: {}", operation, e);
        }
        self.notice = Some(format!("Failed to {operation}: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Config::default(), LogBuffer::new(), KvStore::in_memory())
    }

    #[test]
    fn selection_is_clamped_to_list_bounds() {
        let mut a = app();
        a.view = View::List;
        a.problems = vec![];
        a.select_next();
        assert_eq!(a.selected_problem, 0);

        a.problems = vec![
            ProblemSummary {
                id: crate::session::ProblemId(1),
                title: "A".into(),
                difficulty: "Easy".into(),
                tags: vec![],
            },
            ProblemSummary {
                id: crate::session::ProblemId(2),
                title: "B".into(),
                difficulty: "Hard".into(),
                tags: vec![],
            },
        ];
        a.select_next();
        a.select_next();
        assert_eq!(a.selected_problem, 1);
        a.select_prev();
        a.select_prev();
        assert_eq!(a.selected_problem, 0);
    }

    #[test]
    fn tab_cycle_moves_focus_to_notes() {
        let mut a = app();
        // Description -> Hints -> Solution -> Notes
        a.cycle_tab();
        a.cycle_tab();
        a.cycle_tab();
        assert_eq!(a.session.current_tab(), Tab::Notes);
        assert_eq!(a.focus, Focus::Notes);

        a.cycle_tab();
        assert_eq!(a.focus, Focus::Code);
    }

    #[test]
    fn console_pane_toggle_moves_focus() {
        let mut a = app();
        a.toggle_console_pane();
        assert_eq!(a.session.current_pane(), ConsolePane::Input);
        assert_eq!(a.focus, Focus::Input);
        a.toggle_console_pane();
        assert_eq!(a.focus, Focus::Code);
    }
}
