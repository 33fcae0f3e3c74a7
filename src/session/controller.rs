// Session controller - the top-level state machine of the client
//
// Owns the session state (active problem, tab, console pane, return
// view) and the persistence-backed components, and exposes the
// operations the view layer invokes. All state that used to live in
// ambient globals in older clients is a field here; the view layer holds
// a controller instance and nothing else.
//
// Navigation operations (open, switch language, back) flush any pending
// autosave synchronously first, so the debounce window never costs the
// user their last second of typing.

use crate::session::autosave::AutosaveDebouncer;
use crate::session::buffers::BufferCache;
use crate::session::notes::NotesStore;
use crate::session::progress::{ProblemStatus, ProgressTracker};
use crate::session::store::KvStore;
use crate::session::{
    BoilerplateSet, ConsolePane, Language, ProblemId, Result, ReturnView, SessionError, Tab,
};
use std::time::{Duration, Instant};

/// Confirmation capability for destructive operations, injected so the
/// reset path is testable without a terminal.
pub type Confirm = Box<dyn FnMut(&str) -> bool>;

/// Everything the view layer needs to render a freshly opened problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedProblem {
    pub language: Language,
    pub buffer: String,
    pub notes: String,
}

/// Navigation state. Never persisted; every process start begins at
/// (no problem, Description, Output, Dashboard).
#[derive(Debug, Clone, Copy, Default)]
struct SessionState {
    problem: Option<ProblemId>,
    language: Language,
    tab: Tab,
    pane: ConsolePane,
    return_view: ReturnView,
}

pub struct SessionController {
    state: SessionState,
    store: KvStore,
    buffers: BufferCache,
    notes: NotesStore,
    progress: ProgressTracker,
    autosave: AutosaveDebouncer,
    boilerplate: BoilerplateSet,
    default_language: Language,
    confirm: Confirm,
}

impl SessionController {
    pub fn new(
        store: KvStore,
        default_language: Language,
        autosave_delay: Duration,
        confirm: Confirm,
    ) -> Self {
        Self {
            state: SessionState::default(),
            buffers: BufferCache::new(store.clone()),
            notes: NotesStore::new(store.clone()),
            progress: ProgressTracker::new(store.clone()),
            store,
            autosave: AutosaveDebouncer::new(autosave_delay),
            boilerplate: BoilerplateSet::new(),
            default_language,
            confirm,
        }
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Activate a problem. The problem detail (and its boilerplate set)
    /// has already been fetched by the caller; a failed fetch never
    /// reaches this method, so the session state cannot be left
    /// half-transitioned.
    pub fn open_problem(
        &mut self,
        problem: ProblemId,
        boilerplate: BoilerplateSet,
    ) -> Result<OpenedProblem> {
        self.flush_pending();

        // Materialize the buffer before touching any state, so a missing
        // boilerplate leaves the session exactly where it was
        let language = self.default_language;
        let buffer = self
            .buffers
            .resolve_initial(problem, language, &boilerplate)?;
        let notes = self.notes.load(problem);

        self.boilerplate = boilerplate;
        self.state.problem = Some(problem);
        self.state.language = language;
        self.state.tab = Tab::Description;
        self.state.pane = ConsolePane::Output;

        tracing::debug!("Opened problem {} ({})", problem, language);
        Ok(OpenedProblem {
            language,
            buffer,
            notes,
        })
    }

    /// Switch the editing surface to another language's buffer.
    /// Returns the buffer content to load into the surface.
    pub fn switch_language(&mut self, language: Language) -> Result<String> {
        let problem = self.require_problem("switch language")?;
        self.flush_pending();

        let buffer = self
            .buffers
            .resolve_initial(problem, language, &self.boilerplate)?;
        self.state.language = language;
        Ok(buffer)
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.state.tab = tab;
    }

    pub fn switch_console_pane(&mut self, pane: ConsolePane) {
        self.state.pane = pane;
    }

    /// Record which list view the user is on, for `go_back`
    pub fn record_list_view(&mut self, view: ReturnView) {
        self.state.return_view = view;
    }

    /// Leave the editor. Flushes pending work, deactivates the problem
    /// and tells the caller which list view to return to - the only
    /// transition whose target depends on history.
    pub fn go_back(&mut self) -> ReturnView {
        self.flush_pending();
        self.state.problem = None;
        self.state.return_view
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// An edit event from the editing surface. Schedules a debounced
    /// save capturing the active pair and the content right now.
    pub fn on_edit(&mut self, now: Instant, content: &str) -> Result<()> {
        let problem = self.require_problem("edit")?;
        self.autosave
            .schedule(now, problem, self.state.language, content.to_string());
        Ok(())
    }

    /// A notes edit. Saved immediately, not debounced, so rapid
    /// navigation away cannot lose notes.
    pub fn on_notes_edit(&mut self, text: &str) -> Result<()> {
        let problem = self.require_problem("edit notes")?;
        self.notes.save(problem, text);
        Ok(())
    }

    /// Periodic tick from the event loop. Flushes a due autosave;
    /// returns true when something was persisted.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.autosave.poll(now) {
            Some(save) => {
                self.buffers.write(save.problem, save.language, &save.content);
                true
            }
            None => false,
        }
    }

    /// Confirm-gated reset of the active buffer to its boilerplate.
    /// Returns `Ok(None)` when the user declines. A pending autosave for
    /// the pair is dropped, not flushed - its content is exactly what
    /// the user asked to discard.
    pub fn reset_buffer(&mut self) -> Result<Option<String>> {
        let problem = self.require_problem("reset buffer")?;

        if !(self.confirm)("Reset code to default? This will lose your current changes.") {
            return Ok(None);
        }

        self.autosave.cancel();
        let content =
            self.buffers
                .reset_to_boilerplate(problem, self.state.language, &self.boilerplate)?;
        tracing::info!("Buffer reset to boilerplate for problem {}", problem);
        Ok(Some(content))
    }

    // ── Submissions ──────────────────────────────────────────────────

    /// Fold a submission verdict into the progress sets
    pub fn record_submission_outcome(&mut self, accepted: bool) -> Result<()> {
        let problem = self.require_problem("record submission")?;
        if accepted {
            self.progress.mark_solved(problem);
        } else {
            self.progress.mark_attempted(problem);
        }
        Ok(())
    }

    // ── Read accessors ───────────────────────────────────────────────

    pub fn current_problem(&self) -> Option<ProblemId> {
        self.state.problem
    }

    pub fn current_language(&self) -> Language {
        self.state.language
    }

    pub fn current_tab(&self) -> Tab {
        self.state.tab
    }

    pub fn current_pane(&self) -> ConsolePane {
        self.state.pane
    }

    /// Persisted (or boilerplate) content for the active pair. The
    /// bundled TUI keeps its own surface copy; this is the read surface
    /// for hosts that do not.
    #[allow(dead_code)]
    pub fn current_buffer(&self) -> Result<String> {
        let problem = self.require_problem("read buffer")?;
        self.buffers
            .resolve_initial(problem, self.state.language, &self.boilerplate)
    }

    pub fn current_status(&self, problem: ProblemId) -> ProblemStatus {
        self.progress.status(problem)
    }

    /// Notes of the active problem, empty when none is active
    pub fn current_notes(&self) -> String {
        match self.state.problem {
            Some(problem) => self.notes.load(problem),
            None => String::new(),
        }
    }

    /// (solved, attempted) counts for list headers
    pub fn progress_counts(&self) -> (usize, usize) {
        self.progress.counts()
    }

    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    /// One-shot degraded-storage notice for the status bar
    pub fn storage_notice(&mut self) -> Option<&'static str> {
        if self.store.take_degraded_notice() {
            Some("storage unavailable - work is kept in memory only")
        } else {
            None
        }
    }

    /// Whether persistence has fallen back to memory, for the
    /// permanent status-bar indicator
    pub fn storage_degraded(&self) -> bool {
        self.store.is_degraded()
    }

    // ── Internals ────────────────────────────────────────────────────

    fn flush_pending(&mut self) {
        if let Some(save) = self.autosave.take() {
            self.buffers.write(save.problem, save.language, &save.content);
        }
    }

    fn require_problem(&self, operation: &str) -> Result<ProblemId> {
        self.state
            .problem
            .ok_or_else(|| SessionError::InvalidState(format!("{operation}: no active problem")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);

    fn boilerplate() -> BoilerplateSet {
        let mut set = BoilerplateSet::new();
        set.insert(Language::Python, "pass".to_string());
        set.insert(Language::Javascript, "console.log(1)".to_string());
        set
    }

    fn controller() -> SessionController {
        SessionController::new(
            KvStore::in_memory(),
            Language::Python,
            DELAY,
            Box::new(|_| true),
        )
    }

    #[test]
    fn session_starts_on_description_and_output() {
        let c = controller();
        assert_eq!(c.current_problem(), None);
        assert_eq!(c.current_language(), Language::Python);
        assert_eq!(c.current_tab(), Tab::Description);
        assert_eq!(c.current_pane(), ConsolePane::Output);
    }

    #[test]
    fn open_problem_resets_tab_and_pane() {
        let mut c = controller();
        c.switch_tab(Tab::Solution);
        c.switch_console_pane(ConsolePane::Input);

        let opened = c.open_problem(ProblemId(42), boilerplate()).unwrap();

        assert_eq!(opened.buffer, "pass");
        assert_eq!(opened.language, Language::Python);
        assert_eq!(c.current_problem(), Some(ProblemId(42)));
        assert_eq!(c.current_tab(), Tab::Description);
        assert_eq!(c.current_pane(), ConsolePane::Output);
    }

    #[test]
    fn open_problem_without_boilerplate_leaves_state_unchanged() {
        let mut c = controller();
        c.open_problem(ProblemId(1), boilerplate()).unwrap();
        c.switch_tab(Tab::Hints);

        // Problem 2 ships no boilerplate at all for the default language
        let err = c.open_problem(ProblemId(2), BoilerplateSet::new());

        assert!(matches!(err, Err(SessionError::MissingBoilerplate(_))));
        assert_eq!(c.current_problem(), Some(ProblemId(1)));
        assert_eq!(c.current_tab(), Tab::Hints);
    }

    #[test]
    fn typed_code_persists_after_debounce() {
        let mut c = controller();
        let t0 = Instant::now();

        c.open_problem(ProblemId(42), boilerplate()).unwrap();
        c.on_edit(t0, "print(1)").unwrap();

        assert!(!c.tick(t0 + DELAY - Duration::from_millis(1)));
        assert!(c.tick(t0 + DELAY));
        assert_eq!(c.current_buffer().unwrap(), "print(1)");
    }

    #[test]
    fn language_switch_mid_window_flushes_under_original_pair() {
        let mut c = controller();
        let t0 = Instant::now();

        c.open_problem(ProblemId(42), boilerplate()).unwrap();
        c.on_edit(t0, "print(1)").unwrap();

        // Switch before the debounce fires: the pending python save is
        // flushed synchronously, then the javascript buffer materializes
        let js = c.switch_language(Language::Javascript).unwrap();
        assert_eq!(js, "console.log(1)");
        assert!(!c.autosave_pending());

        // Nothing left for the timer, and the python work is intact
        assert!(!c.tick(t0 + DELAY));
        let py = c.switch_language(Language::Python).unwrap();
        assert_eq!(py, "print(1)");
    }

    #[test]
    fn switch_language_requires_active_problem() {
        let mut c = controller();
        assert!(matches!(
            c.switch_language(Language::Java),
            Err(SessionError::InvalidState(_))
        ));
    }

    #[test]
    fn switch_to_language_without_boilerplate_keeps_current_language() {
        let mut c = controller();
        c.open_problem(ProblemId(42), boilerplate()).unwrap();

        assert!(c.switch_language(Language::Java).is_err());
        assert_eq!(c.current_language(), Language::Python);
    }

    #[test]
    fn go_back_flushes_and_reports_return_view() {
        let mut c = controller();
        let t0 = Instant::now();

        c.record_list_view(ReturnView::List);
        c.open_problem(ProblemId(42), boilerplate()).unwrap();
        c.on_edit(t0, "print(2)").unwrap();

        assert_eq!(c.go_back(), ReturnView::List);
        assert_eq!(c.current_problem(), None);

        // The sub-second edit was not lost to the debounce window
        c.open_problem(ProblemId(42), boilerplate()).unwrap();
        assert_eq!(c.current_buffer().unwrap(), "print(2)");
    }

    #[test]
    fn accepted_submission_marks_solved_and_stays_solved() {
        let mut c = controller();
        c.open_problem(ProblemId(42), boilerplate()).unwrap();

        c.record_submission_outcome(true).unwrap();
        assert_eq!(c.current_status(ProblemId(42)), ProblemStatus::Solved);

        // A later Wrong Answer must not downgrade
        c.record_submission_outcome(false).unwrap();
        assert_eq!(c.current_status(ProblemId(42)), ProblemStatus::Solved);
    }

    #[test]
    fn rejected_submission_marks_attempted() {
        let mut c = controller();
        c.open_problem(ProblemId(7), boilerplate()).unwrap();
        c.record_submission_outcome(false).unwrap();
        assert_eq!(c.current_status(ProblemId(7)), ProblemStatus::Attempted);
    }

    #[test]
    fn reset_honors_declined_confirmation() {
        let mut c = SessionController::new(
            KvStore::in_memory(),
            Language::Python,
            DELAY,
            Box::new(|_| false),
        );
        let t0 = Instant::now();

        c.open_problem(ProblemId(42), boilerplate()).unwrap();
        c.on_edit(t0, "print(1)").unwrap();
        c.tick(t0 + DELAY);

        assert_eq!(c.reset_buffer().unwrap(), None);
        assert_eq!(c.current_buffer().unwrap(), "print(1)");
    }

    #[test]
    fn confirmed_reset_discards_work_and_pending_saves() {
        let mut c = controller();
        let t0 = Instant::now();

        c.open_problem(ProblemId(42), boilerplate()).unwrap();
        c.on_edit(t0, "print(1)").unwrap();
        c.tick(t0 + DELAY);

        // More typing, still pending when the user resets
        c.on_edit(t0 + DELAY, "print(2)").unwrap();

        let restored = c.reset_buffer().unwrap();
        assert_eq!(restored.as_deref(), Some("pass"));

        // The pending "print(2)" must not resurface after the reset
        assert!(!c.tick(t0 + DELAY + DELAY));
        assert_eq!(c.current_buffer().unwrap(), "pass");
    }

    #[test]
    fn notes_save_immediately_and_follow_the_problem() {
        let mut c = controller();

        c.open_problem(ProblemId(1), boilerplate()).unwrap();
        c.on_notes_edit("sliding window").unwrap();

        c.open_problem(ProblemId(2), boilerplate()).unwrap();
        assert_eq!(c.current_notes(), "");

        let reopened = c.open_problem(ProblemId(1), boilerplate()).unwrap();
        assert_eq!(reopened.notes, "sliding window");
    }

    #[test]
    fn edit_without_problem_is_invalid_state() {
        let mut c = controller();
        assert!(matches!(
            c.on_edit(Instant::now(), "x"),
            Err(SessionError::InvalidState(_))
        ));
        assert!(matches!(
            c.on_notes_edit("x"),
            Err(SessionError::InvalidState(_))
        ));
        assert!(matches!(
            c.record_submission_outcome(true),
            Err(SessionError::InvalidState(_))
        ));
    }

    #[test]
    fn buffers_survive_controller_restarts() {
        let store = KvStore::in_memory();
        let t0 = Instant::now();

        {
            let mut c = SessionController::new(
                store.clone(),
                Language::Python,
                DELAY,
                Box::new(|_| true),
            );
            c.open_problem(ProblemId(42), boilerplate()).unwrap();
            c.on_edit(t0, "print(1)").unwrap();
            c.tick(t0 + DELAY);
        }

        // A fresh controller over the same store: navigation state reset,
        // persisted work intact
        let mut c =
            SessionController::new(store, Language::Python, DELAY, Box::new(|_| true));
        assert_eq!(c.current_problem(), None);
        let opened = c.open_problem(ProblemId(42), boilerplate()).unwrap();
        assert_eq!(opened.buffer, "print(1)");
    }
}
