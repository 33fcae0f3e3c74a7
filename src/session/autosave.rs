// Autosave debouncer - single-slot coalescing timer over edit events
//
// Every edit replaces the pending slot and pushes the deadline out by
// the full delay; only the most recent edit survives a burst. The
// (problem, language, content) triple is captured when the save is
// scheduled, not when it fires, so switching language or problem inside
// the debounce window can never file a buffer under the wrong key.
//
// Time is injected through `Instant` parameters. The component never
// reads the clock itself, which keeps the coalescing behavior testable
// without sleeping; the UI event loop calls `poll` from its tick.

use crate::session::{Language, ProblemId};
use std::time::{Duration, Instant};

/// A write captured at schedule time, waiting for its deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub problem: ProblemId,
    pub language: Language,
    pub content: String,
}

pub struct AutosaveDebouncer {
    delay: Duration,
    slot: Option<(Instant, PendingSave)>,
}

impl AutosaveDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, slot: None }
    }

    /// Schedule a save for the pair, replacing any pending one.
    /// Scheduling implicitly cancels the previous timer.
    pub fn schedule(
        &mut self,
        now: Instant,
        problem: ProblemId,
        language: Language,
        content: String,
    ) {
        let save = PendingSave {
            problem,
            language,
            content,
        };
        self.slot = Some((now + self.delay, save));
    }

    /// Take the pending save if its deadline has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<PendingSave> {
        match &self.slot {
            Some((deadline, _)) if *deadline <= now => self.slot.take().map(|(_, save)| save),
            _ => None,
        }
    }

    /// Drain the pending save immediately, deadline or not.
    /// Used to flush on navigation so data loss is bounded to zero.
    pub fn take(&mut self) -> Option<PendingSave> {
        self.slot.take().map(|(_, save)| save)
    }

    /// Drop the pending save without flushing it.
    /// Used by reset, where the pending content is exactly what the
    /// user asked to discard.
    pub fn cancel(&mut self) {
        self.slot = None;
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);

    fn debouncer() -> AutosaveDebouncer {
        AutosaveDebouncer::new(DELAY)
    }

    #[test]
    fn burst_of_edits_produces_one_flush_with_last_content() {
        let mut d = debouncer();
        let t0 = Instant::now();

        // Five edits, each inside the previous one's window
        for (i, text) in ["p", "pr", "pri", "prin", "print(1)"].iter().enumerate() {
            let at = t0 + Duration::from_millis(100 * i as u64);
            d.schedule(at, ProblemId(42), Language::Python, text.to_string());
            assert_eq!(d.poll(at), None);
        }

        let last_schedule = t0 + Duration::from_millis(400);

        // Still inside the final window: nothing flushes
        assert_eq!(d.poll(last_schedule + DELAY - Duration::from_millis(1)), None);

        // Window elapsed: exactly one flush with the final content
        let flushed = d.poll(last_schedule + DELAY).unwrap();
        assert_eq!(flushed.content, "print(1)");
        assert_eq!(d.poll(last_schedule + DELAY), None);
    }

    #[test]
    fn capture_happens_at_schedule_time() {
        let mut d = debouncer();
        let t0 = Instant::now();

        // Edit under python, then the user switches language mid-window;
        // the later schedule is a different pair and fully replaces the slot
        d.schedule(t0, ProblemId(42), Language::Python, "print(1)".into());
        d.schedule(
            t0 + Duration::from_millis(200),
            ProblemId(42),
            Language::Javascript,
            "console.log(1)".into(),
        );

        let flushed = d.poll(t0 + Duration::from_millis(200) + DELAY).unwrap();
        assert_eq!(flushed.language, Language::Javascript);
        assert_eq!(flushed.content, "console.log(1)");
    }

    #[test]
    fn take_drains_before_the_deadline() {
        let mut d = debouncer();
        let t0 = Instant::now();

        d.schedule(t0, ProblemId(7), Language::Java, "class A {}".into());
        assert!(d.is_pending());

        let flushed = d.take().unwrap();
        assert_eq!(flushed.problem, ProblemId(7));
        assert!(!d.is_pending());
        assert_eq!(d.poll(t0 + DELAY), None);
    }

    #[test]
    fn cancel_discards_without_flushing() {
        let mut d = debouncer();
        let t0 = Instant::now();

        d.schedule(t0, ProblemId(7), Language::Java, "doomed".into());
        d.cancel();
        assert_eq!(d.poll(t0 + DELAY), None);
        assert_eq!(d.take(), None);
    }

    #[test]
    fn empty_debouncer_never_flushes() {
        let mut d = debouncer();
        assert_eq!(d.poll(Instant::now() + DELAY), None);
        assert_eq!(d.take(), None);
    }
}
