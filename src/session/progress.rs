// Progress tracker - solved/attempted membership over problem ids
//
// Two sets persisted as JSON integer arrays under stable keys. The
// invariant is disjointness with solved taking precedence: marking a
// problem solved removes it from attempted, and attempts against an
// already-solved problem are ignored. There is deliberately no un-solve
// operation; solved is append-only through this API.

use crate::session::store::KvStore;
use crate::session::{ProblemId, StorageKey};

/// Progress of a single problem, solved winning over attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProblemStatus {
    #[default]
    None,
    Attempted,
    Solved,
}

pub struct ProgressTracker {
    store: KvStore,
}

impl ProgressTracker {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    /// Record an accepted submission. Idempotent; clears any attempted
    /// marker so the sets stay disjoint.
    pub fn mark_solved(&self, problem: ProblemId) {
        let mut solved = self.load_set(StorageKey::SolvedIds);
        if !solved.contains(&problem) {
            solved.push(problem);
            self.save_set(StorageKey::SolvedIds, &solved);
        }

        let mut attempted = self.load_set(StorageKey::AttemptedIds);
        if attempted.contains(&problem) {
            attempted.retain(|id| *id != problem);
            self.save_set(StorageKey::AttemptedIds, &attempted);
        }
    }

    /// Record a rejected submission. Solved problems are never
    /// downgraded; otherwise an idempotent add to attempted.
    pub fn mark_attempted(&self, problem: ProblemId) {
        if self.load_set(StorageKey::SolvedIds).contains(&problem) {
            return;
        }
        let mut attempted = self.load_set(StorageKey::AttemptedIds);
        if !attempted.contains(&problem) {
            attempted.push(problem);
            self.save_set(StorageKey::AttemptedIds, &attempted);
        }
    }

    pub fn status(&self, problem: ProblemId) -> ProblemStatus {
        if self.load_set(StorageKey::SolvedIds).contains(&problem) {
            ProblemStatus::Solved
        } else if self.load_set(StorageKey::AttemptedIds).contains(&problem) {
            ProblemStatus::Attempted
        } else {
            ProblemStatus::None
        }
    }

    /// (solved, attempted) counts for the dashboard header
    pub fn counts(&self) -> (usize, usize) {
        (
            self.load_set(StorageKey::SolvedIds).len(),
            self.load_set(StorageKey::AttemptedIds).len(),
        )
    }

    fn load_set(&self, key: StorageKey) -> Vec<ProblemId> {
        let Some(raw) = self.store.get(&key) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(ids) => ids,
            Err(e) => {
                // A corrupt set is unusable; start fresh rather than crash
                tracing::warn!("Corrupt progress set under '{}': {}", key.render(), e);
                Vec::new()
            }
        }
    }

    fn save_set(&self, key: StorageKey, ids: &[ProblemId]) {
        match serde_json::to_string(ids) {
            Ok(json) => self.store.set(&key, &json),
            Err(e) => tracing::error!("Could not serialize progress set: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ProgressTracker {
        ProgressTracker::new(KvStore::in_memory())
    }

    #[test]
    fn solved_clears_attempted() {
        let t = tracker();
        let p = ProblemId(42);

        t.mark_attempted(p);
        assert_eq!(t.status(p), ProblemStatus::Attempted);

        t.mark_solved(p);
        assert_eq!(t.status(p), ProblemStatus::Solved);
        assert_eq!(t.counts(), (1, 0));
    }

    #[test]
    fn solved_is_sticky_against_later_attempts() {
        let t = tracker();
        let p = ProblemId(42);

        t.mark_solved(p);
        t.mark_attempted(p);
        assert_eq!(t.status(p), ProblemStatus::Solved);
        assert_eq!(t.counts(), (1, 0));
    }

    #[test]
    fn marking_is_idempotent() {
        let t = tracker();
        let p = ProblemId(9);

        t.mark_solved(p);
        t.mark_solved(p);
        assert_eq!(t.counts(), (1, 0));

        let q = ProblemId(10);
        t.mark_attempted(q);
        t.mark_attempted(q);
        assert_eq!(t.counts(), (1, 1));
    }

    #[test]
    fn unknown_problem_has_no_status() {
        assert_eq!(tracker().status(ProblemId(999)), ProblemStatus::None);
    }

    #[test]
    fn sets_use_legacy_json_layout() {
        let store = KvStore::in_memory();
        // Layout written by earlier clients: plain JSON integer arrays
        store.set(&StorageKey::SolvedIds, "[1,2,3]");

        let t = ProgressTracker::new(store);
        assert_eq!(t.status(ProblemId(2)), ProblemStatus::Solved);

        t.mark_solved(ProblemId(4));
        assert_eq!(t.counts(), (4, 0));
    }

    #[test]
    fn corrupt_set_is_treated_as_empty() {
        let store = KvStore::in_memory();
        store.set(&StorageKey::SolvedIds, "not json");

        let t = ProgressTracker::new(store);
        assert_eq!(t.status(ProblemId(1)), ProblemStatus::None);
    }
}
