// Notes store - one free-text note per problem, language-independent
//
// Notes save on every edit event rather than through the debouncer, so
// navigating away immediately after typing can never lose them.

use crate::session::store::KvStore;
use crate::session::{ProblemId, StorageKey};

pub struct NotesStore {
    store: KvStore,
}

impl NotesStore {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    /// Saved note for the problem, empty string if none
    pub fn load(&self, problem: ProblemId) -> String {
        self.store
            .get(&StorageKey::Notes(problem))
            .unwrap_or_default()
    }

    pub fn save(&self, problem: ProblemId, text: &str) {
        self.store.set(&StorageKey::Notes(problem), text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_note_loads_empty() {
        let notes = NotesStore::new(KvStore::in_memory());
        assert_eq!(notes.load(ProblemId(1)), "");
    }

    #[test]
    fn save_then_load_roundtrip() {
        let notes = NotesStore::new(KvStore::in_memory());
        notes.save(ProblemId(1), "two pointers from both ends");
        notes.save(ProblemId(2), "memoize on (i, j)");

        assert_eq!(notes.load(ProblemId(1)), "two pointers from both ends");
        assert_eq!(notes.load(ProblemId(2)), "memoize on (i, j)");
    }
}
