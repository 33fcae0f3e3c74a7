// Keyed buffer cache - one code string per (problem, language) pair
//
// Read-through/write-back over the persistence store. Buffers are
// materialized lazily: `resolve_initial` prefers persisted user work and
// falls back to the problem's boilerplate, which is also the policy on
// problem open, language switch and explicit reset.

use crate::session::store::KvStore;
use crate::session::{BoilerplateSet, Language, ProblemId, Result, SessionError, StorageKey};

pub struct BufferCache {
    store: KvStore,
}

impl BufferCache {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    /// Persisted content for the pair, if the user ever wrote any
    pub fn read(&self, problem: ProblemId, language: Language) -> Option<String> {
        self.store.get(&StorageKey::Solution(problem, language))
    }

    /// Persist content for the pair, overwriting unconditionally
    pub fn write(&self, problem: ProblemId, language: Language, content: &str) {
        self.store
            .set(&StorageKey::Solution(problem, language), content);
    }

    /// Content to show when a buffer must be materialized: saved user
    /// work if present, the language's boilerplate otherwise.
    pub fn resolve_initial(
        &self,
        problem: ProblemId,
        language: Language,
        boilerplate: &BoilerplateSet,
    ) -> Result<String> {
        if let Some(saved) = self.read(problem, language) {
            return Ok(saved);
        }
        boilerplate
            .get(&language)
            .cloned()
            .ok_or(SessionError::MissingBoilerplate(language))
    }

    /// Discard saved work for the pair and restore the boilerplate.
    /// Destructive; callers gate this behind an explicit confirmation.
    pub fn reset_to_boilerplate(
        &self,
        problem: ProblemId,
        language: Language,
        boilerplate: &BoilerplateSet,
    ) -> Result<String> {
        let content = boilerplate
            .get(&language)
            .cloned()
            .ok_or(SessionError::MissingBoilerplate(language))?;
        self.write(problem, language, &content);
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boilerplate() -> BoilerplateSet {
        let mut set = BoilerplateSet::new();
        set.insert(Language::Python, "pass".to_string());
        set.insert(Language::Javascript, "console.log(1)".to_string());
        set
    }

    fn cache() -> BufferCache {
        BufferCache::new(KvStore::in_memory())
    }

    #[test]
    fn resolve_initial_prefers_saved_work() {
        let cache = cache();
        let p = ProblemId(42);

        assert_eq!(
            cache
                .resolve_initial(p, Language::Python, &boilerplate())
                .unwrap(),
            "pass"
        );

        cache.write(p, Language::Python, "print(1)");
        assert_eq!(
            cache
                .resolve_initial(p, Language::Python, &boilerplate())
                .unwrap(),
            "print(1)"
        );
    }

    #[test]
    fn resolve_initial_errors_without_boilerplate() {
        let cache = cache();
        let err = cache
            .resolve_initial(ProblemId(1), Language::Java, &boilerplate())
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::MissingBoilerplate(Language::Java)
        ));
    }

    #[test]
    fn buffers_are_independent_per_language() {
        let cache = cache();
        let p = ProblemId(42);

        cache.write(p, Language::Python, "print(1)");

        // Fresh javascript buffer falls back to its boilerplate...
        assert_eq!(
            cache
                .resolve_initial(p, Language::Javascript, &boilerplate())
                .unwrap(),
            "console.log(1)"
        );
        // ...and the python buffer is untouched
        assert_eq!(cache.read(p, Language::Python).as_deref(), Some("print(1)"));
    }

    #[test]
    fn reset_discards_saved_work() {
        let cache = cache();
        let p = ProblemId(42);

        cache.write(p, Language::Python, "print(1)");
        let restored = cache
            .reset_to_boilerplate(p, Language::Python, &boilerplate())
            .unwrap();

        assert_eq!(restored, "pass");
        assert_eq!(cache.read(p, Language::Python).as_deref(), Some("pass"));
    }

    #[test]
    fn reset_errors_without_boilerplate_and_keeps_buffer() {
        let cache = cache();
        let p = ProblemId(42);

        cache.write(p, Language::Java, "class Solution {}");
        assert!(cache
            .reset_to_boilerplate(p, Language::Java, &boilerplate())
            .is_err());
        assert_eq!(
            cache.read(p, Language::Java).as_deref(),
            Some("class Solution {}")
        );
    }
}
