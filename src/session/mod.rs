// Session core - state machine and persistence for the practice client
//
// Everything with a real invariant lives under this module: the key/value
// store, the per-(problem, language) buffer cache, the solved/attempted
// progress sets, per-problem notes, the autosave debouncer, and the
// session controller that orchestrates them. The TUI is a view layer over
// this module and holds no persistent state of its own.

pub mod autosave;
pub mod buffers;
pub mod controller;
pub mod error;
pub mod notes;
pub mod progress;
pub mod store;

pub use controller::{OpenedProblem, SessionController};
pub use error::{Result, SessionError};
pub use progress::ProblemStatus;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque identifier for a problem, assigned by the judge's catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ProblemId(pub u32);

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Languages the judge accepts. The string tokens are part of the wire
/// and storage contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
    Javascript,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Python, Language::Java, Language::Javascript];

    /// Wire/storage token for this language
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Java => "java",
            Language::Javascript => "javascript",
        }
    }

    /// Parse a language token. Unknown tokens are a data error, not a panic.
    pub fn parse(token: &str) -> Result<Self> {
        Language::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == token)
            .ok_or_else(|| SessionError::InvalidState(format!("unknown language '{token}'")))
    }

    /// Next language in the selector cycle
    pub fn next(self) -> Self {
        match self {
            Language::Python => Language::Java,
            Language::Java => Language::Javascript,
            Language::Javascript => Language::Python,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Python
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default starter code per language, delivered with each problem detail.
/// Replaced wholesale when a new problem is opened.
pub type BoilerplateSet = HashMap<Language, String>;

/// Content tabs of the editor view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Description,
    Hints,
    Solution,
    Notes,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Description, Tab::Hints, Tab::Solution, Tab::Notes];

    pub fn next(self) -> Self {
        match self {
            Tab::Description => Tab::Hints,
            Tab::Hints => Tab::Solution,
            Tab::Solution => Tab::Notes,
            Tab::Notes => Tab::Description,
        }
    }

    /// Display name for the tab bar
    pub fn name(&self) -> &'static str {
        match self {
            Tab::Description => "Description",
            Tab::Hints => "Hints",
            Tab::Solution => "Solution",
            Tab::Notes => "Notes",
        }
    }
}

/// Panes of the bottom console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsolePane {
    #[default]
    Output,
    Input,
}

impl ConsolePane {
    pub fn toggle(self) -> Self {
        match self {
            ConsolePane::Output => ConsolePane::Input,
            ConsolePane::Input => ConsolePane::Output,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConsolePane::Output => "Output",
            ConsolePane::Input => "Custom Input",
        }
    }
}

/// Which list the user navigated to the editor from, and therefore where
/// "back" returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnView {
    #[default]
    Dashboard,
    List,
}

/// Typed composite key for the persistence store.
///
/// Renders to the flat string layout the store has always used, so data
/// persisted by earlier versions keeps resolving:
/// `solution_{id}_{lang}`, `notes_{id}`, `solved_ids`, `attempted_ids`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    Solution(ProblemId, Language),
    Notes(ProblemId),
    SolvedIds,
    AttemptedIds,
}

impl StorageKey {
    pub fn render(&self) -> String {
        match self {
            StorageKey::Solution(problem, language) => {
                format!("solution_{}_{}", problem, language.as_str())
            }
            StorageKey::Notes(problem) => format!("notes_{problem}"),
            StorageKey::SolvedIds => "solved_ids".to_string(),
            StorageKey::AttemptedIds => "attempted_ids".to_string(),
        }
    }
}
