// Wire models for the judge API
//
// Shapes mirror what the judge actually serves. Fields the backend is
// known to omit on some responses carry serde defaults so a sparse
// payload deserializes instead of failing the whole screen.

use crate::session::{BoilerplateSet, Language, ProblemId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A curated problem collection shown on the dashboard
#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub question_count: u32,
}

/// One row of a problem list
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemSummary {
    pub id: ProblemId,
    pub title: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_difficulty() -> String {
    "Medium".to_string()
}

/// A worked example shown on the description tab
#[derive(Debug, Clone, Deserialize)]
pub struct Example {
    pub input: String,
    pub output: String,
}

/// Full problem payload for the editor view
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemDetail {
    pub id: ProblemId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub input_format: String,
    #[serde(default)]
    pub output_format: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub examples: Vec<Example>,
    /// Starter code keyed by language token
    #[serde(default)]
    pub boilerplate: HashMap<String, String>,
}

impl ProblemDetail {
    /// Boilerplate keyed by known languages. Tokens the client does not
    /// speak are skipped, not fatal - the judge may serve more languages
    /// than this client supports.
    pub fn boilerplate_set(&self) -> BoilerplateSet {
        let mut set = BoilerplateSet::new();
        for (token, code) in &self.boilerplate {
            match Language::parse(token) {
                Ok(language) => {
                    set.insert(language, code.clone());
                }
                Err(_) => {
                    tracing::debug!("Ignoring boilerplate for unknown language '{}'", token);
                }
            }
        }
        set
    }
}

/// Body for `POST /submit`
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    pub question_id: ProblemId,
    pub language: Language,
    pub code: String,
}

/// Per-test-case detail in a submission result
#[derive(Debug, Clone, Deserialize)]
pub struct CaseResult {
    #[serde(default)]
    pub test_case: u32,
    pub status: String,
    #[serde(default)]
    pub expected: String,
    #[serde(default)]
    pub actual: String,
}

impl CaseResult {
    pub fn failed(&self) -> bool {
        self.status == "Fail"
    }
}

/// Verdict for a full submission
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResult {
    pub status: String,
    #[serde(default)]
    pub runtime: f64,
    pub total_passed: u32,
    pub total_tests: u32,
    #[serde(default)]
    pub details: Vec<CaseResult>,
}

impl SubmitResult {
    pub fn accepted(&self) -> bool {
        self.status == "Accepted"
    }

    /// First failing case, used for the condensed console summary
    pub fn first_failure(&self) -> Option<&CaseResult> {
        self.details.iter().find(|d| d.failed())
    }
}

/// Body for `POST /submit/run`
#[derive(Debug, Clone, Serialize)]
pub struct RunRequest {
    pub language: Language,
    pub code: String,
    pub input_data: String,
}

/// Output of a custom-input run
#[derive(Debug, Clone, Deserialize)]
pub struct RunResult {
    pub output: String,
    pub is_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_detail_decodes_judge_payload() {
        let json = r#"{
            "id": 42,
            "title": "Two Sum",
            "description": "Find two numbers that add to target.",
            "hints": ["Use a map"],
            "boilerplate": {"python": "pass", "java": "class Solution {}"},
            "examples": [{"input": "1 2", "output": "3"}]
        }"#;

        let detail: ProblemDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.id, ProblemId(42));
        assert_eq!(detail.examples.len(), 1);
        // Omitted fields fall back to defaults
        assert_eq!(detail.input_format, "");

        let set = detail.boilerplate_set();
        assert_eq!(set.get(&Language::Python).map(String::as_str), Some("pass"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn unknown_boilerplate_language_is_skipped() {
        let json = r#"{
            "id": 1,
            "title": "T",
            "description": "d",
            "boilerplate": {"python": "pass", "brainfuck": "+"}
        }"#;

        let detail: ProblemDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.boilerplate_set().len(), 1);
    }

    #[test]
    fn summary_defaults_difficulty_and_tags() {
        let rows: Vec<ProblemSummary> =
            serde_json::from_str(r#"[{"id": 3, "title": "Rotate Array"}]"#).unwrap();
        assert_eq!(rows[0].difficulty, "Medium");
        assert!(rows[0].tags.is_empty());
    }

    #[test]
    fn submit_result_finds_first_failure() {
        let json = r#"{
            "status": "Wrong Answer",
            "runtime": 12.5,
            "total_passed": 1,
            "total_tests": 3,
            "details": [
                {"test_case": 1, "status": "Pass", "expected": "3", "actual": "3"},
                {"test_case": 2, "status": "Fail", "expected": "5", "actual": "4"}
            ]
        }"#;

        let result: SubmitResult = serde_json::from_str(json).unwrap();
        assert!(!result.accepted());
        assert_eq!(result.first_failure().unwrap().test_case, 2);
    }

    #[test]
    fn error_response_decodes_without_test_case_numbers() {
        // The judge's error shape omits test_case and runtime entirely
        let json = r#"{
            "status": "Error",
            "total_passed": 0,
            "total_tests": 0,
            "details": [{"status": "Fail", "actual": "No test cases found", "expected": ""}]
        }"#;

        let result: SubmitResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.first_failure().unwrap().test_case, 0);
    }

    #[test]
    fn submit_request_serializes_language_token() {
        let req = SubmitRequest {
            question_id: ProblemId(42),
            language: Language::Python,
            code: "print(1)".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["language"], "python");
        assert_eq!(json["question_id"], 42);
    }
}
