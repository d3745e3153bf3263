//! Storage-owned entities and the ephemeral extraction proposal.
//!
//! `Task` and `Course` belong to the surrounding storage layer; this core
//! only borrows them. Wire format is camelCase JSON, matching the
//! document store the rest of the application reads and writes.

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Weighted-grade task owned by the task store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Assigned by storage; absent until the task is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub title: String,
    pub course_id: String,
    /// Fraction of the course grade in [0, 1], or -1 when unknown.
    pub weight: f64,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    /// Fraction in [0, 1] once graded.
    #[serde(default)]
    pub grade: Option<f64>,
    /// Minutes logged against the task.
    #[serde(default)]
    pub time_spent: Option<i64>,
    /// Estimated minutes to completion.
    #[serde(default)]
    pub expected_time: Option<i64>,
    #[serde(default)]
    pub completed: bool,
    /// -1 means unset.
    #[serde(default = "unset_priority")]
    pub priority: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Course record owned by the course store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_id: String,
    pub user_id: String,
    pub course_name: String,
    /// Current aggregate grade as a fraction in [0, 1].
    #[serde(default)]
    pub grade: f64,
    /// Grade-category name to weight fraction, weights conventionally
    /// summing to 1 across categories. Insertion order is preserved.
    #[serde(default)]
    pub grade_types: IndexMap<String, f64>,
}

fn unset_priority() -> i32 {
    -1
}

fn unknown_weight() -> f64 {
    -1.0
}

/// Structured course-and-tasks payload produced by syllabus extraction.
///
/// Holds the model's payload exactly as returned. Only the two-key shape
/// contract is enforced here; field-level validation is the caller's
/// concern and can go through [`Proposal::course_draft`] and
/// [`Proposal::task_drafts`]. The proposal lives for one request and is
/// never persisted by this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub course: Value,
    pub tasks: Value,
}

/// Reasons a completion fails the proposal shape contract.
#[derive(Debug, thiserror::Error)]
pub enum ProposalError {
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response is missing the \"{0}\" key")]
    MissingKey(&'static str),
}

impl Proposal {
    /// Parse raw completion text under the shape contract: strict JSON
    /// with both `course` and `tasks` present at the top level.
    pub fn parse(raw: &str) -> Result<Self, ProposalError> {
        let value: Value = serde_json::from_str(raw)?;
        let course = value
            .get("course")
            .cloned()
            .ok_or(ProposalError::MissingKey("course"))?;
        let tasks = value
            .get("tasks")
            .cloned()
            .ok_or(ProposalError::MissingKey("tasks"))?;
        Ok(Self { course, tasks })
    }

    /// Deserialize the course half into the documented draft shape.
    pub fn course_draft(&self) -> Result<CourseDraft, serde_json::Error> {
        serde_json::from_value(self.course.clone())
    }

    /// Deserialize the task half into the documented draft shapes.
    pub fn task_drafts(&self) -> Result<Vec<TaskDraft>, serde_json::Error> {
        serde_json::from_value(self.tasks.clone())
    }
}

/// Course shape the extraction prompt instructs the model to emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub name: String,
    #[serde(default)]
    pub grade_types: IndexMap<String, f64>,
}

/// Task shape the extraction prompt instructs the model to emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    /// Whole minutes, >= 0.
    #[serde(default)]
    pub expected_time: Option<i64>,
    #[serde(default = "unknown_weight")]
    pub weight: f64,
    #[serde(default)]
    pub grade_type: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "unset_priority")]
    pub priority: i32,
}
