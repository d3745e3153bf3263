//! Orchestration over the extraction and ranking agents.
//!
//! Two entry points: turning syllabus text into a structured
//! course-and-tasks proposal, and reordering a task list by
//! model-assessed priority. The service owns no persistent state; every
//! entity it touches is borrowed from the storage layer, and each call's
//! retry bookkeeping is local to that call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::llm::{Agent, LlmError};
use crate::lookup::{CourseLookup, LookupError};
use crate::models::{Proposal, Task};
use crate::prompts::PromptTemplates;

/// Attempt budget for syllabus extraction.
const MAX_GENERATION_ATTEMPTS: u32 = 3;

/// Pause between failed extraction attempts. Constant rather than
/// exponential: malformed completions are attempt-independent, not
/// load-related.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Errors surfaced by the orchestration service.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("completion request failed: {0}")]
    Completion(#[from] LlmError),
    #[error("course-task generation failed after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    #[error("ranking response rejected: {reason}")]
    InvalidRanking { reason: String },
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl AiError {
    /// Stable machine-readable code for caller-side branching.
    pub fn code(&self) -> &'static str {
        match self {
            AiError::Completion(_) => "COMPLETION_FAILED",
            AiError::GenerationExhausted { .. } => "COURSE_TASK_GENERATION_FAILED",
            AiError::InvalidRanking { .. } => "RANKING_RESPONSE_INVALID",
            AiError::Lookup(_) => "COURSE_LOOKUP_FAILED",
        }
    }
}

/// Orchestrates one extraction agent and one ranking agent.
///
/// Constructed by explicit dependency injection; the two agents share no
/// mutable state and unrelated requests never interfere with each other.
pub struct AiService {
    extractor: Agent,
    ranker: Agent,
    courses: Arc<dyn CourseLookup>,
}

impl AiService {
    pub fn new(extractor: Agent, ranker: Agent, courses: Arc<dyn CourseLookup>) -> Self {
        Self {
            extractor,
            ranker,
            courses,
        }
    }

    /// Turn raw syllabus text into a structured course-and-tasks
    /// proposal.
    ///
    /// Up to three attempts. A response that is not strict JSON or lacks
    /// either top-level key counts as a failed attempt, with a fixed
    /// one-second pause before the next. The first structurally valid
    /// payload is returned verbatim; field-level validation is the
    /// caller's concern. All-or-nothing: no partial result is ever
    /// returned.
    pub async fn extract_course_and_tasks(&self, document_text: &str) -> Result<Proposal, AiError> {
        let request = PromptTemplates::extraction_request(document_text);

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            match self.extractor.generate(&request).await {
                Ok(raw) => match Proposal::parse(&raw) {
                    Ok(proposal) => {
                        debug!(attempt, "syllabus extraction succeeded");
                        return Ok(proposal);
                    }
                    Err(reason) => {
                        warn!(
                            attempt,
                            %reason,
                            response = %raw,
                            "discarding malformed extraction response"
                        );
                    }
                },
                Err(error) => {
                    warn!(attempt, %error, "extraction completion request failed");
                }
            }

            if attempt < MAX_GENERATION_ATTEMPTS {
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }

        Err(AiError::GenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Return the same tasks in model-assessed priority order.
    ///
    /// The model sees each task under a local dense id equal to its
    /// position in `tasks`; that correspondence is private to this call
    /// and is how the response maps back to task objects. Empty input
    /// returns empty without any network call.
    pub async fn order_tasks(&self, tasks: Vec<Task>) -> Result<Vec<Task>, AiError> {
        if tasks.is_empty() {
            return Ok(tasks);
        }

        // All tasks in one request belong to one user.
        let user_id = tasks[0].user_id.clone();
        let course_ids: Vec<String> = tasks
            .iter()
            .map(|task| task.course_id.clone())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();

        let courses = self.courses.courses_by_ids(&user_id, &course_ids).await?;
        let names: HashMap<String, String> = courses
            .into_iter()
            .map(|course| (course.course_id, course.course_name))
            .collect();

        let lines: Vec<String> = tasks
            .iter()
            .enumerate()
            .map(|(index, task)| {
                // A course the lookup did not return keeps its raw id so
                // the serialized line never carries an empty field.
                let course_name = names
                    .get(&task.course_id)
                    .map(String::as_str)
                    .unwrap_or(&task.course_id);
                ranking_line(index, task, course_name)
            })
            .collect();

        debug!(tasks = tasks.len(), courses = names.len(), "requesting task ranking");

        let request = PromptTemplates::ranking_request(&lines.join("\n"));
        let response = self.ranker.generate(&request).await?;
        let order = parse_ranking(&response, tasks.len())?;

        let mut slots: Vec<Option<Task>> = tasks.into_iter().map(Some).collect();
        Ok(order
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect())
    }
}

/// Serialize one task for the ranking prompt under its local dense id.
fn ranking_line(index: usize, task: &Task, course_name: &str) -> String {
    let due = task
        .due_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "none".to_string());
    format!(
        "id={index}:Task(id={index}, name={title}, courseName={course_name}, weight={weight}, due={due}, desc={desc})",
        title = task.title,
        weight = task.weight,
        desc = task.description,
    )
}

/// Parse a ranking response as a permutation of `0..len`.
///
/// Length, range, and duplicates are all checked; a response that drops
/// or repeats an id fails closed instead of silently losing tasks.
fn parse_ranking(response: &str, len: usize) -> Result<Vec<usize>, AiError> {
    let ids: Vec<i64> =
        serde_json::from_str(response).map_err(|error| AiError::InvalidRanking {
            reason: format!("not a JSON array of integers: {error}"),
        })?;

    if ids.len() != len {
        return Err(AiError::InvalidRanking {
            reason: format!("expected {len} ids, got {count}", count = ids.len()),
        });
    }

    let mut seen = vec![false; len];
    let mut order = Vec::with_capacity(len);
    for id in ids {
        let index = usize::try_from(id)
            .ok()
            .filter(|&index| index < len)
            .ok_or_else(|| AiError::InvalidRanking {
                reason: format!("id {id} is outside 0..{len}"),
            })?;
        if std::mem::replace(&mut seen[index], true) {
            return Err(AiError::InvalidRanking {
                reason: format!("id {id} appears more than once"),
            });
        }
        order.push(index);
    }

    Ok(order)
}
