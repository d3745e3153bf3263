//! Core library for studyflow.
//!
//! Orchestrates two LLM-backed operations for a student planner: turning
//! raw syllabus text into a structured course-and-tasks proposal, and
//! reordering a task list by model-assessed priority. Storage, HTTP
//! routing, and calendar integration live in the surrounding application;
//! this crate owns only the completion client, the prompt library, the
//! agent bindings, and the orchestration service on top of them.

pub mod config;
pub mod llm;
pub mod lookup;
pub mod models;
pub mod prompts;
pub mod service;

pub use config::StudyflowConfig;
pub use llm::{Agent, CompletionProvider, LlmError, OpenAIProvider};
pub use lookup::{CourseLookup, InMemoryCourseLookup};
pub use models::{Course, Proposal, Task};
pub use prompts::PromptTemplates;
pub use service::{AiError, AiService};
