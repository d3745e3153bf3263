//! Prompt library: pure renderers for the fixed instruction templates
//! used by the extraction and ranking agents.

pub mod templates;

pub use templates::PromptTemplates;
