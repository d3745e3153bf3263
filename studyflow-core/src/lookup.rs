//! Course lookup collaborator.
//!
//! The orchestration service resolves course display names through this
//! seam; the real application backs it with the document store, which is
//! outside this crate.

use async_trait::async_trait;

use crate::models::Course;

/// Failure while resolving courses.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("course store unavailable: {0}")]
    Unavailable(String),
}

/// Resolves course records for one user by id.
#[async_trait]
pub trait CourseLookup: Send + Sync {
    /// Return the courses among `course_ids` that belong to `user_id`.
    /// Ids the store does not know are simply absent from the result.
    async fn courses_by_ids(
        &self,
        user_id: &str,
        course_ids: &[String],
    ) -> Result<Vec<Course>, LookupError>;
}

/// Course lookup backed by a fixed in-memory collection. Used by the CLI
/// and by tests.
pub struct InMemoryCourseLookup {
    courses: Vec<Course>,
}

impl InMemoryCourseLookup {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }
}

#[async_trait]
impl CourseLookup for InMemoryCourseLookup {
    async fn courses_by_ids(
        &self,
        user_id: &str,
        course_ids: &[String],
    ) -> Result<Vec<Course>, LookupError> {
        Ok(self
            .courses
            .iter()
            .filter(|course| course.user_id == user_id && course_ids.contains(&course.course_id))
            .cloned()
            .collect())
    }
}
