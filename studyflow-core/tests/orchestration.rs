//! End-to-end tests for the orchestration service over a scripted
//! completion provider.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use studyflow_core::llm::{Agent, Completion, CompletionProvider, CompletionRequest, LlmError};
use studyflow_core::lookup::InMemoryCourseLookup;
use studyflow_core::models::{Course, Task};
use studyflow_core::prompts::PromptTemplates;
use studyflow_core::service::{AiError, AiService};

/// Completion provider that replays canned responses and records every
/// request it receives.
struct ScriptedProvider {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    fn new<I>(responses: I) -> Arc<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> CompletionRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    fn last_user_prompt(&self) -> String {
        let requests = self.requests.lock().unwrap();
        let request = requests.last().expect("at least one request");
        request.messages[1].content.clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        self.requests.lock().unwrap().push(request);
        let text = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Provider("script exhausted".to_string()))?;
        Ok(Completion {
            text,
            raw: json!({}),
        })
    }
}

fn service_with(provider: Arc<ScriptedProvider>, courses: Vec<Course>) -> AiService {
    let extractor = Agent::new(
        provider.clone(),
        "test-model",
        PromptTemplates::extraction_system_prompt(),
    );
    let ranker = Agent::new(
        provider,
        "test-model",
        PromptTemplates::ranking_system_prompt(),
    );
    AiService::new(extractor, ranker, Arc::new(InMemoryCourseLookup::new(courses)))
}

fn task(id: &str, course_id: &str, title: &str) -> Task {
    Task {
        id: Some(id.to_string()),
        user_id: "u1".to_string(),
        title: title.to_string(),
        course_id: course_id.to_string(),
        weight: 0.2,
        due_date: NaiveDate::from_ymd_opt(2024, 10, 1),
        description: format!("{title} write-up"),
        grade: None,
        time_spent: None,
        expected_time: Some(60),
        completed: false,
        priority: -1,
        created_at: None,
        updated_at: None,
    }
}

fn course(course_id: &str, name: &str) -> Course {
    Course {
        course_id: course_id.to_string(),
        user_id: "u1".to_string(),
        course_name: name.to_string(),
        grade: 0.9,
        grade_types: Default::default(),
    }
}

const VALID_PROPOSAL: &str = r#"{"course":{"name":"CS 2110","gradeTypes":{"Homework":0.4,"Final":0.6}},"tasks":[{"title":"Homework 1","expectedTime":120,"weight":0.1,"gradeType":"Homework","dueDate":"2024-09-06","description":"Arrays","priority":-1}]}"#;

#[tokio::test]
async fn empty_reorder_returns_without_calling_the_provider() {
    let provider = ScriptedProvider::new(Vec::<String>::new());
    let service = service_with(provider.clone(), Vec::new());

    let ordered = service.order_tasks(Vec::new()).await.expect("empty input");
    assert!(ordered.is_empty());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn reorder_maps_response_ids_back_to_tasks() {
    let provider = ScriptedProvider::new(["[1,0]"]);
    let service = service_with(provider.clone(), vec![course("c1", "Calc I")]);

    let tasks = vec![task("a", "c1", "Problem set 1"), task("b", "c1", "Problem set 2")];
    let ordered = service.order_tasks(tasks).await.expect("reorder succeeds");

    assert_eq!(provider.calls(), 1);
    assert_eq!(ordered.len(), 2);
    assert_eq!(ordered[0].id.as_deref(), Some("b"));
    assert_eq!(ordered[1].id.as_deref(), Some("a"));
}

#[tokio::test]
async fn reorder_preserves_every_input_task() {
    let provider = ScriptedProvider::new(["[2,0,1]"]);
    let service = service_with(provider.clone(), vec![course("c1", "Calc I")]);

    let tasks = vec![
        task("a", "c1", "Reading 1"),
        task("b", "c1", "Reading 2"),
        task("c", "c1", "Reading 3"),
    ];
    let ordered = service.order_tasks(tasks).await.expect("reorder succeeds");

    let mut ids: Vec<_> = ordered.iter().filter_map(|t| t.id.as_deref()).collect();
    ids.sort_unstable();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[tokio::test]
async fn reorder_prompt_carries_resolved_course_names() {
    let provider = ScriptedProvider::new(["[1,0]"]);
    let service = service_with(
        provider.clone(),
        vec![course("c1", "Calc I"), course("c2", "Physics")],
    );

    let tasks = vec![task("a", "c1", "Problem set 1"), task("b", "c2", "Lab report")];
    service.order_tasks(tasks).await.expect("reorder succeeds");

    let prompt = provider.last_user_prompt();
    assert!(prompt.contains("courseName=Calc I"));
    assert!(prompt.contains("courseName=Physics"));
    assert!(!prompt.contains("courseName=c1"));
    assert!(!prompt.contains("courseName=c2"));
    assert!(prompt.contains("id=0:"));
    assert!(prompt.contains("id=1:"));
}

#[tokio::test]
async fn reorder_rejects_a_non_permutation_response() {
    for bad in ["[0,5]", "[0,0]", "[0]", "not json"] {
        let provider = ScriptedProvider::new([bad]);
        let service = service_with(provider, vec![course("c1", "Calc I")]);

        let tasks = vec![task("a", "c1", "T1"), task("b", "c1", "T2")];
        let error = service.order_tasks(tasks).await.expect_err("must reject");
        assert_eq!(error.code(), "RANKING_RESPONSE_INVALID", "response {bad:?}");
    }
}

#[tokio::test]
async fn reorder_sends_the_ranking_system_prompt() {
    let provider = ScriptedProvider::new(["[0]"]);
    let service = service_with(provider.clone(), vec![course("c1", "Calc I")]);

    service
        .order_tasks(vec![task("a", "c1", "T1")])
        .await
        .expect("reorder succeeds");

    let request = provider.request(0);
    assert_eq!(request.model, "test-model");
    assert_eq!(
        request.messages[0].content,
        PromptTemplates::ranking_system_prompt()
    );
}

#[tokio::test]
async fn extraction_succeeds_on_the_first_valid_response() {
    let provider = ScriptedProvider::new([VALID_PROPOSAL]);
    let service = service_with(provider.clone(), Vec::new());

    let proposal = service
        .extract_course_and_tasks("Course: CS101\nHomework: 100%")
        .await
        .expect("extraction succeeds");

    assert_eq!(provider.calls(), 1);
    assert_eq!(proposal.course["name"], "CS 2110");
    assert_eq!(proposal.tasks[0]["title"], "Homework 1");

    let prompt = provider.last_user_prompt();
    assert!(prompt.contains("Course: CS101\nHomework: 100%"));
}

#[tokio::test(start_paused = true)]
async fn extraction_retries_a_missing_key_then_returns_the_second_payload() {
    let provider = ScriptedProvider::new([r#"{"course": {"name": "CS"}}"#, VALID_PROPOSAL]);
    let service = service_with(provider.clone(), Vec::new());

    let proposal = service
        .extract_course_and_tasks("syllabus text")
        .await
        .expect("second attempt succeeds");

    assert_eq!(provider.calls(), 2);
    assert_eq!(
        proposal.course,
        json!({"name": "CS 2110", "gradeTypes": {"Homework": 0.4, "Final": 0.6}})
    );
}

#[tokio::test(start_paused = true)]
async fn extraction_exhausts_after_three_attempts_and_two_delays() {
    let provider = ScriptedProvider::new(["no", "still no", "nope"]);
    let service = service_with(provider.clone(), Vec::new());

    let started = tokio::time::Instant::now();
    let error = service
        .extract_course_and_tasks("syllabus text")
        .await
        .expect_err("all attempts fail");

    assert_eq!(provider.calls(), 3);
    assert_eq!(error.code(), "COURSE_TASK_GENERATION_FAILED");
    assert!(error.to_string().contains("3 attempts"));
    assert_eq!(started.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn extraction_retries_transport_failures_within_the_budget() {
    // An empty script makes every call fail at the provider.
    let provider = ScriptedProvider::new(Vec::<String>::new());
    let service = service_with(provider.clone(), Vec::new());

    let error = service
        .extract_course_and_tasks("syllabus text")
        .await
        .expect_err("provider keeps failing");

    assert_eq!(provider.calls(), 3);
    assert!(matches!(error, AiError::GenerationExhausted { .. }));
}
