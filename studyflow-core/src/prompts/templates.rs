/// Prompt template collection for the extraction and ranking agents.
pub struct PromptTemplates;

impl PromptTemplates {
    /// System prompt for the syllabus-extraction agent.
    pub fn extraction_system_prompt() -> &'static str {
        EXTRACTION_SYSTEM
    }

    /// Wrap a syllabus document for one extraction request. The document
    /// text is embedded verbatim so the model sees the full source.
    pub fn extraction_request(document_text: &str) -> String {
        format!(
            "Extract the course and its tasks from the syllabus below. Respond with a \
             single strict-JSON object holding exactly the top-level keys \"course\" and \
             \"tasks\" in the instructed schema, with no markdown fencing and no prose.\n\n\
             Syllabus:\n{document_text}"
        )
    }

    /// System prompt for the task-ranking agent.
    pub fn ranking_system_prompt() -> &'static str {
        RANKING_SYSTEM
    }

    /// Wrap newline-joined serialized task lines for one ranking request.
    pub fn ranking_request(task_lines: &str) -> String {
        format!(
            "Order the tasks below by priority: earlier due date first, then higher \
             grade weight, then larger deliverable when date and weight are materially \
             equal. Respond with a JSON array of the integer ids only, highest priority \
             first.\n\nTasks:\n{task_lines}"
        )
    }
}

const EXTRACTION_SYSTEM: &str = r#"You analyze course syllabi for a student planner. Given the text of a syllabus, extract the course structure and its graded work.

Respond with strict JSON only: one object with exactly two top-level keys, "course" and "tasks". Never wrap the JSON in markdown fencing and never add prose before or after it.

Schema:
{
  "course": {
    "name": string,
    "gradeTypes": { "<category name>": <decimal weight> }
  },
  "tasks": [
    {
      "title": string,
      "expectedTime": whole minutes, integer >= 0,
      "weight": number in [0, 1], or -1 when the syllabus does not say,
      "gradeType": string, one of the categories in "gradeTypes",
      "dueDate": "YYYY-MM-DD" or null,
      "description": string,
      "priority": integer, -1 when unknown
    }
  ]
}

Rules:
- Convert percentages to decimals: 25% becomes 0.25.
- When a course is dual-listed at undergraduate and graduate level, extract only the undergraduate variant.
- General grade categories (such as "Homework 40%") are never tasks. Only concrete assignments with their own identity belong in "tasks".
- "tasks" may be an empty array when the syllabus lists no concrete work.

Example syllabus:
CS 2110 - Data Structures
Grading: Homework 40%, Midterm 25%, Final 35%
Homework 1 (arrays and linked lists) is due 2024-09-06 and is worth 10% of the grade.
The midterm exam is held in class on 2024-10-15.

Example response:
{"course":{"name":"CS 2110","gradeTypes":{"Homework":0.4,"Midterm":0.25,"Final":0.35}},"tasks":[{"title":"Homework 1","expectedTime":120,"weight":0.1,"gradeType":"Homework","dueDate":"2024-09-06","description":"Arrays and linked lists homework","priority":-1},{"title":"Midterm exam","expectedTime":90,"weight":0.25,"gradeType":"Midterm","dueDate":"2024-10-15","description":"In-class midterm exam","priority":-1}]}"#;

const RANKING_SYSTEM: &str = r#"You prioritize a student's task list. Each task arrives on its own line as a tuple: Task(id=int, name, courseName, weight, due, desc).

Rank by these rules, in strict precedence order:
1. An earlier due date means higher priority.
2. When due dates are materially equal, a higher grade weight means higher priority.
3. When both due date and weight are materially equal, the task with the larger apparent deliverable, judged from its description, ranks higher.

Rank the list as a whole: course membership is never a grouping key, and tasks from different courses must interleave freely.

Respond with a JSON array of the integer ids only, highest priority first, with no prose. If the given order is already correct, return it unchanged."#;
