use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use studyflow_core::config::StudyflowConfig;
use studyflow_core::llm::{Agent, OpenAIProvider};
use studyflow_core::lookup::InMemoryCourseLookup;
use studyflow_core::models::{Course, Task};
use studyflow_core::prompts::PromptTemplates;
use studyflow_core::service::AiService;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "studyflow",
    version,
    about = "Student course and task assistant: syllabus extraction and LLM task ranking"
)]
struct Cli {
    /// Directory holding studyflow.toml; defaults to the current directory
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract a course and its tasks from a syllabus text file
    Extract {
        /// Path to the syllabus text
        #[arg(long)]
        file: PathBuf,
    },

    /// Reorder a task list by model-assessed priority
    Order {
        /// Path to a JSON array of tasks
        #[arg(long)]
        tasks: PathBuf,
        /// Path to a JSON array of the user's courses, for name resolution
        #[arg(long)]
        courses: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let config_dir = match args.config_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current dir")?,
    };
    let config = StudyflowConfig::load_from(&config_dir)?;
    let api_key = config.api_key()?;

    tracing::info!(
        extraction_model = %config.models.extraction,
        ranking_model = %config.models.ranking,
        "agents configured"
    );

    let provider = Arc::new(OpenAIProvider::with_base_url(
        api_key,
        config.provider.base_url.clone(),
    ));
    let extractor = Agent::new(
        provider.clone(),
        config.models.extraction.clone(),
        PromptTemplates::extraction_system_prompt(),
    );
    let ranker = Agent::new(
        provider,
        config.models.ranking.clone(),
        PromptTemplates::ranking_system_prompt(),
    );

    match args.command {
        Commands::Extract { file } => {
            let document = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let service = AiService::new(
                extractor,
                ranker,
                Arc::new(InMemoryCourseLookup::new(Vec::new())),
            );

            let proposal = service.extract_course_and_tasks(&document).await?;
            println!("{}", serde_json::to_string_pretty(&proposal)?);
        }
        Commands::Order { tasks, courses } => {
            let tasks: Vec<Task> = read_json(&tasks)?;
            let courses: Vec<Course> = read_json(&courses)?;
            let service = AiService::new(
                extractor,
                ranker,
                Arc::new(InMemoryCourseLookup::new(courses)),
            );

            let ordered = service.order_tasks(tasks).await?;
            println!("{}", serde_json::to_string_pretty(&ordered)?);
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("invalid JSON in {}", path.display()))
}
