use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::env;

/// Process-wide configuration for the evaluation engine.
///
/// Loaded once from `.env`/environment variables and shared read-only across
/// all concurrent evaluations. Provider credentials live here so that the
/// vendor adapters can be constructed without touching the environment again.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,

    /// Text-generation vendor: `openai`, `huggingface` or `azure`.
    pub llm_provider: String,
    pub llm_api_key: String,
    pub llm_model_name: String,
    /// Explicit endpoint override; required for `azure`.
    pub llm_api_endpoint: Option<String>,
    /// Azure deployment name.
    pub llm_deployment_name: String,

    /// Embedding vendor: `openai` or `huggingface`.
    pub embedding_provider: String,
    pub embedding_api_key: String,
    pub embedding_model_name: String,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

impl Config {
    pub fn init(env_path: &str) -> &'static Self {
        dotenvy::from_filename(env_path).ok();

        CONFIG.get_or_init(|| {
            let project_name = env::var("PROJECT_NAME").unwrap_or_else(|_| "asag-engine".into());
            let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
            let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/evaluator.log".into());
            let log_to_stdout =
                env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "true".into()) == "true";

            let llm_provider = env::var("LLM_PROVIDER").unwrap_or_else(|_| "huggingface".into());
            let llm_api_key = env::var("LLM_API_KEY").unwrap_or_default();
            let llm_model_name = env::var("LLM_MODEL_NAME")
                .unwrap_or_else(|_| "mistralai/Mistral-7B-Instruct-v0.2".into());
            let llm_api_endpoint = env::var("LLM_API_ENDPOINT").ok();
            let llm_deployment_name =
                env::var("LLM_DEPLOYMENT_NAME").unwrap_or_else(|_| "gpt-4".into());

            let embedding_provider =
                env::var("EMBEDDING_PROVIDER").unwrap_or_else(|_| "huggingface".into());
            let embedding_api_key = env::var("EMBEDDING_API_KEY").unwrap_or_default();
            let embedding_model_name = env::var("EMBEDDING_MODEL_NAME")
                .unwrap_or_else(|_| "intfloat/multilingual-e5-large".into());

            if let Some(parent) = std::path::Path::new(&log_file).parent() {
                std::fs::create_dir_all(parent).expect("Failed to create log directory");
            }

            Config {
                project_name,
                log_level,
                log_file,
                log_to_stdout,
                llm_provider,
                llm_api_key,
                llm_model_name,
                llm_api_endpoint,
                llm_deployment_name,
                embedding_provider,
                embedding_api_key,
                embedding_model_name,
            }
        })
    }

    pub fn get() -> &'static Self {
        CONFIG.get().expect("Config not initialized")
    }
}
