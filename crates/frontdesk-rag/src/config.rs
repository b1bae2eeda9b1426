//! Configuration for the question-answering service
//!
//! Resolved once at startup: defaults, then an optional TOML file, then
//! environment overrides. Variables missing from the process environment are
//! looked up in a dotenv file (`.env` by default). The result is validated
//! before the chunk store is built and never changes afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::generation::prompt::{PersonaTemplate, DEFAULT_PERSONA_TEMPLATE};
use crate::ingestion::WordChunker;

/// Dotenv file consulted at startup
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Environment variable holding the generation service API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the document source path
pub const DOCUMENT_PATH_ENV: &str = "FRONTDESK_DOCUMENT_PATH";
/// Environment variable overriding the bind host
pub const HOST_ENV: &str = "FRONTDESK_HOST";
/// Environment variable overriding the bind port
pub const PORT_ENV: &str = "FRONTDESK_PORT";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Source document
    pub document: DocumentConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Generation service configuration
    pub llm: LlmConfig,
    /// Persona prompt configuration
    pub persona: PersonaConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Source document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Path to the document, or to a directory holding it
    pub path: PathBuf,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("uploaded_pdfs"),
        }
    }
}

/// Chunking configuration (sizes are in words)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Words per chunk
    pub chunk_size: usize,
    /// Words shared with the previous chunk
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

/// Scoring function used to rank chunks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Case-insensitive substring containment of the whole query
    #[default]
    Substring,
    /// Number of distinct query words present in the chunk
    TokenOverlap,
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Maximum number of chunks placed in the prompt
    pub top_k: usize,
    /// Scoring function
    pub scorer: ScorerKind,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            scorer: ScorerKind::Substring,
        }
    }
}

/// Generation service (Gemini API) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// API key; usually supplied through `GEMINI_API_KEY`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Longest prompt (in characters) the service accepts
    pub max_prompt_chars: Option<usize>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemma-3n-e4b-it".to_string(),
            api_key: None,
            temperature: 0.4,
            timeout_secs: 60,
            // gemma-3n has a 32k token window; ~4 chars per token
            max_prompt_chars: Some(120_000),
        }
    }
}

impl LlmConfig {
    /// Check timeout, prompt limit and model name
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::invalid_config("llm.timeout_secs must be greater than zero"));
        }
        if self.max_prompt_chars == Some(0) {
            return Err(Error::invalid_config("llm.max_prompt_chars must be greater than zero"));
        }
        if self.model.trim().is_empty() {
            return Err(Error::invalid_config("llm.model must not be empty"));
        }
        Ok(())
    }
}

/// Persona prompt configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// Template with `{context}` and `{question}` slots
    pub template: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_PERSONA_TEMPLATE.to_string(),
        }
    }
}

impl RagConfig {
    /// Resolve configuration: defaults, optional TOML file, environment.
    ///
    /// The process environment wins over `env_file`; a missing env file is
    /// not an error.
    pub fn load(path: Option<&Path>, env_file: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let file_vars = match env_file {
            Some(env_file) => read_env_file(env_file)?,
            None => HashMap::new(),
        };
        config.apply_overrides(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_vars.get(key).cloned())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::invalid_config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::invalid_config(format!("Malformed config: {}", e)))
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(path) = lookup(DOCUMENT_PATH_ENV) {
            self.document.path = PathBuf::from(path);
        }
        if let Some(host) = lookup(HOST_ENV) {
            self.server.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .parse()
                .map_err(|e| Error::invalid_config(format!("{} is not a port: {}", PORT_ENV, e)))?;
        }
        Ok(())
    }

    /// Check chunking, retrieval, template and service settings
    pub fn validate(&self) -> Result<()> {
        WordChunker::from_config(&self.chunking)?;
        PersonaTemplate::parse(&self.persona.template)?;
        self.llm.validate()
    }
}

/// Read `KEY=value` pairs from a dotenv file without touching the process
/// environment. A missing file yields no variables.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => {
            tracing::debug!("No env file at {}", path.display());
            return Ok(HashMap::new());
        }
        Err(e) => {
            return Err(Error::invalid_config(format!(
                "Cannot read env file {}: {}",
                path.display(),
                e
            )))
        }
    };

    let vars = entries
        .collect::<std::result::Result<HashMap<_, _>, _>>()
        .map_err(|e| Error::invalid_config(format!("Malformed env file {}: {}", path.display(), e)))?;
    tracing::info!("Read {} variables from {}", vars.len(), path.display());
    Ok(vars)
}
