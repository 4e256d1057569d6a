use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by GUDID Chronicles.
///
/// Data-quality problems in an uploaded packing list are never represented
/// here; malformed fields degrade to defaults during parsing.
#[derive(Error, Debug)]
pub enum ChroniclesError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The agents YAML document is not valid YAML.
    #[error("Failed to parse agents YAML: {0}")]
    YamlParse(String),

    /// The agents YAML is valid YAML but does not describe any agents.
    #[error("Invalid agent configuration: {0}")]
    InvalidAgentConfig(String),

    /// No agent with the requested id exists in the registry.
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// No API key is configured for the language model.
    #[error("API Key is missing in environment variables.")]
    MissingApiKey,

    /// The language model returned an error response.
    #[error("LLM error: {0}")]
    Llm(String),

    /// The HTTP transport to the language model failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the chronicles crates.
pub type Result<T> = std::result::Result<T, ChroniclesError>;
