//! YAML agent registry.
//!
//! The registry document has the shape
//!
//! ```yaml
//! agents:
//!   nlp_analyzer:
//!     description: "..."
//!     llm_provider: "openai"
//!     model: "gpt-4o-mini"
//!     capabilities: ["..."]
//!     system_prompt: |-
//!       ...
//! ```
//!
//! Agents keep the order of the `agents` mapping. The raw YAML text is kept
//! alongside the parsed agents so it can be saved back unchanged.

use std::path::Path;

use chronicles_core::{ChroniclesError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Registry shipped with the binary.
pub const DEFAULT_AGENTS_YAML: &str = include_str!("../data/agents.yaml");

// ── AgentDef ──────────────────────────────────────────────────────────────────

/// One configured chat agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentDef {
    /// Key of the agent in the `agents` mapping.
    pub id: String,
    /// Display name derived from the id (`nlp_analyzer` → `NLP ANALYZER`).
    pub name: String,
    pub description: String,
    pub llm_provider: String,
    pub model: String,
    pub capabilities: Vec<String>,
    pub system_prompt: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAgent {
    description: String,
    llm_provider: String,
    model: String,
    capabilities: Option<Vec<String>>,
    system_prompt: String,
}

impl AgentDef {
    fn from_raw(id: String, raw: RawAgent) -> Self {
        Self {
            name: display_name(&id),
            id,
            description: raw.description,
            llm_provider: raw.llm_provider,
            model: raw.model,
            capabilities: raw.capabilities.unwrap_or_default(),
            system_prompt: raw.system_prompt,
        }
    }
}

/// `kpi_dashboard_designer` → `KPI DASHBOARD DESIGNER`.
pub fn display_name(id: &str) -> String {
    id.replace('_', " ").to_uppercase()
}

// ── AgentRegistry ─────────────────────────────────────────────────────────────

/// Parsed agents plus the YAML text they came from.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    yaml: String,
    agents: Vec<AgentDef>,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AgentRegistry {
    /// The bundled default registry.
    pub fn builtin() -> Self {
        match Self::from_yaml(DEFAULT_AGENTS_YAML) {
            Ok(registry) => registry,
            Err(e) => {
                warn!(error = %e, "bundled agents.yaml is invalid");
                Self {
                    yaml: DEFAULT_AGENTS_YAML.to_string(),
                    agents: Vec::new(),
                }
            }
        }
    }

    /// Parse a registry document.
    ///
    /// Invalid YAML is a [`ChroniclesError::YamlParse`]; a document without
    /// an `agents` mapping, or with an agent entry that is not a mapping, is
    /// a [`ChroniclesError::InvalidAgentConfig`].
    pub fn from_yaml(text: &str) -> Result<Self> {
        let doc: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| ChroniclesError::YamlParse(e.to_string()))?;

        let mapping = doc
            .get("agents")
            .and_then(serde_yaml::Value::as_mapping)
            .ok_or_else(|| {
                ChroniclesError::InvalidAgentConfig("missing `agents` mapping".to_string())
            })?;

        let mut agents = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let id = match key {
                serde_yaml::Value::String(s) => s.clone(),
                other => serde_yaml::to_string(other)
                    .map(|s| s.trim().to_string())
                    .map_err(|e| ChroniclesError::YamlParse(e.to_string()))?,
            };
            let raw: RawAgent = if value.is_null() {
                RawAgent::default()
            } else {
                serde_yaml::from_value(value.clone()).map_err(|e| {
                    ChroniclesError::InvalidAgentConfig(format!("agent `{}`: {}", id, e))
                })?
            };
            agents.push(AgentDef::from_raw(id, raw));
        }

        debug!(agents = agents.len(), "parsed agent registry");
        Ok(Self {
            yaml: text.to_string(),
            agents,
        })
    }

    /// Read a registry file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ChroniclesError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Replace this registry with `text`. On error the current agents stay.
    pub fn set_yaml(&mut self, text: &str) -> Result<()> {
        *self = Self::from_yaml(text)?;
        Ok(())
    }

    /// Replace this registry with the file at `path`. On error the current
    /// agents stay.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        *self = Self::from_path(path)?;
        Ok(())
    }

    /// Write the raw YAML text to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_err = |source: std::io::Error| ChroniclesError::FileWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let tmp = path.with_extension("yaml.tmp");
        std::fs::write(&tmp, &self.yaml).map_err(write_err)?;
        std::fs::rename(&tmp, path).map_err(write_err)?;
        Ok(())
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn agents(&self) -> &[AgentDef] {
        &self.agents
    }

    pub fn yaml(&self) -> &str {
        &self.yaml
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&AgentDef> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// First agent in the registry.
    pub fn default_agent(&self) -> Option<&AgentDef> {
        self.agents.first()
    }

    /// The agent named by `id`, or the default agent when `id` is `None`.
    pub fn resolve(&self, id: Option<&str>) -> Result<&AgentDef> {
        match id {
            Some(id) => self
                .get(id)
                .ok_or_else(|| ChroniclesError::UnknownAgent(id.to_string())),
            None => self.default_agent().ok_or_else(|| {
                ChroniclesError::InvalidAgentConfig("no agents defined".to_string())
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
