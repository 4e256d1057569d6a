use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::FilterCriteria;

/// Models offered for agent chat, reports and the note keeper.
pub const MODEL_OPTIONS: [&str; 6] = [
    "gemini-3-flash-preview",
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-3-pro-preview",
    "gpt-4o-mini",
    "gpt-4.1-mini",
];

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Name of the per-user state directory under `$HOME`.
pub const APP_DIR_NAME: &str = ".gudid-chronicles";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Supply-chain analytics for GUDID packing lists
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gudid-chronicles",
    about = "Supply-chain analytics for GUDID medical-device packing lists",
    version
)]
pub struct Settings {
    /// Packing-list CSV to load (the bundled sample is used when omitted)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Keep only this supplier (exact match)
    #[arg(long)]
    pub supplier: Option<String>,

    /// Keep only this device name (exact match)
    #[arg(long)]
    pub device: Option<String>,

    /// Inclusive start of the delivery-date range (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Inclusive end of the delivery-date range (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = [
        "dashboard", "summary", "digest", "graph", "preview", "chat", "report", "note", "agents",
    ])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["dark", "light", "auto"])]
    pub theme: String,

    /// Agents YAML registry (the built-in registry is used when omitted)
    #[arg(long)]
    pub agents: Option<PathBuf>,

    /// Agent id to chat with (defaults to the first agent in the registry)
    #[arg(long)]
    pub agent: Option<String>,

    /// Language model
    #[arg(long, default_value = DEFAULT_MODEL,
        value_parser = clap::builder::PossibleValuesParser::new(MODEL_OPTIONS))]
    pub model: String,

    /// Question for chat / note views, or a custom report prompt
    #[arg(long)]
    pub prompt: Option<String>,

    /// Note file for the note view
    #[arg(long)]
    pub note: Option<PathBuf>,

    /// Note keeper action
    #[arg(long, default_value = "organize", value_parser = [
        "organize", "summarize", "action-items", "translate", "polish", "simplify", "ask", "highlight",
    ])]
    pub note_action: String,

    /// Keyword to highlight in the note
    #[arg(long)]
    pub keyword: Option<String>,

    /// Highlight colour (hex or CSS name)
    #[arg(long)]
    pub color: Option<String>,

    /// Sampling temperature (0.0-2.0)
    #[arg(long, default_value = "0.7", value_parser = parse_temperature)]
    pub temperature: f32,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

fn parse_temperature(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("`{}` is not a number", s))?;
    if (0.0..=2.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("temperature {} is outside 0.0-2.0", value))
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.gudid-chronicles/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agents: Option<PathBuf>,
}

impl LastUsedParams {
    /// Default path of the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation; accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins; filters are never restored.
        if !is_arg_explicitly_set(&matches, "data") && settings.data.is_none() {
            settings.data = last.data.filter(|p| p.is_file());
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "model") {
            if let Some(v) = last.model.filter(|m| MODEL_OPTIONS.contains(&m.as_str())) {
                settings.model = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "agent") && settings.agent.is_none() {
            settings.agent = last.agent;
        }
        if !is_arg_explicitly_set(&matches, "agents") && settings.agents.is_none() {
            settings.agents = last.agents;
        }

        settings = Self::apply_debug_flag(settings);

        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// Filter criteria assembled from the filter flags.
    pub fn filter_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            supplier: self.supplier.clone().unwrap_or_default(),
            device: self.device.clone().unwrap_or_default(),
            start_date: self.start_date.clone().unwrap_or_default(),
            end_date: self.end_date.clone().unwrap_or_default(),
        }
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data: s
                .data
                .as_ref()
                .map(|p| std::fs::canonicalize(p).unwrap_or_else(|_| p.clone())),
            theme: Some(s.theme.clone()),
            model: Some(s.model.clone()),
            agent: s.agent.clone(),
            agents: s.agents.clone(),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
