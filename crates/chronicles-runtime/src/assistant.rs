//! Assistant flows built on a [`LanguageModel`]: agent chat, the
//! comprehensive report and the note keeper.
//!
//! Model failures never surface as errors here; they come back as in-place
//! text via [`generate_response`].

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use chronicles_core::{ChroniclesError, Result};
use chronicles_data::analysis::AnalysisResult;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::activity_log::ActivityLog;
use crate::agents::AgentDef;
use crate::context::{chat_context, report_context};
use crate::llm::{generate_response, GenerationRequest, LanguageModel, DEFAULT_TEMPERATURE};

/// Report prompt used when the caller gives none.
pub const DEFAULT_REPORT_PROMPT: &str = "Please provide a comprehensive summary of the supply chain analysis based on the filtered data, focusing on top suppliers, device trends, and potential risks.";

/// Colour used by [`highlight_keyword`] when none is given.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#ff7f50";

// ── Transcript ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One turn of a chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

impl ChatMessage {
    fn user(text: &str) -> Self {
        Self {
            role: Role::User,
            text: text.to_string(),
            timestamp: Utc::now(),
            agent_id: None,
            model_used: None,
        }
    }

    fn model(text: String, agent_id: Option<&str>, model: &str) -> Self {
        Self {
            role: Role::Model,
            text,
            timestamp: Utc::now(),
            agent_id: agent_id.map(str::to_string),
            model_used: Some(model.to_string()),
        }
    }
}

// ── Notes ─────────────────────────────────────────────────────────────────────

/// Note keeper document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    /// Text as first loaded.
    pub original: String,
    /// Current text, rewritten by note actions.
    pub content: String,
}

impl Note {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            original: text.clone(),
            content: text,
        }
    }

    /// Restore the text as first loaded.
    pub fn reset(&mut self) {
        self.content = self.original.clone();
    }
}

/// LLM rewrites offered by the note keeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    Summarize,
    ActionItems,
    Translate,
    Polish,
    Simplify,
}

impl NoteAction {
    /// Instruction placed above the note text.
    pub fn instruction(self) -> &'static str {
        match self {
            NoteAction::Summarize => "Summarize the following note in 3 bullet points:",
            NoteAction::ActionItems => {
                "Extract actionable tasks from the following note as a checklist:"
            }
            NoteAction::Translate => "Translate the following note to Traditional Chinese:",
            NoteAction::Polish => {
                "Polish the grammar and tone of the following note to be professional:"
            }
            NoteAction::Simplify => "Simplify the following note for a general audience:",
        }
    }
}

impl FromStr for NoteAction {
    type Err = ChroniclesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "summarize" => Ok(NoteAction::Summarize),
            "action-items" | "action_items" => Ok(NoteAction::ActionItems),
            "translate" => Ok(NoteAction::Translate),
            "polish" => Ok(NoteAction::Polish),
            "simplify" => Ok(NoteAction::Simplify),
            other => Err(ChroniclesError::Config(format!("unknown note action `{}`", other))),
        }
    }
}

/// Wrap every case-insensitive occurrence of `keyword` in a coloured, bold
/// `<span>`. The keyword is matched literally. An empty keyword leaves the
/// text unchanged; an empty colour falls back to [`DEFAULT_HIGHLIGHT_COLOR`].
pub fn highlight_keyword(content: &str, keyword: &str, color: Option<&str>) -> Result<String> {
    if keyword.is_empty() {
        return Ok(content.to_string());
    }
    let color = color
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_HIGHLIGHT_COLOR);

    let pattern = RegexBuilder::new(&format!("({})", regex::escape(keyword)))
        .case_insensitive(true)
        .build()
        .map_err(|e| ChroniclesError::Config(e.to_string()))?;
    let replacement = format!(
        "<span style=\"color: {}; font-weight: bold;\">${{1}}</span>",
        color.replace('$', "$$")
    );
    Ok(pattern.replace_all(content, replacement.as_str()).into_owned())
}

// ── Assistant ─────────────────────────────────────────────────────────────────

/// Runs prompts against one model and keeps the chat transcripts.
pub struct Assistant {
    llm: Arc<dyn LanguageModel>,
    model: String,
    temperature: f32,
    chat: Vec<ChatMessage>,
    note_chat: Vec<ChatMessage>,
    activity: ActivityLog,
}

impl Assistant {
    pub fn new(llm: Arc<dyn LanguageModel>, model: impl Into<String>, activity: ActivityLog) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            chat: Vec::new(),
            note_chat: Vec::new(),
            activity,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Agent chat transcript, oldest first.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.chat
    }

    /// Note chat transcript, oldest first.
    pub fn note_transcript(&self) -> &[ChatMessage] {
        &self.note_chat
    }

    async fn complete(&self, prompt: String) -> String {
        let request = GenerationRequest::new(prompt, self.model.clone())
            .with_temperature(self.temperature);
        generate_response(self.llm.as_ref(), &request).await
    }

    // ── Agent chat ────────────────────────────────────────────────────────

    /// Ask `agent` a question about the current analysis.
    ///
    /// The prompt is the agent's system prompt, the chat data context and the
    /// question. Returns `None` for a blank question.
    pub async fn ask_agent(
        &mut self,
        agent: &AgentDef,
        question: &str,
        analysis: &AnalysisResult,
    ) -> Option<String> {
        if question.trim().is_empty() {
            return None;
        }
        self.chat.push(ChatMessage::user(question));

        let prompt = format!(
            "{}\n\nDATA CONTEXT:\n{}\n\nUSER QUERY:\n{}",
            agent.system_prompt,
            chat_context(&analysis.summary, &analysis.criteria),
            question
        );
        let answer = self.complete(prompt).await;

        self.chat
            .push(ChatMessage::model(answer.clone(), Some(agent.id.as_str()), &self.model));
        self.activity.record(
            "Agent Chat",
            format!("Used {} with {}", agent.name, self.model),
        );
        Some(answer)
    }

    // ── Report ────────────────────────────────────────────────────────────

    /// Comprehensive report over the current analysis.
    pub async fn generate_report(&self, prompt: Option<&str>, analysis: &AnalysisResult) -> String {
        let prompt = prompt
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_REPORT_PROMPT);
        let full_prompt = format!(
            "{}\n\nData Context:\n{}",
            prompt,
            report_context(&analysis.summary, &analysis.criteria)
        );
        let report = self.complete(full_prompt).await;
        self.activity
            .record("Analytics", "Generated Comprehensive Report");
        report
    }

    // ── Note keeper ───────────────────────────────────────────────────────

    /// Load a note from disk.
    ///
    /// PDF files are not extracted; the note holds a placeholder instead.
    pub async fn open_note(&self, path: &Path) -> Result<Note> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            self.activity.record("Note Upload", "PDF file uploaded");
            return Ok(Note {
                original: format!("[PDF Uploaded: {}]", name),
                content: format!(
                    "[PDF Uploaded: {}]\n\n(Note: PDF text extraction is not supported. \
                     Please provide Text/Markdown content for best results.)",
                    name
                ),
            });
        }

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ChroniclesError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        self.activity
            .record("Note Upload", format!("Text file uploaded {}", name));
        Ok(Note::from_text(text))
    }

    /// Restructure the note into Markdown sections with bolded key entities.
    pub async fn organize(&self, note: &mut Note) {
        let prompt = format!(
            "You are an AI Note Organizer.\n\
             Task: Reorganize the following raw text into structured Markdown.\n\
             Requirements:\n\
             1. Use Headers (#, ##) for sections.\n\
             2. Use bullet points for lists.\n\
             3. Highlight key entities (names, devices, dates, actions) using **bold** syntax.\n\
             4. Keep the tone professional and concise.\n\
             5. DO NOT remove important information, just structure it.\n\
             \n\
             Raw Text:\n{}",
            note.content
        );
        note.content = self.complete(prompt).await;
        self.activity.record("Note Magic", "Organized Note");
    }

    /// Rewrite the note with one of the [`NoteAction`]s.
    pub async fn magic(&self, note: &mut Note, action: NoteAction) {
        let prompt = format!("{}\n\n{}", action.instruction(), note.content);
        note.content = self.complete(prompt).await;
    }

    /// Answer a question about the note. Returns `None` for a blank question.
    pub async fn ask_note(&mut self, note: &Note, question: &str) -> Option<String> {
        if question.trim().is_empty() {
            return None;
        }
        self.note_chat.push(ChatMessage::user(question));

        let prompt = format!(
            "Context: You are an assistant helping with the following note content.\n\
             Note Content:\n{}\n\nUser Question: {}",
            note.content, question
        );
        let answer = self.complete(prompt).await;

        self.note_chat
            .push(ChatMessage::model(answer.clone(), None, &self.model));
        Some(answer)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
