//! Non-interactive views: everything except the dashboard prints text.

use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chronicles_data::analysis::AnalysisResult;
use chronicles_data::graph::{build_graph, DEFAULT_GRAPH_LIMIT};
use chronicles_data::reader::to_csv;
use chronicles_runtime::agents::AgentRegistry;
use chronicles_runtime::assistant::{highlight_keyword, Assistant, NoteAction};
use chronicles_runtime::context::report_context;

// ── Data views ────────────────────────────────────────────────────────────────

/// `--view summary`: the analytics summary as pretty JSON.
pub fn summary_json(result: &AnalysisResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(&result.summary)?)
}

/// `--view digest`: the same text the report prompt receives.
pub fn digest_text(result: &AnalysisResult) -> String {
    report_context(&result.summary, &result.criteria)
}

/// `--view graph`: relationship graph of the filtered records as JSON.
pub fn graph_json(result: &AnalysisResult) -> Result<String> {
    let graph = build_graph(&result.filtered, DEFAULT_GRAPH_LIMIT);
    Ok(serde_json::to_string_pretty(&graph)?)
}

/// `--view preview`: first rows of the filtered set as CSV.
pub fn preview_csv(headers: &[String], result: &AnalysisResult) -> String {
    to_csv(headers, result.preview())
}

/// `--view agents`: one block per configured agent.
pub fn agents_listing(registry: &AgentRegistry) -> String {
    if registry.is_empty() {
        return "No agents configured.".to_string();
    }
    registry
        .agents()
        .iter()
        .map(|agent| {
            let mut block = format!(
                "{} ({})\n  provider: {} / {}\n  {}",
                agent.name, agent.id, agent.llm_provider, agent.model, agent.description
            );
            if !agent.capabilities.is_empty() {
                block.push_str(&format!("\n  capabilities: {}", agent.capabilities.join(", ")));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ── Assistant views ───────────────────────────────────────────────────────────

/// `--view chat`: ask the selected agent about the filtered data.
pub async fn chat(
    assistant: &mut Assistant,
    registry: &AgentRegistry,
    agent_id: Option<&str>,
    prompt: Option<&str>,
    result: &AnalysisResult,
) -> Result<String> {
    let agent = registry.resolve(agent_id)?;
    let question = prompt.unwrap_or_default();
    match assistant.ask_agent(agent, question, result).await {
        Some(answer) => Ok(answer),
        None => bail!("the chat view needs a question: pass --prompt"),
    }
}

/// Options for `--view note`.
#[derive(Debug, Default)]
pub struct NoteRequest<'a> {
    pub action: &'a str,
    pub prompt: Option<&'a str>,
    pub keyword: Option<&'a str>,
    pub color: Option<&'a str>,
}

/// `--view note`: load a note and run one note-keeper action on it.
///
/// `ask` prints the answer; every other action prints the rewritten note.
pub async fn note(assistant: &mut Assistant, path: &Path, request: NoteRequest<'_>) -> Result<String> {
    let mut note = assistant
        .open_note(path)
        .await
        .with_context(|| format!("cannot open note {}", path.display()))?;

    match request.action {
        "organize" => assistant.organize(&mut note).await,
        "ask" => {
            let question = request.prompt.unwrap_or_default();
            return match assistant.ask_note(&note, question).await {
                Some(answer) => Ok(answer),
                None => bail!("the ask action needs a question: pass --prompt"),
            };
        }
        "highlight" => {
            let Some(keyword) = request.keyword else {
                bail!("the highlight action needs --keyword");
            };
            note.content = highlight_keyword(&note.content, keyword, request.color)?;
        }
        other => {
            let action = NoteAction::from_str(other)?;
            assistant.magic(&mut note, action).await;
        }
    }
    Ok(note.content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
