mod bootstrap;
mod commands;

use std::sync::Arc;

use anyhow::{Context, Result};
use chronicles_core::settings::Settings;
use chronicles_runtime::activity_log::ActivityLog;
use chronicles_runtime::agents::AgentRegistry;
use chronicles_runtime::assistant::Assistant;
use chronicles_runtime::data_manager::DataManager;
use chronicles_runtime::llm::{GeminiClient, GeminiConfig};
use chronicles_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("GUDID Chronicles v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Model: {}",
        settings.view,
        settings.theme,
        settings.model
    );

    let activity = ActivityLog::new();

    // ── Dataset ───────────────────────────────────────────────────────────────
    let mut data = DataManager::with_activity(activity.clone());
    match settings.data.as_deref() {
        Some(path) => {
            data.load_file(path)
                .with_context(|| format!("cannot load packing list {}", path.display()))?;
        }
        None => {
            data.load_sample();
        }
    }

    // ── Agents ────────────────────────────────────────────────────────────────
    let mut registry = AgentRegistry::builtin();
    if let Some(path) = settings.agents.as_deref() {
        registry
            .load(path)
            .with_context(|| format!("cannot load agents from {}", path.display()))?;
        activity.record("Agent Config", "Uploaded new agents.yaml");
    }

    let criteria = settings.filter_criteria();
    let headers = data.dataset().headers.clone();
    let options = data.filter_options();
    let result = data.analysis(&criteria);
    tracing::info!(
        total = result.metadata.total_records,
        filtered = result.metadata.filtered_records,
        "analysis ready"
    );

    match settings.view.as_str() {
        "dashboard" => {
            let app = App::new(&settings.theme);
            app.run_dashboard(result, &options)?;
        }
        "summary" => println!("{}", commands::summary_json(result)?),
        "digest" => println!("{}", commands::digest_text(result)),
        "graph" => println!("{}", commands::graph_json(result)?),
        "preview" => print!("{}", commands::preview_csv(&headers, result)),
        "agents" => println!("{}", commands::agents_listing(&registry)),

        "chat" | "report" | "note" => {
            let client = GeminiClient::new(GeminiConfig::from_env())?;
            let mut assistant =
                Assistant::new(Arc::new(client), settings.model.clone(), activity.clone())
                    .with_temperature(settings.temperature);

            let output = match settings.view.as_str() {
                "chat" => {
                    commands::chat(
                        &mut assistant,
                        &registry,
                        settings.agent.as_deref(),
                        settings.prompt.as_deref(),
                        result,
                    )
                    .await?
                }
                "report" => {
                    assistant
                        .generate_report(settings.prompt.as_deref(), result)
                        .await
                }
                _ => {
                    let path = settings
                        .note
                        .as_deref()
                        .context("the note view needs a file: pass --note")?;
                    let request = commands::NoteRequest {
                        action: &settings.note_action,
                        prompt: settings.prompt.as_deref(),
                        keyword: settings.keyword.as_deref(),
                        color: settings.color.as_deref(),
                    };
                    commands::note(&mut assistant, path, request).await?
                }
            };
            println!("{}", output);
        }

        unknown => anyhow::bail!("unknown view {unknown}"),
    }

    for entry in activity.entries().iter().rev() {
        tracing::debug!(event = %entry.event, details = %entry.details, "activity");
    }

    Ok(())
}
