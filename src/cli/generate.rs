use std::io::Write;

use clap::ValueEnum;
use mealgen_client::{GenerationClient, SessionOutcome, run_session};
use mealgen_planner::{GenerationRequest, PlanState, build_prompt};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Rendered meal plan and shopping list
    Text,
    /// Rendered block nodes as JSON
    Json,
    /// Generated text exactly as it streams in
    Raw,
}

pub async fn generate(
    config: crate::config::Config,
    request: GenerationRequest,
    format: OutputFormat,
    endpoint_override: Option<String>,
) -> anyhow::Result<()> {
    let mut client_config = config.client;
    if let Some(endpoint) = endpoint_override {
        client_config.endpoint_base_url = endpoint;
    }

    let client = GenerationClient::new(&client_config)?;
    tracing::info!(endpoint = %client.endpoint(), "Requesting meal plan");

    stream_plan(&client, &request, format, &mut std::io::stdout()).await
}

/// Run one session and write the plan to `out` in `format`.
///
/// Raw output is written as chunks arrive, the other formats once the
/// stream has ended. Whatever was received is written even when the session
/// fails; the error is returned afterwards.
#[tracing::instrument(skip_all, fields(days = request.days(), people = request.people()))]
pub async fn stream_plan<W: Write>(
    client: &GenerationClient,
    request: &GenerationRequest,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let state = Mutex::new(PlanState::new());
    let mut printed = 0;
    let mut write_error: Option<std::io::Error> = None;

    let result = run_session(client, request, &state, |plan| {
        if format == OutputFormat::Raw {
            if write_error.is_some() {
                return;
            }
            let text = plan.buffer().text();
            if let Err(e) = out
                .write_all(text[printed..].as_bytes())
                .and_then(|()| out.flush())
            {
                tracing::error!("Failed to write streamed output: {e}");
                write_error = Some(e);
                return;
            }
            printed = text.len();
        } else {
            let view = plan.view();
            tracing::debug!(
                meal_plan_blocks = view.meal_plan.len(),
                shopping_list_blocks = view.shopping_list.len(),
                "Rendered update"
            );
        }
    })
    .await;

    if let Some(e) = write_error {
        return Err(anyhow::Error::new(e).context("output closed while streaming"));
    }

    let state = state.lock().await;

    if state.has_content() {
        match format {
            OutputFormat::Raw => writeln!(out)?,
            OutputFormat::Text => super::write_plan(out, &state.view())?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, &state.view())?;
                writeln!(out)?;
            }
        }
    }

    match result {
        Ok(SessionOutcome::Completed) => {
            if state.shopping_list().is_empty() {
                tracing::warn!("No shopping list in the generated output");
            }
            Ok(())
        }
        Ok(SessionOutcome::Superseded) => Ok(()),
        Err(e) => {
            tracing::error!("Generation failed: {e}");
            anyhow::bail!(
                "{}",
                state
                    .error()
                    .map(str::to_owned)
                    .unwrap_or_else(|| mealgen_planner::user_error_message(&e))
            )
        }
    }
}

pub fn prompt(request: &GenerationRequest) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", build_prompt(request).trim())?;
    Ok(())
}
