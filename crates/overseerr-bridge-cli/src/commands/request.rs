use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_request_client::ClientError;
use media_request_core::{DispatchOutcome, RequestDispatcher, SkipReason};
use media_request_models::{RequestUpdate, SeasonMode};
use serde_json::json;
use std::path::Path;

async fn dispatcher(config_path: Option<&Path>) -> Result<RequestDispatcher> {
    let config = super::load_config(config_path)?;
    Ok(RequestDispatcher::new(super::connect(&config).await?))
}

fn remote_error(action: &str, e: ClientError) -> color_eyre::Report {
    if e.is_remote_rejection() {
        eyre!("Overseerr rejected the {}: {}", action, e)
    } else {
        eyre!("Failed to submit {}: {}", action, e)
    }
}

fn report(outcome: &DispatchOutcome, kind: &str, output: &Output) {
    match outcome {
        DispatchOutcome::Submitted { media_id } => {
            if output.is_human() {
                output.success(format!("Requested {} {}", kind, media_id));
            } else {
                output.data(&json!({ "status": "submitted", "media_id": media_id }));
            }
        }
        DispatchOutcome::Skipped(reason) => {
            let message = match reason {
                SkipReason::MissingInput => format!("No {} name or id provided, nothing requested", kind),
                SkipReason::NotFound { name } => format!("No {} found for '{}', nothing requested", kind, name),
                SkipReason::UnknownSeasonMode(season) => {
                    format!("Unknown season '{}', nothing requested", season)
                }
            };
            if output.is_human() {
                output.warn(message);
            } else {
                output.data(&json!({ "status": "skipped", "reason": message }));
            }
        }
    }
}

pub async fn run_request_movie(
    name: Option<String>,
    media_id: Option<String>,
    config_path: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let outcome = dispatcher(config_path)
        .await?
        .submit_movie_request(name.as_deref(), media_id.as_deref())
        .await
        .map_err(|e| remote_error("movie request", e))?;

    report(&outcome, "movie", output);
    Ok(())
}

pub async fn run_request_tv(
    name: Option<String>,
    media_id: Option<String>,
    season: SeasonMode,
    config_path: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let outcome = dispatcher(config_path)
        .await?
        .submit_tv_request(name.as_deref(), media_id.as_deref(), season.as_str())
        .await
        .map_err(|e| remote_error("TV request", e))?;

    report(&outcome, "TV show", output);
    Ok(())
}

pub async fn run_update_request(update: RequestUpdate, config_path: Option<&Path>, output: &Output) -> Result<()> {
    dispatcher(config_path)
        .await?
        .update_request(&update.request_id, &update.new_status)
        .await
        .map_err(|e| remote_error("status update", e))?;

    if output.is_human() {
        output.success(format!("Request {} set to {}", update.request_id, update.new_status));
    } else {
        output.data(&update);
    }
    Ok(())
}
