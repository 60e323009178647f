use axum::{
    Json,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures::{StreamExt, stream};
use mealgen_planner::{GenerationRequest, build_prompt};
use serde::Deserialize;

use super::AppState;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePayload {
    pub days: Option<u32>,
    pub people: Option<u32>,
    pub excluded_ingredients: Option<String>,
}

/// POST /api/generate-meal-plan
///
/// Streams the generated plan back as `text/plain`, fragment by fragment, as
/// the upstream model produces it.
#[tracing::instrument(skip_all)]
pub async fn action(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePayload>, JsonRejection>,
) -> Result<Response, AppError> {
    let Some(generator) = state.generator.clone() else {
        return Err(AppError::MissingCredential);
    };

    let Json(payload) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected generation payload");
        AppError::BadRequest(e.body_text())
    })?;

    let days = payload.days.filter(|days| *days > 0);
    let people = payload.people.filter(|people| *people > 0);
    let (Some(days), Some(people)) = (days, people) else {
        return Err(AppError::BadRequest(
            "Days and people are required".to_string(),
        ));
    };

    let request =
        GenerationRequest::new(days, people, payload.excluded_ingredients.unwrap_or_default())?;
    tracing::info!(days, people, exclusions = request.exclusions().is_some(), "Generating meal plan");

    let mut fragments = generator.stream_text(&build_prompt(&request)).await?;

    // Until the first fragment arrives the status can still become an error.
    let first = match fragments.next().await {
        Some(Err(e)) => return Err(e.into()),
        first => first,
    };

    let body = stream::iter(first).chain(fragments).map(|fragment| {
        fragment.map(Bytes::from).inspect_err(|e| {
            tracing::error!("Upstream stream failed after response started: {}", e);
        })
    });

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        Body::from_stream(body),
    )
        .into_response())
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
