//! Axum route handlers for the Worksheet API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::AgeRange;
use crate::models::element::{Element, PaginationResult};
use crate::state::AppState;
use crate::worksheet::generator::{generate_worksheet, GenerateRequest};
use crate::worksheet::pipeline::{paginate_worksheet, LayoutJob};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PaginateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub age_range: Option<String>,
    pub elements: Vec<Element>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedWorksheet {
    pub worksheet_id: Uuid,
    pub title: Option<String>,
    pub age_range: AgeRange,
    pub created_at: DateTime<Utc>,
    pub result: PaginationResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/worksheets/paginate
///
/// Lays out a caller-supplied element list.
pub async fn handle_paginate(
    State(state): State<AppState>,
    Json(request): Json<PaginateRequest>,
) -> Result<Json<PaginatedWorksheet>, AppError> {
    let age_range = resolve_age_range(request.age_range.as_deref());
    let worksheet = layout(&state, request.title, age_range, request.elements).await?;
    Ok(Json(worksheet))
}

/// POST /api/v1/worksheets/generate
///
/// Generates a worksheet for a topic, then lays it out.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<PaginatedWorksheet>, AppError> {
    if request.topic.trim().is_empty() {
        return Err(AppError::Validation("topic cannot be empty".to_string()));
    }
    let llm = state.llm.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Generation requires ANTHROPIC_API_KEY".to_string())
    })?;

    let age_range = resolve_age_range(request.age_range.as_deref());
    let draft = generate_worksheet(llm, &request, age_range).await?;
    let title = Some(draft.title).filter(|t| !t.trim().is_empty());

    let worksheet = layout(&state, title, age_range, draft.elements).await?;
    Ok(Json(worksheet))
}

async fn layout(
    state: &AppState,
    title: Option<String>,
    age_range: AgeRange,
    elements: Vec<Element>,
) -> Result<PaginatedWorksheet, AppError> {
    let mut capacity = state.capacity.clone();
    capacity.set_age_range(age_range);

    let job = LayoutJob {
        title: title.clone(),
        elements,
        capacity,
        measure_timeout: state.config.measure_timeout(),
        cancel: None,
    };
    let result = paginate_worksheet(job, state.surface_host.as_ref()).await?;

    Ok(PaginatedWorksheet {
        worksheet_id: Uuid::new_v4(),
        title,
        age_range,
        created_at: Utc::now(),
        result,
    })
}

fn resolve_age_range(label: Option<&str>) -> AgeRange {
    label.map(AgeRange::parse_label).unwrap_or_default()
}
