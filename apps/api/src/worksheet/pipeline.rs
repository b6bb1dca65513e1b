//! Worksheet layout pipeline: measure, paginate, assemble.
//!
//! Measuring is async and sequential on one surface. The pagination pass is
//! pure CPU work and runs on the blocking pool.

use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use crate::errors::AppError;
use crate::layout::{assemble_pages, paginate, CapacityModel};
use crate::measure::{measure_elements, MeasureOptions, SurfaceHost};
use crate::models::element::{Element, PaginationResult};
use crate::render::WorksheetRenderer;

pub struct LayoutJob {
    pub title: Option<String>,
    pub elements: Vec<Element>,
    /// Page geometry with the worksheet's age range already applied.
    pub capacity: CapacityModel,
    pub measure_timeout: Duration,
    pub cancel: Option<watch::Receiver<bool>>,
}

/// Lays out one worksheet. Zero elements give zero pages.
pub async fn paginate_worksheet(
    job: LayoutJob,
    host: &dyn SurfaceHost,
) -> Result<PaginationResult, AppError> {
    let LayoutJob {
        title,
        elements,
        capacity,
        measure_timeout,
        cancel,
    } = job;

    let element_count = elements.len();
    let renderer = WorksheetRenderer::new(capacity.age_range);
    let mut options = MeasureOptions::new(&capacity, measure_timeout);
    if let Some(cancel) = cancel {
        options = options.with_cancel(cancel);
    }

    let batch = measure_elements(elements, host, &renderer, options).await?;

    let pass_capacity = capacity.clone();
    let groups = tokio::task::spawn_blocking(move || paginate(batch.elements, &pass_capacity))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Pagination task failed: {e}")))?;

    let result = assemble_pages(groups, title.as_deref(), &capacity, batch.log);

    info!(
        elements = element_count,
        pages = result.total_pages,
        age_range = ?capacity.age_range,
        "Worksheet paginated"
    );

    Ok(result)
}
