//! Measurement Provider: Renders each element off-screen and reads its height.
//!
//! # Resource model
//! One `RenderSurface` is acquired per pagination run and wrapped in a
//! `SurfaceLease`. The lease tracks the scoped region currently open and, on
//! drop, closes it and releases the surface. That covers normal completion,
//! errors, timeouts, explicit cancellation and the caller dropping the future.
//!
//! # Ordering
//! Elements are measured strictly one after another: every element renders into
//! the same surface, so overlapping renders would corrupt the readings.
//!
//! # Failure
//! A failed or timed-out element gets the estimator's height and a warning; the
//! pass continues. Only surface acquisition and cancellation abort the pass.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::layout::{CapacityModel, HeightEstimator};
use crate::models::element::{Element, HeightSource, MeasuredElement, MeasurementRecord};

/// Frames to wait after rendering before the height is stable.
const SETTLE_FRAMES: usize = 2;

pub type RegionId = u32;

#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("Failed to acquire rendering surface: {0}")]
    Surface(String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Unknown region {0}")]
    UnknownRegion(RegionId),

    #[error("Height could not be read: {0}")]
    Unreadable(String),

    #[error("Measurement cancelled")]
    Cancelled,
}

// ────────────────────────────────────────────────────────────────────────────
// Surface contract
// ────────────────────────────────────────────────────────────────────────────

/// Text run styling, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    /// Multiplier on `font_size` per printed line.
    pub line_height: f32,
    /// Horizontal inset from the region's left edge.
    pub indent: f32,
}

/// A drawing primitive placed into a region, stacked top to bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fragment<'a> {
    Text { text: &'a str, style: TextStyle },
    /// Fixed-height box: rules, answer lines, images, table rows.
    Block { height: f32 },
}

/// An invisible rendering surface sized to the page width.
///
/// Drawing is lazy: fragments placed into a region are laid out on the next
/// frame, so `region_height` is only meaningful after `next_frame` has run.
#[async_trait]
pub trait RenderSurface: Send {
    fn width(&self) -> f32;

    /// Opens a scoped child region.
    fn open_region(&mut self) -> Result<RegionId, MeasureError>;

    fn draw(&mut self, region: RegionId, fragment: Fragment<'_>) -> Result<(), MeasureError>;

    /// Waits for one paint/layout cycle.
    async fn next_frame(&mut self);

    fn region_height(&self, region: RegionId) -> Result<f32, MeasureError>;

    fn close_region(&mut self, region: RegionId);

    /// Releases the whole surface. Called exactly once, by `SurfaceLease`.
    fn release(&mut self);
}

/// Hands out rendering surfaces.
pub trait SurfaceHost: Send + Sync {
    fn acquire(&self, width: f32) -> Result<Box<dyn RenderSurface>, MeasureError>;
}

/// The caller-supplied render callback.
pub trait ElementRenderer: Send + Sync {
    fn render_into(
        &self,
        element: &Element,
        surface: &mut dyn RenderSurface,
        region: RegionId,
    ) -> Result<(), MeasureError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Lease
// ────────────────────────────────────────────────────────────────────────────

/// Exclusive ownership of one surface for one pagination run.
pub struct SurfaceLease {
    surface: Box<dyn RenderSurface>,
    open_region: Option<RegionId>,
}

impl SurfaceLease {
    pub fn acquire(host: &dyn SurfaceHost, width: f32) -> Result<Self, MeasureError> {
        let surface = host.acquire(width)?;
        debug!(width, "Rendering surface acquired");
        Ok(Self {
            surface,
            open_region: None,
        })
    }

    /// Renders one element into a fresh region and reads its settled height.
    ///
    /// On error the region stays tracked; `close_open_region` (or drop) cleans
    /// it up.
    pub async fn measure_one(
        &mut self,
        element: &Element,
        renderer: &dyn ElementRenderer,
    ) -> Result<f32, MeasureError> {
        let region = self.surface.open_region()?;
        self.open_region = Some(region);

        renderer.render_into(element, &mut *self.surface, region)?;
        for _ in 0..SETTLE_FRAMES {
            self.surface.next_frame().await;
        }

        let height = self.surface.region_height(region)?;
        self.close_open_region();

        if !height.is_finite() || height < 0.0 {
            return Err(MeasureError::Unreadable(format!("invalid height {height}")));
        }
        Ok(height)
    }

    pub fn close_open_region(&mut self) {
        if let Some(region) = self.open_region.take() {
            self.surface.close_region(region);
        }
    }
}

impl Drop for SurfaceLease {
    fn drop(&mut self) {
        self.close_open_region();
        self.surface.release();
        debug!("Rendering surface released");
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Measurement pass
// ────────────────────────────────────────────────────────────────────────────

pub struct MeasureOptions {
    /// Surface width in pixels.
    pub width: f32,
    /// Upper bound for one element's render-and-settle.
    pub timeout: Duration,
    pub estimator: HeightEstimator,
    /// Flipping the sender to `true` aborts the pass.
    pub cancel: Option<watch::Receiver<bool>>,
}

impl MeasureOptions {
    pub fn new(capacity: &CapacityModel, timeout: Duration) -> Self {
        Self {
            width: capacity.page_width,
            timeout,
            estimator: HeightEstimator::new(capacity.age_range),
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredBatch {
    pub elements: Vec<MeasuredElement>,
    pub log: Vec<MeasurementRecord>,
}

/// Measures every element in input order.
pub async fn measure_elements(
    elements: Vec<Element>,
    host: &dyn SurfaceHost,
    renderer: &dyn ElementRenderer,
    options: MeasureOptions,
) -> Result<MeasuredBatch, MeasureError> {
    let MeasureOptions {
        width,
        timeout,
        estimator,
        mut cancel,
    } = options;

    let mut lease = SurfaceLease::acquire(host, width)?;
    let mut measured = Vec::with_capacity(elements.len());
    let mut log = Vec::with_capacity(elements.len());
    let mut fallbacks = 0usize;

    for (index, element) in elements.into_iter().enumerate() {
        if is_cancelled(&cancel) {
            warn!(index, "Measurement cancelled before element");
            return Err(MeasureError::Cancelled);
        }

        let estimated = estimator.estimate(&element.element_type);

        let outcome = tokio::select! {
            biased;
            _ = wait_cancelled(&mut cancel) => {
                warn!(index, "Measurement cancelled mid-render");
                return Err(MeasureError::Cancelled);
            }
            outcome = tokio::time::timeout(timeout, lease.measure_one(&element, renderer)) => outcome,
        };
        lease.close_open_region();

        let (measured_height, source) = match outcome {
            Ok(Ok(height)) => (height, HeightSource::Measured),
            Ok(Err(e)) => {
                warn!(
                    index,
                    element_type = %element.element_type,
                    error = %e,
                    "Measurement failed, using estimated height"
                );
                (estimated, HeightSource::Fallback)
            }
            Err(_) => {
                warn!(
                    index,
                    element_type = %element.element_type,
                    timeout_ms = timeout.as_millis() as u64,
                    "Render timed out, using estimated height"
                );
                (estimated, HeightSource::Fallback)
            }
        };
        if source == HeightSource::Fallback {
            fallbacks += 1;
        }

        log.push(MeasurementRecord {
            index,
            element_type: element.element_type.clone(),
            estimated_height: estimated,
            measured_height,
            delta: measured_height - estimated,
            source,
        });
        measured.push(MeasuredElement {
            element_id: index,
            element,
            measured_height,
        });
    }

    drop(lease);

    info!(
        elements = measured.len(),
        fallbacks, "Measurement pass complete"
    );

    Ok(MeasuredBatch {
        elements: measured,
        log,
    })
}

fn is_cancelled(cancel: &Option<watch::Receiver<bool>>) -> bool {
    cancel.as_ref().is_some_and(|rx| *rx.borrow())
}

/// Resolves once cancellation is requested. Never resolves without a receiver
/// or after the sender is dropped without cancelling.
async fn wait_cancelled(cancel: &mut Option<watch::Receiver<bool>>) {
    if let Some(rx) = cancel {
        let sender_gone = rx.wait_for(|cancelled| *cancelled).await.is_err();
        if !sender_gone {
            return;
        }
    }
    std::future::pending::<()>().await
}
