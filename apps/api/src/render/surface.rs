//! In-process rendering surface that lays text out with static font metrics.
//!
//! Fragments drawn into a region are queued and only laid out on the next
//! frame, mirroring how a real layout engine settles.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::measure::{Fragment, MeasureError, RegionId, RenderSurface, SurfaceHost, TextStyle};
use crate::render::font_metrics::{FontFamily, TextMeasurer};

enum Pending {
    Text { text: String, style: TextStyle },
    Block { height: f32 },
}

#[derive(Default)]
struct Region {
    committed: f32,
    pending: Vec<Pending>,
}

pub struct MetricSurface {
    width: f32,
    font: FontFamily,
    next_id: RegionId,
    regions: HashMap<RegionId, Region>,
    released: bool,
}

impl MetricSurface {
    pub fn new(width: f32, font: FontFamily) -> Self {
        Self {
            width,
            font,
            next_id: 0,
            regions: HashMap::new(),
            released: false,
        }
    }

    pub fn open_regions(&self) -> usize {
        self.regions.len()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn layout(&self, fragment: &Pending) -> f32 {
        match fragment {
            Pending::Block { height } => *height,
            Pending::Text { text, style } => {
                let measurer = TextMeasurer::new(self.font, style.font_size);
                let max_width = (self.width - style.indent).max(style.font_size);
                let lines = measurer.line_count(text, max_width);
                lines as f32 * style.font_size * style.line_height
            }
        }
    }
}

#[async_trait]
impl RenderSurface for MetricSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn open_region(&mut self) -> Result<RegionId, MeasureError> {
        if self.released {
            return Err(MeasureError::Surface("surface already released".to_string()));
        }
        self.next_id += 1;
        self.regions.insert(self.next_id, Region::default());
        Ok(self.next_id)
    }

    fn draw(&mut self, region: RegionId, fragment: Fragment<'_>) -> Result<(), MeasureError> {
        let slot = self
            .regions
            .get_mut(&region)
            .ok_or(MeasureError::UnknownRegion(region))?;

        let pending = match fragment {
            Fragment::Text { text, style } => {
                if !(style.font_size > 0.0 && style.line_height > 0.0) {
                    return Err(MeasureError::Render(format!(
                        "invalid text style {style:?}"
                    )));
                }
                Pending::Text {
                    text: text.to_string(),
                    style,
                }
            }
            Fragment::Block { height } => {
                if !height.is_finite() || height < 0.0 {
                    return Err(MeasureError::Render(format!("invalid block height {height}")));
                }
                Pending::Block { height }
            }
        };
        slot.pending.push(pending);
        Ok(())
    }

    async fn next_frame(&mut self) {
        tokio::task::yield_now().await;

        let mut settled: Vec<(RegionId, f32)> = Vec::with_capacity(self.regions.len());
        for (id, region) in &self.regions {
            let added: f32 = region.pending.iter().map(|f| self.layout(f)).sum();
            settled.push((*id, added));
        }
        for (id, added) in settled {
            if let Some(region) = self.regions.get_mut(&id) {
                region.committed += added;
                region.pending.clear();
            }
        }
    }

    fn region_height(&self, region: RegionId) -> Result<f32, MeasureError> {
        self.regions
            .get(&region)
            .map(|r| r.committed)
            .ok_or(MeasureError::UnknownRegion(region))
    }

    fn close_region(&mut self, region: RegionId) {
        self.regions.remove(&region);
    }

    fn release(&mut self) {
        self.regions.clear();
        self.released = true;
    }
}

/// Hands out `MetricSurface`s in one font family.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricSurfaceHost {
    pub font: FontFamily,
}

impl MetricSurfaceHost {
    pub fn new(font: FontFamily) -> Self {
        Self { font }
    }
}

impl SurfaceHost for MetricSurfaceHost {
    fn acquire(&self, width: f32) -> Result<Box<dyn RenderSurface>, MeasureError> {
        if !(width.is_finite() && width > 0.0) {
            return Err(MeasureError::Surface(format!("invalid surface width {width}")));
        }
        Ok(Box::new(MetricSurface::new(width, self.font)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_style(font_size: f32) -> TextStyle {
        TextStyle {
            font_size,
            line_height: 1.5,
            indent: 0.0,
        }
    }

    #[tokio::test]
    async fn test_height_only_settles_after_frame() {
        let mut surface = MetricSurface::new(600.0, FontFamily::Sans);
        let region = surface.open_region().unwrap();
        surface
            .draw(region, Fragment::Block { height: 40.0 })
            .unwrap();
        surface
            .draw(
                region,
                Fragment::Text {
                    text: "Label the parts of a plant",
                    style: make_style(20.0),
                },
            )
            .unwrap();

        assert_eq!(surface.region_height(region).unwrap(), 0.0);
        surface.next_frame().await;
        assert_eq!(surface.region_height(region).unwrap(), 70.0);
    }

    #[tokio::test]
    async fn test_indent_narrows_line() {
        let text = "word ".repeat(30);
        let mut surface = MetricSurface::new(600.0, FontFamily::Sans);

        let plain = surface.open_region().unwrap();
        surface
            .draw(plain, Fragment::Text { text: &text, style: make_style(16.0) })
            .unwrap();
        let indented = surface.open_region().unwrap();
        let style = TextStyle {
            indent: 300.0,
            ..make_style(16.0)
        };
        surface
            .draw(indented, Fragment::Text { text: &text, style })
            .unwrap();
        surface.next_frame().await;

        assert!(surface.region_height(indented).unwrap() > surface.region_height(plain).unwrap());
    }

    #[test]
    fn test_draw_rejects_bad_input() {
        let mut surface = MetricSurface::new(600.0, FontFamily::Sans);
        let region = surface.open_region().unwrap();
        assert!(surface.draw(region, Fragment::Block { height: f32::NAN }).is_err());
        assert!(surface.draw(region, Fragment::Block { height: -1.0 }).is_err());
        assert!(matches!(
            surface.draw(99, Fragment::Block { height: 1.0 }),
            Err(MeasureError::UnknownRegion(99))
        ));
    }

    #[test]
    fn test_close_and_release() {
        let mut surface = MetricSurface::new(600.0, FontFamily::Sans);
        let a = surface.open_region().unwrap();
        let _b = surface.open_region().unwrap();
        surface.close_region(a);
        assert_eq!(surface.open_regions(), 1);
        assert!(surface.region_height(a).is_err());

        surface.release();
        assert!(surface.is_released());
        assert_eq!(surface.open_regions(), 0);
        assert!(surface.open_region().is_err());
    }

    #[test]
    fn test_host_rejects_zero_width() {
        let host = MetricSurfaceHost::default();
        assert!(host.acquire(0.0).is_err());
        assert!(host.acquire(794.0).is_ok());
    }
}
