// In-process rendering for the measurement pass: static font metrics, a
// metric-backed `RenderSurface`, and the element renderer that decomposes
// worksheet elements into fragments.

pub mod font_metrics;
pub mod renderer;
pub mod surface;

pub use font_metrics::FontFamily;
pub use renderer::WorksheetRenderer;
pub use surface::MetricSurfaceHost;
