// Worksheet layout core: role classification, page capacity, height estimates,
// move-back rules, the pagination pass and page assembly.
// Everything here is pure and synchronous; measuring lives in `crate::measure`.

pub mod assembler;
pub mod capacity;
pub mod estimates;
pub mod paginator;
pub mod roles;
pub mod rules;

// Re-export the public API consumed by the measurement pass and the worksheet pipeline.
pub use assembler::assemble_pages;
pub use capacity::{AgeRange, CapacityModel};
pub use estimates::HeightEstimator;
pub use paginator::paginate;
