pub mod align;
pub mod correlation;
pub mod normalize;

// Re-export the main entry points (e.g. `use crate::analysis::align`).
pub use align::align;
pub use correlation::{correlate, CorrelationResult};
pub use normalize::{price_observations, sentiment_events};
