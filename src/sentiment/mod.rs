pub mod classifier;
pub mod lexicon;

// Re-export the classifier entry points (e.g. `use crate::sentiment::classify`).
pub use classifier::{annotate_rows, classify, Classification};
