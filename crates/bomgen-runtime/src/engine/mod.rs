//! Expression evaluation engine
//!
//! Provides the tree-walking evaluator for parsed pattern expressions.

pub mod evaluator;
mod operators;

// Re-export for convenience
pub use evaluator::Evaluator;
