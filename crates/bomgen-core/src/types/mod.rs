//! Type system for the pattern engine
//!
//! This module contains the runtime type system including:
//! - Value types
//! - The immutable variable environment
//! - Source spans

pub mod environment;
pub mod span;
pub mod value;

pub use environment::Environment;
pub use span::Span;
pub use value::Value;
