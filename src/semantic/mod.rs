//! Semantic analysis module for pre-generation validation.

mod checker;

pub use checker::Checker;
