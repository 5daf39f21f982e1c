//! trc - a small statically typed language that transpiles to C
//!
//! The pipeline is strictly linear: source text is tokenized, the tokens
//! are parsed into an AST, a best-effort semantic pass runs over the
//! statements, and the code generator emits a single C translation unit.
//! Compiling and running the generated C is the job of an external
//! toolchain, not this crate.

pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod codegen;
pub mod diagnostics;
pub mod driver;

// Re-export commonly used types
pub use driver::Driver;
pub use diagnostics::{Diagnostic, DiagnosticLevel, SourceLocation};
