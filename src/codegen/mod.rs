//! Code generation module for emitting C from the AST.

mod c_emitter;

pub use c_emitter::{CEmitter, GenError};
