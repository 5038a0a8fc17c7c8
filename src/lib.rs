//! Filter, resolve, classify, run and compile programs for the eight-symbol tape language.
//!
//! The pipeline is `lexer::filter` -> `brackets::resolve` -> either
//! `interpreter::Executor::run` or `codegen::compile`. Loop classification and the idiom
//! table in `optimizer` feed the profiler and the code generator.

pub mod brackets;
pub mod codegen;
pub mod interpreter;
pub mod lexer;
pub mod optimizer;
pub mod profiler;

use thiserror::Error;

pub use brackets::{resolve, JumpTable, ResolveError};
pub use codegen::{compile, CodegenError, CodegenOptions};
pub use interpreter::{
    CursorPolicy, EofBehavior, Executor, ExecutorOptions, Runtime, RuntimeError, RuntimeOptions,
};
pub use lexer::{filter, Instruction, Location, Program};
pub use optimizer::{classify, Idiom, LoopClass, OptimizationFlags, PeepholeOptimizer};
pub use profiler::Profiler;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

impl Error {
    /// Instruction position the error points at, if it has one
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::Resolve(err) => Some(err.position()),
            Error::Runtime(err) => err.position(),
            Error::Codegen(err) => err.position(),
        }
    }
}
