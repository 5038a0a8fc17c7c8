pub mod x86_64;

use std::io::Write;

use thiserror::Error;

use crate::{
    brackets::JumpTable, interpreter::DEFAULT_TAPE_SIZE, lexer::Program,
    optimizer::OptimizationFlags,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Bytes reserved for the tape, at least one
    pub tape_size: usize,
    /// Keep the cursor on the tape by wrapping, like the interpreter's default policy
    pub wrap_pointer: bool,
    pub optimizations: OptimizationFlags,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            wrap_pointer: true,
            optimizations: OptimizationFlags::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("No matching bracket recorded for position {position}")]
    UnresolvedBracket { position: usize },

    #[error("IO Error")]
    Io(
        #[from]
        std::io::Error,
    ),
}

impl CodegenError {
    pub fn position(&self) -> Option<usize> {
        match *self {
            CodegenError::UnresolvedBracket { position } => Some(position),
            CodegenError::Io(_) => None,
        }
    }
}

pub trait CodeGen {
    fn new(options: CodegenOptions) -> Self
    where
        Self: Sized;

    /// Lower a resolved program, the jump table decides which `]` closes which `[`
    fn load(&mut self, program: &Program, jumps: &JumpTable) -> Result<(), CodegenError>;

    fn write_to(&self, out: &mut dyn Write) -> Result<(), CodegenError>;
}

pub use self::x86_64::{Line, X86_64Codegen};

/// Lower `program` into assembly text
pub fn compile(
    program: &Program,
    jumps: &JumpTable,
    options: CodegenOptions,
) -> Result<String, CodegenError> {
    let mut codegen = x86_64::X86_64Codegen::new(options);
    codegen.load(program, jumps)?;
    Ok(codegen.assembly())
}
