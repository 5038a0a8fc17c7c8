//! NASM flavoured x86-64 output for Linux.
//!
//! The generated program keeps the cursor in `rsi` which is also the buffer argument
//! of the `read`/`write` syscalls, so cell I/O needs no extra moves.

pub mod codegen;
pub mod instruction;
pub mod operand;
pub mod ops;
pub mod registers;

pub use self::codegen::X86_64Codegen;
pub use self::instruction::Line;
