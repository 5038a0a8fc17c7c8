use tracing::debug;

use crate::lexer::{Instruction, Program};

use super::{JumpTable, ResolveError};

/// Match every `[` with its `]` in one pass.
///
/// The stack holds the positions of the currently open loops, so when the scan ends
/// with something left over the top of the stack is the innermost unmatched `[`.
pub fn resolve(program: &Program) -> Result<JumpTable, ResolveError> {
    let mut table = JumpTable::with_len(program.len());
    let mut stack = vec![];

    for (position, instruction) in program.instructions().iter().enumerate() {
        match instruction {
            Instruction::LoopOpen => stack.push(position),
            Instruction::LoopClose => match stack.pop() {
                Some(open) => table.link(open, position),
                None => return Err(ResolveError::UnmatchedClose { position }),
            },
            _ => {}
        }
    }

    if let Some(&position) = stack.last() {
        return Err(ResolveError::UnmatchedOpen { position });
    }

    debug!(
        instructions = program.len(),
        loops = table.loop_count(),
        "resolved jump table"
    );
    Ok(table)
}
