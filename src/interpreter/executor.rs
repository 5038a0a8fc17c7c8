use std::collections::HashMap;

use tracing::debug;

use crate::{
    brackets::JumpTable,
    lexer::{Instruction, Program},
    optimizer::{Idiom, PeepholeOptimizer},
    profiler::Profiler,
};

use super::{Runtime, RuntimeError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutorOptions {
    /// Apply idiom closed forms instead of stepping through matching loops
    pub fast_idioms: bool,
}

/// Runs a resolved program directly against a `Runtime`
#[derive(Debug, Clone, Default)]
pub struct Executor {
    options: ExecutorOptions,
}

impl Executor {
    pub fn new(options: ExecutorOptions) -> Self {
        Self { options }
    }

    /// Run to completion.
    ///
    /// The output stream is flushed even if the run fails part way, bytes that were
    /// already written stay written.
    pub fn run(
        &self,
        runtime: &mut Runtime,
        program: &Program,
        jumps: &JumpTable,
        profiler: &mut Profiler,
    ) -> Result<(), RuntimeError> {
        let idioms = if self.options.fast_idioms {
            PeepholeOptimizer::new().matches(program, jumps)
        } else {
            HashMap::new()
        };

        let result = self.dispatch(runtime, program, jumps, &idioms, profiler);
        let flushed = runtime.flush();
        let steps = result?;
        flushed?;

        debug!(steps, cursor = runtime.cursor(), "run finished");
        Ok(())
    }

    fn dispatch(
        &self,
        runtime: &mut Runtime,
        program: &Program,
        jumps: &JumpTable,
        idioms: &HashMap<usize, Idiom>,
        profiler: &mut Profiler,
    ) -> Result<u64, RuntimeError> {
        let instructions = program.instructions();
        let mut steps: u64 = 0;
        let mut ip = 0;

        while ip < instructions.len() {
            let instruction = instructions[ip];
            profiler.record_instruction(instruction);
            steps += 1;

            match instruction {
                Instruction::MoveRight => move_cursor(runtime, 1, ip)?,
                Instruction::MoveLeft => move_cursor(runtime, -1, ip)?,
                Instruction::Increment => runtime.increment(),
                Instruction::Decrement => runtime.decrement(),
                Instruction::Output => runtime.write()?,
                Instruction::Input => runtime.read()?,
                Instruction::LoopOpen => {
                    let close = target(jumps, ip)?;
                    if runtime.value_is_zero() {
                        ip = close;
                    } else {
                        profiler.record_loop_entry(ip);
                        if let Some(&idiom) = idioms.get(&ip) {
                            if apply_idiom(runtime, idiom, ip)? {
                                ip = close;
                            }
                        }
                    }
                }
                Instruction::LoopClose => {
                    if !runtime.value_is_zero() {
                        let open = target(jumps, ip)?;
                        profiler.record_loop_iteration(open);
                        ip = open;
                    }
                }
            }

            // jump targets are the brackets themselves so this lands just past them
            ip += 1;
        }

        Ok(steps)
    }
}

fn target(jumps: &JumpTable, position: usize) -> Result<usize, RuntimeError> {
    jumps
        .target(position)
        .ok_or(RuntimeError::UnresolvedBracket { position })
}

fn shifted(runtime: &Runtime, delta: isize, position: usize) -> Result<usize, RuntimeError> {
    runtime
        .offset(delta)
        .ok_or(RuntimeError::PointerOutOfBounds {
            position,
            cursor: runtime.cursor(),
            delta,
        })
}

fn move_cursor(runtime: &mut Runtime, delta: isize, position: usize) -> Result<(), RuntimeError> {
    if runtime.move_cursor(delta) {
        Ok(())
    } else {
        Err(RuntimeError::PointerOutOfBounds {
            position,
            cursor: runtime.cursor(),
            delta,
        })
    }
}

/// Apply an idiom to a loop that is about to run (the current cell is non-zero).
///
/// Returns false when the closed form doesn't hold for this tape and the loop has to
/// be stepped through normally.
fn apply_idiom(runtime: &mut Runtime, idiom: Idiom, position: usize) -> Result<bool, RuntimeError> {
    match idiom {
        Idiom::Clear => runtime.set_current(0),
        Idiom::Scan { stride } => {
            while !runtime.value_is_zero() {
                move_cursor(runtime, stride, position)?;
            }
        }
        Idiom::MoveAdd { offset, factor } => {
            let destination = shifted(runtime, offset, position)?;
            // on a tiny wrapping tape the destination can be the cell itself
            if destination == runtime.cursor() {
                return Ok(false);
            }
            let amount = runtime.current().wrapping_mul(factor as u8);
            let value = runtime.cell(destination).wrapping_add(amount);
            runtime.set_cell(destination, value);
            runtime.set_current(0);
        }
    }
    Ok(true)
}
