use std::{collections::HashMap, io::Write};

use tracing::{debug, trace};

use crate::{
    brackets::JumpTable,
    codegen::{CodeGen, CodegenError, CodegenOptions},
    lexer::{Instruction, Program},
    optimizer::{Idiom, OptimizationFlags, PeepholeOptimizer},
};

use super::{
    instruction::Line,
    operand::Operand,
    ops::{self, JumpOperator},
    registers::{Registers, A, C, CURSOR, D, DI, TAPE_END, TAPE_START},
};

const TAPE_SYMBOL: &str = "tape";

const SYS_READ: i64 = 0;
const SYS_WRITE: i64 = 1;
const SYS_EXIT: i64 = 60;
const STDIN: i64 = 0;
const STDOUT: i64 = 1;

/*
    - RSI: cursor (address of the current cell)
    - R12: first cell of the tape
    - R13: one past the last cell of the tape
    - RAX/RCX/RDX/RDI: scratch and syscall arguments

    `[ ... ]` is lowered as
        loop_N_start: if (*cursor == 0) goto loop_N_end;
        ...
        loop_N_end:   if (*cursor != 0) goto loop_N_start;
    where N is handed out in order of the `[` and the `]` finds it through the jump table.
*/

pub struct X86_64Codegen {
    options: CodegenOptions,
    lines: Vec<Line>,
    optimizer: PeepholeOptimizer,

    /// Next loop number to hand out
    next_loop: usize,

    /// Loop number waiting for the `]` at the key position
    pending_closes: HashMap<usize, usize>,

    idioms_used: usize,
}

impl X86_64Codegen {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The whole program as text, one line per `Line`
    pub fn assembly(&self) -> String {
        let mut text = String::new();
        for line in self.lines.iter() {
            text.push_str(&line.to_string());
            text.push('\n');
        }
        text
    }

    fn push(&mut self, line: impl Into<Line>) {
        self.lines.push(line.into());
    }

    fn tape_size(&self) -> i64 {
        self.options.tape_size.max(1) as i64
    }

    fn cell() -> Operand {
        Operand::byte_at(CURSOR, 0)
    }

    fn label(&mut self, name: String) {
        self.lines.push(Line::Label(name));
    }

    fn prologue(&mut self) {
        let tape_size = self.options.tape_size.max(1);
        self.push(Line::Section(".bss"));
        self.push(Line::Reserve {
            symbol: TAPE_SYMBOL,
            bytes: tape_size,
        });
        self.push(Line::Section(".text"));
        self.push(Line::Global("_start"));
        self.label(String::from("_start"));

        if self.options.wrap_pointer {
            self.push(ops::mov(TAPE_START.qword(), Operand::symbol(TAPE_SYMBOL)).with_comment("tape start"));
            self.push(
                ops::lea(TAPE_END.qword(), Operand::address(TAPE_START, self.tape_size()))
                    .with_comment("one past the tape end"),
            );
            self.push(ops::mov(CURSOR.qword(), TAPE_START.qword()).with_comment("cursor"));
        } else {
            self.push(ops::mov(CURSOR.qword(), Operand::symbol(TAPE_SYMBOL)).with_comment("cursor"));
        }
    }

    fn epilogue(&mut self) {
        self.label(String::from("end_program"));
        self.push(ops::mov(A.qword(), SYS_EXIT));
        self.push(ops::xor(DI.qword(), DI.qword()).with_comment("exit code 0"));
        self.push(ops::syscall());
    }

    fn move_right(&mut self) {
        self.push(ops::inc(CURSOR.qword()));
        if self.options.wrap_pointer {
            self.push(ops::cmp(CURSOR.qword(), TAPE_END.qword()));
            self.push(ops::cmove(CURSOR.qword(), TAPE_START.qword()));
        }
    }

    fn move_left(&mut self) {
        if self.options.wrap_pointer {
            self.push(ops::cmp(CURSOR.qword(), TAPE_START.qword()));
            self.push(ops::cmove(CURSOR.qword(), TAPE_END.qword()));
        }
        self.push(ops::dec(CURSOR.qword()));
    }

    fn syscall(&mut self, number: i64, fd: i64) {
        // rsi already points at the cell
        self.push(ops::mov(A.qword(), number));
        self.push(ops::mov(DI.qword(), fd));
        self.push(ops::mov(D.qword(), 1i64));
        self.push(ops::syscall());
    }

    /// Bring the address in `register` back onto the tape after moving it by `delta`,
    /// `|delta|` is smaller than the tape so one correction is enough
    fn wrap_address(&mut self, register: Registers, delta: i64) {
        let size = self.tape_size();
        if delta > 0 {
            self.push(ops::lea(D.qword(), Operand::address(register, -size)));
            self.push(ops::cmp(register.qword(), TAPE_END.qword()));
            self.push(ops::cmovae(register.qword(), D.qword()));
        } else {
            self.push(ops::lea(D.qword(), Operand::address(register, size)));
            self.push(ops::cmp(register.qword(), TAPE_START.qword()));
            self.push(ops::cmovb(register.qword(), D.qword()));
        }
    }

    /// Whether an idiom that reaches `distance` cells away still has a closed form here
    fn fits_on_tape(&self, distance: isize) -> bool {
        !self.options.wrap_pointer || (distance.unsigned_abs() as i64) < self.tape_size()
    }

    /// Emit the closed form of `idiom`, false if it can't be used on this tape
    fn emit_idiom(&mut self, idiom: Idiom, number: usize) -> bool {
        match idiom {
            Idiom::Clear => {
                self.push(ops::mov(Self::cell(), 0i64));
            }
            Idiom::Scan { stride } => {
                if !self.fits_on_tape(stride) {
                    return false;
                }
                let start = format!("scan_{}", number);
                let done = format!("scan_{}_done", number);
                let stride = stride as i64;

                self.label(start.clone());
                self.push(ops::cmp(Self::cell(), 0i64));
                self.push(ops::jump_op(JumpOperator::JumpIfZero, &done));
                if stride > 0 {
                    self.push(ops::add(CURSOR.qword(), stride));
                } else {
                    self.push(ops::sub(CURSOR.qword(), -stride));
                }
                if self.options.wrap_pointer {
                    self.wrap_address(CURSOR, stride);
                }
                self.push(ops::jump_op(JumpOperator::Jump, &start));
                self.label(done);
            }
            Idiom::MoveAdd { offset, factor } => {
                if offset == 0 || !self.fits_on_tape(offset) {
                    return false;
                }
                let offset = offset as i64;
                let destination = if self.options.wrap_pointer {
                    self.push(ops::lea(A.qword(), Operand::address(CURSOR, offset)));
                    self.wrap_address(A, offset);
                    Operand::byte_at(A, 0)
                } else {
                    Operand::byte_at(CURSOR, offset)
                };

                self.push(ops::mov(C.byte(), Self::cell()));
                for _ in 0..factor.unsigned_abs() {
                    if factor > 0 {
                        self.push(ops::add(destination.clone(), C.byte()));
                    } else {
                        self.push(ops::sub(destination.clone(), C.byte()));
                    }
                }
                self.push(ops::mov(Self::cell(), 0i64));
            }
        }
        true
    }

    fn loop_open(&mut self, position: usize, close: usize, number: usize) {
        self.pending_closes.insert(close, number);
        self.label(format!("loop_{}_start", number));
        self.push(ops::cmp(Self::cell(), 0i64));
        self.push(ops::jump_op(
            JumpOperator::JumpIfZero,
            &format!("loop_{}_end", number),
        ));
        trace!(position, close, number, "opened loop");
    }

    fn loop_close(&mut self, position: usize) -> Result<(), CodegenError> {
        let number = self
            .pending_closes
            .remove(&position)
            .ok_or(CodegenError::UnresolvedBracket { position })?;
        self.label(format!("loop_{}_end", number));
        self.push(ops::cmp(Self::cell(), 0i64));
        self.push(ops::jump_op(
            JumpOperator::JumpIfNotZero,
            &format!("loop_{}_start", number),
        ));
        Ok(())
    }
}

impl CodeGen for X86_64Codegen {
    fn new(options: CodegenOptions) -> Self {
        X86_64Codegen {
            options,
            lines: vec![],
            optimizer: PeepholeOptimizer::new(),
            next_loop: 0,
            pending_closes: HashMap::new(),
            idioms_used: 0,
        }
    }

    fn load(&mut self, program: &Program, jumps: &JumpTable) -> Result<(), CodegenError> {
        let flags = self.options.optimizations;
        let target = |position: usize| {
            jumps
                .target(position)
                .ok_or(CodegenError::UnresolvedBracket { position })
        };

        self.lines.clear();
        self.pending_closes.clear();
        self.next_loop = 0;
        self.idioms_used = 0;
        self.prologue();

        let mut position = 0;
        // the first cell starts at zero so a leading loop can never run
        if flags.contains(OptimizationFlags::COMMENT_BLOCK)
            && program.get(0) == Some(Instruction::LoopOpen)
        {
            position = target(0)? + 1;
            debug!(skipped = position, "dropped leading comment loop");
        }

        while position < program.len() {
            match program.instructions()[position] {
                Instruction::MoveRight => self.move_right(),
                Instruction::MoveLeft => self.move_left(),
                Instruction::Increment => self.push(ops::inc(Self::cell())),
                Instruction::Decrement => self.push(ops::dec(Self::cell())),
                Instruction::Output => self.syscall(SYS_WRITE, STDOUT),
                Instruction::Input => self.syscall(SYS_READ, STDIN),
                Instruction::LoopOpen => {
                    let close = target(position)?;
                    if close <= position || close >= program.len() {
                        return Err(CodegenError::UnresolvedBracket { position });
                    }
                    let number = self.next_loop;
                    self.next_loop += 1;

                    if flags.contains(OptimizationFlags::IDIOMS) {
                        if let Some(idiom) = self.optimizer.lookup(program.span(position, close)) {
                            if self.emit_idiom(idiom, number) {
                                trace!(position, ?idiom, "lowered idiom");
                                self.idioms_used += 1;
                                position = close + 1;
                                continue;
                            }
                        }
                    }
                    self.loop_open(position, close, number);
                }
                Instruction::LoopClose => self.loop_close(position)?,
            }
            position += 1;
        }

        self.epilogue();
        debug!(
            lines = self.lines.len(),
            loops = self.next_loop,
            idioms = self.idioms_used,
            "generated assembly"
        );
        Ok(())
    }

    fn write_to(&self, out: &mut dyn Write) -> Result<(), CodegenError> {
        for line in self.lines.iter() {
            writeln!(out, "{}", line)?;
        }
        out.flush()?;
        Ok(())
    }
}
