pub mod executor;

use std::io::{self, ErrorKind, Read, Write};

use clap::ValueEnum;
use thiserror::Error;

pub use self::executor::{Executor, ExecutorOptions};

/// Conventional tape length
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// What happens when the cursor would leave the tape
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CursorPolicy {
    /// Wrap around to the other end of the tape
    #[default]
    Wrap,
    /// Stop the run with `PointerOutOfBounds`
    Checked,
}

/// What a `,` stores once the input source is exhausted
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EofBehavior {
    /// Leave the cell as it was
    #[default]
    Unchanged,
    /// Store 0
    Zero,
    /// Store 255
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Number of cells, at least one cell is always allocated
    pub tape_size: usize,
    pub cursor: CursorPolicy,
    pub eof: EofBehavior,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            cursor: CursorPolicy::default(),
            eof: EofBehavior::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Cursor left the tape at position {position} (cursor {cursor}, moving by {delta})")]
    PointerOutOfBounds {
        position: usize,
        cursor: usize,
        delta: isize,
    },

    #[error("No matching bracket recorded for position {position}")]
    UnresolvedBracket { position: usize },

    #[error("IO Error")]
    Io(
        #[from]
        std::io::Error,
    ),
}

impl RuntimeError {
    pub fn position(&self) -> Option<usize> {
        match *self {
            RuntimeError::PointerOutOfBounds { position, .. } => Some(position),
            RuntimeError::UnresolvedBracket { position } => Some(position),
            RuntimeError::Io(_) => None,
        }
    }
}

/// Tape, cursor and the two byte streams owned by a single run
pub struct Runtime<'a> {
    /// Index of the current cell
    cursor: usize,

    /// Our statically allocated tape
    tape: Vec<u8>,

    options: RuntimeOptions,

    in_stream: Box<dyn Read + 'a>,
    out_stream: Box<dyn Write + 'a>,
}

impl<'a> Runtime<'a> {
    pub fn new(
        options: RuntimeOptions,
        in_stream: Box<dyn Read + 'a>,
        out_stream: Box<dyn Write + 'a>,
    ) -> Self {
        Self {
            cursor: 0,
            tape: vec![0; options.tape_size.max(1)],
            options,
            in_stream,
            out_stream,
        }
    }

    pub fn reset(&mut self) {
        self.tape.fill(0);
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn tape(&self) -> &[u8] {
        &self.tape
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// Value of the cell under the cursor
    pub fn current(&self) -> u8 {
        self.tape[self.cursor]
    }

    pub fn set_current(&mut self, value: u8) {
        self.tape[self.cursor] = value;
    }

    pub fn cell(&self, index: usize) -> u8 {
        self.tape[index]
    }

    pub fn set_cell(&mut self, index: usize, value: u8) {
        self.tape[index] = value;
    }

    /// is the value at the cursor zero?
    pub fn value_is_zero(&self) -> bool {
        self.current() == 0
    }

    pub fn increment(&mut self) {
        self.tape[self.cursor] = self.tape[self.cursor].wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        self.tape[self.cursor] = self.tape[self.cursor].wrapping_sub(1);
    }

    /// Index `delta` cells away from the cursor under the configured policy,
    /// `None` when a checked tape would be left
    pub fn offset(&self, delta: isize) -> Option<usize> {
        let len = self.tape.len();
        match self.options.cursor {
            CursorPolicy::Wrap => {
                let step = delta.rem_euclid(len as isize) as usize;
                Some((self.cursor + step) % len)
            }
            CursorPolicy::Checked => self
                .cursor
                .checked_add_signed(delta)
                .filter(|&index| index < len),
        }
    }

    /// Move the cursor, returns false (and stays put) if the tape would be left
    pub fn move_cursor(&mut self, delta: isize) -> bool {
        match self.offset(delta) {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    /// Read one byte from the input stream into the current cell
    pub fn read(&mut self) -> io::Result<()> {
        let mut byte = [0u8; 1];
        loop {
            match self.in_stream.read(&mut byte) {
                Ok(0) => {
                    match self.options.eof {
                        EofBehavior::Unchanged => {}
                        EofBehavior::Zero => self.set_current(0),
                        EofBehavior::Max => self.set_current(u8::MAX),
                    }
                    return Ok(());
                }
                Ok(_) => {
                    self.set_current(byte[0]);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Write the current cell to the output stream
    pub fn write(&mut self) -> io::Result<()> {
        self.out_stream.write_all(&[self.current()])
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out_stream.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime_with(options: RuntimeOptions, input: &'static [u8]) -> Runtime<'static> {
        Runtime::new(options, Box::new(input), Box::new(io::sink()))
    }

    #[test]
    fn cells_wrap_modulo_256() {
        let mut runtime = runtime_with(RuntimeOptions::default(), b"");
        runtime.decrement();
        assert_eq!(runtime.current(), 255);
        runtime.increment();
        assert_eq!(runtime.current(), 0);
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let mut runtime = runtime_with(RuntimeOptions::default(), b"");
        assert!(runtime.move_cursor(-1));
        assert_eq!(runtime.cursor(), DEFAULT_TAPE_SIZE - 1);
        assert!(runtime.move_cursor(1));
        assert_eq!(runtime.cursor(), 0);
        assert_eq!(runtime.offset(-(DEFAULT_TAPE_SIZE as isize) - 2), Some(DEFAULT_TAPE_SIZE - 2));
    }

    #[test]
    fn checked_cursor_refuses_to_leave_the_tape() {
        let options = RuntimeOptions {
            tape_size: 3,
            cursor: CursorPolicy::Checked,
            ..RuntimeOptions::default()
        };
        let mut runtime = runtime_with(options, b"");
        assert!(!runtime.move_cursor(-1));
        assert_eq!(runtime.cursor(), 0);
        assert!(runtime.move_cursor(2));
        assert!(!runtime.move_cursor(1));
        assert_eq!(runtime.cursor(), 2);
    }

    #[test]
    fn zero_sized_tape_still_has_a_cell() {
        let options = RuntimeOptions {
            tape_size: 0,
            ..RuntimeOptions::default()
        };
        let runtime = runtime_with(options, b"");
        assert_eq!(runtime.tape().len(), 1);
    }

    #[test]
    fn eof_behaviors() {
        for (eof, expected) in [
            (EofBehavior::Unchanged, 7),
            (EofBehavior::Zero, 0),
            (EofBehavior::Max, 255),
        ] {
            let options = RuntimeOptions {
                eof,
                ..RuntimeOptions::default()
            };
            let mut runtime = runtime_with(options, b"a");
            runtime.set_current(7);
            runtime.read().unwrap();
            assert_eq!(runtime.current(), b'a');
            runtime.set_current(7);
            runtime.read().unwrap();
            assert_eq!(runtime.current(), expected, "{:?}", eof);
        }
    }

    #[test]
    fn reset_clears_tape_and_cursor() {
        let mut runtime = runtime_with(RuntimeOptions::default(), b"");
        runtime.increment();
        runtime.move_cursor(5);
        runtime.reset();
        assert_eq!(runtime.cursor(), 0);
        assert!(runtime.tape().iter().all(|&cell| cell == 0));
    }
}
