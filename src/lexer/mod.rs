use std::fmt;

pub mod lexer;

pub use self::lexer::{filter, Lexer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Instruction {
    // `>`: Move the cursor one cell to the right
    MoveRight,
    // `<`: Move the cursor one cell to the left
    MoveLeft,

    // `+`: Increment the cell under the cursor by one
    Increment,
    // `-`: Decrement the cell under the cursor by one
    Decrement,

    // `.`: Write the cell under the cursor to the output sink
    Output,
    // `,`: Read the next byte from the input source into the cell under the cursor
    Input,

    // `[`: If the cell under the cursor is zero, jump past the matching `]`
    LoopOpen,
    // `]`: If the cell under the cursor is non-zero, jump back to the matching `[`
    LoopClose,
}

impl Instruction {
    /// Every instruction in symbol order, used wherever a stable ordering is needed
    pub const ALL: [Instruction; 8] = [
        Instruction::MoveRight,
        Instruction::MoveLeft,
        Instruction::Increment,
        Instruction::Decrement,
        Instruction::Output,
        Instruction::Input,
        Instruction::LoopOpen,
        Instruction::LoopClose,
    ];

    pub fn from_symbol(c: char) -> Option<Instruction> {
        match c {
            '>' => Some(Instruction::MoveRight),
            '<' => Some(Instruction::MoveLeft),
            '+' => Some(Instruction::Increment),
            '-' => Some(Instruction::Decrement),
            '.' => Some(Instruction::Output),
            ',' => Some(Instruction::Input),
            '[' => Some(Instruction::LoopOpen),
            ']' => Some(Instruction::LoopClose),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Instruction::MoveRight => '>',
            Instruction::MoveLeft => '<',
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::Output => '.',
            Instruction::Input => ',',
            Instruction::LoopOpen => '[',
            Instruction::LoopClose => ']',
        }
    }

    /// Dense index into per-symbol tables (matches `ALL`)
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Human readable position of an instruction in the raw source (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The canonical instruction sequence, position is the index into `instructions`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    locations: Vec<Location>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>, locations: Vec<Location>) -> Program {
        debug_assert_eq!(instructions.len(), locations.len());
        Program {
            instructions,
            locations,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<Instruction> {
        self.instructions.get(position).copied()
    }

    /// Where the instruction at `position` came from in the raw source
    pub fn location(&self, position: usize) -> Option<Location> {
        self.locations.get(position).copied()
    }

    /// The literal instructions in `start..=end`
    pub fn span(&self, start: usize, end: usize) -> &[Instruction] {
        &self.instructions[start..=end]
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in self.instructions.iter() {
            write!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

/// Render an instruction slice back into its symbols
pub fn to_symbols(instructions: &[Instruction]) -> String {
    instructions.iter().map(|i| i.symbol()).collect()
}
