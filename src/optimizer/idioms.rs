use std::{collections::HashMap, sync::OnceLock};

use crate::{
    brackets::JumpTable,
    lexer::{filter, Instruction, Program},
};

/// Closed form of a loop that appears literally in the idiom table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Idiom {
    /// `[-]`: set the current cell to zero
    Clear,
    /// `[>]`: move the cursor by `stride` until it lands on a zero cell
    Scan { stride: isize },
    /// `[->+<]`: add `factor` times the current cell to the cell at `offset`, then clear it
    MoveAdd { offset: isize, factor: i8 },
}

// brackets are part of every pattern
const PATTERNS: &[(&str, Idiom)] = &[
    ("[-]", Idiom::Clear),
    ("[+]", Idiom::Clear),
    ("[>]", Idiom::Scan { stride: 1 }),
    ("[<]", Idiom::Scan { stride: -1 }),
    ("[>>]", Idiom::Scan { stride: 2 }),
    ("[<<]", Idiom::Scan { stride: -2 }),
    ("[>>>>]", Idiom::Scan { stride: 4 }),
    ("[<<<<]", Idiom::Scan { stride: -4 }),
    ("[->+<]", Idiom::MoveAdd { offset: 1, factor: 1 }),
    ("[>+<-]", Idiom::MoveAdd { offset: 1, factor: 1 }),
    ("[-<+>]", Idiom::MoveAdd { offset: -1, factor: 1 }),
    ("[<+>-]", Idiom::MoveAdd { offset: -1, factor: 1 }),
    ("[->>+<<]", Idiom::MoveAdd { offset: 2, factor: 1 }),
    ("[-<<+>>]", Idiom::MoveAdd { offset: -2, factor: 1 }),
    ("[->-<]", Idiom::MoveAdd { offset: 1, factor: -1 }),
    ("[-<->]", Idiom::MoveAdd { offset: -1, factor: -1 }),
];

type IdiomTable = HashMap<Box<[Instruction]>, Idiom>;

fn table() -> &'static IdiomTable {
    static TABLE: OnceLock<IdiomTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|(pattern, idiom)| {
                let instructions: Box<[Instruction]> = filter(pattern).instructions().into();
                (instructions, *idiom)
            })
            .collect()
    })
}

/// Exact-match lookup of loop bodies against the idiom table.
///
/// No symbolic reasoning happens here: `[-]` matches but `[--+]` doesn't, even though
/// the two behave the same on every cell value.
#[derive(Debug, Clone, Copy)]
pub struct PeepholeOptimizer {
    table: &'static IdiomTable,
}

impl Default for PeepholeOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PeepholeOptimizer {
    pub fn new() -> Self {
        Self { table: table() }
    }

    /// `pattern` is the whole loop including both brackets
    pub fn lookup(&self, pattern: &[Instruction]) -> Option<Idiom> {
        self.table.get(pattern).copied()
    }

    /// Look up the loop opened at `open`
    pub fn lookup_loop(&self, program: &Program, jumps: &JumpTable, open: usize) -> Option<Idiom> {
        let close = jumps.target(open)?;
        self.lookup(program.instructions().get(open..=close)?)
    }

    /// Every loop in the program that matches an idiom, keyed by its `[` position
    pub fn matches(&self, program: &Program, jumps: &JumpTable) -> HashMap<usize, Idiom> {
        jumps
            .loops()
            .filter_map(|(open, close)| {
                let idiom = self.lookup(program.instructions().get(open..=close)?)?;
                Some((open, idiom))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
