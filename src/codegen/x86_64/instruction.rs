use std::fmt;

use super::operand::Operand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Mov,
    Lea,
    Inc,
    Dec,
    Add,
    Sub,
    Xor,
    Cmp,
    /// Conditional moves, used to wrap the cursor without branching
    Cmove,
    Cmovae,
    Cmovb,
    Je,
    Jne,
    Jmp,
    Syscall,
}

impl Mnemonic {
    pub fn name(&self) -> &'static str {
        match self {
            Mnemonic::Mov => "mov",
            Mnemonic::Lea => "lea",
            Mnemonic::Inc => "inc",
            Mnemonic::Dec => "dec",
            Mnemonic::Add => "add",
            Mnemonic::Sub => "sub",
            Mnemonic::Xor => "xor",
            Mnemonic::Cmp => "cmp",
            Mnemonic::Cmove => "cmove",
            Mnemonic::Cmovae => "cmovae",
            Mnemonic::Cmovb => "cmovb",
            Mnemonic::Je => "je",
            Mnemonic::Jne => "jne",
            Mnemonic::Jmp => "jmp",
            Mnemonic::Syscall => "syscall",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub operands: Vec<Operand>,
    pub comment: Option<&'static str>,
}

impl Instruction {
    pub fn new(mnemonic: Mnemonic, operands: Vec<Operand>) -> Self {
        Self {
            mnemonic,
            operands,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: &'static str) -> Self {
        self.comment = Some(comment);
        self
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic.name())?;
        for (i, operand) in self.operands.iter().enumerate() {
            let separator = if i == 0 { " " } else { ", " };
            write!(f, "{}{}", separator, operand)?;
        }
        if let Some(comment) = self.comment {
            write!(f, " ; {}", comment)?;
        }
        Ok(())
    }
}

/// One line of NASM output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Section(&'static str),
    /// `name resb bytes` inside `.bss`
    Reserve { symbol: &'static str, bytes: usize },
    Global(&'static str),
    Label(String),
    Instruction(Instruction),
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Section(name) => write!(f, "section {}", name),
            Line::Reserve { symbol, bytes } => write!(f, "    {} resb {}", symbol, bytes),
            Line::Global(symbol) => write!(f, "global {}", symbol),
            Line::Label(name) => write!(f, "{}:", name),
            Line::Instruction(instruction) => write!(f, "    {}", instruction),
        }
    }
}

impl From<Instruction> for Line {
    fn from(instruction: Instruction) -> Self {
        Line::Instruction(instruction)
    }
}
