use std::fmt;

use super::registers::{Register, RegisterAccess, Registers};

/// Width prefix for memory operands whose size can't be inferred from a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemorySize {
    Byte,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(Register),
    Immediate(i64),
    /// `[base + displacement]`, always addressed through a 64 bit base
    Memory {
        size: Option<MemorySize>,
        base: Registers,
        displacement: i64,
    },
    /// A label or a data symbol
    Symbol(String),
}

impl Operand {
    pub fn byte_at(base: Registers, displacement: i64) -> Operand {
        Operand::Memory {
            size: Some(MemorySize::Byte),
            base,
            displacement,
        }
    }

    /// Untyped address, used by `lea`
    pub fn address(base: Registers, displacement: i64) -> Operand {
        Operand::Memory {
            size: None,
            base,
            displacement,
        }
    }

    pub fn symbol(name: impl Into<String>) -> Operand {
        Operand::Symbol(name.into())
    }
}

impl From<Register> for Operand {
    fn from(register: Register) -> Self {
        Operand::Register(register)
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Immediate(value)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register((register, access)) => write!(f, "{}", register.get_name(*access)),
            Operand::Immediate(value) => write!(f, "{}", value),
            Operand::Memory {
                size,
                base,
                displacement,
            } => {
                if let Some(MemorySize::Byte) = size {
                    write!(f, "byte ")?;
                }
                let base = base.get_name(RegisterAccess::LowEightBytes);
                match *displacement {
                    0 => write!(f, "[{}]", base),
                    d if d < 0 => write!(f, "[{} - {}]", base, -d),
                    d => write!(f, "[{} + {}]", base, d),
                }
            }
            Operand::Symbol(name) => write!(f, "{}", name),
        }
    }
}
