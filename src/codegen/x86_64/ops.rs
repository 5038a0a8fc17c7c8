use super::{
    instruction::{Instruction, Mnemonic},
    operand::Operand,
};

fn unary(mnemonic: Mnemonic, op: impl Into<Operand>) -> Instruction {
    Instruction::new(mnemonic, vec![op.into()])
}

fn binary(mnemonic: Mnemonic, dst: impl Into<Operand>, src: impl Into<Operand>) -> Instruction {
    Instruction::new(mnemonic, vec![dst.into(), src.into()])
}

pub fn mov(dst: impl Into<Operand>, src: impl Into<Operand>) -> Instruction {
    binary(Mnemonic::Mov, dst, src)
}

/// Load effective address
pub fn lea(dst: impl Into<Operand>, src: impl Into<Operand>) -> Instruction {
    binary(Mnemonic::Lea, dst, src)
}

pub fn inc(op: impl Into<Operand>) -> Instruction {
    unary(Mnemonic::Inc, op)
}

pub fn dec(op: impl Into<Operand>) -> Instruction {
    unary(Mnemonic::Dec, op)
}

pub fn add(dst: impl Into<Operand>, src: impl Into<Operand>) -> Instruction {
    binary(Mnemonic::Add, dst, src)
}

pub fn sub(dst: impl Into<Operand>, src: impl Into<Operand>) -> Instruction {
    binary(Mnemonic::Sub, dst, src)
}

pub fn xor(dst: impl Into<Operand>, src: impl Into<Operand>) -> Instruction {
    binary(Mnemonic::Xor, dst, src)
}

pub fn cmp(dst: impl Into<Operand>, src: impl Into<Operand>) -> Instruction {
    binary(Mnemonic::Cmp, dst, src)
}

/// Move if equal
pub fn cmove(dst: impl Into<Operand>, src: impl Into<Operand>) -> Instruction {
    binary(Mnemonic::Cmove, dst, src)
}

/// Move if above or equal (unsigned)
pub fn cmovae(dst: impl Into<Operand>, src: impl Into<Operand>) -> Instruction {
    binary(Mnemonic::Cmovae, dst, src)
}

/// Move if below (unsigned)
pub fn cmovb(dst: impl Into<Operand>, src: impl Into<Operand>) -> Instruction {
    binary(Mnemonic::Cmovb, dst, src)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOperator {
    JumpIfZero,
    JumpIfNotZero,
    Jump,
}

pub fn jump_op(opcode: JumpOperator, label: &str) -> Instruction {
    let mnemonic = match opcode {
        JumpOperator::JumpIfZero => Mnemonic::Je,
        JumpOperator::JumpIfNotZero => Mnemonic::Jne,
        JumpOperator::Jump => Mnemonic::Jmp,
    };
    unary(mnemonic, Operand::symbol(label))
}

pub fn syscall() -> Instruction {
    Instruction::new(Mnemonic::Syscall, vec![])
}
