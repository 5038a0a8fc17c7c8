#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    LowByte,
    LowEightBytes,
}

pub type Register = (Registers, RegisterAccess);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub name: &'static str,
    pub index: u8,
}

impl Registers {
    pub const fn new(name: &'static str, index: u8) -> Self {
        Self { name, index }
    }

    pub fn get_name(&self, access: RegisterAccess) -> String {
        match access {
            RegisterAccess::LowByte => {
                String::from(self.name)
                    + match self.index {
                        // "a..d" => "al..dl", "sp..di" => "spl..dil"
                        0b0000..=0b0111 => "l",
                        // "r8..r15" => "r8b..r15b"
                        _ => "b",
                    }
            }
            RegisterAccess::LowEightBytes => {
                String::from(match self.index {
                    // "a..d" & "sp..di"
                    0b0000..=0b0111 => "r",
                    // "r8-r15",
                    _ => "",
                }) + self.name
                    + match self.index {
                        // "a..d"
                        0b0000..=0b0011 => "x",
                        _ => "",
                    }
            }
        }
    }

    pub const fn byte(self) -> Register {
        (self, RegisterAccess::LowByte)
    }

    pub const fn qword(self) -> Register {
        (self, RegisterAccess::LowEightBytes)
    }
}

pub const A: Registers = Registers::new("a", 0b0000);
pub const C: Registers = Registers::new("c", 0b0001);
pub const D: Registers = Registers::new("d", 0b0010);

pub const SI: Registers = Registers::new("si", 0b0110);
pub const DI: Registers = Registers::new("di", 0b0111);

pub const R12: Registers = Registers::new("r12", 0b1100);
pub const R13: Registers = Registers::new("r13", 0b1101);

/// Address of the current cell, also the buffer argument of read/write
pub const CURSOR: Registers = SI;
/// First cell of the tape
pub const TAPE_START: Registers = R12;
/// One past the last cell of the tape
pub const TAPE_END: Registers = R13;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_names() {
        assert_eq!(A.get_name(RegisterAccess::LowEightBytes), "rax");
        assert_eq!(C.get_name(RegisterAccess::LowByte), "cl");
        assert_eq!(SI.get_name(RegisterAccess::LowEightBytes), "rsi");
        assert_eq!(SI.get_name(RegisterAccess::LowByte), "sil");
        assert_eq!(DI.get_name(RegisterAccess::LowEightBytes), "rdi");
        assert_eq!(R12.get_name(RegisterAccess::LowEightBytes), "r12");
        assert_eq!(R13.get_name(RegisterAccess::LowByte), "r13b");
    }
}
