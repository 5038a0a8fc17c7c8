use std::collections::BTreeMap;

use bitflags::bitflags;
use tracing::{debug, trace};

use crate::{
    brackets::JumpTable,
    lexer::{Instruction, Program},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopClass {
    /// Innermost, no I/O, no net cursor movement and a unit change to the starting cell
    Simple,
    NonSimple,
}

bitflags! {
    /// Why a loop failed to be simple, empty for simple loops
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LoopFlags: u8 {
        const PERFORMS_IO    = 0b0001;
        const CONTAINS_LOOP  = 0b0010;
        /// The body doesn't bring the cursor back to where it started
        const POINTER_DRIFT  = 0b0100;
        /// The starting cell doesn't change by exactly +1 or -1 per iteration
        const NON_UNIT_DELTA = 0b1000;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopInfo {
    pub open: usize,
    pub close: usize,
    pub class: LoopClass,
    pub flags: LoopFlags,
    /// Net cursor offset of one pass over the body (only meaningful for innermost loops)
    pub offset: isize,
    /// Net change applied at offset zero during one pass (only meaningful for innermost loops)
    pub start_delta: i32,
}

impl LoopInfo {
    pub fn is_simple(&self) -> bool {
        self.class == LoopClass::Simple
    }
}

/// Every loop in a program keyed by the position of its `[`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopClassification {
    loops: BTreeMap<usize, LoopInfo>,
}

impl LoopClassification {
    pub fn get(&self, open: usize) -> Option<&LoopInfo> {
        self.loops.get(&open)
    }

    /// Loops in ascending order of their `[` position
    pub fn iter(&self) -> impl Iterator<Item = &LoopInfo> {
        self.loops.values()
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    pub fn simple_count(&self) -> usize {
        self.iter().filter(|info| info.is_simple()).count()
    }
}

/// Running state for one open loop
struct Frame {
    open: usize,
    flags: LoopFlags,
    offset: isize,
    start_delta: i32,
}

impl Frame {
    fn new(open: usize) -> Frame {
        Frame {
            open,
            flags: LoopFlags::empty(),
            offset: 0,
            start_delta: 0,
        }
    }
}

/// Classify every loop in one pass.
///
/// Arithmetic only counts towards the start cell while the body offset is exactly zero,
/// so a body like `[->+<]` that also changes a neighbouring cell is still simple.
pub fn classify(program: &Program, jumps: &JumpTable) -> LoopClassification {
    let mut loops = BTreeMap::new();
    let mut frames: Vec<Frame> = vec![];

    for (position, instruction) in program.instructions().iter().enumerate() {
        match instruction {
            Instruction::LoopOpen => {
                if let Some(parent) = frames.last_mut() {
                    parent.flags |= LoopFlags::CONTAINS_LOOP;
                }
                frames.push(Frame::new(position));
            }
            Instruction::LoopClose => {
                let Some(mut frame) = frames.pop() else {
                    // the jump table was resolved from this program so this can't happen
                    continue;
                };
                debug_assert_eq!(jumps.target(position), Some(frame.open));

                if frame.offset != 0 {
                    frame.flags |= LoopFlags::POINTER_DRIFT;
                }
                if frame.start_delta.abs() != 1 {
                    frame.flags |= LoopFlags::NON_UNIT_DELTA;
                }
                if let Some(parent) = frames.last_mut() {
                    parent.flags |= frame.flags & LoopFlags::PERFORMS_IO;
                }

                let class = if frame.flags.is_empty() {
                    LoopClass::Simple
                } else {
                    LoopClass::NonSimple
                };
                trace!(open = frame.open, close = position, ?class, flags = ?frame.flags, "classified loop");

                loops.insert(
                    frame.open,
                    LoopInfo {
                        open: frame.open,
                        close: position,
                        class,
                        flags: frame.flags,
                        offset: frame.offset,
                        start_delta: frame.start_delta,
                    },
                );
            }
            other => {
                let Some(frame) = frames.last_mut() else {
                    continue;
                };
                match other {
                    Instruction::Output | Instruction::Input => {
                        frame.flags |= LoopFlags::PERFORMS_IO
                    }
                    Instruction::Increment if frame.offset == 0 => frame.start_delta += 1,
                    Instruction::Decrement if frame.offset == 0 => frame.start_delta -= 1,
                    Instruction::MoveRight => frame.offset += 1,
                    Instruction::MoveLeft => frame.offset -= 1,
                    _ => {}
                }
            }
        }
    }

    let classification = LoopClassification { loops };
    debug!(
        loops = classification.len(),
        simple = classification.simple_count(),
        "classified loops"
    );
    classification
}
