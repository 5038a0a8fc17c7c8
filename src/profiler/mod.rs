use std::collections::HashMap;

use crate::{lexer::Instruction, optimizer::LoopClassification};

pub mod report;

pub use self::report::write_report;

/// How often a loop ran
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopCounts {
    /// Times the body was entered from its `[`
    pub entries: u64,
    /// Times the `]` jumped back for another pass
    pub iterations: u64,
}

/// Per-run execution counters.
///
/// A disabled profiler ignores every record call, so the executor can always be handed
/// one without checking whether profiling was requested.
#[derive(Debug, Clone, Default)]
pub struct Profiler {
    enabled: bool,
    instruction_counts: [u64; 8],
    loop_counts: HashMap<usize, LoopCounts>,
    classification: LoopClassification,
}

impl Profiler {
    pub fn new(classification: LoopClassification) -> Self {
        Self {
            enabled: true,
            instruction_counts: [0; 8],
            loop_counts: HashMap::new(),
            classification,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record_instruction(&mut self, instruction: Instruction) {
        if self.enabled {
            self.instruction_counts[instruction.index()] += 1;
        }
    }

    pub fn record_loop_entry(&mut self, open: usize) {
        if self.enabled {
            self.loop_counts.entry(open).or_default().entries += 1;
        }
    }

    pub fn record_loop_iteration(&mut self, open: usize) {
        if self.enabled {
            self.loop_counts.entry(open).or_default().iterations += 1;
        }
    }

    pub fn instruction_count(&self, instruction: Instruction) -> u64 {
        self.instruction_counts[instruction.index()]
    }

    pub fn total_instructions(&self) -> u64 {
        self.instruction_counts.iter().sum()
    }

    /// Counts for the loop opened at `open`, zero if it never ran
    pub fn loop_counts(&self, open: usize) -> LoopCounts {
        self.loop_counts.get(&open).copied().unwrap_or_default()
    }

    pub fn classification(&self) -> &LoopClassification {
        &self.classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{brackets::resolve, lexer::filter, optimizer::classify};

    #[test]
    fn disabled_profiler_records_nothing() {
        let mut profiler = Profiler::disabled();
        profiler.record_instruction(Instruction::Increment);
        profiler.record_loop_entry(0);
        profiler.record_loop_iteration(0);

        assert!(!profiler.is_enabled());
        assert_eq!(profiler.total_instructions(), 0);
        assert_eq!(profiler.loop_counts(0), LoopCounts::default());
    }

    #[test]
    fn counts_accumulate() {
        let program = filter("[-]");
        let jumps = resolve(&program).unwrap();
        let mut profiler = Profiler::new(classify(&program, &jumps));

        profiler.record_instruction(Instruction::Increment);
        profiler.record_instruction(Instruction::Increment);
        profiler.record_instruction(Instruction::LoopOpen);
        profiler.record_loop_entry(0);
        profiler.record_loop_iteration(0);
        profiler.record_loop_iteration(0);

        assert_eq!(profiler.instruction_count(Instruction::Increment), 2);
        assert_eq!(profiler.instruction_count(Instruction::Output), 0);
        assert_eq!(profiler.total_instructions(), 3);
        assert_eq!(
            profiler.loop_counts(0),
            LoopCounts {
                entries: 1,
                iterations: 2
            }
        );
        assert_eq!(profiler.classification().len(), 1);
    }
}
