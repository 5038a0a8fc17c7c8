use bitflags::bitflags;

pub mod classifier;
pub mod idioms;

pub use self::classifier::{classify, LoopClass, LoopClassification, LoopFlags, LoopInfo};
pub use self::idioms::{Idiom, PeepholeOptimizer};

bitflags! {
    /// Fixed-pattern rewrites the code generator is allowed to apply
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OptimizationFlags: u8 {
        /// Replace loops that literally match the idiom table with their closed form
        const IDIOMS        = 0b0000_0001;
        /// A loop at the very start never runs since the tape starts zeroed
        const COMMENT_BLOCK = 0b0000_0010;
    }
}

impl Default for OptimizationFlags {
    fn default() -> Self {
        OptimizationFlags::IDIOMS
    }
}
