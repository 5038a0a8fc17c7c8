use thiserror::Error;

pub mod resolver;

pub use self::resolver::resolve;

/// Symmetric `[` <-> `]` mapping, only defined at bracket positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTable {
    targets: Vec<Option<usize>>,
}

impl JumpTable {
    pub(crate) fn with_len(len: usize) -> JumpTable {
        JumpTable {
            targets: vec![None; len],
        }
    }

    pub(crate) fn link(&mut self, open: usize, close: usize) {
        self.targets[open] = Some(close);
        self.targets[close] = Some(open);
    }

    /// Matching bracket position for the bracket at `position`
    pub fn target(&self, position: usize) -> Option<usize> {
        self.targets.get(position).copied().flatten()
    }

    /// All `(open, close)` pairs in ascending order of `open`
    pub fn loops(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.targets
            .iter()
            .enumerate()
            .filter_map(|(position, target)| match *target {
                Some(close) if close > position => Some((position, close)),
                _ => None,
            })
    }

    pub fn loop_count(&self) -> usize {
        self.loops().count()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("This ] at position {position} has no matching [")]
    UnmatchedClose { position: usize },

    #[error("This [ at position {position} has no matching ]")]
    UnmatchedOpen { position: usize },
}

impl ResolveError {
    pub fn position(&self) -> usize {
        match *self {
            ResolveError::UnmatchedClose { position } => position,
            ResolveError::UnmatchedOpen { position } => position,
        }
    }
}
