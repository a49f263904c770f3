//! The visited-class registry.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Class names already converted, in first-visit order.
///
/// Once a name is marked it is never expanded again: later references to the
/// class resolve to its bare name. This is what keeps cyclic and diamond
/// shaped class graphs finite.
#[derive(Debug, Clone, Default)]
pub struct ConversionSession {
    visited: IndexSet<String>,
}

/// How long a [`ConversionSession`] lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SessionScope {
    /// One session for the whole run. A class emitted into an earlier file is
    /// only referenced by name from later files.
    #[default]
    Run,
    /// A fresh session per instruction, so every file is self-contained.
    Instruction,
}

impl ConversionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `class`. Returns false if it was already registered.
    pub fn mark(&mut self, class: &str) -> bool {
        if self.visited.contains(class) {
            return false;
        }
        self.visited.insert(class.to_string())
    }

    /// Number of classes converted so far.
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
