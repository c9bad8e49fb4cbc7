use crate::rope::DEFAULT_LEAF_SIZE;

/// Settings handed from the command line to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum chars per rope leaf
    pub leaf_size: usize,
    /// Abort a script on the first failing command
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            leaf_size: DEFAULT_LEAF_SIZE,
            strict: false,
        }
    }
}
