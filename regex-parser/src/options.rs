/// How the DFA of a pattern is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Construction {
    /// Straight from the syntax tree using followpos.
    #[default]
    Direct,
    /// Thompson's construction to an epsilon NFA, then subset construction.
    Thompson,
}

/// Options for [`compile_with`](crate::compile_with).
///
/// The default builds the DFA directly and minimizes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompileOptions {
    /// Which construction to use.
    pub construction: Construction,
    /// Whether to minimize the constructed DFA.
    pub minimize: bool,
}

impl CompileOptions {
    /// The default options.
    pub fn new() -> Self {
        Self {
            construction: Construction::Direct,
            minimize: true,
        }
    }

    /// Sets the construction.
    pub fn construction(mut self, construction: Construction) -> Self {
        self.construction = construction;
        self
    }

    /// Sets whether the DFA gets minimized.
    pub fn minimize(mut self, yes: bool) -> Self {
        self.minimize = yes;
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new()
    }
}
