/// Engine-wide constants and tunable solver policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// A concrete item only satisfies a gearpiece when its melded materia
    /// cover the gearpiece's required materia.
    pub strict_materia_matching: bool,
    /// Concrete items carrying melded materia may also be consumed by
    /// prerequisite nodes.
    pub include_prerequisite_materia: bool,
}

impl SolverConfig {
    // ===== static limits =====
    /// Deepest acquisition chain a tree builder will expand.
    pub const MAX_TREE_DEPTH: usize = 8;
    /// Materia slots an item can carry including overmelds.
    pub const MAX_MATERIA_SLOTS: usize = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_STRICT_MATERIA_MATCHING: bool = false;
    pub const DEFAULT_INCLUDE_PREREQUISITE_MATERIA: bool = true;

    pub const fn new() -> Self {
        Self {
            strict_materia_matching: Self::DEFAULT_STRICT_MATERIA_MATCHING,
            include_prerequisite_materia: Self::DEFAULT_INCLUDE_PREREQUISITE_MATERIA,
        }
    }

    pub const fn with_strict_materia_matching(mut self, strict: bool) -> Self {
        self.strict_materia_matching = strict;
        self
    }

    pub const fn with_prerequisite_materia(mut self, include: bool) -> Self {
        self.include_prerequisite_materia = include;
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}
