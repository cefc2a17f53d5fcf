/// State budgets for the two potentially expensive stages.
///
/// `None` means unbounded, which is the default.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of states a single determinized automaton may have,
    /// the sink state included.
    pub max_dfa_states: Option<usize>,
    /// Maximum number of state pairs the product search may visit.
    pub max_product_states: Option<usize>,
}

impl Limits {
    pub fn with_max_dfa_states(mut self, limit: usize) -> Self {
        self.max_dfa_states = Some(limit);
        self
    }

    pub fn with_max_product_states(mut self, limit: usize) -> Self {
        self.max_product_states = Some(limit);
        self
    }
}
