mod dot;
mod subset;
mod thompson;

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::{
    Alphabet, AutomatonState, AutomatonTransition, DeterministicAutomaton, FiniteAutomaton,
};

/// Canonical form of a set of states: sorted and without duplicates, so two
/// equal sets always compare and hash the same way.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateSet(Vec<AutomatonState>);

impl StateSet {
    pub fn contains(&self, state: AutomatonState) -> bool {
        self.0.binary_search(&state).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = AutomatonState> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<AutomatonState> for StateSet {
    fn from_iter<I: IntoIterator<Item = AutomatonState>>(iter: I) -> Self {
        let mut states: Vec<AutomatonState> = iter.into_iter().collect();
        states.sort_unstable();
        states.dedup();
        Self(states)
    }
}

impl IntoIterator for StateSet {
    type Item = AutomatonState;
    type IntoIter = std::vec::IntoIter<AutomatonState>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FiniteAutomaton {
    pub fn start_state(&self) -> AutomatonState {
        self.start_state
    }

    pub fn accept_state(&self) -> AutomatonState {
        self.accept_state
    }

    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    fn new_state(&mut self) -> AutomatonState {
        let new_state = self.transitions.len();
        self.transitions.push(BTreeMap::default());
        new_state
    }

    fn add_transition(
        &mut self,
        from: AutomatonState,
        transition: AutomatonTransition,
        to: AutomatonState,
    ) {
        debug_assert!(to < self.transitions.len());
        self.transitions[from]
            .entry(transition)
            .or_default()
            .insert(to);
    }

    fn targets(
        &self,
        state: AutomatonState,
        transition: AutomatonTransition,
    ) -> impl Iterator<Item = AutomatonState> + '_ {
        self.transitions
            .get(state)
            .and_then(|list| list.get(&transition))
            .into_iter()
            .flat_map(|to| to.iter().copied())
    }

    /// States reachable from `states` through zero or more epsilon moves.
    pub fn epsilon_closure(&self, states: impl IntoIterator<Item = AutomatonState>) -> StateSet {
        let mut queue: VecDeque<AutomatonState> = states.into_iter().collect();
        let mut visited: BTreeSet<AutomatonState> = queue.iter().copied().collect();

        while let Some(state) = queue.pop_front() {
            for to in self.targets(state, AutomatonTransition::Epsilon) {
                if visited.insert(to) {
                    queue.push_back(to);
                }
            }
        }

        visited.into_iter().collect()
    }

    /// States reachable from `states` by reading exactly `symbol`, without
    /// any epsilon moves.
    pub fn step(&self, states: &StateSet, symbol: char) -> StateSet {
        states
            .iter()
            .flat_map(|state| self.targets(state, AutomatonTransition::Symbol(symbol)))
            .collect()
    }

    /// States reachable from the start state through any transitions.
    pub fn reachable_states(&self) -> BTreeSet<AutomatonState> {
        let mut queue = VecDeque::from([self.start_state]);
        let mut visited = BTreeSet::from([self.start_state]);

        while let Some(state) = queue.pop_front() {
            let Some(list) = self.transitions.get(state) else {
                continue;
            };
            for to in list.values().flatten() {
                if visited.insert(*to) {
                    queue.push_back(*to);
                }
            }
        }

        visited
    }

    pub fn accepts(&self, word: &str) -> bool {
        let mut current = self.epsilon_closure([self.start_state]);

        for symbol in word.chars() {
            current = self.epsilon_closure(self.step(&current, symbol));
            if current.is_empty() {
                return false;
            }
        }

        current.contains(self.accept_state)
    }

    /// Whether the language is empty, i.e. the accept state is unreachable.
    pub fn is_empty(&self) -> bool {
        !self.reachable_states().contains(&self.accept_state)
    }
}

impl DeterministicAutomaton {
    pub(crate) fn from_parts(
        alphabet: Alphabet,
        start_state: AutomatonState,
        accept_states: BTreeSet<AutomatonState>,
        table: Vec<Vec<AutomatonState>>,
    ) -> Self {
        let dfa = Self {
            alphabet,
            start_state,
            accept_states,
            table,
        };
        debug_assert!(dfa.is_total());
        dfa
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn start_state(&self) -> AutomatonState {
        self.start_state
    }

    pub fn accept_states(&self) -> &BTreeSet<AutomatonState> {
        &self.accept_states
    }

    pub fn is_accepting(&self, state: AutomatonState) -> bool {
        self.accept_states.contains(&state)
    }

    pub fn state_count(&self) -> usize {
        self.table.len()
    }

    /// Successor of `state` on the symbol with the given alphabet index.
    pub fn next_by_index(&self, state: AutomatonState, index: usize) -> AutomatonState {
        self.table[state][index]
    }

    /// Successor of `state` on `symbol`, or `None` if `symbol` is not in the alphabet.
    pub fn next(&self, state: AutomatonState, symbol: char) -> Option<AutomatonState> {
        let index = self.alphabet.index_of(symbol)?;
        self.table.get(state).map(|row| row[index])
    }

    pub fn accepts(&self, word: &str) -> bool {
        let mut state = self.start_state;

        for symbol in word.chars() {
            match self.next(state, symbol) {
                Some(next) => state = next,
                None => return false,
            }
        }

        self.is_accepting(state)
    }

    /// Every `(state, symbol)` pair has exactly one destination inside the table.
    pub fn is_total(&self) -> bool {
        self.start_state < self.table.len()
            && self.table.iter().all(|row| {
                row.len() == self.alphabet.len() && row.iter().all(|&to| to < self.table.len())
            })
    }

    /// Accept exactly the words over the alphabet that were rejected before.
    pub fn to_complement(&mut self) {
        self.accept_states = (0..self.table.len())
            .filter(|state| !self.accept_states.contains(state))
            .collect();
    }

    /// Whether no accepting state is reachable from the start state.
    pub fn is_empty(&self) -> bool {
        let mut queue = VecDeque::from([self.start_state]);
        let mut visited = BTreeSet::from([self.start_state]);

        while let Some(state) = queue.pop_front() {
            if self.is_accepting(state) {
                return false;
            }
            for &to in self.table[state].iter() {
                if visited.insert(to) {
                    queue.push_back(to);
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0 -ε-> 1 -a-> 2 -ε-> 3, 2 -ε-> 1
    fn sample() -> FiniteAutomaton {
        let mut nfa = FiniteAutomaton {
            start_state: 0,
            accept_state: 3,
            transitions: Vec::new(),
        };
        for _ in 0..4 {
            nfa.new_state();
        }
        nfa.add_transition(0, AutomatonTransition::Epsilon, 1);
        nfa.add_transition(1, AutomatonTransition::Symbol('a'), 2);
        nfa.add_transition(2, AutomatonTransition::Epsilon, 3);
        nfa.add_transition(2, AutomatonTransition::Epsilon, 1);
        nfa
    }

    #[test]
    fn state_set_is_canonical() {
        let left: StateSet = [3, 1, 2, 1].into_iter().collect();
        let right: StateSet = [2, 3, 1].into_iter().collect();
        assert_eq!(left, right);
        assert_eq!(left.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(left.contains(2));
        assert!(!left.contains(0));
    }

    #[test]
    fn epsilon_closure() {
        let nfa = sample();
        assert_eq!(nfa.epsilon_closure([0]).iter().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(nfa.epsilon_closure([2]).iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(nfa.epsilon_closure([3]).iter().collect::<Vec<_>>(), vec![3]);
        assert!(nfa.epsilon_closure(std::iter::empty()).is_empty());
    }

    #[test]
    fn step_and_accepts() {
        let nfa = sample();
        let start = nfa.epsilon_closure([0]);
        assert_eq!(nfa.step(&start, 'a').iter().collect::<Vec<_>>(), vec![2]);
        assert!(nfa.step(&start, 'b').is_empty());

        assert!(!nfa.accepts(""));
        assert!(nfa.accepts("a"));
        assert!(nfa.accepts("aaa"));
        assert!(!nfa.accepts("ab"));
        assert!(!nfa.is_empty());
        assert_eq!(nfa.reachable_states().len(), 4);
    }

    #[test]
    fn dfa_queries() {
        // Accepts words over {a, b} that end in 'a'
        let mut dfa = DeterministicAutomaton::from_parts(
            Alphabet::new("ab".chars()),
            0,
            BTreeSet::from([1]),
            vec![vec![1, 0], vec![1, 0]],
        );
        assert!(dfa.is_total());
        assert!(dfa.accepts("ba"));
        assert!(!dfa.accepts("ab"));
        assert!(!dfa.accepts("ca"));
        assert_eq!(dfa.next(0, 'a'), Some(1));
        assert_eq!(dfa.next(0, 'c'), None);

        dfa.to_complement();
        assert!(dfa.accepts(""));
        assert!(dfa.accepts("ab"));
        assert!(!dfa.accepts("ba"));
        assert!(!dfa.is_empty());

        dfa.accept_states.clear();
        assert!(dfa.is_empty());
    }
}
