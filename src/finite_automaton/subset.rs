use std::collections::{BTreeSet, HashMap, VecDeque};

use log::{debug, trace};

use super::StateSet;
use crate::{
    Alphabet, AutomatonState, DeterministicAutomaton, Error, FiniteAutomaton, Limits, Stage,
};

/// Work-list state of a running subset construction.
struct SubsetBuilder<'a> {
    alphabet: &'a Alphabet,
    limits: &'a Limits,
    subsets: Vec<StateSet>,
    reverse_mapping: HashMap<StateSet, AutomatonState>,
    partial: Vec<Vec<Option<AutomatonState>>>,
    queue: VecDeque<AutomatonState>,
}

impl SubsetBuilder<'_> {
    /// The DFA state for `subset`, allocated and queued on first sight.
    fn state_for(&mut self, subset: StateSet) -> Result<AutomatonState, Error> {
        if let Some(mapped_dfa) = self.reverse_mapping.get(&subset) {
            return Ok(*mapped_dfa);
        }

        if let Some(limit) = self.limits.max_dfa_states {
            if self.subsets.len() >= limit {
                return Err(Error::ResourceExceeded {
                    stage: Stage::Determinization,
                    limit,
                });
            }
        }

        let new_state = self.subsets.len();
        trace!("from_nfa: state {} = {:?}", new_state, subset);
        self.reverse_mapping.insert(subset.clone(), new_state);
        self.subsets.push(subset);
        self.partial.push(vec![None; self.alphabet.len()]);
        self.queue.push_back(new_state);
        Ok(new_state)
    }
}

impl DeterministicAutomaton {
    /// Subset construction.
    ///
    /// Every state stands for the epsilon-closed set of NFA states reachable
    /// by some word. Pairs left without a destination are sent to a shared,
    /// rejecting sink state, so the result is always complete.
    pub fn from_nfa(
        nfa: &FiniteAutomaton,
        alphabet: &Alphabet,
        limits: &Limits,
    ) -> Result<Self, Error> {
        let mut builder = SubsetBuilder {
            alphabet,
            limits,
            subsets: Vec::new(),
            reverse_mapping: HashMap::new(),
            partial: Vec::new(),
            queue: VecDeque::new(),
        };

        let start_state = builder.state_for(nfa.epsilon_closure([nfa.start_state()]))?;

        while let Some(curr_state) = builder.queue.pop_front() {
            for (index, symbol) in alphabet.iter().enumerate() {
                let nfa_to = nfa.epsilon_closure(nfa.step(&builder.subsets[curr_state], symbol));

                // Filled in with the sink state afterwards
                if nfa_to.is_empty() {
                    continue;
                }

                let dfa_to = builder.state_for(nfa_to)?;
                builder.partial[curr_state][index] = Some(dfa_to);
            }
        }

        let accept_states: BTreeSet<AutomatonState> = builder
            .subsets
            .iter()
            .enumerate()
            .filter(|(_, subset)| subset.contains(nfa.accept_state()))
            .map(|(state, _)| state)
            .collect();

        let table = complete(builder.partial, alphabet.len(), limits)?;
        debug!(
            "from_nfa: {} nfa states -> {} dfa states ({} accepting)",
            nfa.state_count(),
            table.len(),
            accept_states.len()
        );

        Ok(Self::from_parts(
            alphabet.clone(),
            start_state,
            accept_states,
            table,
        ))
    }
}

/// Route every missing transition to a fresh sink state that loops on every
/// symbol. The sink is only added when something needs it.
fn complete(
    partial: Vec<Vec<Option<AutomatonState>>>,
    symbol_count: usize,
    limits: &Limits,
) -> Result<Vec<Vec<AutomatonState>>, Error> {
    let sink = partial.len();
    let needs_sink = partial.iter().flatten().any(Option::is_none);

    if needs_sink {
        if let Some(limit) = limits.max_dfa_states {
            if sink >= limit {
                return Err(Error::ResourceExceeded {
                    stage: Stage::Determinization,
                    limit,
                });
            }
        }
    }

    let mut table: Vec<Vec<AutomatonState>> = partial
        .into_iter()
        .map(|row| row.into_iter().map(|to| to.unwrap_or(sink)).collect())
        .collect();

    if needs_sink {
        trace!("complete: sink state {}", sink);
        table.push(vec![sink; symbol_count]);
    }

    Ok(table)
}
