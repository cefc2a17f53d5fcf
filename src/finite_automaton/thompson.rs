use log::debug;

use crate::{AutomatonState, AutomatonTransition, FiniteAutomaton, Regex, RegexOps};

/// Start and accept state of a compiled subexpression.
type Fragment = (AutomatonState, AutomatonState);

impl FiniteAutomaton {
    /// Thompson construction: one fragment per syntax tree node, glued
    /// together with epsilon moves.
    pub fn from_regex(regex: &Regex) -> Self {
        let mut nfa = Self {
            start_state: 0,
            accept_state: 0,
            transitions: Vec::new(),
        };

        let (start, accept) = nfa.compile(regex.root());
        nfa.start_state = start;
        nfa.accept_state = accept;

        debug!(
            "from_regex({}): {} states, start = {}, accept = {}",
            regex,
            nfa.state_count(),
            start,
            accept
        );
        nfa
    }

    fn compile(&mut self, op: &RegexOps) -> Fragment {
        match op {
            RegexOps::Empty => (self.new_state(), self.new_state()),
            RegexOps::Epsilon => {
                let (start, accept) = (self.new_state(), self.new_state());
                self.add_transition(start, AutomatonTransition::Epsilon, accept);
                (start, accept)
            }
            RegexOps::Symbol(symbol) => {
                let (start, accept) = (self.new_state(), self.new_state());
                self.add_transition(start, AutomatonTransition::Symbol(*symbol), accept);
                (start, accept)
            }
            RegexOps::Consecutive(left, right) => {
                let (left_start, left_accept) = self.compile(left);
                let (right_start, right_accept) = self.compile(right);
                self.add_transition(left_accept, AutomatonTransition::Epsilon, right_start);
                (left_start, right_accept)
            }
            RegexOps::Either(left, right) => {
                let start = self.new_state();
                let (left_start, left_accept) = self.compile(left);
                let (right_start, right_accept) = self.compile(right);
                let accept = self.new_state();

                self.add_transition(start, AutomatonTransition::Epsilon, left_start);
                self.add_transition(start, AutomatonTransition::Epsilon, right_start);
                self.add_transition(left_accept, AutomatonTransition::Epsilon, accept);
                self.add_transition(right_accept, AutomatonTransition::Epsilon, accept);
                (start, accept)
            }
            RegexOps::Repeat(inner) => {
                let start = self.new_state();
                let (inner_start, inner_accept) = self.compile(inner);
                let accept = self.new_state();

                self.add_transition(start, AutomatonTransition::Epsilon, inner_start);
                self.add_transition(start, AutomatonTransition::Epsilon, accept);
                self.add_transition(inner_accept, AutomatonTransition::Epsilon, inner_start);
                self.add_transition(inner_accept, AutomatonTransition::Epsilon, accept);
                (start, accept)
            }
            RegexOps::OneOrMore(inner) => {
                let start = self.new_state();
                let (inner_start, inner_accept) = self.compile(inner);
                let accept = self.new_state();

                self.add_transition(start, AutomatonTransition::Epsilon, inner_start);
                self.add_transition(inner_accept, AutomatonTransition::Epsilon, inner_start);
                self.add_transition(inner_accept, AutomatonTransition::Epsilon, accept);
                (start, accept)
            }
        }
    }
}
