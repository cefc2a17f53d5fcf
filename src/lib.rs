//! Decide whether two regular expressions denote the same language.
//!
//! Every expression goes through the same pipeline: it is parsed into a
//! [`Regex`], compiled into a [`FiniteAutomaton`] by Thompson construction,
//! determinized into a complete [`DeterministicAutomaton`] and finally compared
//! against the other expression's automaton by a lazy search over their
//! product.
//!
//! ```
//! use autoeq::{are_equivalent, Alphabet};
//!
//! let alphabet = Alphabet::new("ab".chars());
//! assert!(are_equivalent("a|b", "b|a", &alphabet).unwrap());
//! assert!(!are_equivalent("ab", "ba", &alphabet).unwrap());
//! ```

mod alphabet;
mod equivalence;
mod error;
mod finite_automaton;
mod limits;
mod regular_expression;

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

pub use alphabet::Alphabet;
pub use equivalence::{compare, find_witness, product, subset_witness, ProductOp, Side, Verdict};
pub use error::{Error, Stage, SyntaxError, SyntaxErrorKind};
pub use finite_automaton::StateSet;
pub use limits::Limits;
pub use regular_expression::MAX_NESTING;

pub type RegexEntry = Box<RegexOps>;

/// Node of a regular expression syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexOps {
    /// Matches no string at all.
    Empty,
    /// Matches only the empty string.
    Epsilon,
    Symbol(char),
    Consecutive(RegexEntry, RegexEntry),
    Either(RegexEntry, RegexEntry),
    /// Zero or more repetitions.
    Repeat(RegexEntry),
    /// One or more repetitions.
    OneOrMore(RegexEntry),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    root: RegexEntry,
}

impl Default for Regex {
    fn default() -> Self {
        Self {
            root: Box::new(RegexOps::Epsilon),
        }
    }
}

pub type AutomatonState = usize;
pub type AutomatonTransitionList = BTreeMap<AutomatonTransition, BTreeSet<AutomatonState>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AutomatonTransition {
    Epsilon,
    Symbol(char),
}

/// Nondeterministic automaton with epsilon moves, as produced by Thompson
/// construction: exactly one start and one accept state.
///
/// States are indices into `transitions`.
// Use BTree here instead of Hash to get determenistic results every time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiniteAutomaton {
    start_state: AutomatonState,
    accept_state: AutomatonState,
    transitions: Vec<AutomatonTransitionList>,
}

/// Complete deterministic automaton.
///
/// `table[state][i]` is the successor of `state` on the `i`-th symbol of
/// `alphabet`, so every `(state, symbol)` pair has exactly one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicAutomaton {
    alphabet: Alphabet,
    start_state: AutomatonState,
    accept_states: BTreeSet<AutomatonState>,
    table: Vec<Vec<AutomatonState>>,
}

/// Parse, compile and determinize one expression over `alphabet`.
pub fn compile(
    expr: &str,
    alphabet: &Alphabet,
    limits: &Limits,
) -> Result<DeterministicAutomaton, Error> {
    let regex = Regex::parse(expr, alphabet)?;
    let nfa = FiniteAutomaton::from_regex(&regex);
    debug!("compile({:?}): nfa has {} states", expr, nfa.state_count());
    let dfa = DeterministicAutomaton::from_nfa(&nfa, alphabet, limits)?;
    debug!("compile({:?}): dfa has {} states", expr, dfa.state_count());
    Ok(dfa)
}

/// Decide whether `regex_a` and `regex_b` denote the same language over `alphabet`.
pub fn are_equivalent(regex_a: &str, regex_b: &str, alphabet: &Alphabet) -> Result<bool, Error> {
    check_equivalence(regex_a, regex_b, alphabet, &Limits::default()).map(|v| v.is_equivalent())
}

/// Like [`are_equivalent`], but reports a distinguishing word and honours `limits`.
pub fn check_equivalence(
    regex_a: &str,
    regex_b: &str,
    alphabet: &Alphabet,
    limits: &Limits,
) -> Result<Verdict, Error> {
    let a = compile(regex_a, alphabet, limits)?;
    let b = compile(regex_b, alphabet, limits)?;
    let verdict = compare(&a, &b, limits)?;
    debug!("check_equivalence({:?}, {:?}) -> {:?}", regex_a, regex_b, verdict);
    Ok(verdict)
}

/// Decide whether every word matched by `regex_a` is also matched by `regex_b`.
///
/// Returns `None` when the inclusion holds, or the shortest word matched by
/// `regex_a` alone.
pub fn check_inclusion(
    regex_a: &str,
    regex_b: &str,
    alphabet: &Alphabet,
    limits: &Limits,
) -> Result<Option<String>, Error> {
    let a = compile(regex_a, alphabet, limits)?;
    let b = compile(regex_b, alphabet, limits)?;
    subset_witness(&a, &b, limits)
}

pub fn is_subset(regex_a: &str, regex_b: &str, alphabet: &Alphabet) -> Result<bool, Error> {
    check_inclusion(regex_a, regex_b, alphabet, &Limits::default()).map(|w| w.is_none())
}
