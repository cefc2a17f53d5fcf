use std::fmt::{self, Display};

use crate::regular_expression::{tokenize, TokenKind, RESERVED};
use crate::SyntaxError;

/// Finite, ordered set of symbols every automaton runs over.
///
/// The position of a symbol in the set is its column in
/// [`DeterministicAutomaton`](crate::DeterministicAutomaton) tables.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    pub fn new(symbols: impl IntoIterator<Item = char>) -> Self {
        let mut symbols: Vec<char> = symbols.into_iter().collect();
        symbols.sort_unstable();
        symbols.dedup();
        Self { symbols }
    }

    /// Printable ASCII and the whitespace characters `\t \n \r \x0b \x0c`.
    pub fn printable() -> Self {
        Self::new((' '..='~').chain(['\t', '\n', '\r', '\x0b', '\x0c']))
    }

    /// The symbols written in any of `exprs`, escaped ones and class members
    /// included. If any of them uses `.`, all of [`Alphabet::printable`] is
    /// added as well, so `.` keeps matching more than the written symbols.
    pub fn from_exprs(exprs: &[&str]) -> Result<Self, SyntaxError> {
        let mut symbols = Vec::new();
        let mut wildcard = false;

        for expr in exprs {
            for token in tokenize(expr)? {
                match token.kind {
                    TokenKind::Symbol(c) => symbols.push(c),
                    TokenKind::Class(members) => symbols.extend(members.into_iter().map(|m| m.0)),
                    TokenKind::Any => wildcard = true,
                    _ => {}
                }
            }
        }

        let alphabet = Self::new(symbols);
        Ok(if wildcard {
            alphabet.union(&Self::printable())
        } else {
            alphabet
        })
    }

    /// Whether `c` has to be escaped to be read as a symbol.
    pub fn is_reserved(c: char) -> bool {
        RESERVED.contains(&c)
    }

    pub fn contains(&self, c: char) -> bool {
        self.index_of(c).is_some()
    }

    pub fn index_of(&self, c: char) -> Option<usize> {
        self.symbols.binary_search(&c).ok()
    }

    pub fn symbol(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }

    pub fn union(&self, other: &Alphabet) -> Alphabet {
        Self::new(self.iter().chain(other.iter()))
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, c) in self.symbols.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", c)?;
        }
        write!(f, "}}")
    }
}
