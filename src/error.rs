//!
//! Error codes
//!

use std::fmt::Display;

use colored::Colorize;

/// What went wrong while reading a regular expression.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SyntaxErrorKind {
    /// A `(` without the matching `)`.
    UnbalancedOpenParen,
    /// A `)` that closes nothing.
    UnbalancedCloseParen,
    /// A postfix operator (`*`, `+` or `?`) with nothing to apply it to.
    MissingOperand,
    /// A symbol that is neither an operator nor part of the alphabet.
    UnknownSymbol(char),
    /// A `\` at the very end of the expression.
    DanglingEscape,
    /// A `[` without the matching `]`.
    UnterminatedClass,
    /// A class range whose lower bound is greater than its upper bound.
    InvalidRange(char, char),
    /// A `(` nested more than `MAX_NESTING` levels deep.
    NestingTooDeep,
}

impl Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnbalancedOpenParen => write!(f, "')' expected"),
            Self::UnbalancedCloseParen => write!(f, "unexpected ')'"),
            Self::MissingOperand => write!(f, "operator has no operand"),
            Self::UnknownSymbol(c) => write!(f, "symbol {:?} is not in the alphabet", c),
            Self::DanglingEscape => write!(f, "unexpected end of the expression after '\\'"),
            Self::UnterminatedClass => write!(f, "']' expected"),
            Self::InvalidRange(lo, hi) => write!(f, "invalid range {:?}-{:?}", lo, hi),
            Self::NestingTooDeep => write!(f, "parentheses nested too deep"),
        }
    }
}

/// Malformed regular expression.
///
/// `position` counts characters, not bytes, from the start of `expr`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SyntaxError {
    pub expr: String,
    pub position: usize,
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub fn new(expr: &str, position: usize, kind: SyntaxErrorKind) -> Self {
        Self {
            expr: expr.to_string(),
            position,
            kind,
        }
    }

    /// The expression with the offending character painted red.
    pub fn highlight(&self) -> String {
        let before: String = self.expr.chars().take(self.position).collect();
        let mut rest = self.expr.chars().skip(self.position);
        match rest.next() {
            Some(c) => format!(
                "{}{}{}",
                before,
                c.to_string().red(),
                rest.collect::<String>()
            ),
            None => format!("{}{}", before, "_".red()),
        }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "syntax error at position {} in {:?}: {}",
            self.position, self.expr, self.kind
        )
    }
}

impl std::error::Error for SyntaxError {}

/// Pipeline stage that ran out of budget.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Stage {
    Determinization,
    ProductSearch,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Determinization => "determinization",
            Self::ProductSearch => "product search",
        }
        .fmt(f)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    Syntax(SyntaxError),
    /// More than `limit` states were needed by `stage`.
    ResourceExceeded { stage: Stage, limit: usize },
    /// An automaton could not be turned into Graphviz source.
    Render(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(e) => e.fmt(f),
            Self::ResourceExceeded { stage, limit } => {
                write!(f, "{} exceeded the limit of {} states", stage, limit)
            }
            Self::Render(message) => write!(f, "cannot render automaton: {}", message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syntax(e) => Some(e),
            Self::ResourceExceeded { .. } | Self::Render(_) => None,
        }
    }
}

impl From<SyntaxError> for Error {
    fn from(e: SyntaxError) -> Self {
        Self::Syntax(e)
    }
}
