mod lexer;

use std::collections::BTreeSet;
use std::fmt::{self, Display};

use log::trace;

pub use lexer::{tokenize, Token, TokenKind, RESERVED};

use super::{Alphabet, Regex, RegexEntry, RegexOps, SyntaxError, SyntaxErrorKind};

/// Deepest allowed nesting of parentheses.
pub const MAX_NESTING: usize = 256;

struct RegexParser<'a> {
    expr: &'a str,
    tokens: Vec<Token>,
    curr_pos: usize,
    depth: usize,
    alphabet: &'a Alphabet,
}

impl Regex {
    /// Parse `expr`, accepting only symbols from `alphabet`.
    ///
    /// Precedence from lowest to highest: `|`, juxtaposition, the postfix
    /// operators `*`, `+`, `?`. An empty expression or an empty alternative
    /// stands for the empty string.
    pub fn parse(expr: &str, alphabet: &Alphabet) -> Result<Self, SyntaxError> {
        let tokens = tokenize(expr)?;
        trace!("parse({:?}): {} tokens", expr, tokens.len());

        let mut regex_parser = RegexParser {
            expr,
            tokens,
            curr_pos: 0,
            depth: 0,
            alphabet,
        };
        regex_parser.get_regex()
    }

    pub fn from_ops(root: RegexOps) -> Self {
        Self {
            root: Box::new(root),
        }
    }

    pub fn root(&self) -> &RegexOps {
        &self.root
    }

    /// Every symbol the expression mentions.
    pub fn symbols(&self) -> BTreeSet<char> {
        fn collect(op: &RegexOps, acc: &mut BTreeSet<char>) {
            match op {
                RegexOps::Empty | RegexOps::Epsilon => {}
                RegexOps::Symbol(c) => {
                    acc.insert(*c);
                }
                RegexOps::Consecutive(left, right) | RegexOps::Either(left, right) => {
                    collect(left, acc);
                    collect(right, acc);
                }
                RegexOps::Repeat(inner) | RegexOps::OneOrMore(inner) => collect(inner, acc),
            }
        }

        let mut acc = BTreeSet::new();
        collect(&self.root, &mut acc);
        acc
    }
}

impl RegexParser<'_> {
    fn get_regex(&mut self) -> Result<Regex, SyntaxError> {
        let root = self.parse_either()?;

        // parse_either only stops early on a ')' it cannot match
        if let Some(token) = self.tokens.get(self.curr_pos) {
            return Err(self.error(token.position, SyntaxErrorKind::UnbalancedCloseParen));
        }

        Ok(Regex { root })
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.curr_pos).map(|token| &token.kind)
    }

    fn parse_either(&mut self) -> Result<RegexEntry, SyntaxError> {
        let mut branches = vec![self.parse_consecutive()?];

        while let Some(TokenKind::Union) = self.peek() {
            self.curr_pos += 1;
            branches.push(self.parse_consecutive()?);
        }

        Ok(balanced(branches, RegexOps::Either).unwrap_or_else(|| Box::new(RegexOps::Epsilon)))
    }

    fn parse_consecutive(&mut self) -> Result<RegexEntry, SyntaxError> {
        let mut items = Vec::new();

        while let Some(kind) = self.peek() {
            if matches!(kind, TokenKind::Union | TokenKind::RParen) {
                break;
            }
            items.push(self.parse_repeat()?);
        }

        Ok(balanced(items, RegexOps::Consecutive).unwrap_or_else(|| Box::new(RegexOps::Epsilon)))
    }

    fn parse_repeat(&mut self) -> Result<RegexEntry, SyntaxError> {
        let mut ret = self.parse_priority()?;

        while let Some(kind) = self.peek() {
            ret = match kind {
                TokenKind::Star => star(ret),
                TokenKind::Plus => plus(ret),
                TokenKind::Question => optional(ret),
                _ => break,
            };

            self.curr_pos += 1;
        }

        Ok(ret)
    }

    fn parse_priority(&mut self) -> Result<RegexEntry, SyntaxError> {
        // Callers only get here with a token that can start an operand or is a
        // misplaced postfix operator.
        let Some(token) = self.tokens.get(self.curr_pos).cloned() else {
            return Ok(Box::new(RegexOps::Epsilon));
        };
        self.curr_pos += 1;

        match token.kind {
            TokenKind::LParen => {
                if self.depth == MAX_NESTING {
                    return Err(self.error(token.position, SyntaxErrorKind::NestingTooDeep));
                }
                self.depth += 1;
                let ret = self.parse_either()?;
                self.depth -= 1;

                if !matches!(self.peek(), Some(TokenKind::RParen)) {
                    return Err(self.error(token.position, SyntaxErrorKind::UnbalancedOpenParen));
                }
                self.curr_pos += 1;

                Ok(ret)
            }
            TokenKind::Symbol(symbol) => {
                self.check_symbol(symbol, token.position)?;
                Ok(Box::new(RegexOps::Symbol(symbol)))
            }
            TokenKind::Class(members) => {
                for &(symbol, position) in members.iter() {
                    self.check_symbol(symbol, position)?;
                }
                Ok(union_of(members.into_iter().map(|(symbol, _)| symbol)))
            }
            TokenKind::Any => Ok(union_of(self.alphabet.iter())),
            TokenKind::Star | TokenKind::Plus | TokenKind::Question => {
                Err(self.error(token.position, SyntaxErrorKind::MissingOperand))
            }
            TokenKind::Union => Err(self.error(token.position, SyntaxErrorKind::MissingOperand)),
            TokenKind::RParen => {
                Err(self.error(token.position, SyntaxErrorKind::UnbalancedCloseParen))
            }
        }
    }

    fn check_symbol(&self, symbol: char, position: usize) -> Result<(), SyntaxError> {
        if self.alphabet.contains(symbol) {
            Ok(())
        } else {
            Err(self.error(position, SyntaxErrorKind::UnknownSymbol(symbol)))
        }
    }

    fn error(&self, position: usize, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(self.expr, position, kind)
    }
}

/// Alternation of the given symbols, or `Empty` if there are none.
fn union_of(symbols: impl Iterator<Item = char>) -> RegexEntry {
    let symbols = symbols.collect::<BTreeSet<_>>();
    let items = symbols.into_iter().map(|c| Box::new(RegexOps::Symbol(c))).collect();
    balanced(items, RegexOps::Either).unwrap_or_else(|| Box::new(RegexOps::Empty))
}

/// Join `items` pairwise into a tree of depth `log2(items.len())`, keeping
/// their order. Both operators are associative, so the shape does not change
/// the language.
fn balanced(
    mut items: Vec<RegexEntry>,
    join: fn(RegexEntry, RegexEntry) -> RegexOps,
) -> Option<RegexEntry> {
    if items.len() <= 1 {
        return items.pop();
    }

    let right = items.split_off((items.len() + 1) / 2);
    let left = balanced(items, join)?;
    let right = balanced(right, join)?;
    Some(Box::new(join(left, right)))
}

// Stacked postfix operators collapse, so `a***` is no deeper than `a*`.

fn star(inner: RegexEntry) -> RegexEntry {
    if matches!(*inner, RegexOps::Repeat(_)) {
        return inner;
    }

    match *inner {
        RegexOps::OneOrMore(inner) => Box::new(RegexOps::Repeat(inner)),
        _ => Box::new(RegexOps::Repeat(inner)),
    }
}

fn plus(inner: RegexEntry) -> RegexEntry {
    if matches!(*inner, RegexOps::Repeat(_) | RegexOps::OneOrMore(_)) {
        return inner;
    }
    Box::new(RegexOps::OneOrMore(inner))
}

fn optional(inner: RegexEntry) -> RegexEntry {
    let already_optional = match inner.as_ref() {
        RegexOps::Repeat(_) => true,
        RegexOps::Either(_, right) => **right == RegexOps::Epsilon,
        _ => false,
    };
    if already_optional {
        return inner;
    }

    match *inner {
        RegexOps::OneOrMore(inner) => Box::new(RegexOps::Repeat(inner)),
        _ => Box::new(RegexOps::Either(inner, Box::new(RegexOps::Epsilon))),
    }
}

// Binding strength of the surrounding context
const ALTERNATION: u8 = 0;
const CONCATENATION: u8 = 1;
const REPETITION: u8 = 2;

fn render(op: &RegexOps, context: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match op {
        RegexOps::Empty => write!(f, "[]"),
        RegexOps::Epsilon => write!(f, "()"),
        RegexOps::Symbol(c) if RESERVED.contains(c) => write!(f, "\\{}", c),
        RegexOps::Symbol(c) => write!(f, "{}", c),
        RegexOps::Either(left, right) => {
            if context > ALTERNATION {
                write!(f, "(")?;
            }
            render(left, ALTERNATION, f)?;
            write!(f, "|")?;
            render(right, ALTERNATION, f)?;
            if context > ALTERNATION {
                write!(f, ")")?;
            }
            Ok(())
        }
        RegexOps::Consecutive(left, right) => {
            if context > CONCATENATION {
                write!(f, "(")?;
            }
            render(left, CONCATENATION, f)?;
            render(right, CONCATENATION, f)?;
            if context > CONCATENATION {
                write!(f, ")")?;
            }
            Ok(())
        }
        RegexOps::Repeat(inner) => {
            render(inner, REPETITION, f)?;
            write!(f, "*")
        }
        RegexOps::OneOrMore(inner) => {
            render(inner, REPETITION, f)?;
            write!(f, "+")
        }
    }
}

/// Renders an expression that parses back to the same language.
impl Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(&self.root, ALTERNATION, f)
    }
}
