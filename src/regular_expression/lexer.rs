use crate::{SyntaxError, SyntaxErrorKind};

/// Characters with a meaning of their own. Escape them with `\` to use them
/// as symbols.
pub const RESERVED: [char; 10] = ['(', ')', '|', '*', '+', '?', '.', '[', ']', '\\'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A plain or escaped symbol.
    Symbol(char),
    /// `[...]`: every member together with the position it was written at.
    /// Ranges are already expanded.
    Class(Vec<(char, usize)>),
    /// `.`
    Any,
    Star,
    Plus,
    Question,
    Union,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Character offset of the first character of the token.
    pub position: usize,
}

struct Lexer<'a> {
    expr: &'a str,
    chars: Vec<char>,
    curr_pos: usize,
}

/// Split `expr` into tokens, resolving escapes and character classes.
pub fn tokenize(expr: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer {
        expr,
        chars: expr.chars().collect(),
        curr_pos: 0,
    };
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }

    Ok(tokens)
}

impl Lexer<'_> {
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.curr_pos).copied();
        if c.is_some() {
            self.curr_pos += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.curr_pos).copied()
    }

    fn error(&self, position: usize, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(self.expr, position, kind)
    }

    fn next_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        let position = self.curr_pos;
        let kind = match self.bump() {
            None => return Ok(None),
            Some('(') => TokenKind::LParen,
            Some(')') => TokenKind::RParen,
            Some('|') => TokenKind::Union,
            Some('*') => TokenKind::Star,
            Some('+') => TokenKind::Plus,
            Some('?') => TokenKind::Question,
            Some('.') => TokenKind::Any,
            Some('[') => TokenKind::Class(self.class_members(position)?),
            Some(']') => TokenKind::Symbol(']'),
            Some('\\') => TokenKind::Symbol(self.escaped(position)?),
            Some(c) => TokenKind::Symbol(c),
        };

        Ok(Some(Token { kind, position }))
    }

    fn escaped(&mut self, escape_pos: usize) -> Result<char, SyntaxError> {
        self.bump()
            .ok_or_else(|| self.error(escape_pos, SyntaxErrorKind::DanglingEscape))
    }

    // Reads up to and including the closing ']'.
    fn class_members(&mut self, open_pos: usize) -> Result<Vec<(char, usize)>, SyntaxError> {
        let mut members = Vec::new();

        loop {
            let position = self.curr_pos;
            let lo = match self.bump() {
                None => return Err(self.error(open_pos, SyntaxErrorKind::UnterminatedClass)),
                Some(']') => break,
                Some('\\') => self.escaped(position)?,
                Some(c) => c,
            };

            // A '-' right before ']' is literal
            let is_range = self.peek() == Some('-')
                && !matches!(self.chars.get(self.curr_pos + 1), None | Some(']'));

            if !is_range {
                members.push((lo, position));
                continue;
            }

            self.bump();
            let hi_pos = self.curr_pos;
            let hi = match self.bump() {
                Some('\\') => self.escaped(hi_pos)?,
                Some(c) => c,
                None => return Err(self.error(open_pos, SyntaxErrorKind::UnterminatedClass)),
            };

            if lo > hi {
                return Err(self.error(position, SyntaxErrorKind::InvalidRange(lo, hi)));
            }

            members.extend((lo..=hi).map(|c| (c, position)));
        }

        Ok(members)
    }
}
