use std::collections::BTreeMap;
use std::fmt;

use crate::decoder::Op;
use crate::instructions::{describe, lookup_mnemonic};

use super::diag::{AsmError, Diagnostic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Label(&'a str),
    DecNumber(&'a str),
    /// Digits only, without the `0x` prefix. Empty when the digits were missing.
    HexNumber(&'a str),
    Mnemonic(Op),
    Comma,
    Unknown(char),
    Eof,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Label(s) | Token::DecNumber(s) => f.write_str(s),
            Token::HexNumber(s) => write!(f, "0x{s}"),
            Token::Mnemonic(op) => f.write_str(describe(*op).mnemonic),
            Token::Comma => f.write_str(","),
            Token::Unknown(c) => write!(f, "{c}"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    prev: (usize, usize),
    line: usize,
    /// byte offset of a line start -> 1-based line number
    line_starts: BTreeMap<usize, usize>,
    errors: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            prev: (0, 0),
            line: 1,
            line_starts: BTreeMap::from([(0, 1)]),
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_starts.insert(self.pos, self.line);
        }
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some('\n' | '\r' | '\t' | ' ') => {
                    self.bump();
                }
                // comment runs to end of line; the newline itself is left for the loop
                Some(';') => self.eat_while(|c| c != '\n'),
                _ => break,
            }
        }
    }

    fn error(&mut self, error: AsmError, offset: usize) {
        let d = Diagnostic::new(error, offset, self);
        self.errors.push(d);
    }

    /// Lexes the next token and returns it with its starting byte offset.
    /// Keeps returning `Eof` once the input is exhausted.
    pub fn next_token(&mut self) -> (Token<'a>, usize) {
        self.skip_trivia();
        let src = self.src;
        let start = self.pos;
        let Some(c) = self.bump() else {
            self.prev = (start, start);
            return (Token::Eof, start);
        };

        let tok = if c.is_ascii_alphabetic() {
            self.eat_while(|c| c.is_ascii_alphanumeric());
            let text = &src[start..self.pos];
            match lookup_mnemonic(text) {
                Some(op) => Token::Mnemonic(op),
                None => Token::Label(text),
            }
        } else if c.is_ascii_digit() {
            if c == '0' && matches!(self.peek(), Some('x' | 'X')) {
                self.bump();
                let digits = self.pos;
                self.eat_while(|c| c.is_ascii_hexdigit());
                if digits == self.pos {
                    self.error(AsmError::MissingHexDigits, start);
                }
                Token::HexNumber(&src[digits..self.pos])
            } else {
                self.eat_while(|c| c.is_ascii_digit());
                Token::DecNumber(&src[start..self.pos])
            }
        } else if c == ',' || c == ':' {
            Token::Comma
        } else {
            self.error(AsmError::UnexpectedChar(c), start);
            Token::Unknown(c)
        };

        self.prev = (start, self.pos);
        (tok, start)
    }

    /// Exact source slice of the most recently produced token.
    pub fn previous_lexeme(&self) -> &'a str {
        &self.src[self.prev.0..self.prev.1]
    }

    /// 1-based line number and full text of the line containing `offset`.
    pub fn line_for(&self, offset: usize) -> (usize, &'a str) {
        let (start, line) = self
            .line_starts
            .range(..=offset)
            .next_back()
            .map_or((0, 1), |(&s, &l)| (s, l));
        let rest = &self.src[start.min(self.src.len())..];
        let text = rest.split('\n').next().unwrap_or(rest);
        (line, text.trim_end_matches('\r'))
    }

    /// Drains lexer errors recorded since the last call.
    pub fn take_errors(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.errors)
    }
}
