use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::lexer::Lexer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Lex,
    Parse,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    #[error("expected hexadecimal digits after `0x`")]
    MissingHexDigits,
    #[error("label `{0}` missing comma")]
    LabelMissingComma(String),
    #[error("invalid operand `{0}`")]
    InvalidOperand(String),
    #[error("operand outside of max word range (2^12): {0}")]
    OperandOutOfRange(String),
    #[error("value outside of word range (2^16): {0}")]
    WordOutOfRange(String),
    #[error("label `{0}` does not exist")]
    UnknownLabel(String),
    #[error("unexpected token `{0}`")]
    UnexpectedToken(String),
}

impl AsmError {
    pub fn stage(&self) -> Stage {
        match self {
            AsmError::UnexpectedChar(_) | AsmError::MissingHexDigits => Stage::Lex,
            _ => Stage::Parse,
        }
    }
}

/// An assembly error pinned to its source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub error: AsmError,
    pub offset: usize,
    pub line: usize,
    pub line_text: String,
}

impl Diagnostic {
    pub fn new(error: AsmError, offset: usize, lexer: &Lexer<'_>) -> Self {
        let (line, text) = lexer.line_for(offset);
        Self {
            error,
            offset,
            line,
            line_text: text.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.error)?;
        writeln!(f, "  --> line {}", self.line)?;
        write!(f, "{:>4} | {}", self.line, self.line_text)
    }
}

/// Errors collected across both passes.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, d: Diagnostic) {
        debug!(line = d.line, stage = ?d.error.stage(), "{}", d.error);
        self.items.push(d);
    }

    pub fn report(&mut self, lexer: &Lexer<'_>, error: AsmError, offset: usize) {
        self.push(Diagnostic::new(error, offset, lexer));
    }

    pub fn has_errors(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
