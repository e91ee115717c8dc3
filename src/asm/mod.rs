//! Two-pass MARIE assembler.
//!
//! Both passes always run to completion; diagnostics are collected along the
//! way and any recorded diagnostic rejects the whole assembly afterwards.

pub mod diag;
pub mod lexer;
pub mod parser;

use tracing::debug;

use crate::decoder::Word;

pub use diag::{AsmError, Diagnostic, Diagnostics, Stage};
pub use lexer::{Lexer, Token};
pub use parser::{first_pass, second_pass, LabelTable, PendingInstruction};

#[derive(Debug, Clone)]
pub struct Assembly {
    pub words: Vec<Word>,
    pub labels: LabelTable,
}

#[derive(thiserror::Error, Debug)]
#[error("parser has errors ({} diagnostics)", .diagnostics.len())]
pub struct AssemblyFailure {
    pub diagnostics: Vec<Diagnostic>,
}

pub fn assemble(source: &str) -> Result<Assembly, AssemblyFailure> {
    let mut diags = Diagnostics::default();
    let mut lexer = Lexer::new(source);
    let (pending, labels) = first_pass(&mut lexer, &mut diags);
    let words = second_pass(&pending, &labels, &lexer, &mut diags);

    if diags.has_errors() {
        return Err(AssemblyFailure {
            diagnostics: diags.into_vec(),
        });
    }
    debug!(words = words.len(), labels = labels.len(), "assembled");
    Ok(Assembly { words, labels })
}
