use std::collections::HashMap;

use crate::decoder::{Op, Word, OPERAND_MASK};
use crate::instructions::describe;

use super::diag::{AsmError, Diagnostics};
use super::lexer::{Lexer, Token};

/// Label name -> word address at its definition point.
pub type LabelTable = HashMap<String, Word>;

const MAX_OPERAND: u64 = 1 << 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingInstruction<'a> {
    Literal { op: Op, value: Word, offset: usize },
    LabelRef { op: Op, label: &'a str, offset: usize },
    /// Bare numeric literal emitted verbatim as a data word.
    Raw { word: Word, offset: usize },
}

fn next<'a>(lexer: &mut Lexer<'a>, diags: &mut Diagnostics) -> (Token<'a>, usize) {
    let tok = lexer.next_token();
    for d in lexer.take_errors() {
        diags.push(d);
    }
    tok
}

/// `None` when the literal does not fit in 64 bits. Empty hex digits
/// (already reported by the lexer) read as 0.
fn literal_value(tok: Token<'_>) -> Option<u64> {
    let (digits, radix) = match tok {
        Token::DecNumber(s) => (s, 10),
        Token::HexNumber(s) => (s, 16),
        _ => return Some(0),
    };
    if digits.is_empty() {
        return Some(0);
    }
    u64::from_str_radix(digits, radix).ok()
}

/// Pass 1: builds the pending instruction list and the label table.
pub fn first_pass<'a>(
    lexer: &mut Lexer<'a>,
    diags: &mut Diagnostics,
) -> (Vec<PendingInstruction<'a>>, LabelTable) {
    let mut pending = Vec::new();
    let mut labels = LabelTable::new();
    let mut addr: usize = 0;

    loop {
        let (mut tok, mut offset) = next(lexer, diags);
        if tok == Token::Eof {
            break;
        }

        if let Token::Label(name) = tok {
            let (after, after_offset) = next(lexer, diags);
            if after == Token::Comma {
                labels.insert(name.to_string(), addr as Word);
                (tok, offset) = next(lexer, diags);
            } else {
                diags.report(lexer, AsmError::LabelMissingComma(name.to_string()), offset);
                (tok, offset) = (after, after_offset);
            }
        }

        match tok {
            Token::Eof => break,
            Token::Mnemonic(op) if !describe(op).takes_operand() => {
                pending.push(PendingInstruction::Literal {
                    op,
                    value: 0,
                    offset,
                });
                addr += 1;
            }
            Token::Mnemonic(op) => {
                let (operand, operand_offset) = next(lexer, diags);
                match operand {
                    Token::Label(label) => {
                        pending.push(PendingInstruction::LabelRef {
                            op,
                            label,
                            offset: operand_offset,
                        });
                    }
                    Token::DecNumber(_) | Token::HexNumber(_) => {
                        let value = match literal_value(operand) {
                            Some(v) if v < MAX_OPERAND => v as Word,
                            _ => {
                                diags.report(
                                    lexer,
                                    AsmError::OperandOutOfRange(operand.to_string()),
                                    operand_offset,
                                );
                                0
                            }
                        };
                        pending.push(PendingInstruction::Literal {
                            op,
                            value,
                            offset: operand_offset,
                        });
                    }
                    other => {
                        // nothing emitted, the address counter stays put
                        diags.report(lexer, AsmError::InvalidOperand(other.to_string()), offset);
                        if other == Token::Eof {
                            break;
                        }
                        continue;
                    }
                }
                addr += 1;
            }
            Token::DecNumber(_) | Token::HexNumber(_) => {
                let word = match literal_value(tok) {
                    Some(v) if v <= Word::MAX as u64 => v as Word,
                    _ => {
                        diags.report(lexer, AsmError::WordOutOfRange(tok.to_string()), offset);
                        0
                    }
                };
                pending.push(PendingInstruction::Raw { word, offset });
                addr += 1;
            }
            other => {
                diags.report(lexer, AsmError::UnexpectedToken(other.to_string()), offset);
            }
        }
    }

    (pending, labels)
}

/// Pass 2: resolves label references and encodes every pending entry.
pub fn second_pass(
    pending: &[PendingInstruction<'_>],
    labels: &LabelTable,
    lexer: &Lexer<'_>,
    diags: &mut Diagnostics,
) -> Vec<Word> {
    pending
        .iter()
        .map(|p| match *p {
            PendingInstruction::Raw { word, .. } => word,
            PendingInstruction::Literal { op, value, .. } => op.encode(value),
            PendingInstruction::LabelRef { op, label, offset } => match labels.get(label) {
                Some(&addr) => op.encode(addr & OPERAND_MASK),
                None => {
                    diags.report(lexer, AsmError::UnknownLabel(label.to_string()), offset);
                    op.encode(0)
                }
            },
        })
        .collect()
}
