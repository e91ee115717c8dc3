use serde::Serialize;

use crate::decoder::{decode, Decoded, Word};
use crate::instructions::describe;

pub fn fmt_decoded(d: &Decoded) -> String {
    match d.op() {
        Some(op) => {
            let desc = describe(op);
            if desc.takes_operand() {
                format!("{} {:#x}", desc.mnemonic, d.operand)
            } else {
                desc.mnemonic.to_string()
            }
        }
        // unassigned opcode: emit as a raw data word the assembler accepts back
        None => format!("{:#x}", ((d.opcode as Word) << 12) | d.operand),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingLine {
    pub addr: Word,
    pub word: Word,
    pub text: String,
}

pub fn listing(words: &[Word]) -> Vec<ListingLine> {
    words
        .iter()
        .enumerate()
        .map(|(i, &word)| ListingLine {
            addr: i as Word,
            word,
            text: fmt_decoded(&decode(word)),
        })
        .collect()
}

/// Plain-text listing, one instruction per line.
pub fn render(words: &[Word], show_words: bool) -> String {
    let mut out = String::new();
    for line in listing(words) {
        if show_words {
            out.push_str(&format!("{:03x}: {:04x}  {}\n", line.addr, line.word, line.text));
        } else {
            out.push_str(&line.text);
            out.push('\n');
        }
    }
    out
}
