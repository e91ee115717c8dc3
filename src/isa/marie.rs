use crate::decoder::{decode, Decoded, Decoder, Word};

/// MARIE decoder: 4-bit opcode, 12-bit operand. Total over all words;
/// unassigned opcodes are left for the executor to reject.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarieDecoder;

impl MarieDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for MarieDecoder {
    fn decode(&self, word: Word) -> Decoded {
        decode(word)
    }
}
