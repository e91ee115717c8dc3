use serde::{Deserialize, Serialize};

/// The machine's 16-bit unit of memory and instruction encoding.
pub type Word = u16;

pub const OPERAND_MASK: Word = 0x0FFF;
pub const OPCODE_SHIFT: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Op {
    Jns = 0,
    Load = 1,
    Store = 2,
    Add = 3,
    Subt = 4,
    Input = 5,
    Output = 6,
    Halt = 7,
    Skipcond = 8,
    Jump = 9,
    Clear = 10,
    AddI = 11,
    JumpI = 12,
    StoreI = 13,
    LoadI = 14,
}

impl Op {
    /// Maps a 4-bit opcode to its instruction. Opcode 15 is unassigned.
    pub fn from_opcode(opcode: u8) -> Option<Op> {
        let op = match opcode {
            0 => Op::Jns,
            1 => Op::Load,
            2 => Op::Store,
            3 => Op::Add,
            4 => Op::Subt,
            5 => Op::Input,
            6 => Op::Output,
            7 => Op::Halt,
            8 => Op::Skipcond,
            9 => Op::Jump,
            10 => Op::Clear,
            11 => Op::AddI,
            12 => Op::JumpI,
            13 => Op::StoreI,
            14 => Op::LoadI,
            _ => return None,
        };
        Some(op)
    }

    pub fn opcode(self) -> u8 {
        self as u8
    }

    pub fn encode(self, operand: Word) -> Word {
        encode(self.opcode(), operand)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub opcode: u8, // high nibble
    pub operand: Word, // low 12 bits
}

impl Decoded {
    pub fn op(&self) -> Option<Op> {
        Op::from_opcode(self.opcode)
    }
}

/// `(opcode << 12) | (operand & 0xFFF)`
pub fn encode(opcode: u8, operand: Word) -> Word {
    ((opcode as Word & 0xF) << OPCODE_SHIFT) | (operand & OPERAND_MASK)
}

pub fn decode(word: Word) -> Decoded {
    Decoded {
        opcode: ((word >> OPCODE_SHIFT) & 0xF) as u8,
        operand: word & OPERAND_MASK,
    }
}

pub trait Decoder {
    fn decode(&self, word: Word) -> Decoded;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_is_lossless_for_every_field_pair() {
        for opcode in 0u8..16 {
            for operand in 0..=OPERAND_MASK {
                let d = decode(encode(opcode, operand));
                assert_eq!((d.opcode, d.operand), (opcode, operand));
            }
        }
    }

    #[test]
    fn encode_masks_operand_to_twelve_bits() {
        assert_eq!(encode(1, 0x1005), 0x1005);
        assert_eq!(encode(2, 0xFFFF), 0x2FFF);
    }

    #[test]
    fn opcode_fifteen_is_unassigned() {
        assert_eq!(decode(0xF123).op(), None);
        assert_eq!(decode(0xE123).op(), Some(Op::LoadI));
        assert_eq!(Op::StoreI.encode(7), 0xD007);
    }
}
