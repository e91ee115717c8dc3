use crate::decoder::Op;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    Implied,
    Direct,
    Indirect,
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub op: Op,
    pub mnemonic: &'static str,
    pub mode: AddrMode,
}

impl InstrDesc {
    pub fn takes_operand(&self) -> bool {
        self.mode != AddrMode::Implied
    }
}

/// Indexed by opcode.
pub const TABLE: &[InstrDesc] = &[
    InstrDesc {
        op: Op::Jns,
        mnemonic: "jns",
        mode: AddrMode::Direct,
    },
    InstrDesc {
        op: Op::Load,
        mnemonic: "load",
        mode: AddrMode::Direct,
    },
    InstrDesc {
        op: Op::Store,
        mnemonic: "store",
        mode: AddrMode::Direct,
    },
    InstrDesc {
        op: Op::Add,
        mnemonic: "add",
        mode: AddrMode::Direct,
    },
    InstrDesc {
        op: Op::Subt,
        mnemonic: "subt",
        mode: AddrMode::Direct,
    },
    InstrDesc {
        op: Op::Input,
        mnemonic: "input",
        mode: AddrMode::Implied,
    },
    InstrDesc {
        op: Op::Output,
        mnemonic: "output",
        mode: AddrMode::Implied,
    },
    InstrDesc {
        op: Op::Halt,
        mnemonic: "halt",
        mode: AddrMode::Implied,
    },
    InstrDesc {
        op: Op::Skipcond,
        mnemonic: "skipcond",
        mode: AddrMode::Direct,
    },
    InstrDesc {
        op: Op::Jump,
        mnemonic: "jump",
        mode: AddrMode::Direct,
    },
    InstrDesc {
        op: Op::Clear,
        mnemonic: "clear",
        mode: AddrMode::Implied,
    },
    InstrDesc {
        op: Op::AddI,
        mnemonic: "addi",
        mode: AddrMode::Indirect,
    },
    InstrDesc {
        op: Op::JumpI,
        mnemonic: "jumpi",
        mode: AddrMode::Indirect,
    },
    InstrDesc {
        op: Op::StoreI,
        mnemonic: "storei",
        mode: AddrMode::Indirect,
    },
    InstrDesc {
        op: Op::LoadI,
        mnemonic: "loadi",
        mode: AddrMode::Indirect,
    },
];

pub fn describe(op: Op) -> &'static InstrDesc {
    &TABLE[op.opcode() as usize]
}

/// Case-insensitive mnemonic lookup.
pub fn lookup_mnemonic(text: &str) -> Option<Op> {
    TABLE
        .iter()
        .find(|d| d.mnemonic.eq_ignore_ascii_case(text))
        .map(|d| d.op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_opcode() {
        for (i, d) in TABLE.iter().enumerate() {
            assert_eq!(d.op.opcode() as usize, i, "{}", d.mnemonic);
        }
        assert_eq!(TABLE.len(), 15);
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup_mnemonic("SkipCond"), Some(Op::Skipcond));
        assert_eq!(lookup_mnemonic("LOADI"), Some(Op::LoadI));
        assert_eq!(lookup_mnemonic("loader"), None);
    }

    #[test]
    fn implied_ops_take_no_operand() {
        let implied: Vec<_> = TABLE.iter().filter(|d| !d.takes_operand()).map(|d| d.op).collect();
        assert_eq!(implied, vec![Op::Input, Op::Output, Op::Halt, Op::Clear]);
    }
}
