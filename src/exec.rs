use tracing::{debug, warn};

use crate::cpu::{Cpu, Status, Trap};
use crate::decoder::{Decoded, Op, Word, OPERAND_MASK};
use crate::io::{parse_hex_input, Device};
use crate::memory::Bus;

pub trait Executor {
    fn exec<B: Bus, IO: Device>(
        &self,
        cpu: &mut Cpu,
        bus: &mut B,
        dev: &mut IO,
        d: Decoded,
    ) -> Result<(), Trap>;
}

const SKIP_LT: Word = 0x000;
const SKIP_EQ: Word = 0x400;
const SKIP_GT: Word = 0x800;

/// Skipcond test selected by operand bits 11-10.
pub fn skip_condition(ac: Word, operand: Word) -> bool {
    let ac = ac as i16;
    match operand & 0x0C00 {
        SKIP_LT => ac < 0,
        SKIP_EQ => ac == 0,
        SKIP_GT => ac > 0,
        _ => false,
    }
}

pub struct IntExecutor;
impl Executor for IntExecutor {
    fn exec<B: Bus, IO: Device>(
        &self,
        cpu: &mut Cpu,
        bus: &mut B,
        dev: &mut IO,
        d: Decoded,
    ) -> Result<(), Trap> {
        let x = d.operand;
        let Some(op) = d.op() else {
            // pc already points past the offending word
            let pc = cpu.pc.wrapping_sub(1);
            cpu.fault(Trap::InvalidInstruction { opcode: d.opcode, pc });
            return Ok(());
        };
        debug!(pc = cpu.pc.wrapping_sub(1), ?op, operand = x, "executing instruction");
        match op {
            Op::Jns => {
                // store the return address, continue after it
                cpu.ac = cpu.pc;
                cpu.store(bus, x, cpu.ac);
                cpu.ac = x.wrapping_add(1);
                cpu.pc = cpu.ac;
            }
            Op::Load => {
                cpu.ac = cpu.load(bus, x);
            }
            Op::Store => {
                cpu.store(bus, x, cpu.ac);
            }
            Op::Add => {
                let v = cpu.load(bus, x);
                cpu.ac = cpu.ac.wrapping_add(v);
            }
            Op::Subt => {
                let v = cpu.load(bus, x);
                cpu.ac = cpu.ac.wrapping_sub(v);
            }
            Op::Input => {
                let pc = cpu.pc.wrapping_sub(1);
                let line = dev
                    .read_line()
                    .map_err(|source| Trap::Device { pc, source })?;
                cpu.ac = match line {
                    Some(l) => parse_hex_input(&l),
                    None => {
                        warn!(pc, "input exhausted, using 0");
                        0
                    }
                };
            }
            Op::Output => {
                let pc = cpu.pc.wrapping_sub(1);
                dev.write_line(&format!("{:x}", cpu.ac))
                    .map_err(|source| Trap::Device { pc, source })?;
            }
            Op::Halt => {
                cpu.halt();
            }
            Op::Skipcond => {
                cpu.status.set(Status::SKIP, skip_condition(cpu.ac, x));
            }
            Op::Jump => {
                cpu.pc = x;
            }
            Op::Clear => {
                cpu.ac = 0;
            }
            Op::AddI => {
                let ptr = cpu.load(bus, x);
                let v = cpu.load(bus, ptr);
                cpu.ac = cpu.ac.wrapping_add(v);
            }
            Op::JumpI => {
                cpu.pc = cpu.load(bus, x) & OPERAND_MASK;
            }
            Op::LoadI => {
                let ptr = cpu.load(bus, x);
                cpu.ac = cpu.load(bus, ptr);
            }
            Op::StoreI => {
                let ptr = cpu.load(bus, x);
                cpu.store(bus, ptr, cpu.ac);
            }
        }
        Ok(())
    }
}
