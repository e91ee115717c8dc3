use anyhow::Error;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::config::MachineConfig;
use crate::decoder::{Decoder, Word};
use crate::exec::Executor;
use crate::io::Device;
use crate::memory::Bus;

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status: u8 {
const SKIP = 1 << 0; // set by Skipcond, consumed by the next fetch
const HALTED = 1 << 1;
}
}

#[derive(thiserror::Error, Debug)]
pub enum Trap {
    #[error("invalid instruction {opcode:#x} at PC {pc:#05x}")]
    InvalidInstruction { opcode: u8, pc: Word },
    #[error("attempting to address outside of memory at {addr:#05x} (image length {limit})")]
    OutOfBounds { addr: Word, limit: usize },
    #[error("device error at PC {pc:#05x}: {source}")]
    Device {
        pc: Word,
        #[source]
        source: Error,
    },
}

#[derive(Debug)]
pub struct Cpu {
    pub pc: Word,         // Program Counter
    pub ac: Word,         // Accumulator
    pub status: Status,
    pub steps: u64,       // fetch cycles since reset
    pub faults: Vec<Trap>,
    pub cfg: MachineConfig,
}

impl Cpu {
    pub fn new(cfg: MachineConfig) -> Self {
        Self {
            pc: 0,
            ac: 0,
            status: Status::empty(),
            steps: 0,
            faults: Vec::new(),
            cfg,
        }
    }

    pub fn reset(&mut self) {
        self.pc = 0;
        self.ac = 0;
        self.status = Status::empty();
        self.steps = 0;
        self.faults.clear();
    }

    pub fn is_halted(&self) -> bool {
        self.status.contains(Status::HALTED)
    }

    pub fn skip_armed(&self) -> bool {
        self.status.contains(Status::SKIP)
    }

    pub fn halt(&mut self) {
        self.status.insert(Status::HALTED);
    }

    /// Records a runtime fault without aborting the run.
    pub fn fault(&mut self, trap: Trap) {
        error!(pc = self.pc, "{trap}");
        self.faults.push(trap);
    }

    /// Memory read that halts and yields 0 on a bounds fault.
    pub fn load<B: Bus>(&mut self, bus: &mut B, addr: Word) -> Word {
        match bus.read(addr) {
            Ok(v) => v,
            Err(trap) => {
                self.fault(trap);
                self.halt();
                0
            }
        }
    }

    /// Memory write that halts and drops the value on a bounds fault.
    pub fn store<B: Bus>(&mut self, bus: &mut B, addr: Word, val: Word) {
        if let Err(trap) = bus.write(addr, val) {
            self.fault(trap);
            self.halt();
        }
    }

    pub fn step<B: Bus, D: Decoder, X: Executor, IO: Device>(
        &mut self,
        bus: &mut B,
        dec: &D,
        exec: &X,
        dev: &mut IO,
    ) -> Result<(), Trap> {
        let pc = self.pc;
        let word = match bus.read(pc) {
            Ok(w) => w,
            Err(trap) => {
                self.fault(trap);
                self.halt();
                return Ok(());
            }
        };
        self.pc = pc.wrapping_add(1);
        self.steps += 1;
        let d = dec.decode(word);
        if self.status.contains(Status::SKIP) {
            self.status.remove(Status::SKIP);
            debug!(pc, word, "skipping instruction");
            return Ok(());
        }
        exec.exec(self, bus, dev, d)
    }

    /// Runs until halted, the PC leaves the image, or the step limit is hit.
    pub fn run<B: Bus, D: Decoder, X: Executor, IO: Device>(
        &mut self,
        bus: &mut B,
        dec: &D,
        exec: &X,
        dev: &mut IO,
    ) -> Result<Word, Trap> {
        while !self.is_halted() && (self.pc as usize) < bus.limit() {
            if let Some(max) = self.cfg.max_steps {
                if self.steps >= max {
                    warn!(steps = self.steps, pc = self.pc, "step limit reached, stopping");
                    break;
                }
            }
            self.step(bus, dec, exec, dev)?;
        }
        Ok(self.ac)
    }
}
