use crate::config::MachineConfig;
use crate::cpu::{Cpu, Trap};
use crate::decoder::Word;
use crate::exec::IntExecutor;
use crate::io::{Device, StdDevice};
use crate::isa::marie::MarieDecoder;
use crate::memory::Memory;

/// A loaded MARIE machine: registers, memory and the attached device.
pub struct Machine<IO: Device = StdDevice> {
    cpu: Cpu,
    mem: Memory,
    dec: MarieDecoder,
    exec: IntExecutor,
    dev: IO,
}

impl Machine<StdDevice> {
    /// Loads `words` with stdin/stdout as the device and no step limit.
    pub fn load(words: &[Word]) -> Self {
        Self::with_device(words, StdDevice, MachineConfig::default())
    }
}

impl<IO: Device> Machine<IO> {
    pub fn with_device(words: &[Word], dev: IO, cfg: MachineConfig) -> Self {
        let mut cpu = Cpu::new(cfg);
        cpu.reset();
        Self {
            cpu,
            mem: Memory::from_image(words),
            dec: MarieDecoder::new(),
            exec: IntExecutor,
            dev,
        }
    }

    pub fn step(&mut self) -> Result<(), Trap> {
        self.cpu
            .step(&mut self.mem, &self.dec, &self.exec, &mut self.dev)
    }

    /// Runs to completion and returns the accumulator.
    pub fn run(&mut self) -> Result<Word, Trap> {
        self.cpu
            .run(&mut self.mem, &self.dec, &self.exec, &mut self.dev)
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.mem
    }

    pub fn device(&self) -> &IO {
        &self.dev
    }

    pub fn faults(&self) -> &[Trap] {
        &self.cpu.faults
    }

    pub fn into_device(self) -> IO {
        self.dev
    }
}
