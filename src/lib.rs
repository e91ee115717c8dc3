pub mod asm;
pub mod config;
pub mod cpu;
pub mod decoder;
pub mod disasm;
pub mod exec;
pub mod image;
pub mod instructions;
pub mod io;
pub mod machine;
pub mod memory;

pub mod isa {
    pub mod marie;
}

pub use asm::{assemble, Assembly, AssemblyFailure};
pub use config::MachineConfig;
pub use cpu::{Cpu, Status, Trap};
pub use decoder::{Decoded, Op, Word};
pub use machine::Machine;
pub use memory::{Bus, Memory, MAX_MEMORY};
