use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cpu::Trap;
use crate::decoder::Word;

/// Size of the MARIE address space in words.
pub const MAX_MEMORY: usize = 4096;

pub trait Bus {
    fn read(&mut self, addr: Word) -> Result<Word, Trap>;
    fn write(&mut self, addr: Word, val: Word) -> Result<(), Trap>;
    /// Number of addressable words; fetches stop here.
    fn limit(&self) -> usize;
}

/// Word-addressed memory. Accesses at or past the loaded image length fault
/// even though the backing array always spans the full address space.
#[derive(Clone, Serialize, Deserialize)]
pub struct Memory {
    pub mem: Vec<Word>,
    pub image_len: usize,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            mem: vec![0; MAX_MEMORY],
            image_len: 0,
        }
    }

    /// Copies at most `MAX_MEMORY` words of `image` into a fresh memory.
    pub fn from_image(image: &[Word]) -> Self {
        let mut m = Self::new();
        let len = if image.len() > MAX_MEMORY {
            warn!(
                image_len = image.len(),
                max = MAX_MEMORY,
                "image is larger than MARIE's address space, truncating"
            );
            MAX_MEMORY
        } else {
            image.len()
        };
        m.mem[..len].copy_from_slice(&image[..len]);
        m.image_len = len;
        m
    }

    fn check(&self, addr: Word) -> Result<usize, Trap> {
        let a = addr as usize;
        if a >= self.image_len {
            return Err(Trap::OutOfBounds {
                addr,
                limit: self.image_len,
            });
        }
        Ok(a)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Memory {
    fn read(&mut self, addr: Word) -> Result<Word, Trap> {
        let a = self.check(addr)?;
        Ok(self.mem[a])
    }
    fn write(&mut self, addr: Word, val: Word) -> Result<(), Trap> {
        let a = self.check(addr)?;
        self.mem[a] = val;
        Ok(())
    }
    fn limit(&self) -> usize {
        self.image_len
    }
}
