use std::collections::VecDeque;
use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::warn;

use crate::decoder::Word;

/// Line-oriented input and output devices seen by `Input` and `Output`.
pub trait Device {
    /// Returns `None` once the input is exhausted.
    fn read_line(&mut self) -> Result<Option<String>>;
    fn write_line(&mut self, line: &str) -> Result<()>;
}

/// Process stdin/stdout.
#[derive(Debug, Default)]
pub struct StdDevice;

impl Device for StdDevice {
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = std::io::stdin().lock().read_line(&mut line)?;
        Ok((n > 0).then_some(line))
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}

/// Scripted input and captured output.
#[derive(Debug, Default, Clone)]
pub struct BufferDevice {
    pub input: VecDeque<String>,
    pub output: Vec<String>,
}

impl BufferDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }
}

impl Device for BufferDevice {
    fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.input.pop_front())
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.output.push(line.to_string());
        Ok(())
    }
}

/// Parses the leading hexadecimal digits of an input line. Anything that
/// yields no digits, or does not fit in a word, reads as 0.
pub fn parse_hex_input(line: &str) -> Word {
    let t = line.trim();
    let t = t
        .strip_prefix("0x")
        .or_else(|| t.strip_prefix("0X"))
        .unwrap_or(t);
    let end = t
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(t.len());
    let digits = &t[..end];
    if digits.is_empty() {
        warn!(input = line.trim_end(), "input is not a hexadecimal value, using 0");
        return 0;
    }
    match Word::from_str_radix(digits, 16) {
        Ok(v) => v,
        Err(_) => {
            warn!(input = digits, "input does not fit in a word, using 0");
            0
        }
    }
}
