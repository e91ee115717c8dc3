use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use marie_rs::asm::{assemble, Assembly, LabelTable};
use marie_rs::disasm::{listing, render};
use marie_rs::image::{read_image, write_image};
use marie_rs::io::StdDevice;
use marie_rs::{Machine, MachineConfig, Word};

#[derive(Parser, Debug)]
#[command(author, version, about = "MARIE assembler and interpreter", long_about = None)]
struct Cli {
    /// Machine configuration (JSON)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Stop execution after N fetch cycles (overrides the config file)
    #[arg(long, value_name = "N", global = true)]
    max_steps: Option<u64>,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a source file into a binary image
    Assemble {
        #[arg(value_name = "SRCFILE")]
        input: PathBuf,
        /// Output image path
        #[arg(short, long, value_name = "BINFILE")]
        output: PathBuf,
        /// Export labels to JSON (Vec<{ addr, name }>)
        #[arg(long, value_name = "FILE")]
        labels_out: Option<PathBuf>,
    },
    /// Assemble a source file, write the image, then execute it
    ExecFile {
        #[arg(value_name = "SRCFILE")]
        input: PathBuf,
        /// Where the intermediate image is written
        #[arg(short, long, value_name = "BINFILE")]
        output: PathBuf,
    },
    /// Execute an existing binary image
    ExecBin {
        #[arg(value_name = "BINFILE")]
        input: PathBuf,
    },
    /// Disassemble a binary image
    Disassemble {
        #[arg(value_name = "BINFILE")]
        input: PathBuf,
        /// Write output to file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Prefix each line with its address and raw word (text format only)
        #[arg(long)]
        show_words: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
struct LabelKV {
    addr: Word,
    name: String,
}

fn sorted_labels(labels: &LabelTable) -> Vec<LabelKV> {
    let mut v: Vec<LabelKV> = labels
        .iter()
        .map(|(name, &addr)| LabelKV { addr, name: name.clone() })
        .collect();
    v.sort_by(|a, b| a.addr.cmp(&b.addr).then_with(|| a.name.cmp(&b.name)));
    v
}

fn machine_config(cli: &Cli) -> Result<MachineConfig> {
    let mut cfg = match &cli.config {
        Some(path) => MachineConfig::from_json_file(path)?,
        None => MachineConfig::default(),
    };
    if cli.max_steps.is_some() {
        cfg.max_steps = cli.max_steps;
    }
    Ok(cfg)
}

/// Assembles `path`, printing every diagnostic before failing.
fn assemble_file(path: &Path) -> Result<Assembly> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read source {}", path.display()))?;
    match assemble(&src) {
        Ok(a) => Ok(a),
        Err(failure) => {
            for d in &failure.diagnostics {
                eprintln!("{}: {d}\n", path.display());
            }
            Err(failure).with_context(|| format!("failed to assemble {}", path.display()))
        }
    }
}

fn execute(words: &[Word], cfg: MachineConfig) -> Result<Word> {
    let mut machine = Machine::with_device(words, StdDevice, cfg);
    let ac = machine.run()?;
    let faults = machine.faults();
    if !faults.is_empty() {
        warn!(count = faults.len(), "execution reported faults");
    }
    info!(steps = machine.cpu().steps, ac, "execution finished");
    println!("AC = {ac:#06x}");
    Ok(ac)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = machine_config(&cli)?;

    match cli.cmd {
        Command::Assemble { input, output, labels_out } => {
            let asm = assemble_file(&input)?;
            write_image(&output, &asm.words)?;
            info!(words = asm.words.len(), output = %output.display(), "image written");
            if let Some(path) = labels_out {
                let json = serde_json::to_string_pretty(&sorted_labels(&asm.labels))?;
                std::fs::write(&path, json)
                    .with_context(|| format!("failed to write labels {}", path.display()))?;
            }
        }
        Command::ExecFile { input, output } => {
            let asm = assemble_file(&input)?;
            write_image(&output, &asm.words)?;
            let words = read_image(&output)?;
            execute(&words, cfg)?;
        }
        Command::ExecBin { input } => {
            let words = read_image(&input)?;
            execute(&words, cfg)?;
        }
        Command::Disassemble { input, output, format, show_words } => {
            let words = read_image(&input)?;
            let text = match format {
                OutputFormat::Text => render(&words, show_words),
                OutputFormat::Json => serde_json::to_string_pretty(&listing(&words))?,
            };
            if let Some(path) = output {
                std::fs::write(&path, text)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            } else {
                print!("{text}");
            }
        }
    }

    Ok(())
}
