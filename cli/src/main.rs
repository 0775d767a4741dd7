//! `ls8`: run, assemble or disassemble LS-8 programs

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use ls8_assembler::{assemble, load_image, to_image_text};
use ls8_disassembler::disassemble;
use ls8_runtime::{HaltReason, Machine, MachineConfig, UnknownOpcodePolicy, WriterSink};
use ls8_spec::Config;

#[derive(Parser, Debug)]
#[command(name = "ls8")]
#[command(version, about = "Run programs on the LS-8 virtual machine", long_about = None)]
struct Args {
    /// Program file: binary image text (.ls8) or mnemonic assembly (.asm, .s)
    program: PathBuf,

    /// Treat the program as mnemonic assembly regardless of extension
    #[arg(long, action = ArgAction::SetTrue)]
    asm: bool,

    /// Print a disassembly listing instead of running
    #[arg(long, action = ArgAction::SetTrue)]
    disassemble: bool,

    /// Print the program in binary image format instead of running
    #[arg(long, action = ArgAction::SetTrue)]
    emit_image: bool,

    /// Print one trace row per executed instruction to stderr
    #[arg(long, action = ArgAction::SetTrue)]
    trace: bool,

    /// Stop after this many instructions
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Treat unknown opcodes as no-ops instead of failing
    #[arg(long, action = ArgAction::SetTrue)]
    skip_unknown: bool,

    /// Print registers and flags to stderr when the program stops
    #[arg(long, action = ArgAction::SetTrue)]
    dump: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn is_assembly(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("asm" | "s")
    )
}

fn load_program(args: &Args) -> Result<Vec<u8>> {
    let path = &args.program;
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    if args.asm || is_assembly(path) {
        assemble(&source).with_context(|| format!("failed to assemble {}", path.display()))
    } else {
        load_image(&source).with_context(|| format!("failed to load image {}", path.display()))
    }
}

fn dump_state(machine: &Machine) {
    let regs: Vec<String> = machine
        .registers()
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, v)| format!("R{i}={v:02X}"))
        .collect();
    let flags = machine.flags();
    eprintln!(
        "PC={:02X} {} FL={:08b} cycles={}",
        machine.pc(),
        regs.join(" "),
        flags.bits(),
        machine.cycles()
    );
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let image = load_program(&args)?;
    debug!(path = %args.program.display(), bytes = image.len(), "program loaded");

    if args.disassemble {
        print!("{}", disassemble(&image));
        return Ok(());
    }
    if args.emit_image {
        print!("{}", to_image_text(&image));
        return Ok(());
    }

    let config = MachineConfig {
        layout: Config::DEFAULT,
        max_cycles: args.max_cycles,
        trace: args.trace,
        unknown_opcode: if args.skip_unknown {
            UnknownOpcodePolicy::Skip
        } else {
            UnknownOpcodePolicy::Fail
        },
    };
    let mut machine = Machine::new(config).context("invalid machine configuration")?;
    machine.load(&image).context("failed to load program into memory")?;

    let stdout = io::stdout();
    let mut sink = WriterSink::new(stdout.lock());
    let outcome = machine.run_with(&mut sink);

    if args.trace {
        let mut stderr = io::stderr().lock();
        for row in machine.trace() {
            writeln!(stderr, "{row}")?;
        }
    }
    if args.dump {
        dump_state(&machine);
    }

    let reason = outcome.with_context(|| format!("execution of {} failed", args.program.display()))?;
    if reason == HaltReason::CycleLimit {
        warn!(cycles = machine.cycles(), "stopped at cycle limit before HLT");
    }
    debug!(?reason, cycles = machine.cycles(), "finished");
    Ok(())
}
