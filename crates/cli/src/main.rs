//! Espresso paired-single instruction runner.
//!
//! This binary drives the paired-single execution core directly. It performs:
//! 1. **Seeding:** Optional initial values for floating-point registers.
//! 2. **Execution:** Runs raw 32-bit instruction words, from the command line or a file, in order.
//! 3. **Reporting:** Dumps the touched FPRs, the FPSCR, and the CR afterwards.

use clap::Parser;
use std::{fs, process};

use espresso_core::core::units::fpu::fenv;
use espresso_core::{register_paired_singles, InstructionTable, ThreadState};

#[derive(Parser, Debug)]
#[command(
    name = "espresso",
    author,
    version,
    about = "Espresso paired-single instruction runner",
    long_about = "Execute raw paired-single instruction words against a fresh thread state.\n\nExamples:\n  espresso --seed f1=1.5,2.5 --seed f2=0.25,0.75 0x1061102A\n  espresso -f program.hex --trace"
)]
struct Cli {
    /// Instruction words in hex (0x prefix optional).
    #[arg(value_name = "WORD")]
    words: Vec<String>,

    /// File of whitespace-separated hex words; '#' starts a comment.
    #[arg(short, long)]
    file: Option<String>,

    /// Seed a register before execution, e.g. f1=1.5,2.5 (repeatable).
    #[arg(short, long, value_name = "REG=PS0,PS1")]
    seed: Vec<String>,

    /// Print each executed mnemonic.
    #[arg(short, long)]
    trace: bool,
}

fn parse_word(token: &str) -> Result<u32, String> {
    let digits = token.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16).map_err(|e| format!("bad instruction word '{token}': {e}"))
}

fn parse_seed(arg: &str) -> Result<(usize, f32, f32), String> {
    let (reg, values) = arg
        .split_once('=')
        .ok_or_else(|| format!("bad seed '{arg}': expected REG=PS0,PS1"))?;
    let reg = reg
        .trim_start_matches('f')
        .parse::<usize>()
        .map_err(|e| format!("bad register in seed '{arg}': {e}"))?;
    if reg >= 32 {
        return Err(format!("bad register in seed '{arg}': f{reg} out of range"));
    }
    let (ps0, ps1) = values
        .split_once(',')
        .ok_or_else(|| format!("bad seed '{arg}': expected two lane values"))?;
    let ps0 = ps0
        .parse::<f32>()
        .map_err(|e| format!("bad lane 0 value in seed '{arg}': {e}"))?;
    let ps1 = ps1
        .parse::<f32>()
        .map_err(|e| format!("bad lane 1 value in seed '{arg}': {e}"))?;
    Ok((reg, ps0, ps1))
}

fn run(cli: &Cli) -> Result<(), String> {
    let mut words = Vec::new();
    if let Some(path) = &cli.file {
        let text = fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?;
        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("");
            for token in line.split_whitespace() {
                words.push(parse_word(token)?);
            }
        }
    }
    for token in &cli.words {
        words.push(parse_word(token)?);
    }
    if words.is_empty() {
        return Err("no instruction words given (use WORD arguments or --file)".into());
    }

    if !fenv::set_round_to_nearest() {
        return Err("host refused round-to-nearest rounding mode".into());
    }

    let mut table = InstructionTable::new();
    register_paired_singles(&mut table);

    let mut state = ThreadState::new();
    for seed in &cli.seed {
        let (reg, ps0, ps1) = parse_seed(seed)?;
        state.fpr[reg].set_paired0(ps0 as f64);
        state.fpr[reg].set_paired1(ps1);
    }

    for word in words {
        if cli.trace {
            let mnemonic = table
                .lookup(espresso_core::Instruction(word))
                .map(|e| e.mnemonic)
                .unwrap_or("<unknown>");
            println!("{word:#010x}  {mnemonic}");
        }
        table
            .execute(&mut state, word)
            .map_err(|trap| format!("trap: {trap}"))?;
    }

    for (i, fpr) in state.fpr.iter().enumerate() {
        if fpr.bits0() != 0 || fpr.bits1() != 0 {
            println!(
                "f{i:<2} ps0={:<24} ps1={:<16} [{:#018x} {:#010x}]",
                fpr.paired0(),
                fpr.paired1(),
                fpr.bits0(),
                fpr.bits1()
            );
        }
    }
    println!("fpscr={:#010x} cr={:#010x}", state.fpscr.value(), state.cr.value());
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
