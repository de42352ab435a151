//! CLI command implementations.

use std::fs;
use std::io::{self, BufWriter, IsTerminal};
use std::path::PathBuf;

use tracing::debug;
use wordvm_common::{Image, Opcode, ADDRESS_SPACE, MAX_WORD, REGISTER_COUNT};
use wordvm_vm::{Config, HaltReason, LogObserver, Output, ReadInput, Vm, WriteOutput};

use crate::trace_file::TraceFile;

const RUN_USAGE: &str = "Usage: wordvm run <image.bin> [--trace FILE] [--max-steps N] [--echo|--no-echo] [--patch ADDR=VALUE]... [--register N=VALUE]...";

/// Options accepted by `run`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub image: String,
    pub trace: Option<PathBuf>,
    pub max_steps: Option<u64>,
    /// `None` decides from whether stdin is a terminal.
    pub echo: Option<bool>,
    /// `(address, value)` memory writes applied before the run.
    pub patches: Vec<(usize, u16)>,
    /// `(register, value)` presets applied before the run.
    pub registers: Vec<(usize, u16)>,
}

/// Load an image and execute it on the terminal.
pub fn run(args: &[String]) -> Result<(), i32> {
    let options = parse_run_options(args).map_err(|e| {
        eprintln!("error: {e}");
        eprintln!("{RUN_USAGE}");
        1
    })?;

    let image = read_image(&options.image)?;
    debug!(path = %options.image, words = image.len(), "image loaded");

    // A cooked terminal already echoes what the user types.
    let echo = options.echo.unwrap_or_else(|| !io::stdin().is_terminal());
    let config = Config::default()
        .with_echo(echo)
        .with_max_steps(options.max_steps);

    let trace = match &options.trace {
        Some(path) => Some(TraceFile::create(path).map_err(|e| {
            eprintln!("error: cannot create trace '{}': {e}", path.display());
            1
        })?),
        None => None,
    };

    let input = ReadInput::new(io::stdin().lock());
    let output = WriteOutput::new(BufWriter::new(io::stdout().lock()));
    let mut vm = Vm::with_config(image.into_memory(ADDRESS_SPACE), input, output, config)
        .with_observer((LogObserver, trace));

    for &(address, value) in &options.patches {
        vm.machine_mut().poke(address, value).map_err(|e| {
            eprintln!("error: --patch {address}={value}: {e}");
            1
        })?;
    }
    for &(index, value) in &options.registers {
        vm.machine_mut().set_register(index, value).map_err(|e| {
            eprintln!("error: --register {index}={value}: {e}");
            1
        })?;
    }

    let result = vm.run();
    let (_, _, mut output, (_, trace)) = vm.into_parts();

    if let Err(e) = output.flush() {
        eprintln!("error: cannot write output: {e}");
    }
    if let Some(trace) = trace {
        if let Err(e) = trace.finish() {
            eprintln!("error: trace incomplete: {e}");
        }
    }

    match result {
        Ok(exit) if exit.reason == HaltReason::StepLimit => {
            eprintln!("step limit reached after {} instructions", exit.steps);
            Err(2)
        }
        Ok(exit) => {
            debug!(reason = ?exit.reason, steps = exit.steps, "run finished");
            Ok(())
        }
        Err(fault) => {
            eprintln!("runtime error: {fault}");
            Err(3)
        }
    }
}

/// Decode an image and report its size.
pub fn check(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: check requires an input file");
        eprintln!("Usage: wordvm check <image.bin>");
        return Err(1);
    }

    let input = &args[0];
    let image = read_image(input)?;

    let Some(&first) = image.words.first() else {
        eprintln!("error: '{input}' is empty");
        return Err(1);
    };

    match Opcode::try_from(first) {
        Ok(opcode) => println!(
            "OK: {input} ({} words, starts with {})",
            image.len(),
            opcode.mnemonic()
        ),
        Err(e) => println!(
            "OK: {input} ({} words, first word is data: {e})",
            image.len()
        ),
    }
    Ok(())
}

// --- Helpers ---

/// Read and decode an image file.
fn read_image(path: &str) -> Result<Image, i32> {
    let bytes = fs::read(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    Image::decode(&bytes).map_err(|e| {
        eprintln!("error: invalid image: {e}");
        1
    })
}

/// Parse the arguments following `run`.
pub fn parse_run_options(args: &[String]) -> Result<RunOptions, String> {
    let mut options = RunOptions::default();
    let mut image = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--trace" => options.trace = Some(PathBuf::from(flag_value(&mut iter, arg)?)),
            "--max-steps" => {
                let value = flag_value(&mut iter, arg)?;
                let steps = value
                    .parse()
                    .map_err(|_| format!("--max-steps expects a number, got '{value}'"))?;
                options.max_steps = Some(steps);
            }
            "--echo" => options.echo = Some(true),
            "--no-echo" => options.echo = Some(false),
            "--patch" => {
                let (address, value) = parse_assignment(flag_value(&mut iter, arg)?)?;
                options.patches.push((address, value));
            }
            "--register" => {
                let (index, value) = parse_assignment(flag_value(&mut iter, arg)?)?;
                if index >= REGISTER_COUNT {
                    return Err(format!("register index {index} out of range (0-7)"));
                }
                options.registers.push((index, value));
            }
            "-v" | "--verbose" => {}
            flag if flag.starts_with('-') => return Err(format!("unknown option '{flag}'")),
            path => {
                if image.replace(path.to_string()).is_some() {
                    return Err(format!("unexpected argument '{path}'"));
                }
            }
        }
    }

    options.image = image.ok_or("run requires an input file")?;
    Ok(options)
}

fn flag_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<&'a str, String> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

/// Parse `<index>=<word>`.
fn parse_assignment(text: &str) -> Result<(usize, u16), String> {
    let (left, right) = text
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=VALUE, got '{text}'"))?;
    let index = left
        .trim()
        .parse()
        .map_err(|_| format!("invalid index '{left}'"))?;
    let value: u16 = right
        .trim()
        .parse()
        .map_err(|_| format!("invalid value '{right}'"))?;
    if value > MAX_WORD {
        return Err(format!("value {value} exceeds {MAX_WORD}"));
    }
    Ok((index, value))
}
