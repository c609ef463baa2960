//! CLI command implementations.

use std::fs;
use std::path::Path;

use synvm_common::Image;
use synvm_vm::{Console, RuntimeError, StdConsole, Status, Termination, Vm};
use tracing::{debug, warn};

/// Execute a program image against stdin/stdout.
pub fn run(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: run requires an input file");
        eprintln!("Usage: synvm run <image.bin> [--max-steps N]");
        return Err(1);
    }

    let input = &args[0];
    let max_steps = parse_max_steps(&args[1..])?;
    let image = read_image(input)?;
    debug!(path = %input, words = image.len(), ?max_steps, "loaded image");

    let mut vm = Vm::new(image);
    let mut console = StdConsole::stdio();
    let outcome = match max_steps {
        Some(limit) => run_bounded(&mut vm, &mut console, limit),
        None => vm.run(&mut console).map(Some),
    };
    if let Err(e) = console.flush() {
        warn!(error = %e, "could not flush program output");
    }

    match outcome {
        Ok(Some(termination)) => {
            debug!(?termination, steps = vm.steps(), "program finished");
            Ok(())
        }
        Ok(None) => {
            eprintln!(
                "error: step budget of {} exhausted at address {}",
                vm.steps(),
                vm.pc()
            );
            Err(4)
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

/// Assemble a text file to a binary image.
pub fn assemble(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: assemble requires an input file");
        eprintln!("Usage: synvm assemble <input.asm> [-o output.bin]");
        return Err(1);
    }

    let input = &args[0];

    let output = match &args[1..] {
        [] => default_output(input),
        [flag, path] if flag == "-o" => path.clone(),
        _ => {
            eprintln!("error: unexpected arguments after '{input}'");
            eprintln!("Usage: synvm assemble <input.asm> [-o output.bin]");
            return Err(1);
        }
    };

    let text = fs::read_to_string(input).map_err(|e| {
        eprintln!("error: cannot read '{input}': {e}");
        1
    })?;

    let image = synvm_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    let bytes = image.encode();
    fs::write(&output, &bytes).map_err(|e| {
        eprintln!("error: cannot write '{output}': {e}");
        1
    })?;

    eprintln!(
        "assembled {} words ({} bytes) -> {output}",
        image.len(),
        bytes.len()
    );
    Ok(())
}

/// Print an annotated listing of a binary image.
pub fn disassemble(args: &[String]) -> Result<(), i32> {
    if args.len() != 1 {
        eprintln!("error: disassemble requires exactly one input file");
        eprintln!("Usage: synvm disassemble <image.bin>");
        return Err(1);
    }

    let image = read_image(&args[0])?;
    print!("{}", synvm_assembler::disassemble(&image.words));
    Ok(())
}

// --- Helpers ---

/// Step the machine until it halts or `limit` instructions have executed.
///
/// Returns `Ok(None)` when the budget runs out first.
fn run_bounded<C: Console>(
    vm: &mut Vm,
    console: &mut C,
    limit: u64,
) -> Result<Option<Termination>, RuntimeError> {
    while vm.steps() < limit {
        if let Status::Halted(termination) = vm.step(console)? {
            return Ok(Some(termination));
        }
    }
    Ok(None)
}

/// Parse the optional `--max-steps N` flag.
fn parse_max_steps(args: &[String]) -> Result<Option<u64>, i32> {
    match args {
        [] => Ok(None),
        [flag, n] if flag == "--max-steps" => n.parse().map(Some).map_err(|_| {
            eprintln!("error: --max-steps expects a non-negative integer, got '{n}'");
            1
        }),
        _ => {
            eprintln!("error: unexpected arguments {args:?}");
            eprintln!("Usage: synvm run <image.bin> [--max-steps N]");
            Err(1)
        }
    }
}

/// `prog.asm` → `prog.bin`; anything else gets `.bin` appended.
fn default_output(input: &str) -> String {
    let path = Path::new(input);
    if path.extension().is_some_and(|ext| ext == "asm") {
        path.with_extension("bin").to_string_lossy().into_owned()
    } else {
        format!("{input}.bin")
    }
}

/// Read and decode a binary image file.
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

#[cfg(test)]
mod tests {
    use super::*;
    use synvm_vm::BufferConsole;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_output_replaces_asm_extension() {
        assert_eq!(default_output("dir/prog.asm"), "dir/prog.bin");
        assert_eq!(default_output("prog.txt"), "prog.txt.bin");
        assert_eq!(default_output("prog"), "prog.bin");
    }

    #[test]
    fn max_steps_flag() {
        assert_eq!(parse_max_steps(&[]), Ok(None));
        assert_eq!(
            parse_max_steps(&strings(&["--max-steps", "10"])),
            Ok(Some(10))
        );
        assert_eq!(parse_max_steps(&strings(&["--max-steps", "ten"])), Err(1));
        assert_eq!(parse_max_steps(&strings(&["--max-steps"])), Err(1));
    }

    #[test]
    fn bounded_run_stops_at_budget() {
        // jmp 0
        let mut vm = Vm::new(Image::new(vec![6, 0]));
        let mut console = BufferConsole::default();
        assert_eq!(run_bounded(&mut vm, &mut console, 5), Ok(None));
        assert_eq!(vm.steps(), 5);
        assert_eq!(vm.status(), Status::Running);
    }

    #[test]
    fn bounded_run_reports_termination() {
        let mut vm = Vm::new(Image::new(vec![19, 33, 0]));
        let mut console = BufferConsole::default();
        assert_eq!(
            run_bounded(&mut vm, &mut console, 5),
            Ok(Some(Termination::Halt))
        );
        assert_eq!(console.output(), "!");
    }
}
