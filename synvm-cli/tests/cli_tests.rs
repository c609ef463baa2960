//! Integration tests for the synvm CLI.
//!
//! These tests invoke the `synvm` binary as a subprocess and check
//! exit codes, stdout, and stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn synvm() -> Command {
    Command::cargo_bin("synvm").unwrap()
}

/// Write little-endian image words to a temp file and return its path.
fn write_image(dir: &TempDir, words: &[u16]) -> PathBuf {
    let path = dir.path().join("prog.bin");
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    fs::write(&path, bytes).unwrap();
    path
}

/// Helper: assemble source text, returning the path to the image.
fn assemble_to_temp(dir: &TempDir, source: &str) -> PathBuf {
    let input = dir.path().join("test.asm");
    let output = dir.path().join("test.bin");
    fs::write(&input, source).unwrap();
    synvm()
        .args([
            "assemble",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();
    output
}

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_exits_1() {
    synvm()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: synvm"));
}

#[test]
fn help_flag_exits_0() {
    synvm()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Commands:"));
}

#[test]
fn unknown_command_exits_1() {
    synvm()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown command"));
}

// ---- Run ----

#[test]
fn run_add_and_output() {
    let dir = TempDir::new().unwrap();
    // add r0 r1 'A'; out r0; halt
    let image = write_image(&dir, &[9, 32768, 32769, 65, 19, 32768, 0]);
    synvm()
        .args(["run", image.to_str().unwrap()])
        .assert()
        .success()
        .stdout("A");
}

#[test]
fn run_echoes_stdin() {
    let dir = TempDir::new().unwrap();
    let image = assemble_to_temp(
        &dir,
        "loop: in r0\n eq r1 r0 '.'\n jt r1 end\n out r0\n jmp loop\nend: halt\n",
    );
    synvm()
        .args(["run", image.to_str().unwrap()])
        .write_stdin("héllo.rest")
        .assert()
        .success()
        .stdout("héllo");
}

#[test]
fn run_input_at_eof_is_runtime_error() {
    let dir = TempDir::new().unwrap();
    // in r0
    let image = write_image(&dir, &[20, 32768]);
    synvm()
        .args(["run", image.to_str().unwrap()])
        .write_stdin("")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("runtime error"));
}

#[test]
fn run_invalid_opcode_exits_3() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir, &[22]);
    synvm()
        .args(["run", image.to_str().unwrap()])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("invalid opcode 22"));
}

#[test]
fn run_output_before_error_is_flushed() {
    let dir = TempDir::new().unwrap();
    // out 'x'; pop r0 on an empty stack
    let image = write_image(&dir, &[19, 120, 3, 32768]);
    synvm()
        .args(["run", image.to_str().unwrap()])
        .assert()
        .failure()
        .code(3)
        .stdout("x");
}

#[test]
fn run_step_budget_exhausted_exits_4() {
    let dir = TempDir::new().unwrap();
    // jmp 0
    let image = write_image(&dir, &[6, 0]);
    synvm()
        .args(["run", image.to_str().unwrap(), "--max-steps", "100"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("step budget of 100 exhausted"));
}

#[test]
fn run_within_step_budget_succeeds() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir, &[19, 111, 19, 107, 0]);
    synvm()
        .args(["run", image.to_str().unwrap(), "--max-steps", "3"])
        .assert()
        .success()
        .stdout("ok");
}

#[test]
fn run_bad_max_steps_exits_1() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir, &[0]);
    synvm()
        .args(["run", image.to_str().unwrap(), "--max-steps", "many"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn run_odd_length_image_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("odd.bin");
    fs::write(&path, [0u8, 0, 0]).unwrap();
    synvm()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid image"));
}

#[test]
fn run_missing_file_exits_1() {
    synvm()
        .args(["run", "/nonexistent/prog.bin"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn run_debug_logging_goes_to_stderr() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir, &[19, 33, 0]);
    synvm()
        .env("RUST_LOG", "debug")
        .args(["run", image.to_str().unwrap()])
        .assert()
        .success()
        .stdout("!")
        .stderr(predicate::str::contains("run finished"));
}

// ---- Assemble ----

#[test]
fn assemble_writes_little_endian_words() {
    let dir = TempDir::new().unwrap();
    let output = assemble_to_temp(&dir, "out 'H'\nhalt\n");
    assert_eq!(fs::read(output).unwrap(), vec![19, 0, 72, 0, 0, 0]);
}

#[test]
fn assemble_reports_size() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("p.asm");
    fs::write(&input, "push 1\npop r0\nhalt\n").unwrap();
    synvm()
        .args(["assemble", input.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("assembled 5 words (10 bytes)"));
    assert!(dir.path().join("p.bin").exists());
}

#[test]
fn assemble_bad_input_exits_1() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.asm");
    fs::write(&input, "halt\nfrobnicate r0\n").unwrap();
    synvm()
        .args(["assemble", input.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("line 2: unknown opcode 'frobnicate'"));
}

#[test]
fn assemble_missing_input_exits_1() {
    synvm().arg("assemble").assert().failure().code(1);
}

// ---- Disassemble ----

#[test]
fn disassemble_prints_listing() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir, &[9, 32768, 32769, 4, 19, 32768, 0, 40000]);
    synvm()
        .args(["disassemble", image.to_str().unwrap()])
        .assert()
        .success()
        .stdout("00000: add r0 r1 4\n00004: out r0\n00006: halt\n00007: .word 40000\n");
}

#[test]
fn disassemble_then_assemble_roundtrip() {
    let dir = TempDir::new().unwrap();
    let words: [u16; 9] = [1, 32771, 7, 2, 32771, 3, 32768, 23, 18];
    let image = write_image(&dir, &words);

    let listing = synvm()
        .args(["disassemble", image.to_str().unwrap()])
        .output()
        .unwrap()
        .stdout;
    let listing_path = dir.path().join("listing.asm");
    fs::write(&listing_path, listing).unwrap();

    let rebuilt = assemble_to_temp(&dir, &fs::read_to_string(&listing_path).unwrap());
    assert_eq!(fs::read(rebuilt).unwrap(), fs::read(image).unwrap());
}
