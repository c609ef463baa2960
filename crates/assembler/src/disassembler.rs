//! Disassembler: image words → annotated assembly text.
//!
//! Output is one line per decoded instruction, prefixed with its
//! five-digit address. A word that does not start a decodable instruction
//! is printed as `.word n` and decoding resumes at the next address.

use synvm_common::{Instruction, Word};

/// Disassemble a word sequence into assembly text.
///
/// Every line reassembles to the words it was decoded from, so
/// `assemble(disassemble(words))` reproduces `words`.
pub fn disassemble(words: &[Word]) -> String {
    let mut lines = Vec::new();
    let mut addr = 0;

    while addr < words.len() {
        match Instruction::decode(words, addr) {
            Ok(Some(instr)) => {
                lines.push(format!("{addr:05}: {instr}"));
                addr += instr.width();
            }
            Ok(None) => break,
            Err(_) => {
                lines.push(format!("{addr:05}: .word {}", words[addr]));
                addr += 1;
            }
        }
    }

    let mut text = lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}
