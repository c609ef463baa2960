//! synvm assembler: text ↔ image translation.
//!
//! Assembly is two-pass: the first pass lays out every line and binds
//! labels to addresses, the second encodes operands now that forward
//! references can be resolved.
//!
//! # Usage
//!
//! ```
//! use synvm_assembler::{assemble, disassemble};
//!
//! let image = assemble("out 'H'\nout 'i'\nhalt\n").unwrap();
//! assert_eq!(image.words, vec![19, 72, 19, 105, 0]);
//! assert_eq!(
//!     disassemble(&image.words),
//!     "00000: out 72\n00002: out 105\n00004: halt\n"
//! );
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(words))` reproduces `words` for every word
//! sequence, including ones that do not decode as instructions.

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use std::collections::HashMap;

use synvm_common::word::{ADDRESS_SPACE, MAX_LITERAL};
use synvm_common::{Argument, Image, Word};

use lexer::tokenize_line;
use parser::{parse_line, Item, Operand};

/// Label name → (address, defining line).
type Labels = HashMap<String, (usize, usize)>;

/// Assemble text into a program image.
///
/// Returns the first error encountered. Fix one error at a time.
pub fn assemble(text: &str) -> Result<Image, AsmError> {
    let mut lines = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        lines.push((line_num, parse_line(&tokens, line_num)?));
    }

    let labels = layout(&lines)?;
    let words = emit(&lines, &labels)?;
    Ok(Image::new(words))
}

/// Disassemble image words into annotated assembly text.
pub fn disassemble(words: &[Word]) -> String {
    disassembler::disassemble(words)
}

/// First pass: assign an address to every label.
fn layout(lines: &[(usize, Vec<Item>)]) -> Result<Labels, AsmError> {
    let mut labels = Labels::new();
    let mut addr = 0;

    for (line_num, items) in lines {
        for item in items {
            if let Item::Label(name) = item {
                if let Some(&(_, first)) = labels.get(name) {
                    return Err(AsmError::DuplicateLabel {
                        line: *line_num,
                        label: name.clone(),
                        first,
                    });
                }
                labels.insert(name.clone(), (addr, *line_num));
            }
            addr += item.width();
            if addr > ADDRESS_SPACE {
                return Err(AsmError::ImageTooLarge { line: *line_num });
            }
        }
    }

    Ok(labels)
}

/// Second pass: encode every item into words.
fn emit(lines: &[(usize, Vec<Item>)], labels: &Labels) -> Result<Vec<Word>, AsmError> {
    let mut words = Vec::new();

    for (line_num, items) in lines {
        for item in items {
            match item {
                Item::Label(_) => {}
                Item::Instruction { opcode, operands } => {
                    words.push(*opcode as Word);
                    for operand in operands {
                        words.push(encode(operand, MAX_LITERAL, labels, *line_num)?);
                    }
                }
                Item::Words(operands) => {
                    for operand in operands {
                        words.push(encode(operand, Word::MAX, labels, *line_num)?);
                    }
                }
            }
        }
    }

    Ok(words)
}

/// Encode one operand. A label address above `max` cannot be expressed.
fn encode(operand: &Operand, max: Word, labels: &Labels, line_num: usize) -> Result<Word, AsmError> {
    match operand {
        Operand::Value(value) => Ok(*value),
        Operand::Register(reg) => Ok(Argument::Register(*reg).encode()),
        Operand::Label(name) => {
            let &(addr, _) = labels.get(name).ok_or_else(|| AsmError::UnknownLabel {
                line: line_num,
                label: name.clone(),
            })?;
            Word::try_from(addr)
                .ok()
                .filter(|&addr| addr <= max)
                .ok_or_else(|| AsmError::InvalidNumber {
                    line: line_num,
                    token: format!("{name} ({addr})"),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_minimal() {
        let image = assemble("add r0 r1 4\nout r0\nhalt\n").unwrap();
        assert_eq!(image.words, vec![9, 32768, 32769, 4, 19, 32768, 0]);
    }

    #[test]
    fn assemble_with_comments_and_blanks() {
        let text = "\
; greeting
out 'H'   ; first letter

  out 'i'
halt
";
        let image = assemble(text).unwrap();
        assert_eq!(image.words, vec![19, 72, 19, 105, 0]);
    }

    #[test]
    fn decimal_hex_and_char_produce_same_result() {
        let dec = assemble("out 65\n").unwrap();
        let hex = assemble("out 0x41\n").unwrap();
        let chr = assemble("out 'A'\n").unwrap();
        assert_eq!(dec, hex);
        assert_eq!(dec, chr);
    }

    #[test]
    fn forward_and_backward_labels() {
        let text = "\
start:
    jmp end
middle: noop
end: jt r0 start
";
        let image = assemble(text).unwrap();
        // jmp end(3); noop; jt r0 start(0)
        assert_eq!(image.words, vec![6, 3, 21, 7, 32768, 0]);
    }

    #[test]
    fn labels_in_word_directive() {
        let image = assemble("table: .word table after 7\nafter: halt\n").unwrap();
        assert_eq!(image.words, vec![0, 3, 7, 0]);
    }

    #[test]
    fn labels_are_case_sensitive() {
        let err = assemble("Loop: jmp loop\n").unwrap_err();
        assert_eq!(
            err,
            AsmError::UnknownLabel {
                line: 1,
                label: "loop".to_string()
            }
        );
    }

    #[test]
    fn duplicate_label() {
        let err = assemble("a: noop\nb: noop\na: halt\n").unwrap_err();
        assert_eq!(
            err,
            AsmError::DuplicateLabel {
                line: 3,
                label: "a".to_string(),
                first: 1
            }
        );
    }

    #[test]
    fn label_beyond_literal_range_rejected_as_operand() {
        let text = format!(".word {}\nfar: halt\njmp far\n", vec!["0"; 32768].join(" "));
        let err = assemble(&text).unwrap_err();
        assert_eq!(
            err,
            AsmError::InvalidNumber {
                line: 3,
                token: "far (32768)".to_string()
            }
        );
    }

    #[test]
    fn image_too_large() {
        let text = ".word 0\n".repeat(ADDRESS_SPACE) + "halt\n";
        let err = assemble(&text).unwrap_err();
        assert_eq!(
            err,
            AsmError::ImageTooLarge {
                line: ADDRESS_SPACE + 1
            }
        );
    }

    #[test]
    fn error_reports_correct_line() {
        let err = assemble("halt\nfoobar\n").unwrap_err();
        assert!(matches!(err, AsmError::UnknownOpcode { line: 2, .. }));
    }

    #[test]
    fn roundtrip_disassemble_then_assemble() {
        let words = vec![1, 32770, 10, 22, 15, 32768, 32770, 40000, 18];
        let text = disassemble(&words);
        assert_eq!(assemble(&text).unwrap().words, words);
    }

    #[test]
    fn every_opcode_roundtrips() {
        for &opcode in &synvm_common::opcode::ALL_OPCODES {
            let mut words = vec![opcode as Word];
            words.extend((0..opcode.arity()).map(|i| 32768 + i as Word));
            let text = disassemble(&words);
            assert_eq!(
                assemble(&text).unwrap().words,
                words,
                "roundtrip failed for {}",
                opcode.mnemonic()
            );
        }
    }
}
