//! Error types for the synvm assembler.

use thiserror::Error;

/// Errors produced while assembling text into an image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An unrecognized mnemonic or directive was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An opcode or directive did not have enough arguments.
    #[error("line {line}: {opcode} expects {expected} argument(s)")]
    MissingArgument {
        line: usize,
        opcode: &'static str,
        expected: usize,
    },

    /// A numeric or character literal could not be parsed or is out of range.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    /// A label was referenced but never defined.
    #[error("line {line}: unknown label '{label}'")]
    UnknownLabel { line: usize, label: String },

    /// A label was defined twice.
    #[error("line {line}: label '{label}' already defined on line {first}")]
    DuplicateLabel {
        line: usize,
        label: String,
        first: usize,
    },

    /// A register name outside r0..r7.
    #[error("line {line}: invalid register '{token}'")]
    InvalidRegister { line: usize, token: String },

    /// The program no longer fits in the 65536-word address space.
    #[error("line {line}: program exceeds the 65536-word address space")]
    ImageTooLarge { line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unknown_opcode() {
        let e = AsmError::UnknownOpcode {
            line: 3,
            token: "foo".to_string(),
        };
        assert_eq!(e.to_string(), "line 3: unknown opcode 'foo'");
    }

    #[test]
    fn error_display_missing_argument() {
        let e = AsmError::MissingArgument {
            line: 7,
            opcode: "add",
            expected: 3,
        };
        assert_eq!(e.to_string(), "line 7: add expects 3 argument(s)");
    }

    #[test]
    fn error_display_invalid_number() {
        let e = AsmError::InvalidNumber {
            line: 2,
            token: "0xZZZZ".to_string(),
        };
        assert_eq!(e.to_string(), "line 2: invalid number '0xZZZZ'");
    }

    #[test]
    fn error_display_duplicate_label() {
        let e = AsmError::DuplicateLabel {
            line: 9,
            label: "loop".to_string(),
            first: 4,
        };
        assert_eq!(
            e.to_string(),
            "line 9: label 'loop' already defined on line 4"
        );
    }

    #[test]
    fn error_display_invalid_register() {
        let e = AsmError::InvalidRegister {
            line: 1,
            token: "r8".to_string(),
        };
        assert_eq!(e.to_string(), "line 1: invalid register 'r8'");
    }

    #[test]
    fn error_clone_and_eq() {
        let e1 = AsmError::UnknownLabel {
            line: 1,
            label: "x".to_string(),
        };
        let e2 = e1.clone();
        assert_eq!(e1, e2);
    }
}
