//! Runtime errors for the synvm VM.
//!
//! Every variant raised while executing an instruction carries the address
//! of that instruction (`at`).

use std::io;

use synvm_common::DecodeError;
use thiserror::Error;

use crate::memory::OutOfRange;

/// Errors that stop a run.
///
/// Halting is not an error: a deliberate `halt`, a `ret` on an empty stack
/// and walking off the end of memory all end the run successfully (see
/// [`Termination`](crate::Termination)).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The instruction at pc could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A literal argument above 32767.
    #[error("invalid literal {value} at address {at}")]
    InvalidLiteral { at: usize, value: u16 },

    /// A register index outside r0..r7, or a destination that is not a
    /// register at all.
    #[error("invalid register {index} at address {at}")]
    InvalidRegister { at: usize, index: usize },

    /// `pop` on an empty stack.
    #[error("stack exhausted at address {at}")]
    StackExhausted { at: usize },

    /// `mod` with a zero divisor.
    #[error("division by zero at address {at}")]
    DivisionByZero { at: usize },

    /// `rmem` past the written extent of memory.
    #[error("memory read out of range at address {at}: {source}")]
    MemoryOutOfRange {
        at: usize,
        #[source]
        source: OutOfRange,
    },

    /// `out` of a code that is not a character, or `in` of a character whose
    /// code does not fit in a 15-bit word.
    #[error("invalid character code {code} at address {at}")]
    InvalidCharacter { at: usize, code: u32 },

    /// The console failed to read or write.
    #[error("i/o error at address {at}: {message}")]
    Io {
        at: usize,
        kind: io::ErrorKind,
        message: String,
    },

    /// `call` whose return address does not fit in a word.
    #[error("return address overflows the address space at address {at}")]
    AddressOverflow { at: usize },

    /// `step` called after the machine already failed.
    #[error("machine faulted earlier and cannot resume")]
    Faulted,
}

impl RuntimeError {
    pub(crate) fn io(at: usize, err: io::Error) -> Self {
        RuntimeError::Io {
            at,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
