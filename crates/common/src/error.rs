//! Decode errors for synvm instruction streams and program images.

use thiserror::Error;

use crate::opcode::Opcode;

/// Errors that occur while decoding instructions or program images.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The word at `at` is not an opcode (anything above 21).
    #[error("invalid opcode {value} at address {at}")]
    InvalidOpcode { at: usize, value: u16 },

    /// An argument word in the reserved range 32776..=65535.
    #[error("invalid argument {value} at address {at}")]
    InvalidArgument { at: usize, value: u16 },

    /// Memory ended before all of an instruction's arguments were read.
    #[error("{} at address {at} is missing argument {index}", opcode.mnemonic())]
    MissingArgument {
        at: usize,
        opcode: Opcode,
        index: usize,
    },

    /// Image byte stream ends in the middle of a word.
    #[error("truncated image: {0} bytes is not a whole number of 16-bit words")]
    TruncatedImage(usize),

    /// Image holds more words than the address space.
    #[error("image of {0} words exceeds the 65536-word address space")]
    ImageTooLarge(usize),
}
