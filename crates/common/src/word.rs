//! The word and argument model.
//!
//! Every memory cell is 16 bits wide, but values are 15-bit: arithmetic wraps
//! at [`MODULUS`] and literals never exceed [`MAX_LITERAL`]. The upper half of
//! the cell range is reserved for encoding register references:
//!
//! ```text
//! 0     ..= 32767   literal value
//! 32768 ..= 32775   register r0..r7
//! 32776 ..= 65535   invalid
//! ```

use std::fmt;

use crate::error::DecodeError;

/// A single machine word.
pub type Word = u16;

/// Arithmetic modulus; all results are reduced into `0..MODULUS`.
pub const MODULUS: u32 = 32768;

/// Largest value a literal argument may hold.
pub const MAX_LITERAL: Word = 32767;

/// Raw encoding of register 0. Register `n` is `REGISTER_BASE + n`.
pub const REGISTER_BASE: Word = 32768;

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// Number of addressable words.
pub const ADDRESS_SPACE: usize = 1 << 16;

/// Index of one of the eight general-purpose registers.
///
/// Only constructible for indices `0..REGISTER_COUNT`, so holding a
/// `Register` is proof that the index is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Register(u8);

impl Register {
    /// All eight registers, in index order.
    pub const ALL: [Register; REGISTER_COUNT] = [
        Register(0),
        Register(1),
        Register(2),
        Register(3),
        Register(4),
        Register(5),
        Register(6),
        Register(7),
    ];

    /// Returns the register with the given index, or `None` if out of range.
    pub fn new(index: usize) -> Option<Self> {
        if index < REGISTER_COUNT {
            Some(Register(index as u8))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A decoded instruction argument.
///
/// Literals and register references share one raw encoding; keeping them as
/// separate variants means a register index can never be read as a value by
/// accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Argument {
    /// A value used as-is.
    Literal(Word),
    /// A value read from a register, or a register written to.
    Register(Register),
}

impl Argument {
    /// Decode a raw argument word. `at` is the address it was read from.
    pub fn decode(raw: Word, at: usize) -> Result<Self, DecodeError> {
        match raw {
            0..=MAX_LITERAL => Ok(Argument::Literal(raw)),
            _ => Register::new((raw - REGISTER_BASE) as usize)
                .map(Argument::Register)
                .ok_or(DecodeError::InvalidArgument { at, value: raw }),
        }
    }

    /// Encode back to the raw word representation.
    pub fn encode(self) -> Word {
        match self {
            Argument::Literal(value) => value,
            Argument::Register(reg) => REGISTER_BASE + reg.index() as Word,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Literal(value) => write!(f, "{value}"),
            Argument::Register(reg) => write!(f, "{reg}"),
        }
    }
}
