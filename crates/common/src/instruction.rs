//! Instruction decoding.
//!
//! An instruction is an opcode word followed by `opcode.arity()` argument
//! words, all stored in the same address space as data:
//!
//! ```text
//! addr+0: opcode (0..=21)
//! addr+1: arg 0   (literal 0..=32767 or register 32768..=32775)
//! addr+2: arg 1
//! addr+3: arg 2
//! ```

use std::fmt;

use crate::error::DecodeError;
use crate::opcode::Opcode;
use crate::word::{Argument, Word};

/// Anything instructions can be fetched from.
pub trait WordSource {
    /// The word at `addr`, or `None` past the end of the source.
    fn word_at(&self, addr: usize) -> Option<Word>;
}

impl WordSource for [Word] {
    fn word_at(&self, addr: usize) -> Option<Word> {
        self.get(addr).copied()
    }
}

impl WordSource for Vec<Word> {
    fn word_at(&self, addr: usize) -> Option<Word> {
        self.as_slice().word_at(addr)
    }
}

/// A decoded instruction: an opcode and its fixed-length argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    args: [Argument; 3],
}

impl Instruction {
    /// Create an instruction. `args` must hold exactly `opcode.arity()`
    /// arguments; returns `None` otherwise.
    pub fn new(opcode: Opcode, args: &[Argument]) -> Option<Self> {
        if args.len() != opcode.arity() {
            return None;
        }
        let mut slots = [Argument::Literal(0); 3];
        slots[..args.len()].copy_from_slice(args);
        Some(Self {
            opcode,
            args: slots,
        })
    }

    /// The instruction's arguments, in encoding order.
    pub fn args(&self) -> &[Argument] {
        &self.args[..self.opcode.arity()]
    }

    /// Number of words this instruction occupies.
    pub fn width(&self) -> usize {
        1 + self.opcode.arity()
    }

    /// Decode the instruction starting at `addr`.
    ///
    /// Returns `Ok(None)` when `addr` is past the end of `source`: the run
    /// has walked off the end of the program. An argument missing past the
    /// end is an error, not end-of-program.
    pub fn decode<S>(source: &S, addr: usize) -> Result<Option<Self>, DecodeError>
    where
        S: WordSource + ?Sized,
    {
        let Some(word) = source.word_at(addr) else {
            return Ok(None);
        };
        let opcode = Opcode::decode(word, addr)?;

        let mut args = [Argument::Literal(0); 3];
        for (index, slot) in args.iter_mut().enumerate().take(opcode.arity()) {
            let at = addr + 1 + index;
            let raw = source.word_at(at).ok_or(DecodeError::MissingArgument {
                at: addr,
                opcode,
                index,
            })?;
            *slot = Argument::decode(raw, at)?;
        }

        Ok(Some(Self { opcode, args }))
    }

    /// Encode back to words (opcode first).
    pub fn encode(&self) -> Vec<Word> {
        let mut words = Vec::with_capacity(self.width());
        words.push(self.opcode as Word);
        words.extend(self.args().iter().map(|arg| arg.encode()));
        words
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode.mnemonic())?;
        for arg in self.args() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
