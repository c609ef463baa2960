//! Argument resolution: turning a decoded argument into the value it names.

use synvm_common::word::MAX_LITERAL;
use synvm_common::{Argument, Register, Word};

use crate::error::RuntimeError;
use crate::machine::Registers;

/// Resolve a source operand: literals stand for themselves, registers for
/// their current contents. `at` is the address of the instruction.
pub fn resolve(argument: Argument, registers: &Registers, at: usize) -> Result<Word, RuntimeError> {
    match argument {
        Argument::Literal(value) if value > MAX_LITERAL => {
            Err(RuntimeError::InvalidLiteral { at, value })
        }
        Argument::Literal(value) => Ok(value),
        Argument::Register(reg) => registers
            .cells
            .get(reg.index())
            .copied()
            .ok_or(RuntimeError::InvalidRegister {
                at,
                index: reg.index(),
            }),
    }
}

/// Interpret a destination operand as the register it names.
///
/// Destinations are never resolved to a value. A literal in destination
/// position is rejected rather than reinterpreted as an index.
pub fn destination(argument: Argument, at: usize) -> Result<Register, RuntimeError> {
    match argument {
        Argument::Register(reg) => Ok(reg),
        Argument::Literal(value) => Err(RuntimeError::InvalidRegister {
            at,
            index: value as usize,
        }),
    }
}
