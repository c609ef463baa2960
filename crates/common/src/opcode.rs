//! Opcode definitions for the synvm instruction set.
//!
//! Each opcode carries its own metadata: the number of argument words that
//! follow it, its assembly mnemonic, and whether it executes as a storage
//! operation or a control-flow operation.

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// The `#[repr(u16)]` attribute fixes each variant to its encoded word value.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Stop execution.
    Halt = 0,
    /// `set a b`: r[a] = b.
    Set = 1,
    /// `push a`: push a onto the stack.
    Push = 2,
    /// `pop a`: pop the stack into r[a].
    Pop = 3,
    /// `eq a b c`: r[a] = 1 if b == c, else 0.
    Equal = 4,
    /// `gt a b c`: r[a] = 1 if b > c, else 0.
    GreaterThan = 5,
    /// `jmp a`: jump to a.
    Jump = 6,
    /// `jt a b`: jump to b if a is nonzero.
    JumpIfTrue = 7,
    /// `jf a b`: jump to b if a is zero.
    JumpIfFalse = 8,
    /// `add a b c`: r[a] = (b + c) mod 32768.
    Add = 9,
    /// `mult a b c`: r[a] = (b * c) mod 32768.
    Multiply = 10,
    /// `mod a b c`: r[a] = b mod c.
    Modulo = 11,
    /// `and a b c`: r[a] = b & c.
    BitAnd = 12,
    /// `or a b c`: r[a] = b | c.
    BitOr = 13,
    /// `not a b`: r[a] = 15-bit complement of b.
    Not = 14,
    /// `rmem a b`: r[a] = memory[b].
    ReadMemory = 15,
    /// `wmem a b`: memory[a] = b.
    WriteMemory = 16,
    /// `call a`: push the next address, jump to a.
    Call = 17,
    /// `ret`: pop an address and jump to it; halt on an empty stack.
    Return = 18,
    /// `out a`: write the character with code a.
    Output = 19,
    /// `in a`: read one character code into r[a].
    Input = 20,
    /// No operation.
    Noop = 21,
}

/// Largest valid opcode word.
pub const MAX_OPCODE: u16 = Opcode::Noop as u16;

/// All opcodes, in encoding order.
pub const ALL_OPCODES: [Opcode; 22] = [
    Opcode::Halt,
    Opcode::Set,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Equal,
    Opcode::GreaterThan,
    Opcode::Jump,
    Opcode::JumpIfTrue,
    Opcode::JumpIfFalse,
    Opcode::Add,
    Opcode::Multiply,
    Opcode::Modulo,
    Opcode::BitAnd,
    Opcode::BitOr,
    Opcode::Not,
    Opcode::ReadMemory,
    Opcode::WriteMemory,
    Opcode::Call,
    Opcode::Return,
    Opcode::Output,
    Opcode::Input,
    Opcode::Noop,
];

/// How an opcode affects control flow when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Writes its first argument's register and falls through to the next
    /// instruction.
    Storage,
    /// May jump, touch the stack or memory, perform output, or halt.
    ControlFlow,
}

impl TryFrom<u16> for Opcode {
    type Error = u16;

    /// Converts a raw word into an opcode, returning the word back if it is
    /// out of range.
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ALL_OPCODES.get(value as usize).copied().ok_or(value)
    }
}

impl Opcode {
    /// Decode the opcode word found at address `at`.
    pub fn decode(value: u16, at: usize) -> Result<Self, DecodeError> {
        Opcode::try_from(value).map_err(|value| DecodeError::InvalidOpcode { at, value })
    }

    /// Number of argument words following the opcode.
    pub fn arity(self) -> usize {
        match self {
            Opcode::Halt | Opcode::Return | Opcode::Noop => 0,

            Opcode::Push
            | Opcode::Pop
            | Opcode::Jump
            | Opcode::Call
            | Opcode::Output
            | Opcode::Input => 1,

            Opcode::Set
            | Opcode::JumpIfTrue
            | Opcode::JumpIfFalse
            | Opcode::Not
            | Opcode::ReadMemory
            | Opcode::WriteMemory => 2,

            Opcode::Equal
            | Opcode::GreaterThan
            | Opcode::Add
            | Opcode::Multiply
            | Opcode::Modulo
            | Opcode::BitAnd
            | Opcode::BitOr => 3,
        }
    }

    /// Execution shape of this opcode.
    pub fn shape(self) -> Shape {
        match self {
            Opcode::Set
            | Opcode::Pop
            | Opcode::Equal
            | Opcode::GreaterThan
            | Opcode::Add
            | Opcode::Multiply
            | Opcode::Modulo
            | Opcode::BitAnd
            | Opcode::BitOr
            | Opcode::Not
            | Opcode::ReadMemory
            | Opcode::Input => Shape::Storage,

            Opcode::Halt
            | Opcode::Return
            | Opcode::Noop
            | Opcode::Push
            | Opcode::Jump
            | Opcode::JumpIfTrue
            | Opcode::JumpIfFalse
            | Opcode::WriteMemory
            | Opcode::Call
            | Opcode::Output => Shape::ControlFlow,
        }
    }

    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Halt => "halt",
            Opcode::Set => "set",
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::Equal => "eq",
            Opcode::GreaterThan => "gt",
            Opcode::Jump => "jmp",
            Opcode::JumpIfTrue => "jt",
            Opcode::JumpIfFalse => "jf",
            Opcode::Add => "add",
            Opcode::Multiply => "mult",
            Opcode::Modulo => "mod",
            Opcode::BitAnd => "and",
            Opcode::BitOr => "or",
            Opcode::Not => "not",
            Opcode::ReadMemory => "rmem",
            Opcode::WriteMemory => "wmem",
            Opcode::Call => "call",
            Opcode::Return => "ret",
            Opcode::Output => "out",
            Opcode::Input => "in",
            Opcode::Noop => "noop",
        }
    }

    /// Look up an opcode by mnemonic (case-insensitive).
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(mnemonic))
            .copied()
    }
}
