//! VM state: registers, stack, memory, program counter, and run status.

use synvm_common::word::REGISTER_COUNT;
use synvm_common::{Image, Register, Word};

use crate::error::RuntimeError;
use crate::memory::Memory;

/// The eight general-purpose registers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    pub(crate) cells: [Word; REGISTER_COUNT],
}

impl Registers {
    pub fn get(&self, reg: Register) -> Word {
        self.cells[reg.index()]
    }

    pub fn set(&mut self, reg: Register, value: Word) {
        self.cells[reg.index()] = value;
    }

    pub fn as_array(&self) -> &[Word; REGISTER_COUNT] {
        &self.cells
    }
}

/// Why a run ended successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A `halt` instruction executed.
    Halt,
    /// A `ret` found the stack empty.
    EmptyReturn,
    /// The program counter moved past the end of memory.
    EndOfProgram,
}

/// Where the machine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted(Termination),
    /// A step failed. The machine cannot be resumed.
    Errored,
}

/// The synvm virtual machine.
#[derive(Debug, Clone)]
pub struct Vm {
    pub(crate) registers: Registers,
    pub(crate) stack: Vec<Word>,
    pub(crate) memory: Memory,
    /// Address of the next instruction. May equal the address-space size
    /// when the last instruction ends at the top of memory.
    pub(crate) pc: usize,
    pub(crate) status: Status,
    pub(crate) steps: u64,
}

impl Vm {
    /// Create a machine whose memory holds `image`, with zeroed registers,
    /// an empty stack, and pc at address 0.
    pub fn new(image: Image) -> Self {
        Self::with_memory(Memory::from(image))
    }

    pub fn with_memory(memory: Memory) -> Self {
        Self {
            registers: Registers::default(),
            stack: Vec::new(),
            memory,
            pc: 0,
            status: Status::Running,
            steps: 0,
        }
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Stack contents, bottom first.
    pub fn stack(&self) -> &[Word] {
        &self.stack
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Pop a word, failing with [`RuntimeError::StackExhausted`] when empty.
    pub(crate) fn pop(&mut self, at: usize) -> Result<Word, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackExhausted { at })
    }
}
