//! Main execution loop and opcode dispatch for the synvm VM.

use synvm_common::word::{MAX_LITERAL, MODULUS};
use synvm_common::{Argument, Instruction, Opcode, Shape, Word};
use tracing::{debug, trace};

use crate::console::Console;
use crate::error::RuntimeError;
use crate::machine::{Status, Termination, Vm};
use crate::resolve::{destination, resolve};

/// What an executed instruction asks the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Continue at this address.
    Next(usize),
    Halt(Termination),
}

impl Vm {
    /// Execute until the machine halts or fails.
    ///
    /// Returns how the run ended on success. A machine that already halted
    /// returns its termination again without executing anything.
    pub fn run<C>(&mut self, console: &mut C) -> Result<Termination, RuntimeError>
    where
        C: Console + ?Sized,
    {
        debug!(
            extent = self.memory.extent(),
            pc = self.pc,
            "run starting"
        );
        loop {
            if let Status::Halted(termination) = self.step(console)? {
                debug!(?termination, steps = self.steps, "run finished");
                return Ok(termination);
            }
        }
    }

    /// Execute a single instruction.
    ///
    /// On success the new pc is committed and the resulting status returned.
    /// On failure the machine moves to [`Status::Errored`]; any later call
    /// fails with [`RuntimeError::Faulted`].
    pub fn step<C>(&mut self, console: &mut C) -> Result<Status, RuntimeError>
    where
        C: Console + ?Sized,
    {
        match self.status {
            Status::Running => {}
            Status::Halted(_) => return Ok(self.status),
            Status::Errored => return Err(RuntimeError::Faulted),
        }

        match self.fetch_and_execute(console) {
            Ok(Flow::Next(pc)) => {
                self.pc = pc;
                self.steps += 1;
            }
            Ok(Flow::Halt(termination)) => {
                if termination != Termination::EndOfProgram {
                    self.steps += 1;
                }
                self.status = Status::Halted(termination);
            }
            Err(err) => {
                debug!(pc = self.pc, error = %err, "machine faulted");
                self.status = Status::Errored;
                return Err(err);
            }
        }
        Ok(self.status)
    }

    fn fetch_and_execute<C>(&mut self, console: &mut C) -> Result<Flow, RuntimeError>
    where
        C: Console + ?Sized,
    {
        let at = self.pc;
        let Some(instr) = Instruction::decode(&self.memory, at)? else {
            return Ok(Flow::Halt(Termination::EndOfProgram));
        };
        trace!(pc = at, %instr, "execute");

        let next = at + instr.width();
        match instr.opcode.shape() {
            Shape::Storage => {
                let dest = destination(instr.args()[0], at)?;
                let value = self.exec_storage(&instr, at, console)?;
                self.registers.set(dest, value);
                Ok(Flow::Next(next))
            }
            Shape::ControlFlow => self.exec_control(&instr, at, next, console),
        }
    }

    /// Resolve a source operand against the current registers.
    fn operand(&self, argument: Argument, at: usize) -> Result<Word, RuntimeError> {
        resolve(argument, &self.registers, at)
    }

    /// Resolve the two source operands of a three-argument instruction.
    fn operand_pair(&self, args: &[Argument], at: usize) -> Result<(Word, Word), RuntimeError> {
        Ok((self.operand(args[1], at)?, self.operand(args[2], at)?))
    }

    // ---- Storage operations ----

    /// Compute the value a storage operation writes to its destination.
    fn exec_storage<C>(
        &mut self,
        instr: &Instruction,
        at: usize,
        console: &mut C,
    ) -> Result<Word, RuntimeError>
    where
        C: Console + ?Sized,
    {
        let args = instr.args();
        match instr.opcode {
            Opcode::Set => self.operand(args[1], at),
            Opcode::Pop => self.pop(at),
            Opcode::Equal => {
                let (b, c) = self.operand_pair(args, at)?;
                Ok(Word::from(b == c))
            }
            Opcode::GreaterThan => {
                let (b, c) = self.operand_pair(args, at)?;
                Ok(Word::from(b > c))
            }
            Opcode::Add => {
                let (b, c) = self.operand_pair(args, at)?;
                Ok(wrap(u32::from(b) + u32::from(c)))
            }
            Opcode::Multiply => {
                let (b, c) = self.operand_pair(args, at)?;
                Ok(wrap(u32::from(b) * u32::from(c)))
            }
            Opcode::Modulo => {
                let (b, c) = self.operand_pair(args, at)?;
                b.checked_rem(c).ok_or(RuntimeError::DivisionByZero { at })
            }
            Opcode::BitAnd => {
                let (b, c) = self.operand_pair(args, at)?;
                Ok(b & c)
            }
            Opcode::BitOr => {
                let (b, c) = self.operand_pair(args, at)?;
                Ok(b | c)
            }
            Opcode::Not => Ok(!self.operand(args[1], at)? & MAX_LITERAL),
            Opcode::ReadMemory => {
                let address = self.operand(args[1], at)?;
                self.memory
                    .load(address)
                    .map_err(|source| RuntimeError::MemoryOutOfRange { at, source })
            }
            Opcode::Input => self.exec_input(console, at),
            other => unreachable!("{other:?} is not a storage operation"),
        }
    }

    fn exec_input<C>(&mut self, console: &mut C, at: usize) -> Result<Word, RuntimeError>
    where
        C: Console + ?Sized,
    {
        let c = console.read_char().map_err(|e| RuntimeError::io(at, e))?;
        let code = u32::from(c);
        if code > u32::from(MAX_LITERAL) {
            return Err(RuntimeError::InvalidCharacter { at, code });
        }
        Ok(code as Word)
    }

    // ---- Control-flow operations ----

    fn exec_control<C>(
        &mut self,
        instr: &Instruction,
        at: usize,
        next: usize,
        console: &mut C,
    ) -> Result<Flow, RuntimeError>
    where
        C: Console + ?Sized,
    {
        let args = instr.args();
        match instr.opcode {
            Opcode::Halt => Ok(Flow::Halt(Termination::Halt)),
            Opcode::Noop => Ok(Flow::Next(next)),
            Opcode::Push => {
                let value = self.operand(args[0], at)?;
                self.stack.push(value);
                Ok(Flow::Next(next))
            }
            Opcode::Jump => Ok(Flow::Next(self.operand(args[0], at)? as usize)),
            Opcode::JumpIfTrue => {
                let cond = self.operand(args[0], at)?;
                let target = self.operand(args[1], at)?;
                Ok(Flow::Next(if cond != 0 { target as usize } else { next }))
            }
            Opcode::JumpIfFalse => {
                let cond = self.operand(args[0], at)?;
                let target = self.operand(args[1], at)?;
                Ok(Flow::Next(if cond == 0 { target as usize } else { next }))
            }
            Opcode::WriteMemory => {
                let address = self.operand(args[0], at)?;
                let value = self.operand(args[1], at)?;
                self.memory.store(address, value);
                Ok(Flow::Next(next))
            }
            Opcode::Call => {
                let target = self.operand(args[0], at)?;
                let ret = Word::try_from(next).map_err(|_| RuntimeError::AddressOverflow { at })?;
                self.stack.push(ret);
                Ok(Flow::Next(target as usize))
            }
            Opcode::Return => Ok(match self.stack.pop() {
                Some(address) => Flow::Next(address as usize),
                None => Flow::Halt(Termination::EmptyReturn),
            }),
            Opcode::Output => {
                let code = u32::from(self.operand(args[0], at)?);
                let c = char::from_u32(code).ok_or(RuntimeError::InvalidCharacter { at, code })?;
                console.write_char(c).map_err(|e| RuntimeError::io(at, e))?;
                Ok(Flow::Next(next))
            }
            other => unreachable!("{other:?} is not a control-flow operation"),
        }
    }
}

/// Reduce an intermediate result into the 15-bit word range.
fn wrap(value: u32) -> Word {
    (value % MODULUS) as Word
}
