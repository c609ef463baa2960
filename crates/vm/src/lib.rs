//! synvm virtual machine: executes 15-bit word programs.
//!
//! The machine has:
//! - eight general-purpose registers
//! - an unbounded stack shared by `push`/`pop` and `call`/`ret`
//! - one growable memory holding both code and data
//!
//! # Usage
//!
//! ```
//! use synvm_common::Image;
//! use synvm_vm::{run, BufferConsole, Termination};
//!
//! // out 'H'; out 'i'; halt
//! let image = Image::new(vec![19, 72, 19, 105, 0]);
//! let mut console = BufferConsole::default();
//!
//! assert_eq!(run(image, &mut console), Ok(Termination::Halt));
//! assert_eq!(console.output(), "Hi");
//! ```

pub mod console;
pub mod error;
pub mod execute;
pub mod machine;
pub mod memory;
pub mod resolve;

pub use console::{BufferConsole, Console, IoConsole, StdConsole};
pub use error::RuntimeError;
pub use machine::{Registers, Status, Termination, Vm};
pub use memory::{Memory, OutOfRange};

use synvm_common::Image;

/// Load `image` into a fresh machine and run it to completion.
///
/// # Errors
///
/// Returns the first [`RuntimeError`] raised (decode failure, stack
/// exhaustion, division by zero, console failure, etc.).
pub fn run<C>(image: Image, console: &mut C) -> Result<Termination, RuntimeError>
where
    C: Console + ?Sized,
{
    let mut vm = Vm::new(image);
    vm.run(console)
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use synvm_common::word::{MAX_LITERAL, MODULUS, REGISTER_BASE};
    use synvm_common::{Argument, Register, Word};

    /// Run `words` and return the final machine, asserting a clean finish.
    fn run_clean(words: Vec<Word>) -> Vm {
        let mut vm = Vm::new(Image::new(words));
        let mut console = BufferConsole::default();
        vm.run(&mut console).unwrap();
        vm
    }

    fn literal() -> impl Strategy<Value = Word> {
        0..=MAX_LITERAL
    }

    proptest! {
        /// Every literal resolves to itself regardless of register contents.
        #[test]
        fn literal_resolves_to_itself(v in literal(), fill in literal()) {
            let mut regs = Registers::default();
            for reg in Register::ALL {
                regs.set(reg, fill);
            }
            prop_assert_eq!(resolve::resolve(Argument::Literal(v), &regs, 0), Ok(v));
        }

        /// `set rN v` followed by resolving rN yields v.
        #[test]
        fn set_then_resolve(n in 0usize..8, v in literal()) {
            let vm = run_clean(vec![1, REGISTER_BASE + n as Word, v, 0]);
            let reg = Register::new(n).unwrap();
            prop_assert_eq!(resolve::resolve(Argument::Register(reg), vm.registers(), 0), Ok(v));
        }

        /// Add and multiply reduce modulo 32768.
        #[test]
        fn arithmetic_wraps(b in literal(), c in literal()) {
            let vm = run_clean(vec![
                9, REGISTER_BASE, b, c,
                10, REGISTER_BASE + 1, b, c,
                0,
            ]);
            let regs = vm.registers().as_array();
            prop_assert_eq!(u32::from(regs[0]), (u32::from(b) + u32::from(c)) % MODULUS);
            prop_assert_eq!(u32::from(regs[1]), (u32::from(b) * u32::from(c)) % MODULUS);
        }

        /// Applying `not` twice returns the original value.
        #[test]
        fn not_is_an_involution(v in literal()) {
            let vm = run_clean(vec![
                14, REGISTER_BASE, v,
                14, REGISTER_BASE, REGISTER_BASE,
                0,
            ]);
            prop_assert_eq!(vm.registers().as_array()[0], v);
        }

        /// N pushes followed by N pops deliver the values in reverse order.
        #[test]
        fn push_pop_is_lifo(values in prop::collection::vec(literal(), 1..=8)) {
            let mut words = Vec::new();
            for &v in &values {
                words.extend_from_slice(&[2, v]);
            }
            for n in 0..values.len() {
                words.extend_from_slice(&[3, REGISTER_BASE + n as Word]);
            }
            words.push(0);

            let vm = run_clean(words);
            let regs = vm.registers().as_array();
            for (n, &v) in values.iter().rev().enumerate() {
                prop_assert_eq!(regs[n], v);
            }
            prop_assert!(vm.stack().is_empty());
        }
    }
}
