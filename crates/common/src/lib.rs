//! synvm common types and instruction decoding.
//!
//! This crate provides the foundational data structures for the synvm
//! instruction set:
//!
//! - [`Word`], [`Register`], [`Argument`]: the 15-bit word model and the
//!   literal/register argument encoding
//! - [`Opcode`]: all 22 opcodes with their arity and execution [`Shape`]
//! - [`Instruction`]: an opcode with decoded arguments, fetched from any
//!   [`WordSource`]
//! - [`Image`]: a program image and its little-endian byte encoding
//! - [`DecodeError`]: errors from decoding instructions or images

pub mod error;
pub mod image;
pub mod instruction;
pub mod opcode;
pub mod word;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use image::Image;
pub use instruction::{Instruction, WordSource};
pub use opcode::{Opcode, Shape};
pub use word::{Argument, Register, Word};
