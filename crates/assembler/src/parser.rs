//! Parser for synvm assembly tokens → line items.
//!
//! A line holds any number of label definitions followed by at most one
//! instruction or directive. Label references are left symbolic here and
//! resolved once every label's address is known.

use synvm_common::word::MAX_LITERAL;
use synvm_common::{Opcode, Register, Word};

use crate::error::AsmError;
use crate::lexer::Token;

/// A single operand word, possibly still symbolic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operand {
    /// A literal value, already range-checked.
    Value(Word),
    Register(Register),
    /// A reference to a label's address.
    Label(String),
}

/// One unit of a parsed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Item {
    /// A label definition bound to the address of the next word.
    Label(String),
    /// An instruction with exactly `opcode.arity()` operands.
    Instruction {
        opcode: Opcode,
        operands: Vec<Operand>,
    },
    /// Raw words from `.word` or `.string`.
    Words(Vec<Operand>),
}

impl Item {
    /// Number of words the item occupies in the image.
    pub(crate) fn width(&self) -> usize {
        match self {
            Item::Label(_) => 0,
            Item::Instruction { opcode, .. } => 1 + opcode.arity(),
            Item::Words(words) => words.len(),
        }
    }
}

/// Parse the tokens of a single line.
///
/// Returns an empty Vec for blank lines. Address annotations such as
/// `00012:` are accepted and ignored so that disassembler output can be
/// assembled again.
pub(crate) fn parse_line(tokens: &[Token], line_num: usize) -> Result<Vec<Item>, AsmError> {
    let mut items = Vec::new();
    let mut rest = tokens;

    while let Some((head, tail)) = rest.split_first() {
        match head {
            Token::Address(_) => {}
            Token::Label(name) => items.push(Item::Label(name.clone())),
            _ => break,
        }
        rest = tail;
    }

    let Some((head, args)) = rest.split_first() else {
        return Ok(items);
    };
    let item = match head {
        Token::Ident(mnemonic) => parse_instruction(mnemonic, args, line_num)?,
        Token::Directive(name) => parse_directive(name, args, line_num)?,
        other => return Err(unexpected(other, line_num)),
    };
    items.push(item);
    Ok(items)
}

fn parse_instruction(mnemonic: &str, args: &[Token], line_num: usize) -> Result<Item, AsmError> {
    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| AsmError::UnknownOpcode {
        line: line_num,
        token: mnemonic.to_string(),
    })?;

    let arity = opcode.arity();
    if args.len() < arity {
        return Err(AsmError::MissingArgument {
            line: line_num,
            opcode: opcode.mnemonic(),
            expected: arity,
        });
    }
    expect_end(&args[arity..], line_num)?;

    let operands = args
        .iter()
        .map(|token| operand(token, MAX_LITERAL, line_num))
        .collect::<Result<_, _>>()?;
    Ok(Item::Instruction { opcode, operands })
}

fn parse_directive(name: &str, args: &[Token], line_num: usize) -> Result<Item, AsmError> {
    match name {
        ".word" => {
            if args.is_empty() {
                return Err(AsmError::MissingArgument {
                    line: line_num,
                    opcode: ".word",
                    expected: 1,
                });
            }
            let words = args
                .iter()
                .map(|token| operand(token, Word::MAX, line_num))
                .collect::<Result<_, _>>()?;
            Ok(Item::Words(words))
        }
        ".string" => {
            let Some((Token::Str(text), tail)) = args.split_first() else {
                return match args.first() {
                    Some(other) => Err(unexpected(other, line_num)),
                    None => Err(AsmError::MissingArgument {
                        line: line_num,
                        opcode: ".string",
                        expected: 1,
                    }),
                };
            };
            expect_end(tail, line_num)?;
            let words = text
                .chars()
                .map(|c| char_value(c, MAX_LITERAL, line_num).map(Operand::Value))
                .collect::<Result<_, _>>()?;
            Ok(Item::Words(words))
        }
        _ => Err(AsmError::UnknownOpcode {
            line: line_num,
            token: name.to_string(),
        }),
    }
}

/// Convert one argument token into an operand no larger than `max`.
fn operand(token: &Token, max: Word, line_num: usize) -> Result<Operand, AsmError> {
    match token {
        Token::Number(n) => Word::try_from(*n)
            .ok()
            .filter(|&value| value <= max)
            .map(Operand::Value)
            .ok_or_else(|| AsmError::InvalidNumber {
                line: line_num,
                token: token.to_string(),
            }),
        Token::Char(c) => char_value(*c, max, line_num).map(Operand::Value),
        Token::Register(reg) => Ok(Operand::Register(*reg)),
        Token::Ident(name) => Ok(Operand::Label(name.clone())),
        other => Err(unexpected(other, line_num)),
    }
}

fn char_value(c: char, max: Word, line_num: usize) -> Result<Word, AsmError> {
    Word::try_from(u32::from(c))
        .ok()
        .filter(|&value| value <= max)
        .ok_or_else(|| AsmError::InvalidNumber {
            line: line_num,
            token: format!("{c:?}"),
        })
}

fn expect_end(rest: &[Token], line_num: usize) -> Result<(), AsmError> {
    match rest.first() {
        Some(token) => Err(unexpected(token, line_num)),
        None => Ok(()),
    }
}

fn unexpected(token: &Token, line_num: usize) -> AsmError {
    AsmError::UnexpectedToken {
        line: line_num,
        token: token.to_string(),
    }
}
