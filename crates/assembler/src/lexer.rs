//! Tokenizer for synvm assembly text.

use std::fmt;

use synvm_common::Register;

use crate::error::AsmError;

/// A single token from an assembly line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// An opcode mnemonic or a label reference, case preserved.
    Ident(String),
    /// A label definition (`name:`).
    Label(String),
    /// A numeric address annotation (`00012:`), as printed by the disassembler.
    Address(u64),
    /// A directive such as `.word`, lowercased.
    Directive(String),
    /// `r0` through `r7`.
    Register(Register),
    /// A numeric literal (decimal or hex).
    Number(u64),
    /// A character literal (`'A'`).
    Char(char),
    /// A string literal (`"text"`).
    Str(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) | Token::Directive(name) => f.write_str(name),
            Token::Label(name) => write!(f, "{name}:"),
            Token::Address(addr) => write!(f, "{addr}:"),
            Token::Register(reg) => write!(f, "{reg}"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Char(c) => write!(f, "{c:?}"),
            Token::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Tokenize a single line of assembly text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `;` outside a quoted literal and extend to end of
/// line. Commas are accepted as separators.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let mut tokens = Vec::new();
    let mut rest = line;

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        let Some(first) = rest.chars().next() else {
            break;
        };
        match first {
            ';' => break,
            '"' => {
                let (text, tail) = lex_quoted(rest, '"', line_num)?;
                tokens.push(Token::Str(text));
                rest = tail;
            }
            '\'' => {
                let (text, tail) = lex_quoted(rest, '\'', line_num)?;
                let mut chars = text.chars();
                let c = match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => {
                        return Err(AsmError::UnexpectedToken {
                            line: line_num,
                            token: rest[..rest.len() - tail.len()].to_string(),
                        })
                    }
                };
                tokens.push(Token::Char(c));
                rest = tail;
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '"' | '\''))
                    .unwrap_or(rest.len());
                tokens.push(classify(&rest[..end], line_num)?);
                rest = &rest[end..];
            }
        }
    }

    Ok(tokens)
}

/// Read a quoted literal starting at the opening `quote`.
///
/// Returns the unescaped contents and the text after the closing quote.
fn lex_quoted(text: &str, quote: char, line_num: usize) -> Result<(String, &str), AsmError> {
    let unterminated = || AsmError::UnexpectedToken {
        line: line_num,
        token: text.to_string(),
    };

    let mut value = String::new();
    let mut chars = text.char_indices().skip(1);
    while let Some((idx, c)) = chars.next() {
        if c == quote {
            return Ok((value, &text[idx + c.len_utf8()..]));
        }
        if c != '\\' {
            value.push(c);
            continue;
        }
        let (_, escaped) = chars.next().ok_or_else(unterminated)?;
        value.push(match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' | '\'' | '"' => escaped,
            other => {
                return Err(AsmError::UnexpectedToken {
                    line: line_num,
                    token: format!("\\{other}"),
                })
            }
        });
    }
    Err(unterminated())
}

fn classify(word: &str, line_num: usize) -> Result<Token, AsmError> {
    let invalid_number = || AsmError::InvalidNumber {
        line: line_num,
        token: word.to_string(),
    };

    if let Some(name) = word.strip_suffix(':') {
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            return name.parse().map(Token::Address).map_err(|_| invalid_number());
        }
        if is_identifier(name) {
            return Ok(Token::Label(name.to_string()));
        }
    } else if word.starts_with('.') && is_identifier(&word[1..]) {
        return Ok(Token::Directive(word.to_ascii_lowercase()));
    } else if let Some(hex) = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16)
            .map(Token::Number)
            .map_err(|_| invalid_number());
    } else if word.as_bytes().first().is_some_and(|b| b.is_ascii_digit()) {
        return word.parse().map(Token::Number).map_err(|_| invalid_number());
    } else if let Some(index) = register_index(word) {
        return index
            .parse()
            .ok()
            .and_then(Register::new)
            .map(Token::Register)
            .ok_or_else(|| AsmError::InvalidRegister {
                line: line_num,
                token: word.to_string(),
            });
    } else if is_identifier(word) {
        return Ok(Token::Ident(word.to_string()));
    }

    Err(AsmError::UnexpectedToken {
        line: line_num,
        token: word.to_string(),
    })
}

/// The digits of a register name such as `r3` or `R12`.
fn register_index(word: &str) -> Option<&str> {
    let digits = word.strip_prefix(['r', 'R'])?;
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

fn is_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    bytes
        .next()
        .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
