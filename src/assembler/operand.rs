//! Operand token classification: registers, constants, and bare names.

use crate::common;
use crate::spec::types::hw::{Reg, IMM_MAX};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    Const(u16),
    /// A bare identifier. Only meaningful as a branch target, where it is
    /// resolved through the label table.
    Name(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    MalformedToken(String, &'static str),
    ConstOutOfRange(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedToken(token, what) => write!(f, "Malformed token '{}', {}", token, what),
            Error::ConstOutOfRange(token) => {
                write!(f, "Constant '{}' does not fit in an immediate field", token)
            }
        }
    }
}

impl Operand {
    /// Classifies one (already alias-resolved) operand token.
    pub fn parse(token: &str) -> Result<Operand, Error> {
        if Reg::is_reg_token(token) {
            return match Reg::parse(token) {
                Some(reg) => Ok(Operand::Reg(reg)),
                None => Err(Error::MalformedToken(
                    token.to_owned(),
                    "register index out of range",
                )),
            };
        }

        if token.starts_with('\'') {
            return parse_char_literal(token);
        }

        if token.starts_with(|c: char| c.is_ascii_digit()) || token.starts_with('-') {
            return parse_numeric(token);
        }

        if common::is_ident(token) {
            return Ok(Operand::Name(token.to_owned()));
        }

        Err(Error::MalformedToken(token.to_owned(), "unrecognized operand"))
    }
}

/// Constants are decimal, `0x` hexadecimal, or `0b` binary, and must fit
/// the 16-bit immediate range.
fn parse_numeric(token: &str) -> Result<Operand, Error> {
    let parsed = if token.starts_with("0x") || token.starts_with("0X") {
        i64::from_str_radix(&token[2..], 16)
    } else if token.starts_with("0b") || token.starts_with("0B") {
        i64::from_str_radix(&token[2..], 2)
    } else {
        i64::from_str_radix(token, 10)
    };

    let val = parsed
        .map_err(|_| Error::MalformedToken(token.to_owned(), "could not parse numeric"))?;

    if val < 0 || val > IMM_MAX {
        return Err(Error::ConstOutOfRange(token.to_owned()));
    }

    Ok(Operand::Const(val as u16))
}

/// A single-quoted ASCII character literal, e.g. `'A'` -> 65.
fn parse_char_literal(token: &str) -> Result<Operand, Error> {
    let bytes = token.as_bytes();
    match bytes {
        [b'\'', c, b'\''] if c.is_ascii() => Ok(Operand::Const(*c as u16)),
        _ => Err(Error::MalformedToken(
            token.to_owned(),
            "malformed character literal",
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn registers() {
        assert_eq!(Operand::parse("X0"), Ok(Operand::Reg(Reg::X0)));
        assert_eq!(Operand::parse("x5"), Ok(Operand::Reg(Reg::X5)));
    }

    #[test]
    fn register_out_of_range_is_an_error_not_a_name() {
        assert_eq!(
            Operand::parse("X9"),
            Err(Error::MalformedToken(
                "X9".to_owned(),
                "register index out of range"
            ))
        );
    }

    #[test]
    fn constants() {
        assert_eq!(Operand::parse("255"), Ok(Operand::Const(255)));
        assert_eq!(Operand::parse("0"), Ok(Operand::Const(0)));
        assert_eq!(Operand::parse("0xFF"), Ok(Operand::Const(0xFF)));
        assert_eq!(Operand::parse("0Xff"), Ok(Operand::Const(0xFF)));
        assert_eq!(Operand::parse("0b1010"), Ok(Operand::Const(10)));
        assert_eq!(Operand::parse("65535"), Ok(Operand::Const(0xFFFF)));
    }

    #[test]
    fn constant_range() {
        assert_eq!(
            Operand::parse("65536"),
            Err(Error::ConstOutOfRange("65536".to_owned()))
        );
        assert_eq!(
            Operand::parse("70000"),
            Err(Error::ConstOutOfRange("70000".to_owned()))
        );
        assert_eq!(
            Operand::parse("-1"),
            Err(Error::ConstOutOfRange("-1".to_owned()))
        );
    }

    #[test]
    fn malformed_numerics() {
        assert!(matches!(
            Operand::parse("0xZZ"),
            Err(Error::MalformedToken(_, _))
        ));
        assert!(matches!(
            Operand::parse("12ab"),
            Err(Error::MalformedToken(_, _))
        ));
    }

    #[test]
    fn char_literals() {
        assert_eq!(Operand::parse("'A'"), Ok(Operand::Const(65)));
        assert_eq!(Operand::parse("' '"), Ok(Operand::Const(32)));
        assert!(matches!(
            Operand::parse("'AB'"),
            Err(Error::MalformedToken(_, _))
        ));
        assert!(matches!(
            Operand::parse("'A"),
            Err(Error::MalformedToken(_, _))
        ));
    }

    #[test]
    fn names() {
        assert_eq!(Operand::parse("loop"), Ok(Operand::Name("loop".to_owned())));
        assert_eq!(
            Operand::parse("_done2"),
            Ok(Operand::Name("_done2".to_owned()))
        );
        assert!(matches!(
            Operand::parse("a+b"),
            Err(Error::MalformedToken(_, _))
        ));
    }
}
