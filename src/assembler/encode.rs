//! Second-pass instruction encoding: mnemonic dispatch, catalogue entry
//! selection, and bit packing. Every failure here is line-scoped; the
//! conductor turns it into a diagnostic and moves on.

use super::operand::{self, Operand};
use super::symbols::{AliasTable, SymbolTable};
use crate::common;
use crate::spec::catalogue::Catalogue;
use crate::spec::types::hw::{Cond, HalfWord, Inst, Word};
use crate::spec::types::schema::{InstDef, OpKind};
use std::fmt::Display;

/// Pseudo-instruction: load a register with the index of the word being
/// produced. Encodes as an immediate MOV; the callee never needs to know
/// about program counters.
pub(crate) const LR_MNEMONIC: &str = "LR";

/// Halt is the all-ones word; its low byte is still the EXIT opcode.
const EXIT_WORD: Word = 0xFFFF_FFFF;

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Error {
    Operand(operand::Error),
    InstUnknown(String),
    InstWrongOperandCount(String, usize),
    InstInvalidArgs(String, &'static str),
    UnknownLabel(String),
}

impl From<operand::Error> for Error {
    fn from(err: operand::Error) -> Self {
        Error::Operand(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Operand(err) => write!(f, "{}", err),
            Error::InstUnknown(name) => write!(f, "Unknown instruction '{}'", name),
            Error::InstWrongOperandCount(name, got) => {
                write!(f, "Wrong number of operands for '{}' (got {})", name, got)
            }
            Error::InstInvalidArgs(name, expected) => write!(
                f,
                "Invalid arguments passed to instruction '{}', expected {}",
                name, expected
            ),
            Error::UnknownLabel(name) => write!(f, "Unknown label '{}'", name),
        }
    }
}

/// Encodes one instruction line into a word. `index` is the address the
/// word will occupy if it is appended.
pub(super) fn encode_line(
    text: &str,
    symbols: &SymbolTable,
    aliases: &AliasTable,
    index: usize,
) -> Result<Word, Error> {
    let (mnemonic, rest) = split_mnemonic(text);
    let mnemonic = mnemonic.to_uppercase();
    let args = parse_operands(rest, aliases)?;

    if mnemonic == LR_MNEMONIC {
        return encode_lr(&args, index);
    }

    // Condition mnemonics (B, BEQ, ...) are not catalogue mnemonics; they
    // all select one of the two BRANCH opcodes.
    if let Some(cond) = Cond::for_mnemonic(&mnemonic) {
        return encode_branch(cond, &args, symbols);
    }

    let kind = Catalogue::get()
        .kind_of(&mnemonic)
        .ok_or_else(|| Error::InstUnknown(mnemonic.clone()))?;

    match kind {
        OpKind::Alu | OpKind::Fpu => encode_alu(&mnemonic, &args),
        OpKind::Move => encode_move(&mnemonic, &args),
        OpKind::Cmp => encode_cmp(&mnemonic, &args),
        OpKind::Branch => encode_branch(Cond::B, &args, symbols),
        OpKind::Memory => encode_memory(&mnemonic, &args),
        OpKind::PrintReg | OpKind::PrintConst => encode_print(&mnemonic, &args),
        OpKind::Service => encode_exit(&mnemonic, &args),
    }
}

fn split_mnemonic(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(pos) => (&text[..pos], &text[pos..]),
        None => (text, ""),
    }
}

/// Operands are comma/whitespace-delimited. Every token goes through the
/// alias table before classification.
fn parse_operands(rest: &str, aliases: &AliasTable) -> Result<Vec<Operand>, Error> {
    rest.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| Operand::parse(&aliases.resolve(token)).map_err(Error::from))
        .collect()
}

fn lookup(mnemonic: &str, immediate: bool) -> Result<&'static InstDef, Error> {
    Catalogue::get()
        .lookup(mnemonic, immediate)
        .ok_or_else(|| Error::InstUnknown(mnemonic.to_owned()))
}

fn lookup_kind(mnemonic: &str, kind: OpKind, immediate: bool) -> Result<&'static InstDef, Error> {
    Catalogue::get()
        .lookup_kind(mnemonic, kind, immediate)
        .ok_or_else(|| Error::InstUnknown(mnemonic.to_owned()))
}

fn encode_lr(args: &[Operand], index: usize) -> Result<Word, Error> {
    let dst = match args {
        [Operand::Reg(dst)] => *dst,
        [_] => {
            return Err(Error::InstInvalidArgs(
                LR_MNEMONIC.to_owned(),
                "a destination register",
            ))
        }
        _ => return Err(Error::InstWrongOperandCount(LR_MNEMONIC.to_owned(), args.len())),
    };

    let def = lookup("MOV", true)?;
    Ok(Inst::new(def.opcode, None, Some(dst), None, None, Some(index as HalfWord)).encode())
}

fn encode_alu(mnemonic: &str, args: &[Operand]) -> Result<Word, Error> {
    // NOT is the odd one out: a single operand, source fields left zero.
    if common::eq_ignore_case(mnemonic, "NOT") {
        let dst = match args {
            [Operand::Reg(dst)] => *dst,
            _ => {
                return Err(Error::InstInvalidArgs(
                    mnemonic.to_owned(),
                    "a single destination register",
                ))
            }
        };
        let def = lookup(mnemonic, false)?;
        return Ok(Inst::new(def.opcode, None, Some(dst), None, None, None).encode());
    }

    // In the two-operand shorthand the destination doubles as the first
    // source.
    let (dst, a, src) = match args {
        [Operand::Reg(dst), Operand::Reg(a), src] => (*dst, *a, src),
        [Operand::Reg(dst), src] => (*dst, *dst, src),
        _ => {
            return Err(Error::InstInvalidArgs(
                mnemonic.to_owned(),
                "`Xd, Xa, Xb|const` or `Xd, Xb|const`",
            ))
        }
    };

    match src {
        Operand::Reg(b) => {
            let def = lookup(mnemonic, false)?;
            Ok(Inst::new(def.opcode, None, Some(dst), Some(a), Some(*b), None).encode())
        }
        Operand::Const(imm) => {
            let def = lookup(mnemonic, true)?;
            Ok(Inst::new(def.opcode, None, Some(dst), Some(a), None, Some(*imm)).encode())
        }
        Operand::Name(_) => Err(Error::InstInvalidArgs(
            mnemonic.to_owned(),
            "a register or constant source",
        )),
    }
}

fn encode_move(mnemonic: &str, args: &[Operand]) -> Result<Word, Error> {
    let (dst, src) = match args {
        [Operand::Reg(dst), src] => (*dst, src),
        [_, _] => {
            return Err(Error::InstInvalidArgs(
                mnemonic.to_owned(),
                "a destination register",
            ))
        }
        _ => return Err(Error::InstWrongOperandCount(mnemonic.to_owned(), args.len())),
    };

    match src {
        Operand::Reg(src) => {
            let def = lookup(mnemonic, false)?;
            Ok(Inst::new(def.opcode, None, Some(dst), Some(*src), None, None).encode())
        }
        Operand::Const(imm) => {
            let def = lookup(mnemonic, true)?;
            Ok(Inst::new(def.opcode, None, Some(dst), None, None, Some(*imm)).encode())
        }
        Operand::Name(_) => Err(Error::InstInvalidArgs(
            mnemonic.to_owned(),
            "a register or constant source",
        )),
    }
}

fn encode_cmp(mnemonic: &str, args: &[Operand]) -> Result<Word, Error> {
    let (a, src) = match args {
        [Operand::Reg(a), src] => (*a, src),
        [_, _] => {
            return Err(Error::InstInvalidArgs(
                mnemonic.to_owned(),
                "a register as the first operand",
            ))
        }
        _ => return Err(Error::InstWrongOperandCount(mnemonic.to_owned(), args.len())),
    };

    match src {
        Operand::Reg(b) => {
            let def = lookup(mnemonic, false)?;
            Ok(Inst::new(def.opcode, None, None, Some(a), Some(*b), None).encode())
        }
        Operand::Const(imm) => {
            let def = lookup(mnemonic, true)?;
            Ok(Inst::new(def.opcode, None, None, Some(a), None, Some(*imm)).encode())
        }
        Operand::Name(_) => Err(Error::InstInvalidArgs(
            mnemonic.to_owned(),
            "a register or constant to compare against",
        )),
    }
}

/// Branch targets are the one place a bare identifier is legal: it must
/// resolve through the label table built in the first pass.
fn encode_branch(cond: Cond, args: &[Operand], symbols: &SymbolTable) -> Result<Word, Error> {
    let target = match args {
        [target] => target,
        _ => {
            return Err(Error::InstWrongOperandCount(
                cond.to_string(),
                args.len(),
            ))
        }
    };

    match target {
        Operand::Reg(reg) => {
            let def = lookup("B", false)?;
            Ok(Inst::new(def.opcode, Some(cond), None, None, Some(*reg), None).encode())
        }
        Operand::Const(addr) => {
            let def = lookup("B", true)?;
            Ok(Inst::new(def.opcode, Some(cond), None, None, None, Some(*addr)).encode())
        }
        Operand::Name(name) => {
            let addr = symbols
                .lookup(name)
                .ok_or_else(|| Error::UnknownLabel(name.clone()))?;
            let def = lookup("B", true)?;
            Ok(Inst::new(def.opcode, Some(cond), None, None, None, Some(addr as HalfWord)).encode())
        }
    }
}

/// READ loads through the destination field, WRITE stores through the A
/// field; both address through B or the immediate.
fn encode_memory(mnemonic: &str, args: &[Operand]) -> Result<Word, Error> {
    let (reg, addr) = match args {
        [Operand::Reg(reg), addr] => (*reg, addr),
        [_, _] => {
            return Err(Error::InstInvalidArgs(
                mnemonic.to_owned(),
                "a register as the first operand",
            ))
        }
        _ => return Err(Error::InstWrongOperandCount(mnemonic.to_owned(), args.len())),
    };

    let is_read = common::eq_ignore_case(mnemonic, "READ");
    let (dst, a) = if is_read {
        (Some(reg), None)
    } else {
        (None, Some(reg))
    };

    match addr {
        Operand::Reg(addr) => {
            let def = lookup(mnemonic, false)?;
            Ok(Inst::new(def.opcode, None, dst, a, Some(*addr), None).encode())
        }
        Operand::Const(addr) => {
            let def = lookup(mnemonic, true)?;
            Ok(Inst::new(def.opcode, None, dst, a, None, Some(*addr)).encode())
        }
        Operand::Name(_) => Err(Error::InstInvalidArgs(
            mnemonic.to_owned(),
            "a register or constant address",
        )),
    }
}

/// PRINT selects among its four catalogue entries from the classes of its
/// two operands: position first, data second. Constant data and immediate
/// positions each ride in one byte of the immediate field.
fn encode_print(mnemonic: &str, args: &[Operand]) -> Result<Word, Error> {
    let (pos, data) = match args {
        [pos, data] => (pos, data),
        _ => return Err(Error::InstWrongOperandCount(mnemonic.to_owned(), args.len())),
    };

    match (pos, data) {
        (Operand::Reg(pos), Operand::Reg(data)) => {
            let def = lookup_kind(mnemonic, OpKind::PrintReg, false)?;
            Ok(Inst::new(def.opcode, None, None, Some(*data), Some(*pos), None).encode())
        }
        (Operand::Const(pos), Operand::Reg(data)) => {
            let pos = byte_operand(mnemonic, *pos, "a screen position that fits in a byte")?;
            let def = lookup_kind(mnemonic, OpKind::PrintReg, true)?;
            // Position in the low byte of the immediate.
            Ok(Inst::new(def.opcode, None, None, Some(*data), None, Some(pos as HalfWord)).encode())
        }
        (Operand::Reg(pos), Operand::Const(data)) => {
            let data = byte_operand(mnemonic, *data, "a data constant that fits in a byte")?;
            let def = lookup_kind(mnemonic, OpKind::PrintConst, false)?;
            // Data constant in the high byte of the immediate.
            let imm = (data as HalfWord) << 8;
            Ok(Inst::new(def.opcode, None, None, None, Some(*pos), Some(imm)).encode())
        }
        (Operand::Const(pos), Operand::Const(data)) => {
            let pos = byte_operand(mnemonic, *pos, "a screen position that fits in a byte")?;
            let data = byte_operand(mnemonic, *data, "a data constant that fits in a byte")?;
            let def = lookup_kind(mnemonic, OpKind::PrintConst, true)?;
            let imm = ((data as HalfWord) << 8) | pos as HalfWord;
            Ok(Inst::new(def.opcode, None, None, None, None, Some(imm)).encode())
        }
        _ => Err(Error::InstInvalidArgs(
            mnemonic.to_owned(),
            "register or constant operands",
        )),
    }
}

fn byte_operand(mnemonic: &str, val: u16, expected: &'static str) -> Result<u8, Error> {
    if val > 0xFF {
        return Err(Error::InstInvalidArgs(mnemonic.to_owned(), expected));
    }
    Ok(val as u8)
}

fn encode_exit(mnemonic: &str, args: &[Operand]) -> Result<Word, Error> {
    if !args.is_empty() {
        return Err(Error::InstWrongOperandCount(mnemonic.to_owned(), args.len()));
    }
    Ok(EXIT_WORD)
}
