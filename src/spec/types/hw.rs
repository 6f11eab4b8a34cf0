use crate::common;
use derive_more::Display;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use static_assertions::const_assert;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

pub type Word = u32;
pub type HalfWord = u16;

pub const WORD_WIDTH: usize = 32;
pub const BANK_WIDTH: usize = 16;

/// Capacity of the instruction ROMs. The PC wraps within this range, so a
/// label address always fits in a byte.
pub const MAX_PROGRAM_WORDS: usize = 256;

pub const REGISTER_COUNT: usize = 8;

/// Largest value an immediate field can carry.
pub const IMM_MAX: i64 = 0xFFFF;

const_assert!(WORD_WIDTH == 2 * BANK_WIDTH);
const_assert!(MAX_PROGRAM_WORDS - 1 <= std::u8::MAX as usize);

/*
    Notes on instruction encoding:

    Every instruction is one 32-bit word, with the opcode in the lowest-order
    byte. The remaining fields, right-to-left:

        IIIIIIIIIIIIIIII BBB_ AAA_ DDD_ OOOOOOOO

    (O) the 8-bit opcode, (D) the 3-bit destination register, (A) and (B) the
    3-bit source registers, and (I) the 16-bit immediate, which occupies the
    same upper half of the word as B. An instruction binds either B or a wide
    immediate, never both; the IMMEDIATE catalogue flag (and the `_I` opcode
    variant) says which. Jump-format instructions reuse the D position for
    their 4-bit condition code, and bind no destination.

    The PRINT family subdivides the immediate: the position rides in its low
    byte and the data constant in its high byte.
*/

pub const COND_SHIFT: u32 = 8;
pub const DST_SHIFT: u32 = 8;
pub const A_SHIFT: u32 = 12;
pub const B_SHIFT: u32 = 16;
pub const IMM_SHIFT: u32 = 16;

const_assert!(IMM_SHIFT as usize + BANK_WIDTH == WORD_WIDTH);

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, FromPrimitive, EnumIter)]
pub enum Reg {
    X0,
    X1,
    X2,
    X3,
    X4,
    X5,
    X6,
    X7,
}

impl Reg {
    /// Parses a register token (`X0`..`X7`, case-insensitive). Returns
    /// `None` for anything else, including in-grammar indices outside the
    /// register file.
    pub fn parse(token: &str) -> Option<Reg> {
        let mut chars = token.chars();
        match chars.next() {
            Some('X') | Some('x') => (),
            _ => return None,
        }
        let index = chars.as_str();
        if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Reg::from_u32(index.parse().ok()?)
    }

    /// Does `token` use the register grammar at all (`X` followed by
    /// digits), whether or not the index is in range?
    pub fn is_reg_token(token: &str) -> bool {
        let mut chars = token.chars();
        match chars.next() {
            Some('X') | Some('x') => (),
            _ => return false,
        }
        let index = chars.as_str();
        !index.is_empty() && index.chars().all(|c| c.is_ascii_digit())
    }

    pub fn field(self) -> Word {
        self as Word
    }
}

/// Branch condition codes, as burned into the condition truth-table ROM.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, FromPrimitive, EnumIter)]
pub enum Cond {
    B,
    BEQ,
    BNE,
    BLT,
    BLE,
    BGT,
    BGE,
    BCS,
    BCC,
    BMI,
    BPL,
    BVS,
    BVC,
    BHI,
    BLS,
}

impl Cond {
    pub fn for_mnemonic(mnemonic: &str) -> Option<Cond> {
        Cond::iter().find(|cond| common::eq_ignore_case(mnemonic, &cond.to_string()))
    }

    pub fn code(self) -> Word {
        self as Word
    }
}

/// A fully-bound instruction word, prior to bit packing.
///
/// B and the immediate share the upper half of the word; no instruction
/// binds overlapping ranges of both. Likewise the condition code overlaps
/// the destination field, and only jump formats carry a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inst {
    pub opcode: u8,
    pub cond: Option<Cond>,
    pub dst: Option<Reg>,
    pub a: Option<Reg>,
    pub b: Option<Reg>,
    pub imm: Option<HalfWord>,
}

impl Inst {
    pub const fn new(
        opcode: u8,
        cond: Option<Cond>,
        dst: Option<Reg>,
        a: Option<Reg>,
        b: Option<Reg>,
        imm: Option<HalfWord>,
    ) -> Inst {
        Inst {
            opcode,
            cond,
            dst,
            a,
            b,
            imm,
        }
    }

    pub fn encode(&self) -> Word {
        let mut word = self.opcode as Word;
        if let Some(cond) = self.cond {
            word |= cond.code() << COND_SHIFT;
        }
        if let Some(dst) = self.dst {
            word |= dst.field() << DST_SHIFT;
        }
        if let Some(a) = self.a {
            word |= a.field() << A_SHIFT;
        }
        if let Some(b) = self.b {
            word |= b.field() << B_SHIFT;
        }
        if let Some(imm) = self.imm {
            word |= (imm as Word) << IMM_SHIFT;
        }
        word
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reg_parse_in_range() {
        assert_eq!(Reg::parse("X0"), Some(Reg::X0));
        assert_eq!(Reg::parse("x7"), Some(Reg::X7));
        assert_eq!(Reg::parse("X07"), Some(Reg::X7));
    }

    #[test]
    fn reg_parse_out_of_range() {
        assert_eq!(Reg::parse("X8"), None);
        assert_eq!(Reg::parse("X10"), None);
        assert!(Reg::is_reg_token("X8"));
    }

    #[test]
    fn reg_parse_non_registers() {
        assert_eq!(Reg::parse("Y0"), None);
        assert_eq!(Reg::parse("X"), None);
        assert_eq!(Reg::parse("X1a"), None);
        assert!(!Reg::is_reg_token("X1a"));
    }

    #[test]
    fn cond_mnemonics() {
        assert_eq!(Cond::for_mnemonic("B"), Some(Cond::B));
        assert_eq!(Cond::for_mnemonic("beq"), Some(Cond::BEQ));
        assert_eq!(Cond::for_mnemonic("BLS"), Some(Cond::BLS));
        assert_eq!(Cond::for_mnemonic("BXX"), None);
        assert_eq!(Cond::BLS.code(), 14);
    }

    #[test]
    fn inst_encode_field_positions() {
        let inst = Inst::new(
            0x04,
            None,
            Some(Reg::X0),
            Some(Reg::X1),
            Some(Reg::X2),
            None,
        );
        assert_eq!(inst.encode(), 0x0002_1004);

        let inst = Inst::new(0x41, None, Some(Reg::X3), None, None, Some(100));
        assert_eq!(inst.encode(), 0x0064_0341);
    }
}
