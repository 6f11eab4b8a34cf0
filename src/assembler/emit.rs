//! The bounded output word sequence, and its projection onto the ROM
//! banks the machine actually loads.

use crate::spec::types::hw::{HalfWord, Word, BANK_WIDTH, MAX_PROGRAM_WORDS};
use enum_map::{Enum, EnumMap};
use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

const BANK_MASK: Word = (1 << BANK_WIDTH) - 1;

/// Ordered sequence of encoded instruction words. The sequence index is
/// the instruction address; pushes are refused once the ROM capacity is
/// reached.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Program {
    words: Vec<Word>,
}

impl Program {
    pub fn new() -> Self {
        Program { words: Vec::new() }
    }

    /// Appends a word, returning whether it was accepted. Capacity
    /// overflow is a soft condition the caller may count but not fail on.
    pub fn push(&mut self, word: Word) -> bool {
        if self.words.len() == MAX_PROGRAM_WORDS {
            return false;
        }
        self.words.push(word);
        true
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

/// The two half-width ROMs a split word is loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, EnumIter)]
pub enum Bank {
    Alpha,
    Beta,
}

impl Bank {
    /// Bit offset of this bank's half within a full instruction word.
    pub fn shift(self) -> u32 {
        match self {
            Bank::Alpha => BANK_WIDTH as u32,
            Bank::Beta => 0,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Bank::Alpha => "ALPHA",
            Bank::Beta => "BETA",
        }
    }
}

/// Output layout, threaded in explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Two half-width banks, index-aligned (the machine's ROM pair).
    Split,
    /// One full-width word sequence.
    Single,
}

pub enum Emitted {
    Split(EnumMap<Bank, Vec<HalfWord>>),
    Single(Vec<Word>),
}

/// Projects the program onto the selected layout, zero-padding every
/// sequence out to the full ROM capacity.
pub fn emit(program: &Program, layout: Layout) -> Emitted {
    match layout {
        Layout::Split => {
            let mut banks = EnumMap::new();
            for bank in Bank::iter() {
                banks[bank] = half_words(program, bank);
            }
            Emitted::Split(banks)
        }
        Layout::Single => Emitted::Single(
            program
                .words()
                .iter()
                .copied()
                .pad_using(MAX_PROGRAM_WORDS, |_| 0)
                .collect(),
        ),
    }
}

fn half_words(program: &Program, bank: Bank) -> Vec<HalfWord> {
    program
        .words()
        .iter()
        .map(|word| ((word >> bank.shift()) & BANK_MASK) as HalfWord)
        .pad_using(MAX_PROGRAM_WORDS, |_| 0)
        .collect()
}
