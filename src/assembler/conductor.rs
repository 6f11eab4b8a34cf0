//! Drives the two passes over the source and collects the results.
//!
//! Pass 1 builds the label and alias tables, advancing the program counter
//! only on instruction-kind lines. Pass 2 rescans the source with fresh
//! comment state and encodes each instruction line, consuming the pass-1
//! tables read-only. Label addresses are therefore fully known before any
//! forward reference is resolved.

use super::emit::Program;
use super::encode;
use super::normalize::{self, Line};
use super::symbols::{AliasTable, SymbolTable};
use crate::spec::types::hw::MAX_PROGRAM_WORDS;
use derive_more::Constructor;
use std::fmt::Display;

/// One rejected line. Rejections never abort the run; the rest of the
/// source still assembles.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct Diagnostic {
    pub line: usize,
    pub text: String,
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}: `{}`", self.line, self.message, self.text)
    }
}

/// The outcome of one assembly invocation: the (possibly partial) program
/// plus every per-line warning. Nothing here outlives the invocation.
#[derive(Debug)]
pub struct Assembly {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn assemble(source: &str) -> Assembly {
    let mut diagnostics = Vec::new();
    let (symbols, aliases) = scan_symbols(source, &mut diagnostics);
    log::debug!(
        "pass 1: {} labels, {} aliases",
        symbols.len(),
        aliases.len()
    );

    let program = encode_program(source, &symbols, &aliases, &mut diagnostics);
    log::debug!("pass 2: {} instructions encoded", program.len());

    Assembly {
        program,
        diagnostics,
    }
}

/// Pass 1. Stops early once the PC reaches the ROM capacity; anything past
/// that point cannot be addressed and is ignored.
fn scan_symbols(source: &str, diagnostics: &mut Vec<Diagnostic>) -> (SymbolTable, AliasTable) {
    let mut symbols = SymbolTable::default();
    let mut aliases = AliasTable::default();

    let mut in_block = false;
    let mut pc = 0usize;

    for (line_no, raw) in source.lines().enumerate() {
        if pc == MAX_PROGRAM_WORDS {
            break;
        }

        let (stripped, next_state) = normalize::strip_comments(raw, in_block);
        in_block = next_state;

        match normalize::classify(&stripped) {
            Line::Blank => {}
            Line::Directive(payload) => {
                if let Err(err) = aliases.define_from_directive(payload) {
                    diagnostics.push(Diagnostic::new(
                        line_no + 1,
                        stripped.trim().to_owned(),
                        err.to_string(),
                    ));
                }
            }
            Line::Label(name) => symbols.define(name, pc as u8),
            Line::Inst(_) => pc += 1,
        }
    }

    (symbols, aliases)
}

/// Pass 2. Bad lines are skipped with a diagnostic; lines past the ROM
/// capacity are parsed but silently dropped.
fn encode_program(
    source: &str,
    symbols: &SymbolTable,
    aliases: &AliasTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Program {
    let mut program = Program::new();
    let mut in_block = false;
    let mut dropped = 0usize;

    for (line_no, raw) in source.lines().enumerate() {
        let (stripped, next_state) = normalize::strip_comments(raw, in_block);
        in_block = next_state;

        let text = match normalize::classify(&stripped) {
            Line::Inst(text) => text,
            _ => continue,
        };

        match encode::encode_line(text, symbols, aliases, program.len()) {
            Ok(word) => {
                if !program.push(word) {
                    dropped += 1;
                }
            }
            Err(err) => diagnostics.push(Diagnostic::new(
                line_no + 1,
                text.to_owned(),
                err.to_string(),
            )),
        }
    }

    if dropped > 0 {
        log::debug!(
            "instruction capacity ({}) reached, {} words dropped",
            MAX_PROGRAM_WORDS,
            dropped
        );
    }

    program
}
