use lsasm::assembler::{
    assemble,
    emit::{self, Bank, Emitted, Layout},
};

const FIB: &str = include_str!("../asm/fib.ls");

/// Counts the lines of `source` that assemble as instructions.
fn program_words(source: &str) -> Vec<u32> {
    assemble(source).program.words().to_vec()
}

#[test]
fn pc_matches_instruction_line_count() {
    let source = "\
// header comment
#ALIAS X0 tmp

start:
MOV tmp, 1
ADD tmp, 1
; a comment line
loop:
B loop
";
    let assembly = assemble(source);
    assert!(assembly.diagnostics.is_empty());
    // Three instruction-kind lines: the label, directive, blank, and
    // comment lines advance nothing.
    assert_eq!(assembly.program.len(), 3);
}

#[test]
fn label_references_match_literal_addresses() {
    let by_label = "\
MOV X0, 0
MOV X1, 1
target:
ADD X0, X1
BNE target
";
    let by_address = "\
MOV X0, 0
MOV X1, 1
ADD X0, X1
BNE 2
";
    assert_eq!(program_words(by_label), program_words(by_address));
}

#[test]
fn forward_references_resolve() {
    let source = "\
B done
MOV X0, 1
done:
EXIT
";
    let assembly = assemble(source);
    assert!(assembly.diagnostics.is_empty());
    // `done` sits at address 2; the branch is a jump-immediate with the
    // condition nibble clear.
    assert_eq!(assembly.program.words()[0], 0x0002_0045);
}

#[test]
fn duplicate_labels_keep_the_first_definition() {
    let source = "\
loop:
MOV X0, 1
loop:
MOV X0, 2
B loop
";
    let assembly = assemble(source);
    assert!(assembly.diagnostics.is_empty());
    // The branch targets address 0, not the second definition at 1.
    assert_eq!(*assembly.program.words().last().unwrap(), 0x0000_0045);
}

#[test]
fn alias_substitution_is_transparent() {
    let aliased = "\
#ALIAS X2 sum
#ALIAS X5 step
MOV sum, 0
MOV step, 3
loop:
ADD sum, step
CMP sum, 30
BNE loop
WRITE sum, 0x20
EXIT
";
    let plain = "\
MOV X2, 0
MOV X5, 3
loop:
ADD X2, X5
CMP X2, 30
BNE loop
WRITE X2, 0x20
EXIT
";
    assert_eq!(program_words(aliased), program_words(plain));
}

#[test]
fn alias_redefinition_applies_everywhere_in_one_invocation() {
    // The alias table is completed by pass 1 before any encoding happens,
    // so the overwrite applies to uses before the second directive too.
    let source = "\
#ALIAS X1 ptr
MOV ptr, 1
#ALIAS X6 ptr
MOV ptr, 2
";
    let rewritten = "\
MOV X6, 1
MOV X6, 2
";
    assert_eq!(program_words(source), program_words(rewritten));
}

#[test]
fn bad_lines_are_skipped_and_assembly_continues() {
    let source = "\
MOV X0, 1
B nowhere
MOV X1, 2
";
    let assembly = assemble(source);
    assert_eq!(assembly.diagnostics.len(), 1);
    assert!(assembly.diagnostics[0].message.contains("nowhere"));
    assert_eq!(assembly.program.len(), 2);
}

#[test]
fn rejected_lines_still_occupy_a_pass_one_address() {
    // Pass 1 cannot know a line will fail to encode, so labels after a bad
    // line account for it.
    let source = "\
MOV X0, 1
FROB X0
after:
B after
";
    let assembly = assemble(source);
    assert_eq!(assembly.diagnostics.len(), 1);
    // `after` is at address 2 even though only two words are emitted.
    assert_eq!(*assembly.program.words().last().unwrap(), 0x0002_0045);
}

#[test]
fn capacity_truncates_silently() {
    let mut source = String::new();
    for i in 0..300 {
        source.push_str(&format!("MOV X0, {}\n", i % 100));
    }
    let assembly = assemble(&source);
    assert_eq!(assembly.program.len(), 256);
    // Truncation is not a per-line failure.
    assert!(assembly.diagnostics.is_empty());
}

#[test]
fn lr_tracks_the_emitted_word_index() {
    let source = "\
MOV X0, 0
lr X7
EXIT
";
    let assembly = assemble(source);
    assert!(assembly.diagnostics.is_empty());
    // LR at address 1 is MOV_I X7, 1.
    assert_eq!(assembly.program.words()[1], 0x0001_0741);
}

#[test]
fn split_banks_agree_with_the_program() {
    let assembly = assemble(FIB);
    assert!(assembly.diagnostics.is_empty());

    let banks = match emit::emit(&assembly.program, Layout::Split) {
        Emitted::Split(banks) => banks,
        Emitted::Single(_) => panic!("expected split layout"),
    };

    for (address, &word) in assembly.program.words().iter().enumerate() {
        assert_eq!(banks[Bank::Alpha][address] as u32, word >> 16);
        assert_eq!(banks[Bank::Beta][address] as u32, word & 0xFFFF);
    }
    for address in assembly.program.len()..256 {
        assert_eq!(banks[Bank::Alpha][address], 0);
        assert_eq!(banks[Bank::Beta][address], 0);
    }
}

#[test]
fn fib_sample_assembles_cleanly() {
    let assembly = assemble(FIB);
    assert!(assembly.diagnostics.is_empty());
    assert_eq!(assembly.program.len(), 17);
    // Ends with the three PRINTs and the halt word.
    assert_eq!(*assembly.program.words().last().unwrap(), 0xFFFF_FFFF);
}

#[test]
fn block_comments_span_instruction_lines() {
    let source = "\
MOV X0, 1
/* all of this
B gone
and this too */ MOV X1, 2
";
    let assembly = assemble(source);
    assert!(assembly.diagnostics.is_empty());
    assert_eq!(assembly.program.len(), 2);
}
