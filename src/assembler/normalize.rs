//! Comment stripping and line classification, ahead of both passes.

/// Prefix introducing the register-alias directive. Any other line
/// beginning with `#` is a comment.
pub const ALIAS_PREFIX: &str = "#ALIAS";

/// Strips `//` and `/* */` comments from a single line. `in_block` is the
/// carried "inside a block comment" state from the previous line; the
/// updated state is returned alongside the stripped text. Block comments do
/// not nest: an inner `/*` is ignored. A `//` outside a block comment
/// truncates the rest of the line unconditionally.
pub fn strip_comments(line: &str, in_block: bool) -> (String, bool) {
    let mut out = String::with_capacity(line.len());
    let mut in_block = in_block;

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if in_block {
            if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                in_block = false;
                i += 2;
            } else {
                i += 1;
            }
        } else if chars[i] == '/' && chars.get(i + 1) == Some(&'*') {
            in_block = true;
            i += 2;
        } else if chars[i] == '/' && chars.get(i + 1) == Some(&'/') {
            break;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    (out, in_block)
}

/// What a stripped line means to the assembler.
#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    /// Payload after the `#ALIAS` prefix.
    Directive(&'a str),
    /// The label name (text before the first `:`); the rest of the line is
    /// discarded.
    Label(&'a str),
    /// Trimmed instruction text, mnemonic first.
    Inst(&'a str),
}

pub fn classify(stripped: &str) -> Line<'_> {
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if trimmed.starts_with(ALIAS_PREFIX) {
        return Line::Directive(&trimmed[ALIAS_PREFIX.len()..]);
    }
    if trimmed.starts_with('#') || trimmed.starts_with(';') {
        return Line::Blank;
    }
    if let Some(name) = label_name(trimmed) {
        return Line::Label(name);
    }
    Line::Inst(trimmed)
}

/// A line is a label when the text before its first `:` is non-empty and
/// starts with a letter or underscore.
fn label_name(trimmed: &str) -> Option<&str> {
    let colon = trimmed.find(':')?;
    let name = trimmed[..colon].trim();
    let first = name.chars().next()?;
    if first.is_ascii_alphabetic() || first == '_' {
        Some(name)
    } else {
        None
    }
}
