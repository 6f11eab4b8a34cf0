//! Label and register-alias tables, built by the first pass and read-only
//! afterwards. Both are scoped to a single assembly invocation.

use super::encode;
use crate::common;
use crate::spec::catalogue::Catalogue;
use crate::spec::types::hw::{Cond, Reg};
use derive_more::Constructor;
use std::borrow::Cow;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct Label {
    pub name: String,
    pub address: u8,
}

/// Duplicate definitions are permitted; `lookup` returns the earliest one.
#[derive(Debug, Default)]
pub struct SymbolTable {
    labels: Vec<Label>,
}

impl SymbolTable {
    pub fn define(&mut self, name: &str, address: u8) {
        self.labels.push(Label::new(name.to_owned(), address));
    }

    pub fn lookup(&self, name: &str) -> Option<u8> {
        self.labels
            .iter()
            .find(|label| label.name == name)
            .map(|label| label.address)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct RegisterAlias {
    pub alias: String,
    pub register: Reg,
}

#[derive(Debug, Default)]
pub struct AliasTable {
    entries: Vec<RegisterAlias>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    MalformedDirective(&'static str),
    BadAliasRegister(String),
    BadAliasName(String, &'static str),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedDirective(what) => write!(f, "Malformed alias directive, {}", what),
            Error::BadAliasRegister(token) => {
                write!(f, "Invalid register '{}' in alias directive", token)
            }
            Error::BadAliasName(name, why) => {
                write!(f, "Unacceptable alias name '{}', {}", name, why)
            }
        }
    }
}

impl AliasTable {
    /// Later definitions of the same alias overwrite earlier ones.
    pub fn define(&mut self, alias: &str, register: Reg) {
        match self.entries.iter_mut().find(|entry| entry.alias == alias) {
            Some(entry) => entry.register = register,
            None => self
                .entries
                .push(RegisterAlias::new(alias.to_owned(), register)),
        }
    }

    /// Parses and applies the payload of an alias directive
    /// (`<register> <name>`). All validation happens here, at definition
    /// time; uses of an alias are pure text substitution.
    pub fn define_from_directive(&mut self, payload: &str) -> Result<(), Error> {
        let mut parts = payload.split_whitespace();
        let reg_token = parts
            .next()
            .ok_or(Error::MalformedDirective("expected a register token"))?;
        let alias_token = parts
            .next()
            .ok_or(Error::MalformedDirective("expected an alias name"))?;

        // The register token is taken literally: aliases cannot be chained.
        let register = Reg::parse(reg_token)
            .ok_or_else(|| Error::BadAliasRegister(reg_token.to_owned()))?;
        validate_alias_name(alias_token)?;

        self.define(alias_token, register);
        Ok(())
    }

    /// Purely textual alias resolution: the canonical register token if
    /// `token` names an alias, otherwise `token` unchanged.
    pub fn resolve<'a>(&self, token: &'a str) -> Cow<'a, str> {
        match self.entries.iter().find(|entry| entry.alias == token) {
            Some(entry) => Cow::Owned(entry.register.to_string()),
            None => Cow::Borrowed(token),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_alias_name(name: &str) -> Result<(), Error> {
    if name.is_empty() || name.contains(|c: char| !c.is_ascii_alphanumeric() && c != '_') {
        return Err(Error::BadAliasName(
            name.to_owned(),
            "alias names may contain only letters, digits, and underscores",
        ));
    }

    let reserved = Catalogue::get().is_mnemonic(name)
        || Cond::for_mnemonic(name).is_some()
        || common::eq_ignore_case(name, encode::LR_MNEMONIC);
    if reserved {
        return Err(Error::BadAliasName(
            name.to_owned(),
            "it collides with an instruction mnemonic",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn labels_first_definition_wins() {
        let mut symbols = SymbolTable::default();
        symbols.define("loop", 3);
        symbols.define("loop", 9);
        assert_eq!(symbols.lookup("loop"), Some(3));
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols.lookup("done"), None);
    }

    #[test]
    fn alias_overwrite_is_last_write_wins() {
        let mut aliases = AliasTable::default();
        aliases.define("counter", Reg::X1);
        aliases.define("counter", Reg::X4);
        assert_eq!(aliases.resolve("counter"), "X4");
        assert_eq!(aliases.len(), 1);
    }

    #[test]
    fn resolve_leaves_other_tokens_alone() {
        let mut aliases = AliasTable::default();
        aliases.define("counter", Reg::X1);
        assert_eq!(aliases.resolve("X0"), "X0");
        assert_eq!(aliases.resolve("42"), "42");
        assert_eq!(aliases.resolve("Counter"), "Counter");
    }

    #[test]
    fn directive_roundtrip() {
        let mut aliases = AliasTable::default();
        aliases.define_from_directive(" X3 tmp").unwrap();
        assert_eq!(aliases.resolve("tmp"), "X3");
    }

    #[test]
    fn directive_rejects_bad_register() {
        let mut aliases = AliasTable::default();
        assert_eq!(
            aliases.define_from_directive(" X9 tmp"),
            Err(Error::BadAliasRegister("X9".to_owned()))
        );
        assert_eq!(
            aliases.define_from_directive(" foo tmp"),
            Err(Error::BadAliasRegister("foo".to_owned()))
        );
        assert!(aliases.is_empty());
    }

    #[test]
    fn directive_register_is_literal_not_an_alias() {
        let mut aliases = AliasTable::default();
        aliases.define_from_directive(" X2 first").unwrap();
        assert_eq!(
            aliases.define_from_directive(" first second"),
            Err(Error::BadAliasRegister("first".to_owned()))
        );
    }

    #[test]
    fn directive_rejects_reserved_and_malformed_names() {
        let mut aliases = AliasTable::default();
        assert!(matches!(
            aliases.define_from_directive(" X0 add"),
            Err(Error::BadAliasName(_, _))
        ));
        assert!(matches!(
            aliases.define_from_directive(" X0 BEQ"),
            Err(Error::BadAliasName(_, _))
        ));
        assert!(matches!(
            aliases.define_from_directive(" X0 lr"),
            Err(Error::BadAliasName(_, _))
        ));
        assert!(matches!(
            aliases.define_from_directive(" X0 a-b"),
            Err(Error::BadAliasName(_, _))
        ));
        assert!(matches!(
            aliases.define_from_directive(" X0"),
            Err(Error::MalformedDirective(_))
        ));
    }

    #[test]
    fn directive_ignores_trailing_tokens() {
        let mut aliases = AliasTable::default();
        aliases.define_from_directive(" X1 tmp extra junk").unwrap();
        assert_eq!(aliases.resolve("tmp"), "X1");
    }
}
