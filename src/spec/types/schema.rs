use bitflags::bitflags;
use derive_more::Constructor;

/// The bit-layout family an instruction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Register,
    Immediate,
    JumpRegister,
    JumpImmediate,
}

/// Functional class of an instruction, as recorded in the decoder ROM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Alu,
    Fpu,
    Move,
    Cmp,
    Branch,
    Memory,
    PrintReg,
    PrintConst,
    Service,
}

bitflags! {
    /// Per-opcode decoder flags. The bit positions are the ones the
    /// hardware's opcode-flags ROM exposes to the register file.
    pub struct InstFlags: u16 {
        const VALID          = 1 << 0;
        const IMMEDIATE      = 1 << 5;
        const OVERRIDE_WRITE = 1 << 11;
        const OVERRIDE_B     = 1 << 12;
        const TRY_READ_A     = 1 << 13;
        const TRY_READ_B     = 1 << 14;
        const TRY_WRITE      = 1 << 15;
    }
}

/// One catalogue entry: an opcode plus everything the encoder needs to know
/// to select and pack it. Immutable once the catalogue is built.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct InstDef {
    pub tech_name: String,
    pub mnemonic: String,
    pub opcode: u8,
    pub format: Format,
    pub kind: OpKind,
    pub flags: InstFlags,
}

impl InstDef {
    pub fn is_immediate(&self) -> bool {
        self.flags.contains(InstFlags::IMMEDIATE)
    }
}
