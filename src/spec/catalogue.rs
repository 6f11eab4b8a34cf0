use super::types::schema::{Format, InstDef, InstFlags, OpKind};
use crate::common;
use once_cell::sync::Lazy;

static STORAGE: Lazy<Catalogue> = Lazy::new(Catalogue::new);

/// The sixteen ALU operations, in opcode order. The trailing entries are
/// reserved slots which the hardware decodes but does not yet implement.
const ALU_OPS: [&str; 16] = [
    "AND", "OR", "XOR", "NOT", "ADD", "SUB", "LSL", "LSR", "BCDL", "BCDH", "UMUL_L", "UMUL_H",
    "MUL_L", "MUL_H", "NUL0E", "NUL0F",
];

/// Register-format ALU opcodes start here; adding `ALU_IMMEDIATE_BASE`
/// instead selects the immediate variant.
const ALU_REGISTER_BASE: u8 = 0x00;
const ALU_IMMEDIATE_BASE: u8 = 0x10;

const FPU_REGISTER_BASE: u8 = 0x20;
const FPU_IMMEDIATE_BASE: u8 = 0x30;

/// The full instruction catalogue: an ordered table of every opcode the
/// machine decodes. Built once at start-up and shared read-only; lookups
/// scan in table order and return the first match.
pub struct Catalogue {
    entries: Vec<InstDef>,
}

impl Catalogue {
    pub fn get() -> &'static Catalogue {
        Lazy::force(&STORAGE)
    }

    fn new() -> Self {
        let mut entries = Vec::new();

        let alu_reg = InstFlags::VALID
            | InstFlags::TRY_WRITE
            | InstFlags::TRY_READ_A
            | InstFlags::TRY_READ_B;
        let alu_imm = InstFlags::VALID
            | InstFlags::TRY_WRITE
            | InstFlags::TRY_READ_A
            | InstFlags::OVERRIDE_B
            | InstFlags::IMMEDIATE;

        for (i, op) in ALU_OPS.iter().enumerate() {
            entries.push(InstDef::new(
                format!("ALU_{}", op),
                (*op).to_owned(),
                ALU_REGISTER_BASE + i as u8,
                Format::Register,
                OpKind::Alu,
                alu_reg,
            ));
            entries.push(InstDef::new(
                format!("ALU_{}_I", op),
                (*op).to_owned(),
                ALU_IMMEDIATE_BASE + i as u8,
                Format::Immediate,
                OpKind::Alu,
                alu_imm,
            ));
        }

        // FPU slots are reserved: decoded with ALU-shaped flags, no
        // implemented operation behind them yet.
        for i in 0..16u8 {
            entries.push(InstDef::new(
                format!("FPU_NUL{}", FPU_REGISTER_BASE + i),
                format!("FNUL{}", i),
                FPU_REGISTER_BASE + i,
                Format::Register,
                OpKind::Fpu,
                alu_reg,
            ));
            entries.push(InstDef::new(
                format!("FPU_NUL{}_I", FPU_IMMEDIATE_BASE + i),
                format!("FNUL{}", i),
                FPU_IMMEDIATE_BASE + i,
                Format::Immediate,
                OpKind::Fpu,
                alu_imm,
            ));
        }

        entries.push(InstDef::new(
            "MOVE".to_owned(),
            "MOV".to_owned(),
            0x40,
            Format::Register,
            OpKind::Move,
            InstFlags::VALID | InstFlags::TRY_WRITE | InstFlags::TRY_READ_A | InstFlags::TRY_READ_B,
        ));
        entries.push(InstDef::new(
            "MOVE_I".to_owned(),
            "MOV".to_owned(),
            0x41,
            Format::Immediate,
            OpKind::Move,
            InstFlags::VALID
                | InstFlags::TRY_WRITE
                | InstFlags::TRY_READ_A
                | InstFlags::OVERRIDE_B
                | InstFlags::OVERRIDE_WRITE
                | InstFlags::IMMEDIATE,
        ));

        entries.push(InstDef::new(
            "CMP".to_owned(),
            "CMP".to_owned(),
            0x42,
            Format::Register,
            OpKind::Cmp,
            InstFlags::VALID | InstFlags::TRY_READ_A | InstFlags::TRY_READ_B,
        ));
        entries.push(InstDef::new(
            "CMP_I".to_owned(),
            "CMP".to_owned(),
            0x43,
            Format::Immediate,
            OpKind::Cmp,
            InstFlags::VALID | InstFlags::TRY_READ_A | InstFlags::OVERRIDE_B | InstFlags::IMMEDIATE,
        ));

        entries.push(InstDef::new(
            "BRANCH".to_owned(),
            "B".to_owned(),
            0x44,
            Format::JumpRegister,
            OpKind::Branch,
            InstFlags::VALID | InstFlags::TRY_READ_B,
        ));
        entries.push(InstDef::new(
            "BRANCH_I".to_owned(),
            "B".to_owned(),
            0x45,
            Format::JumpImmediate,
            OpKind::Branch,
            InstFlags::VALID | InstFlags::OVERRIDE_B | InstFlags::IMMEDIATE,
        ));

        entries.push(InstDef::new(
            "READ".to_owned(),
            "READ".to_owned(),
            0x46,
            Format::Register,
            OpKind::Memory,
            InstFlags::VALID | InstFlags::TRY_WRITE | InstFlags::TRY_READ_B,
        ));
        entries.push(InstDef::new(
            "READ_I".to_owned(),
            "READ".to_owned(),
            0x47,
            Format::Immediate,
            OpKind::Memory,
            InstFlags::VALID | InstFlags::TRY_WRITE | InstFlags::OVERRIDE_B | InstFlags::IMMEDIATE,
        ));
        entries.push(InstDef::new(
            "WRITE".to_owned(),
            "WRITE".to_owned(),
            0x48,
            Format::Register,
            OpKind::Memory,
            InstFlags::VALID | InstFlags::TRY_READ_A | InstFlags::TRY_READ_B,
        ));
        entries.push(InstDef::new(
            "WRITE_I".to_owned(),
            "WRITE".to_owned(),
            0x49,
            Format::Immediate,
            OpKind::Memory,
            InstFlags::VALID | InstFlags::TRY_READ_A | InstFlags::OVERRIDE_B | InstFlags::IMMEDIATE,
        ));

        entries.push(InstDef::new(
            "PRINT_REG".to_owned(),
            "PRINT".to_owned(),
            0x4A,
            Format::Register,
            OpKind::PrintReg,
            InstFlags::VALID | InstFlags::TRY_READ_A | InstFlags::TRY_READ_B,
        ));
        entries.push(InstDef::new(
            "PRINT_REG_I".to_owned(),
            "PRINT".to_owned(),
            0x4B,
            Format::Immediate,
            OpKind::PrintReg,
            InstFlags::VALID | InstFlags::TRY_READ_A | InstFlags::OVERRIDE_B | InstFlags::IMMEDIATE,
        ));
        entries.push(InstDef::new(
            "PRINT_CNS".to_owned(),
            "PRINT".to_owned(),
            0x4C,
            Format::Register,
            OpKind::PrintConst,
            InstFlags::VALID | InstFlags::TRY_READ_B | InstFlags::OVERRIDE_WRITE,
        ));
        entries.push(InstDef::new(
            "PRINT_CNS_I".to_owned(),
            "PRINT".to_owned(),
            0x4D,
            Format::Immediate,
            OpKind::PrintConst,
            InstFlags::VALID
                | InstFlags::OVERRIDE_B
                | InstFlags::OVERRIDE_WRITE
                | InstFlags::IMMEDIATE,
        ));

        entries.push(InstDef::new(
            "EXIT".to_owned(),
            "EXIT".to_owned(),
            0xFF,
            Format::Register,
            OpKind::Service,
            InstFlags::VALID,
        ));

        Catalogue { entries }
    }

    /// First entry matching the mnemonic and immediate-vs-register choice.
    pub fn lookup(&self, mnemonic: &str, immediate: bool) -> Option<&InstDef> {
        self.entries
            .iter()
            .find(|def| common::eq_ignore_case(&def.mnemonic, mnemonic) && def.is_immediate() == immediate)
    }

    /// As `lookup`, additionally constrained by kind. Needed where one
    /// mnemonic spans two kinds (PRINT).
    pub fn lookup_kind(&self, mnemonic: &str, kind: OpKind, immediate: bool) -> Option<&InstDef> {
        self.entries.iter().find(|def| {
            common::eq_ignore_case(&def.mnemonic, mnemonic)
                && def.kind == kind
                && def.is_immediate() == immediate
        })
    }

    /// Kind of the first entry carrying this mnemonic, if any.
    pub fn kind_of(&self, mnemonic: &str) -> Option<OpKind> {
        self.entries
            .iter()
            .find(|def| common::eq_ignore_case(&def.mnemonic, mnemonic))
            .map(|def| def.kind)
    }

    pub fn is_mnemonic(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    pub fn entries(&self) -> impl Iterator<Item = &InstDef> {
        self.entries.iter()
    }
}
