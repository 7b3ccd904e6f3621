// Tue Feb 3 2026 - Alex

use crate::decode::registers::{Condition, RegisterList, LR};
use crate::memory::Address;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawUnits {
    One(u16),
    Two(u16, u16),
}

impl RawUnits {
    pub fn first(&self) -> u16 {
        match self {
            Self::One(unit) => *unit,
            Self::Two(first, _) => *first,
        }
    }

    pub fn unit_count(&self) -> u32 {
        match self {
            Self::One(_) => 1,
            Self::Two(_, _) => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftOp {
    Lsl,
    Lsr,
    Asr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImmOp {
    Mov,
    Cmp,
    Add,
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    And,
    Eor,
    Lsl,
    Lsr,
    Asr,
    Adc,
    Sbc,
    Ror,
    Tst,
    Neg,
    Cmp,
    Cmn,
    Orr,
    Mul,
    Bic,
    Mvn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HiOp {
    Add,
    Cmp,
    Mov,
    Bx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignedOp {
    Strh,
    Ldrh,
    Ldsb,
    Ldsh,
}

/// One decoded THUMB shape with its operand fields.
///
/// Branch-like shapes carry the already-resolved virtual target rather than
/// the raw offset field, since every consumer of this engine wants the
/// target. A long branch-with-link is one logical instruction spanning two
/// code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// lsl/lsr/asr rd, rs, #imm5
    ShiftImm { op: ShiftOp, rd: u8, rs: u8, imm: u8 },
    /// add/sub rd, rs, rn or add/sub rd, rs, #imm3
    AddSub { sub: bool, imm: bool, rd: u8, rs: u8, operand: u8 },
    /// mov/cmp/add/sub rd, #imm8
    AluImm { op: ImmOp, rd: u8, imm: u8 },
    /// register-to-register ALU op
    AluReg { op: AluOp, rd: u8, rs: u8 },
    /// hi-register add/cmp/mov, or bx
    HiRegOp { op: HiOp, rd: u8, rs: u8 },
    /// ldr rd, [pc, #imm8*4] (the literal-pool load)
    LdrPc { rd: u8, imm: u8 },
    /// ldr/str/ldrb/strb rd, [rb, ro]
    LoadStoreReg { load: bool, byte: bool, rd: u8, rb: u8, ro: u8 },
    /// strh/ldrh/ldsb/ldsh rd, [rb, ro]
    LoadStoreSigned { op: SignedOp, rd: u8, rb: u8, ro: u8 },
    /// ldr/str/ldrb/strb rd, [rb, #imm5]
    LoadStoreImm { load: bool, byte: bool, rd: u8, rb: u8, imm: u8 },
    /// ldrh/strh rd, [rb, #imm5*2]
    LoadStoreHalf { load: bool, rd: u8, rb: u8, imm: u8 },
    /// ldr/str rd, [sp, #imm8*4]
    LoadStoreSp { load: bool, rd: u8, imm: u8 },
    /// add rd, pc/sp, #imm8*4
    LoadAddress { sp: bool, rd: u8, imm: u8 },
    /// add sp, #±imm7*4
    AdjustSp { neg: bool, imm: u8 },
    /// push/pop, with the extra bit selecting lr (push) or pc (pop)
    PushPop { pop: bool, lr_pc: bool, regs: RegisterList },
    /// stmia/ldmia rb!, {rlist}
    LoadStoreMultiple { load: bool, rb: u8, regs: RegisterList },
    /// conditional branch with resolved target
    BranchCond { cond: Condition, target: Address },
    /// swi #comment
    Swi { comment: u8 },
    /// unconditional branch with resolved target
    Branch { target: Address },
    /// two-unit branch-with-link with resolved target
    BranchLink { target: Address },
    /// anything that matches no known shape (often pool data, not code)
    Unknown { raw: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    address: Address,
    raw: RawUnits,
    kind: Kind,
}

impl Instruction {
    pub fn new(address: Address, raw: RawUnits, kind: Kind) -> Self {
        Self { address, raw, kind }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn raw(&self) -> RawUnits {
        self.raw
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn unit_count(&self) -> u32 {
        self.raw.unit_count()
    }

    pub fn byte_len(&self) -> u32 {
        self.raw.unit_count() * 2
    }

    /// The address of the next instruction slot after this one.
    pub fn next_address(&self) -> Address {
        self.address + self.byte_len()
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, Kind::BranchLink { .. })
    }

    pub fn branch_target(&self) -> Option<Address> {
        match self.kind {
            Kind::BranchCond { target, .. }
            | Kind::Branch { target }
            | Kind::BranchLink { target } => Some(target),
            _ => None,
        }
    }

    /// The prologue shape: push {.., lr}.
    pub fn is_push_with_lr(&self) -> bool {
        matches!(self.kind, Kind::PushPop { pop: false, lr_pc: true, .. })
    }

    /// The epilogue shapes: pop {.., pc} or bx lr.
    pub fn is_return(&self) -> bool {
        match self.kind {
            Kind::PushPop { pop: true, lr_pc: true, .. } => true,
            Kind::HiRegOp { op: HiOp::Bx, rs, .. } => rs == LR,
            _ => false,
        }
    }
}

fn reg(index: u8) -> String {
    match index {
        13 => "sp".to_string(),
        14 => "lr".to_string(),
        15 => "pc".to_string(),
        _ => format!("r{}", index),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.address)?;
        match self.kind {
            Kind::ShiftImm { op, rd, rs, imm } => {
                let name = match op {
                    ShiftOp::Lsl => "lsl",
                    ShiftOp::Lsr => "lsr",
                    ShiftOp::Asr => "asr",
                };
                write!(f, "{} {}, {}, #{}", name, reg(rd), reg(rs), imm)
            }
            Kind::AddSub { sub, imm, rd, rs, operand } => {
                let name = if sub { "sub" } else { "add" };
                if imm {
                    write!(f, "{} {}, {}, #{}", name, reg(rd), reg(rs), operand)
                } else {
                    write!(f, "{} {}, {}, {}", name, reg(rd), reg(rs), reg(operand))
                }
            }
            Kind::AluImm { op, rd, imm } => {
                let name = match op {
                    ImmOp::Mov => "mov",
                    ImmOp::Cmp => "cmp",
                    ImmOp::Add => "add",
                    ImmOp::Sub => "sub",
                };
                write!(f, "{} {}, #0x{:x}", name, reg(rd), imm)
            }
            Kind::AluReg { op, rd, rs } => {
                let name = match op {
                    AluOp::And => "and",
                    AluOp::Eor => "eor",
                    AluOp::Lsl => "lsl",
                    AluOp::Lsr => "lsr",
                    AluOp::Asr => "asr",
                    AluOp::Adc => "adc",
                    AluOp::Sbc => "sbc",
                    AluOp::Ror => "ror",
                    AluOp::Tst => "tst",
                    AluOp::Neg => "neg",
                    AluOp::Cmp => "cmp",
                    AluOp::Cmn => "cmn",
                    AluOp::Orr => "orr",
                    AluOp::Mul => "mul",
                    AluOp::Bic => "bic",
                    AluOp::Mvn => "mvn",
                };
                write!(f, "{} {}, {}", name, reg(rd), reg(rs))
            }
            Kind::HiRegOp { op, rd, rs } => match op {
                HiOp::Add => write!(f, "add {}, {}", reg(rd), reg(rs)),
                HiOp::Cmp => write!(f, "cmp {}, {}", reg(rd), reg(rs)),
                HiOp::Mov => write!(f, "mov {}, {}", reg(rd), reg(rs)),
                HiOp::Bx => write!(f, "bx {}", reg(rs)),
            },
            Kind::LdrPc { rd, imm } => {
                write!(f, "ldr {}, [pc, #0x{:x}]", reg(rd), imm as u32 * 4)
            }
            Kind::LoadStoreReg { load, byte, rd, rb, ro } => {
                let name = match (load, byte) {
                    (true, true) => "ldrb",
                    (true, false) => "ldr",
                    (false, true) => "strb",
                    (false, false) => "str",
                };
                write!(f, "{} {}, [{}, {}]", name, reg(rd), reg(rb), reg(ro))
            }
            Kind::LoadStoreSigned { op, rd, rb, ro } => {
                let name = match op {
                    SignedOp::Strh => "strh",
                    SignedOp::Ldrh => "ldrh",
                    SignedOp::Ldsb => "ldsb",
                    SignedOp::Ldsh => "ldsh",
                };
                write!(f, "{} {}, [{}, {}]", name, reg(rd), reg(rb), reg(ro))
            }
            Kind::LoadStoreImm { load, byte, rd, rb, imm } => {
                let name = match (load, byte) {
                    (true, true) => "ldrb",
                    (true, false) => "ldr",
                    (false, true) => "strb",
                    (false, false) => "str",
                };
                let scale = if byte { 1 } else { 4 };
                write!(f, "{} {}, [{}, #0x{:x}]", name, reg(rd), reg(rb), imm as u32 * scale)
            }
            Kind::LoadStoreHalf { load, rd, rb, imm } => {
                let name = if load { "ldrh" } else { "strh" };
                write!(f, "{} {}, [{}, #0x{:x}]", name, reg(rd), reg(rb), imm as u32 * 2)
            }
            Kind::LoadStoreSp { load, rd, imm } => {
                let name = if load { "ldr" } else { "str" };
                write!(f, "{} {}, [sp, #0x{:x}]", name, reg(rd), imm as u32 * 4)
            }
            Kind::LoadAddress { sp, rd, imm } => {
                let source = if sp { "sp" } else { "pc" };
                write!(f, "add {}, {}, #0x{:x}", reg(rd), source, imm as u32 * 4)
            }
            Kind::AdjustSp { neg, imm } => {
                let sign = if neg { "-" } else { "" };
                write!(f, "add sp, #{}0x{:x}", sign, imm as u32 * 4)
            }
            Kind::PushPop { pop, lr_pc, regs } => {
                let name = if pop { "pop" } else { "push" };
                let extra = match (pop, lr_pc) {
                    (true, true) => ",pc",
                    (false, true) => ",lr",
                    (_, false) => "",
                };
                if regs.is_empty() && lr_pc {
                    write!(f, "{} {{{}}}", name, &extra[1..])
                } else {
                    write!(f, "{} {{{}{}}}", name, regs, extra)
                }
            }
            Kind::LoadStoreMultiple { load, rb, regs } => {
                let name = if load { "ldmia" } else { "stmia" };
                write!(f, "{} {}!, {{{}}}", name, reg(rb), regs)
            }
            Kind::BranchCond { cond, target } => write!(f, "b{} {}", cond, target),
            Kind::Swi { comment } => write!(f, "swi #0x{:x}", comment),
            Kind::Branch { target } => write!(f, "b {}", target),
            Kind::BranchLink { target } => write!(f, "bl {}", target),
            Kind::Unknown { raw } => write!(f, ".hword 0x{:04x}", raw),
        }
    }
}
