// Tue Feb 3 2026 - Alex

use bitflags::bitflags;
use std::fmt;

pub const SP: u8 = 13;
pub const LR: u8 = 14;
pub const PC: u8 = 15;

bitflags! {
    /// The low-register list field of push/pop and multiple load/store.
    ///
    /// The extra LR/PC bit of push/pop is carried separately on the
    /// instruction shape, since its meaning depends on the direction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RegisterList: u8 {
        const R0 = 1 << 0;
        const R1 = 1 << 1;
        const R2 = 1 << 2;
        const R3 = 1 << 3;
        const R4 = 1 << 4;
        const R5 = 1 << 5;
        const R6 = 1 << 6;
        const R7 = 1 << 7;
    }
}

impl RegisterList {
    pub fn count(&self) -> u32 {
        self.bits().count_ones()
    }
}

impl fmt::Display for RegisterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for index in 0..8 {
            if self.bits() & (1 << index) != 0 {
                if !first {
                    write!(f, ",")?;
                }
                write!(f, "r{}", index)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Eq,
    Ne,
    Cs,
    Cc,
    Mi,
    Pl,
    Vs,
    Vc,
    Hi,
    Ls,
    Ge,
    Lt,
    Gt,
    Le,
}

impl Condition {
    /// Maps the 4-bit condition field. `0b1110` is undefined in this
    /// encoding and `0b1111` is the software-interrupt escape, so neither
    /// yields a condition.
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0x0 => Some(Self::Eq),
            0x1 => Some(Self::Ne),
            0x2 => Some(Self::Cs),
            0x3 => Some(Self::Cc),
            0x4 => Some(Self::Mi),
            0x5 => Some(Self::Pl),
            0x6 => Some(Self::Vs),
            0x7 => Some(Self::Vc),
            0x8 => Some(Self::Hi),
            0x9 => Some(Self::Ls),
            0xa => Some(Self::Ge),
            0xb => Some(Self::Lt),
            0xc => Some(Self::Gt),
            0xd => Some(Self::Le),
            _ => None,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Cs => "cs",
            Self::Cc => "cc",
            Self::Mi => "mi",
            Self::Pl => "pl",
            Self::Vs => "vs",
            Self::Vc => "vc",
            Self::Hi => "hi",
            Self::Ls => "ls",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::Le => "le",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
