// Tue Feb 3 2026 - Alex

use crate::decode::error::DecodeError;
use crate::decode::instruction::{
    AluOp, HiOp, ImmOp, Instruction, Kind, RawUnits, ShiftOp, SignedOp,
};
use crate::decode::registers::{Condition, RegisterList};
use crate::memory::{Address, AddressSpace};
use once_cell::sync::Lazy;

struct Rule {
    mask: u16,
    value: u16,
    build: fn(u16, Address) -> Kind,
}

fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

fn low_regs(unit: u16) -> (u8, u8) {
    ((unit & 0x7) as u8, ((unit >> 3) & 0x7) as u8)
}

fn build_swi(unit: u16, _addr: Address) -> Kind {
    Kind::Swi { comment: (unit & 0xff) as u8 }
}

fn build_adjust_sp(unit: u16, _addr: Address) -> Kind {
    Kind::AdjustSp { neg: unit & 0x80 != 0, imm: (unit & 0x7f) as u8 }
}

fn build_push_pop(unit: u16, _addr: Address) -> Kind {
    Kind::PushPop {
        pop: unit & 0x0800 != 0,
        lr_pc: unit & 0x0100 != 0,
        regs: RegisterList::from_bits_truncate((unit & 0xff) as u8),
    }
}

fn build_alu_reg(unit: u16, _addr: Address) -> Kind {
    let op = match (unit >> 6) & 0xf {
        0x0 => AluOp::And,
        0x1 => AluOp::Eor,
        0x2 => AluOp::Lsl,
        0x3 => AluOp::Lsr,
        0x4 => AluOp::Asr,
        0x5 => AluOp::Adc,
        0x6 => AluOp::Sbc,
        0x7 => AluOp::Ror,
        0x8 => AluOp::Tst,
        0x9 => AluOp::Neg,
        0xa => AluOp::Cmp,
        0xb => AluOp::Cmn,
        0xc => AluOp::Orr,
        0xd => AluOp::Mul,
        0xe => AluOp::Bic,
        _ => AluOp::Mvn,
    };
    let (rd, rs) = low_regs(unit);
    Kind::AluReg { op, rd, rs }
}

fn build_hi_reg(unit: u16, _addr: Address) -> Kind {
    let op = match (unit >> 8) & 0x3 {
        0x0 => HiOp::Add,
        0x1 => HiOp::Cmp,
        0x2 => HiOp::Mov,
        _ => HiOp::Bx,
    };
    let rd = ((unit & 0x7) | ((unit >> 4) & 0x8)) as u8;
    let rs = ((unit >> 3) & 0xf) as u8;
    Kind::HiRegOp { op, rd, rs }
}

fn build_ldr_pc(unit: u16, _addr: Address) -> Kind {
    Kind::LdrPc { rd: ((unit >> 8) & 0x7) as u8, imm: (unit & 0xff) as u8 }
}

fn build_load_store_reg(unit: u16, _addr: Address) -> Kind {
    let (rd, rb) = low_regs(unit);
    Kind::LoadStoreReg {
        load: unit & 0x0800 != 0,
        byte: unit & 0x0400 != 0,
        rd,
        rb,
        ro: ((unit >> 6) & 0x7) as u8,
    }
}

fn build_load_store_signed(unit: u16, _addr: Address) -> Kind {
    // key is the sign bit over the halfword bit
    let op = match ((unit >> 9) & 0x2) | ((unit >> 11) & 0x1) {
        0x0 => SignedOp::Strh,
        0x1 => SignedOp::Ldrh,
        0x2 => SignedOp::Ldsb,
        _ => SignedOp::Ldsh,
    };
    let (rd, rb) = low_regs(unit);
    Kind::LoadStoreSigned { op, rd, rb, ro: ((unit >> 6) & 0x7) as u8 }
}

fn build_add_sub(unit: u16, _addr: Address) -> Kind {
    let (rd, rs) = low_regs(unit);
    Kind::AddSub {
        sub: unit & 0x0200 != 0,
        imm: unit & 0x0400 != 0,
        rd,
        rs,
        operand: ((unit >> 6) & 0x7) as u8,
    }
}

fn build_shift_imm(unit: u16, _addr: Address) -> Kind {
    let op = match (unit >> 11) & 0x3 {
        0x0 => ShiftOp::Lsl,
        0x1 => ShiftOp::Lsr,
        _ => ShiftOp::Asr,
    };
    let (rd, rs) = low_regs(unit);
    Kind::ShiftImm { op, rd, rs, imm: ((unit >> 6) & 0x1f) as u8 }
}

fn build_alu_imm(unit: u16, _addr: Address) -> Kind {
    let op = match (unit >> 11) & 0x3 {
        0x0 => ImmOp::Mov,
        0x1 => ImmOp::Cmp,
        0x2 => ImmOp::Add,
        _ => ImmOp::Sub,
    };
    Kind::AluImm { op, rd: ((unit >> 8) & 0x7) as u8, imm: (unit & 0xff) as u8 }
}

fn build_load_store_imm(unit: u16, _addr: Address) -> Kind {
    let (rd, rb) = low_regs(unit);
    Kind::LoadStoreImm {
        load: unit & 0x0800 != 0,
        byte: unit & 0x1000 != 0,
        rd,
        rb,
        imm: ((unit >> 6) & 0x1f) as u8,
    }
}

fn build_load_store_half(unit: u16, _addr: Address) -> Kind {
    let (rd, rb) = low_regs(unit);
    Kind::LoadStoreHalf {
        load: unit & 0x0800 != 0,
        rd,
        rb,
        imm: ((unit >> 6) & 0x1f) as u8,
    }
}

fn build_load_store_sp(unit: u16, _addr: Address) -> Kind {
    Kind::LoadStoreSp {
        load: unit & 0x0800 != 0,
        rd: ((unit >> 8) & 0x7) as u8,
        imm: (unit & 0xff) as u8,
    }
}

fn build_load_address(unit: u16, _addr: Address) -> Kind {
    Kind::LoadAddress {
        sp: unit & 0x0800 != 0,
        rd: ((unit >> 8) & 0x7) as u8,
        imm: (unit & 0xff) as u8,
    }
}

fn build_load_store_multiple(unit: u16, _addr: Address) -> Kind {
    Kind::LoadStoreMultiple {
        load: unit & 0x0800 != 0,
        rb: ((unit >> 8) & 0x7) as u8,
        regs: RegisterList::from_bits_truncate((unit & 0xff) as u8),
    }
}

fn build_undefined(unit: u16, _addr: Address) -> Kind {
    Kind::Unknown { raw: unit }
}

fn build_branch_cond(unit: u16, addr: Address) -> Kind {
    match Condition::from_bits((unit >> 8) & 0xf) {
        Some(cond) => {
            // sign bit lives in the 8-bit field; extend before the x2 scale
            let offset = sign_extend((unit & 0xff) as u32, 8) * 2;
            Kind::BranchCond { cond, target: addr.offset(4 + offset) }
        }
        None => Kind::Unknown { raw: unit },
    }
}

fn build_branch(unit: u16, addr: Address) -> Kind {
    let offset = sign_extend((unit & 0x7ff) as u32, 11) * 2;
    Kind::Branch { target: addr.offset(4 + offset) }
}

/// The encoding table, most-specific discriminant first so no two rules can
/// claim the same unit. The two halves of a long branch-with-link are paired
/// before this table runs.
static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule { mask: 0xff00, value: 0xdf00, build: build_swi },
        Rule { mask: 0xff00, value: 0xde00, build: build_undefined },
        Rule { mask: 0xff00, value: 0xb000, build: build_adjust_sp },
        Rule { mask: 0xf600, value: 0xb400, build: build_push_pop },
        Rule { mask: 0xfc00, value: 0x4000, build: build_alu_reg },
        Rule { mask: 0xfc00, value: 0x4400, build: build_hi_reg },
        Rule { mask: 0xf800, value: 0x4800, build: build_ldr_pc },
        Rule { mask: 0xf200, value: 0x5000, build: build_load_store_reg },
        Rule { mask: 0xf200, value: 0x5200, build: build_load_store_signed },
        Rule { mask: 0xf800, value: 0x1800, build: build_add_sub },
        Rule { mask: 0xe000, value: 0x0000, build: build_shift_imm },
        Rule { mask: 0xe000, value: 0x2000, build: build_alu_imm },
        Rule { mask: 0xe000, value: 0x6000, build: build_load_store_imm },
        Rule { mask: 0xf000, value: 0x8000, build: build_load_store_half },
        Rule { mask: 0xf000, value: 0x9000, build: build_load_store_sp },
        Rule { mask: 0xf000, value: 0xa000, build: build_load_address },
        Rule { mask: 0xf000, value: 0xc000, build: build_load_store_multiple },
        Rule { mask: 0xf000, value: 0xd000, build: build_branch_cond },
        Rule { mask: 0xf800, value: 0xe000, build: build_branch },
    ]
});

/// Decodes the code unit at `file_offset`, consuming two units for a long
/// branch-with-link. Unrecognized bit patterns decode to `Kind::Unknown`
/// (scan ranges routinely cover pool data); the only failures are a read
/// past the image and a branch-with-link half missing its partner.
pub fn decode(space: &AddressSpace, file_offset: u32) -> Result<Instruction, DecodeError> {
    let unit = space
        .read_u16(file_offset)
        .map_err(|_| DecodeError::OutOfBounds(file_offset))?;
    let address = space.to_virtual(file_offset);

    if unit & 0xf800 == 0xf000 {
        // high half of bl; the low half must sit directly behind it
        let partner = space
            .read_u16(file_offset + 2)
            .map_err(|_| DecodeError::Incomplete(address))?;
        if partner & 0xf800 != 0xf800 {
            return Err(DecodeError::Incomplete(address));
        }
        let high = sign_extend((unit & 0x7ff) as u32, 11) << 12;
        let low = ((partner & 0x7ff) as i32) << 1;
        let target = address.offset(4 + high + low);
        return Ok(Instruction::new(
            address,
            RawUnits::Two(unit, partner),
            Kind::BranchLink { target },
        ));
    }
    if unit & 0xf800 == 0xf800 {
        // stray low half; whoever owns the preceding address consumed the pair
        return Err(DecodeError::Incomplete(address));
    }

    let kind = RULES
        .iter()
        .find(|rule| unit & rule.mask == rule.value)
        .map(|rule| (rule.build)(unit, address))
        .unwrap_or(Kind::Unknown { raw: unit });
    Ok(Instruction::new(address, RawUnits::One(unit), kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::registers::LR;

    fn space_with_units(units: &[u16], base: u32) -> AddressSpace {
        let mut bytes = Vec::with_capacity(units.len() * 2);
        for unit in units {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        AddressSpace::new(bytes, Address::new(base))
    }

    fn decode_one(unit: u16, base: u32) -> Instruction {
        decode(&space_with_units(&[unit], base), 0).unwrap()
    }

    #[test]
    fn test_conditional_branch_targets() {
        let beq = decode_one(0xd001, 0x0800_0000);
        assert_eq!(
            beq.kind(),
            Kind::BranchCond { cond: Condition::Eq, target: Address::new(0x0800_0006) }
        );

        let back = decode_one(0xd0ff, 0x0800_0000);
        assert_eq!(back.branch_target(), Some(Address::new(0x0800_0002)));

        // maximum negative field (0x80 = -128) at a non-zero address
        let mut units = vec![0x46c0u16; 0x81]; // mov r8, r8 padding
        units[0x80] = 0xd080;
        let space = space_with_units(&units, 0x0800_0000);
        let insn = decode(&space, 0x100).unwrap();
        assert_eq!(insn.branch_target(), Some(Address::new(0x0800_0004)));

        // a -2 field cancels the +4 pipeline offset exactly
        units[0x80] = 0xd0fe;
        let space = space_with_units(&units, 0x0800_0000);
        let insn = decode(&space, 0x100).unwrap();
        assert_eq!(insn.branch_target(), Some(Address::new(0x0800_0100)));
    }

    #[test]
    fn test_unconditional_branch_target() {
        let fwd = decode_one(0xe010, 0x0800_0000);
        assert_eq!(fwd.kind(), Kind::Branch { target: Address::new(0x0800_0024) });

        let back = decode_one(0xe7ff, 0x0800_0000);
        assert_eq!(back.branch_target(), Some(Address::new(0x0800_0002)));
    }

    #[test]
    fn test_branch_link_round_trip() {
        // combined offset +0x1000 from 0x08010000
        let space = space_with_units(&[0xf001, 0xf800], 0x0801_0000);
        let insn = decode(&space, 0).unwrap();
        assert_eq!(insn.kind(), Kind::BranchLink { target: Address::new(0x0801_1004) });
        assert_eq!(insn.unit_count(), 2);

        // combined offset -0x1000
        let space = space_with_units(&[0xf7ff, 0xf800], 0x0801_0000);
        let insn = decode(&space, 0).unwrap();
        assert_eq!(insn.kind(), Kind::BranchLink { target: Address::new(0x0800_f004) });
    }

    #[test]
    fn test_lone_branch_link_halves_are_incomplete() {
        // prefix at the very end of the window
        let space = space_with_units(&[0xf001], 0x0800_0000);
        assert_eq!(decode(&space, 0), Err(DecodeError::Incomplete(Address::new(0x0800_0000))));

        // prefix with the wrong partner shape
        let space = space_with_units(&[0xf001, 0x2000], 0x0800_0000);
        assert_eq!(decode(&space, 0), Err(DecodeError::Incomplete(Address::new(0x0800_0000))));

        // stray suffix
        let space = space_with_units(&[0xf800, 0x2000], 0x0800_0000);
        assert_eq!(decode(&space, 0), Err(DecodeError::Incomplete(Address::new(0x0800_0000))));
    }

    #[test]
    fn test_common_shapes() {
        assert_eq!(
            decode_one(0xb510, 0x0800_0000).kind(),
            Kind::PushPop { pop: false, lr_pc: true, regs: RegisterList::R4 }
        );
        assert_eq!(
            decode_one(0xbd10, 0x0800_0000).kind(),
            Kind::PushPop { pop: true, lr_pc: true, regs: RegisterList::R4 }
        );
        assert_eq!(
            decode_one(0x4770, 0x0800_0000).kind(),
            Kind::HiRegOp { op: HiOp::Bx, rd: 0, rs: LR }
        );
        assert_eq!(decode_one(0x4801, 0x0800_0000).kind(), Kind::LdrPc { rd: 0, imm: 1 });
        assert_eq!(
            decode_one(0x2a05, 0x0800_0000).kind(),
            Kind::AluImm { op: ImmOp::Cmp, rd: 2, imm: 5 }
        );
        assert_eq!(
            decode_one(0x1840, 0x0800_0000).kind(),
            Kind::AddSub { sub: false, imm: false, rd: 0, rs: 0, operand: 1 }
        );
        assert_eq!(decode_one(0xdf04, 0x0800_0000).kind(), Kind::Swi { comment: 4 });
        assert_eq!(
            decode_one(0xc1fe, 0x0800_0000).kind(),
            Kind::LoadStoreMultiple {
                load: false,
                rb: 1,
                regs: RegisterList::from_bits_truncate(0xfe)
            }
        );
    }

    #[test]
    fn test_holes_decode_to_unknown() {
        assert_eq!(decode_one(0xde00, 0x0800_0000).kind(), Kind::Unknown { raw: 0xde00 });
        assert_eq!(decode_one(0xbe01, 0x0800_0000).kind(), Kind::Unknown { raw: 0xbe01 });
        assert_eq!(decode_one(0xb180, 0x0800_0000).kind(), Kind::Unknown { raw: 0xb180 });
    }

    #[test]
    fn test_decode_is_total() {
        // every 16-bit value either decodes (possibly to Unknown) or reports
        // an incomplete long-branch half; nothing panics
        for raw in 0..=0xffffu16 {
            let space = space_with_units(&[raw, 0xf800], 0x0800_0000);
            match decode(&space, 0) {
                Ok(_) => {}
                // the padding suffix pairs any prefix, so only a stray
                // suffix can come back incomplete here
                Err(DecodeError::Incomplete(_)) => assert_eq!(raw & 0xf800, 0xf800),
                Err(other) => panic!("unexpected error for 0x{:04x}: {}", raw, other),
            }
        }
    }
}
