
use crate::bits::ppc::*;
use crate::interp::dispatch::DispatchRes;
use wiimu_core::cpu::reg::Spr;
use wiimu_core::machine::Machine;

fn branch_target(pc: u32, disp: i32, absolute: bool) -> u32 {
    if absolute { disp as u32 } else { pc.wrapping_add(disp as u32) }
}

pub fn b(m: &mut Machine, op: IFormBits) -> DispatchRes {
    let pc = m.reg.pc;
    if op.lk() {
        m.reg[Spr::Lr] = pc.wrapping_add(4);
    }
    m.reg.pc = branch_target(pc, op.li(), op.aa());
    DispatchRes::RetireBranch
}

/// Conditional branch on a single condition register bit.
///
/// Forms which decrement the count register are not implemented.
pub fn bc(m: &mut Machine, op: BFormBits) -> DispatchRes {
    let bo = op.bo();
    if bo & 0x04 == 0 {
        return DispatchRes::Unimplemented(op.0);
    }
    let taken = if bo & 0x10 != 0 {
        true
    } else if bo & 0x08 != 0 {
        m.reg.cr_bit(op.bi())
    } else {
        !m.reg.cr_bit(op.bi())
    };

    let pc = m.reg.pc;
    if op.lk() {
        m.reg[Spr::Lr] = pc.wrapping_add(4);
    }
    if taken {
        m.reg.pc = branch_target(pc, op.bd(), op.aa());
        DispatchRes::RetireBranch
    } else {
        DispatchRes::RetireOk
    }
}
