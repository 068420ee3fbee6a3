
use crate::bits::ppc::*;
use crate::interp::dispatch::DispatchRes;
use wiimu_core::machine::Machine;

/// Value of `rA`, or zero when the field selects r0.
#[inline(always)]
pub fn ra_or_zero(m: &Machine, ra: usize) -> u32 {
    if ra == 0 { 0 } else { m.reg.gpr[ra] }
}

pub fn add(m: &mut Machine, op: XFormBits) -> DispatchRes {
    m.reg.gpr[op.rd()] = m.reg.gpr[op.ra()].wrapping_add(m.reg.gpr[op.rb()]);
    DispatchRes::RetireOk
}

pub fn subf(m: &mut Machine, op: XFormBits) -> DispatchRes {
    m.reg.gpr[op.rd()] = m.reg.gpr[op.rb()].wrapping_sub(m.reg.gpr[op.ra()]);
    DispatchRes::RetireOk
}

pub fn addi(m: &mut Machine, op: DFormBits) -> DispatchRes {
    m.reg.gpr[op.rd()] = ra_or_zero(m, op.ra()).wrapping_add(op.simm() as u32);
    DispatchRes::RetireOk
}

pub fn addis(m: &mut Machine, op: DFormBits) -> DispatchRes {
    m.reg.gpr[op.rd()] = ra_or_zero(m, op.ra()).wrapping_add((op.simm() as u32) << 16);
    DispatchRes::RetireOk
}

/// Signed word comparison into a condition register field.
pub fn cmp(m: &mut Machine, op: XFormBits) -> DispatchRes {
    let a = m.reg.gpr[op.ra()] as i32;
    let b = m.reg.gpr[op.rb()] as i32;
    let field = match a.cmp(&b) {
        std::cmp::Ordering::Less    => 0x8,
        std::cmp::Ordering::Greater => 0x4,
        std::cmp::Ordering::Equal   => 0x2,
    };
    m.reg.set_cr_field(op.crfd(), field);
    DispatchRes::RetireOk
}
