
use crate::bits::ppc::*;
use crate::interp::alu::ra_or_zero;
use crate::interp::dispatch::DispatchRes;
use wiimu_core::machine::Machine;

#[inline(always)]
fn effective_addr(m: &Machine, op: DFormBits) -> u32 {
    ra_or_zero(m, op.ra()).wrapping_add(op.simm() as u32)
}

pub fn lwz(m: &mut Machine, op: DFormBits) -> DispatchRes {
    let addr = effective_addr(m, op);
    m.reg.gpr[op.rd()] = m.read32(addr);
    DispatchRes::RetireOk
}

pub fn stw(m: &mut Machine, op: DFormBits) -> DispatchRes {
    let addr = effective_addr(m, op);
    let val = m.reg.gpr[op.rs()];
    m.write32(addr, val);
    DispatchRes::RetireOk
}
