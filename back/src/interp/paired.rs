//! Paired-single arithmetic. Both lanes are computed independently.

use crate::bits::ppc::*;
use crate::interp::dispatch::DispatchRes;
use wiimu_core::machine::Machine;

pub fn ps_add(m: &mut Machine, op: AFormBits) -> DispatchRes {
    m.reg.fpr[op.frd()] = m.reg.fpr[op.fra()].zip_with(m.reg.fpr[op.frb()], |a, b| a + b);
    DispatchRes::RetireOk
}

pub fn ps_sub(m: &mut Machine, op: AFormBits) -> DispatchRes {
    m.reg.fpr[op.frd()] = m.reg.fpr[op.fra()].zip_with(m.reg.fpr[op.frb()], |a, b| a - b);
    DispatchRes::RetireOk
}

pub fn ps_mul(m: &mut Machine, op: AFormBits) -> DispatchRes {
    m.reg.fpr[op.frd()] = m.reg.fpr[op.fra()].zip_with(m.reg.fpr[op.frc()], |a, c| a * c);
    DispatchRes::RetireOk
}
