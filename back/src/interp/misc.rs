
use crate::interp::dispatch::DispatchRes;
use wiimu_core::cpu::excep::InterruptKind;
use wiimu_core::machine::Machine;

/// System call. The backend decides whether this is handled by the host or
/// taken as an interrupt.
pub fn sc() -> DispatchRes {
    DispatchRes::Exception(InterruptKind::SystemCall)
}

pub fn rfi(m: &mut Machine) -> DispatchRes {
    m.return_from_interrupt();
    DispatchRes::RetireBranch
}

/// `sync`, `isync` and `eieio`. There is nothing to order here.
pub fn barrier() -> DispatchRes {
    DispatchRes::RetireOk
}
