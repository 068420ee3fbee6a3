//! The table mapping decoded instructions onto handler functions.

use crate::bits::ppc::*;
use crate::decode::ppc::PpcInst;
use crate::interp::dispatch::*;
use crate::interp::{alu, branch, loadstore, misc, paired};

/// Return the handler for some decoded instruction.
pub fn lookup(inst: PpcInst) -> PpcFn {
    use PpcInst::*;
    match inst {
        Halt   => PpcFn(|_, _| DispatchRes::Halt),

        Add    => PpcFn(|m, w| alu::add(m, XFormBits(w))),
        Subf   => PpcFn(|m, w| alu::subf(m, XFormBits(w))),
        Addi   => PpcFn(|m, w| alu::addi(m, DFormBits(w))),
        Addis  => PpcFn(|m, w| alu::addis(m, DFormBits(w))),
        Cmp    => PpcFn(|m, w| alu::cmp(m, XFormBits(w))),

        PsAdd  => PpcFn(|m, w| paired::ps_add(m, AFormBits(w))),
        PsSub  => PpcFn(|m, w| paired::ps_sub(m, AFormBits(w))),
        PsMul  => PpcFn(|m, w| paired::ps_mul(m, AFormBits(w))),

        B      => PpcFn(|m, w| branch::b(m, IFormBits(w))),
        Bc     => PpcFn(|m, w| branch::bc(m, BFormBits(w))),

        Lwz    => PpcFn(|m, w| loadstore::lwz(m, DFormBits(w))),
        Stw    => PpcFn(|m, w| loadstore::stw(m, DFormBits(w))),

        Sc     => PpcFn(|_, _| misc::sc()),
        Rfi    => PpcFn(|m, _| misc::rfi(m)),
        Sync | Isync | Eieio => PpcFn(|_, _| misc::barrier()),

        Unimpl => PpcFn(|_, w| DispatchRes::Unimplemented(w)),
    }
}
