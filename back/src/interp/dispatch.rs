//! Types used for dispatching instructions to handler functions.

use wiimu_core::cpu::excep::InterruptKind;
use wiimu_core::machine::Machine;

/// Result of dispatching an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchRes {
    /// The instruction retired; the program counter should be incremented.
    RetireOk,
    /// The instruction set the program counter itself.
    RetireBranch,
    /// The instruction raises some interrupt. The program counter has not
    /// been advanced yet.
    Exception(InterruptKind),
    /// The instruction stops the machine.
    Halt,
    /// This encoding isn't implemented.
    Unimplemented(u32),
}

/// A function pointer to an instruction handler.
#[derive(Clone, Copy)]
pub struct PpcFn(pub fn(&mut Machine, u32) -> DispatchRes);
