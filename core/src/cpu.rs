
/// The register file.
pub mod reg;
/// Interrupt vectors and the trigger/return logic.
pub mod excep;
/// Guest-facing memory accesses.
pub mod mmu;

use crate::cpu::excep::InterruptKind;

/// Why the CPU stopped executing instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// The machine was already stopped before this step.
    NotRunning,
    /// A halt instruction was executed.
    Halted,
    /// An unimplemented instruction was decoded at `pc`.
    UnknownOpcode { pc: u32, word: u32 },
    /// The guest requested an exit through a system call.
    Exit,
}

/// Result of stepping the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuRes {
    StepOk,
    /// The step ended by entering an interrupt handler.
    StepException(InterruptKind),
    /// A system call was handled by the host.
    Syscall(u32),
    HaltEmulation(HaltReason),
}
