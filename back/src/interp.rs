//! The interpreter backend.

pub mod dispatch;
pub mod lut;

pub mod alu;
pub mod branch;
pub mod loadstore;
pub mod misc;
pub mod paired;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, trace, warn};

use crate::back::*;
use crate::decode::ppc::*;
use crate::host::*;
use crate::interp::dispatch::DispatchRes;
use crate::syscall::*;

use wiimu_core::cpu::{CpuRes, HaltReason};
use wiimu_core::cpu::excep::InterruptKind;
use wiimu_core::machine::{Machine, UnknownOpcodePolicy};

/// Options for the interpreter which don't affect the machine itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct BackendConfig {
    /// Service system calls on the host when a handler is registered.
    pub hle_syscalls: bool,
    /// Log every instruction along with the register file.
    pub trace: bool,
    /// Stop after this many steps.
    pub max_steps: Option<u64>,
}

/// Backend for interpreting-style emulation.
///
/// Each step of the main loop works like this:
///
/// - Fetch/decode/dispatch an instruction, mutating the machine state
/// - Poll the Starlet mailbox, which may raise an interrupt
/// - Every `present_interval` steps, publish presentation state to the
///   host link and latch the input state from it
pub struct InterpBackend {
    pub machine: Machine,
    pub cfg: BackendConfig,
    pub syscalls: SyscallTable,

    /// State shared with the collaborators.
    pub host: HostLink,
    /// Raised by someone else when we should stop.
    pub quit: Arc<AtomicBool>,

    /// Number of steps taken by [Backend::run].
    pub steps: u64,
}
impl InterpBackend {
    pub fn new(machine: Machine, cfg: BackendConfig, host: HostLink, quit: Arc<AtomicBool>) -> Self {
        InterpBackend {
            machine,
            cfg,
            syscalls: SyscallTable::with_builtins(),
            host,
            quit,
            steps: 0,
        }
    }
}

impl InterpBackend {
    /// Write the current instruction to the log.
    fn dbg_print(&self, word: u32) {
        let pc = self.machine.reg.pc;
        trace!(target: "CPU", "{pc:08x}: ({word:08x}) {:24} {}", disassemble(word, pc), self.machine.reg);
    }

    /// Publish presentation state and pick up the latest input.
    pub fn present(&mut self) {
        let mut host = self.host.write();
        host.publish(&mut self.machine.bus);
        self.machine.bus.host.set_input_state(host.input_state);
    }

    /// Try to handle a system call on the host. Returns [None] when the
    /// call should be taken as an interrupt instead.
    fn try_hle_syscall(&mut self) -> Option<CpuRes> {
        if !self.cfg.hle_syscalls {
            return None;
        }
        let num = self.machine.reg.gpr[0];
        let func = self.syscalls.get(num)?;
        self.machine.reg.pc = self.machine.reg.pc.wrapping_add(4);
        match func(&mut self.machine) {
            SyscallRes::Continue => Some(CpuRes::Syscall(num)),
            SyscallRes::Exit => {
                self.machine.reg.running = false;
                Some(CpuRes::HaltEmulation(HaltReason::Exit))
            },
        }
    }

    /// Do a single step of the CPU.
    pub fn cpu_step(&mut self) -> CpuRes {
        if !self.machine.reg.running {
            return CpuRes::HaltEmulation(HaltReason::NotRunning);
        }

        let pc = self.machine.reg.pc;
        let word = self.machine.read32(pc);
        if self.cfg.trace {
            self.dbg_print(word);
        }
        let func = lut::lookup(PpcInst::decode(word));
        let disp_res = func.0(&mut self.machine, word);
        self.machine.reg.cycle += 1;

        // Depending on the instruction, adjust the program counter
        match disp_res {
            DispatchRes::RetireOk => {
                self.machine.reg.pc = pc.wrapping_add(4);
                CpuRes::StepOk
            },
            DispatchRes::RetireBranch => CpuRes::StepOk,

            DispatchRes::Exception(e) => {
                if e == InterruptKind::SystemCall {
                    if let Some(res) = self.try_hle_syscall() {
                        return res;
                    }
                    // The handler resumes after the trap.
                    self.machine.reg.pc = pc.wrapping_add(4);
                }
                if self.machine.trigger_kind(e) {
                    CpuRes::StepException(e)
                } else {
                    CpuRes::StepOk
                }
            },

            DispatchRes::Halt => {
                self.machine.reg.running = false;
                CpuRes::HaltEmulation(HaltReason::Halted)
            },

            DispatchRes::Unimplemented(word) => match self.machine.cfg.unknown_opcode {
                UnknownOpcodePolicy::Halt => {
                    self.machine.reg.running = false;
                    CpuRes::HaltEmulation(HaltReason::UnknownOpcode { pc, word })
                },
                UnknownOpcodePolicy::Skip => {
                    warn!(target: "CPU", "Skipping unimplemented instruction {word:08x} at {pc:08x}");
                    self.machine.reg.pc = pc.wrapping_add(4);
                    CpuRes::StepOk
                },
            },
        }
    }

    /// Step the CPU, then give the Starlet a chance to handle a command.
    ///
    /// The mailbox is left alone once the machine has stopped.
    pub fn step(&mut self) -> CpuRes {
        let res = self.cpu_step();
        if let CpuRes::HaltEmulation(_) = res {
            return res;
        }
        self.machine.handle_step_starlet();
        res
    }
}

impl Backend for InterpBackend {
    fn run(&mut self) -> anyhow::Result<()> {
        let interval = self.machine.cfg.present_interval.max(1);
        self.present();
        loop {
            if self.quit.load(Ordering::Relaxed) {
                info!(target: "Other", "Quit requested after {} steps", self.steps);
                break;
            }
            if self.cfg.max_steps.is_some_and(|max| self.steps >= max) {
                info!(target: "Other", "Reached step limit ({})", self.steps);
                break;
            }

            let res = self.step();
            if let CpuRes::HaltEmulation(reason) = res {
                match reason {
                    HaltReason::UnknownOpcode { pc, word } => {
                        warn!(target: "CPU", "Unimplemented instruction {word:08x} at {pc:08x}");
                    },
                    reason => info!(target: "CPU", "CPU halted: {reason:?}"),
                }
                info!(target: "CPU", "{:?}", self.machine.reg);
                break;
            }
            self.steps += 1;
            if self.steps % interval == 0 {
                self.present();
            }
        }

        self.present();
        self.host.write().halted = true;
        info!(target: "Other", "CPU stopped at pc={:08x} after {} cycles",
            self.machine.reg.pc, self.machine.reg.cycle);
        Ok(())
    }
}
