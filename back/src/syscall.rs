//! System calls handled by the host instead of the guest.
//!
//! The system call number is taken from r0. Arguments are passed in r3
//! and up.

use fxhash::FxHashMap;
use log::info;

use wiimu_core::machine::Machine;

/// Longest string accepted by the print call.
pub const PRINT_MAX_LEN: usize = 256;

pub const SYS_PRINT: u32 = 1;
pub const SYS_EXIT: u32 = 2;

/// What to do after a host-handled system call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallRes {
    /// Resume at the instruction after `sc`.
    Continue,
    /// Stop the machine.
    Exit,
}

pub type SyscallFn = fn(&mut Machine) -> SyscallRes;

/// Map from system call numbers to host handlers.
#[derive(Default)]
pub struct SyscallTable {
    map: FxHashMap<u32, SyscallFn>,
}
impl SyscallTable {
    pub fn new() -> Self { Self::default() }

    /// A table with the print and exit calls.
    pub fn with_builtins() -> Self {
        let mut res = Self::new();
        res.register(SYS_PRINT, sys_print);
        res.register(SYS_EXIT, sys_exit);
        res
    }

    pub fn register(&mut self, num: u32, f: SyscallFn) {
        self.map.insert(num, f);
    }

    pub fn get(&self, num: u32) -> Option<SyscallFn> {
        self.map.get(&num).copied()
    }
}

/// Print the NUL-terminated string at r3.
fn sys_print(m: &mut Machine) -> SyscallRes {
    let addr = m.reg.gpr[3];
    let bytes: Vec<u8> = (0..PRINT_MAX_LEN as u32)
        .map(|i| m.read8(addr.wrapping_add(i)))
        .take_while(|&b| b != 0)
        .collect();
    info!(target: "SYSCALL", "{}", String::from_utf8_lossy(&bytes));
    SyscallRes::Continue
}

fn sys_exit(m: &mut Machine) -> SyscallRes {
    info!(target: "SYSCALL", "Exit requested at pc={:08x}", m.reg.pc);
    SyscallRes::Exit
}
