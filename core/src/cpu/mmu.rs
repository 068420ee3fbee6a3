//! Guest-facing memory accesses.
//!
//! These never fail: a faulted read returns zero and a faulted write is
//! dropped. Both are logged with the program counter at the time.

use log::warn;

use crate::machine::Machine;

impl Machine {
    pub fn read32(&self, addr: u32) -> u32 {
        self.bus.try_read32(addr).unwrap_or_else(|e| {
            warn!(target: "MEM", "read32 {addr:08x} (pc={:08x}): {e}", self.reg.pc);
            0
        })
    }
    pub fn read8(&self, addr: u32) -> u8 {
        self.bus.try_read8(addr).unwrap_or_else(|e| {
            warn!(target: "MEM", "read8 {addr:08x} (pc={:08x}): {e}", self.reg.pc);
            0
        })
    }

    pub fn write32(&mut self, addr: u32, val: u32) {
        if let Err(e) = self.bus.try_write32(addr, val) {
            warn!(target: "MEM", "write32 {addr:08x}={val:08x} (pc={:08x}): {e}", self.reg.pc);
        }
    }
    pub fn write8(&mut self, addr: u32, val: u8) {
        if let Err(e) = self.bus.try_write8(addr, val) {
            warn!(target: "MEM", "write8 {addr:08x}={val:02x} (pc={:08x}): {e}", self.reg.pc);
        }
    }
}
