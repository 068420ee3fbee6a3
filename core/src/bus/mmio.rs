
use log::warn;

use crate::bus::*;
use crate::bus::prim::*;

/// Interface used by the bus to perform some access on an I/O device.
///
/// All of these devices are word-wide. Narrower accesses are merged by the
/// bus before they get here.
pub trait MmioDevice {
    /// Handle a read, returning some result.
    fn read(&self, off: usize) -> u32;
    /// Handle a write.
    fn write(&mut self, off: usize, val: u32);
}

impl Bus {
    /// Dispatch a read access to some memory-mapped I/O device.
    pub fn do_mmio_read(&self, dev: IoDevice, off: usize) -> u32 {
        match dev {
            IoDevice::Host => self.host.read(off),
        }
    }

    /// Dispatch a write access to some memory-mapped I/O device.
    pub fn do_mmio_write(&mut self, dev: IoDevice, off: usize, val: u32) {
        match dev {
            IoDevice::Host => self.host.write(off, val),
        }
    }
}

/// Fallback for accesses that decode into a device but match no register.
pub(crate) fn unhandled(dev: &str, off: usize, val: Option<u32>) -> u32 {
    match val {
        Some(val) => warn!(target: "MMIO", "{dev} unhandled write {val:08x} at {off:x}"),
        None => warn!(target: "MMIO", "{dev} unhandled read at {off:x}"),
    }
    0
}
