//! Decoding of virtual addresses onto the physical memory image.

use crate::bus::prim::*;
use crate::dev::*;

/// Translate a virtual address into an offset in the physical memory image.
///
/// This never fails. Addresses outside of every window are masked into RAM
/// and reported as [Region::Fallback].
pub fn translate(vaddr: u32) -> PhysAddr {
    let (off, region) = match vaddr {
        RAM_CACHED_BASE..=RAM_CACHED_TAIL => (vaddr & RAM_MASK, Region::Ram),
        RAM_UNCACHED_BASE..=RAM_UNCACHED_TAIL => (vaddr & RAM_MASK, Region::Ram),
        HWREG_BASE..=HWREG_TAIL => (HWREG_PHYS + (vaddr - HWREG_BASE), Region::HwReg),
        STARLET_BASE..=STARLET_TAIL => (STARLET_PHYS + (vaddr - STARLET_BASE), Region::Starlet),
        _ => (vaddr & RAM_MASK, Region::Fallback),
    };
    PhysAddr { off, region }
}

/// Decode an address onto a register-backed device, if any.
///
/// These are checked before translation, so they shadow whatever the
/// translator would have aliased them onto.
pub fn decode_io(vaddr: u32) -> Option<(IoDevice, usize)> {
    match vaddr {
        HOST_REG_BASE..=HOST_REG_TAIL => Some((IoDevice::Host, (vaddr - HOST_REG_BASE) as usize)),
        _ => None,
    }
}
