
pub mod prim;
pub mod decode;
pub mod mmio;

use crate::dev::ai::*;
use crate::dev::io::*;
use crate::dev::vi::*;
use crate::dev::*;
use crate::mem::*;
use crate::bus::prim::{PhysAddr, Region};

use log::{trace, warn};

use std::env::current_dir;
use std::path::PathBuf;

/// Implementation of an emulated bus.
///
/// In this model, the bus itself owns the memory image and the buffers
/// shared with the presentation and audio collaborators.
///
/// All accesses here return typed results. Callers decide what a fault
/// means; see [crate::machine::Machine::read32] for the lossy variants.
pub struct Bus {
    /// RAM, followed by the hardware-register and Starlet windows.
    pub mem: BigEndianMemory,

    /// Registers shared with the collaborators.
    pub host: HostRegisters,
    /// Presentation-side copy of the framebuffer.
    pub xfb: FrameMirror,
    /// Presentation-side audio buffer.
    pub audio: AudioBuffer,
}
impl Default for Bus {
    fn default() -> Self { Self::new() }
}
impl Bus {
    pub fn new() -> Self {
        Bus {
            mem: BigEndianMemory::new(IMAGE_SIZE as usize),
            host: HostRegisters::default(),
            xfb: FrameMirror::new(),
            audio: AudioBuffer::new(),
        }
    }

    pub fn try_read32(&self, vaddr: u32) -> Result<u32, MemoryFault> {
        if let Some((dev, off)) = decode::decode_io(vaddr & !3) {
            return Ok(self.do_mmio_read(dev, off));
        }
        let paddr = Self::translate(vaddr);
        self.mem.read::<u32>(paddr.off as usize)
    }

    pub fn try_write32(&mut self, vaddr: u32, val: u32) -> Result<(), MemoryFault> {
        if let Some((dev, off)) = decode::decode_io(vaddr & !3) {
            self.do_mmio_write(dev, off, val);
            return Ok(());
        }
        let paddr = Self::translate(vaddr);
        self.mem.write::<u32>(paddr.off as usize, val)?;
        self.sync_xfb(paddr.off);
        if paddr.off & 3 != 0 {
            self.sync_xfb(paddr.off.wrapping_add(3));
        }
        Ok(())
    }

    pub fn try_read8(&self, vaddr: u32) -> Result<u8, MemoryFault> {
        if let Some((dev, off)) = decode::decode_io(vaddr & !3) {
            let word = self.do_mmio_read(dev, off);
            return Ok(word.to_be_bytes()[(vaddr & 3) as usize]);
        }
        let paddr = Self::translate(vaddr);
        self.mem.read::<u8>(paddr.off as usize)
    }

    pub fn try_write8(&mut self, vaddr: u32, val: u8) -> Result<(), MemoryFault> {
        if let Some((dev, off)) = decode::decode_io(vaddr & !3) {
            let mut bytes = self.do_mmio_read(dev, off).to_be_bytes();
            bytes[(vaddr & 3) as usize] = val;
            self.do_mmio_write(dev, off, u32::from_be_bytes(bytes));
            return Ok(());
        }
        let paddr = Self::translate(vaddr);
        self.mem.write::<u8>(paddr.off as usize, val)?;
        self.sync_xfb(paddr.off);
        Ok(())
    }

    fn translate(vaddr: u32) -> PhysAddr {
        let paddr = decode::translate(vaddr);
        if paddr.region == Region::Fallback {
            trace!(target: "MEM", "{vaddr:08x} is outside every window, aliased to {:08x}", paddr.off);
        }
        paddr
    }

    /// Rebuild the whole framebuffer mirror from RAM.
    pub fn refresh_xfb(&mut self) {
        let mut fb = vec![0u8; FB_SIZE as usize];
        match self.mem.read_buf(FB_PHYS_BASE as usize, &mut fb) {
            Ok(()) => self.xfb.refresh_from(&fb),
            Err(e) => warn!(target: "MEM", "Couldn't refresh framebuffer mirror: {e}"),
        }
    }

    /// Refresh the framebuffer mirror after a write touching `off`.
    fn sync_xfb(&mut self, off: u32) {
        if (FB_PHYS_BASE..=FB_PHYS_TAIL).contains(&off) {
            let aligned = off & !3;
            if let Ok(word) = self.mem.read::<u32>(aligned as usize) {
                self.xfb.update(aligned - FB_PHYS_BASE, word);
            }
        }
    }

    /// Write the RAM and both reserved windows into the current directory.
    pub fn dump_memory(&self, suffix: &'static str) -> anyhow::Result<PathBuf> {
        let dir = current_dir()?;
        let regions = [
            ("ram", 0, RAM_SIZE),
            ("hwreg", HWREG_PHYS, WINDOW_SIZE),
            ("starlet", STARLET_PHYS, WINDOW_SIZE),
        ];
        for (name, off, len) in regions {
            let mut path = dir.clone();
            path.push(name);
            path.set_extension(suffix);
            self.mem.dump_range(&path, off as usize, len as usize)?;
        }
        Ok(dir)
    }
}
