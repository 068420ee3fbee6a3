//! Interrupt vectors, and entering/leaving interrupt handlers.

use fxhash::FxHashMap;
use log::{debug, trace};
use strum::{Display, EnumIter, FromRepr, IntoEnumIterator};

use crate::cpu::reg::Spr;
use crate::dev::*;
use crate::machine::Machine;

/// Encoding of `rfi`, which is installed at every vector.
pub const RFI_STUB: u32 = 0x4c00_0064;

/// Interrupt raised by the Starlet when it completes a command.
pub const COPROCESSOR_IRQ: InterruptKind = InterruptKind::MachineCheck;

/// Different types of interrupts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, FromRepr, Display)]
#[repr(u32)]
pub enum InterruptKind {
    SystemReset = 0,
    MachineCheck = 1,
    Dsi = 2,
    Isi = 3,
    External = 4,
    Alignment = 5,
    Program = 6,
    FloatingPoint = 7,
    Decrementer = 8,
    SystemCall = 9,
    Trace = 10,
    PerformanceMonitor = 11,
}
impl InterruptKind {
    pub fn as_u32(self) -> u32 { self as u32 }
}

/// Map from interrupt types to handler addresses.
pub struct VectorTable {
    base: u32,
    map: FxHashMap<u32, u32>,
}
impl VectorTable {
    /// A table with one entry for every [InterruptKind], spaced
    /// [INTERRUPT_VECTOR_STRIDE] bytes apart starting at `base`.
    pub fn new(base: u32) -> Self {
        let map = InterruptKind::iter()
            .map(|k| (k.as_u32(), base + k.as_u32() * INTERRUPT_VECTOR_STRIDE))
            .collect();
        Self { base, map }
    }

    /// Handler address for some interrupt type. Unmapped types use the base
    /// of the table.
    pub fn lookup(&self, ty: u32) -> u32 {
        self.map.get(&ty).copied().unwrap_or(self.base)
    }

    pub fn len(&self) -> usize { self.map.len() }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.map.iter().map(|(k, v)| (*k, *v))
    }
}

impl Machine {
    /// Write the `rfi` stub at every vector in the table.
    pub fn install_vectors(&mut self) {
        let vectors: Vec<(u32, u32)> = self.vectors.iter().collect();
        for (ty, addr) in vectors {
            self.write32(addr, RFI_STUB);
            trace!(target: "IRQ", "Vector {ty} at {addr:08x}");
        }
        debug!(target: "IRQ", "Installed {} interrupt vectors", self.vectors.len());
    }

    /// Take an interrupt, if interrupts are armed.
    ///
    /// Returns whether the interrupt was taken.
    pub fn trigger(&mut self, ty: u32) -> bool {
        if !self.reg.irq_enabled {
            trace!(target: "IRQ", "Dropped interrupt {ty} (disarmed) at pc={:08x}", self.reg.pc);
            return false;
        }
        let target = self.vectors.lookup(ty);
        match InterruptKind::from_repr(ty) {
            Some(kind) => debug!(target: "IRQ", "{kind} from pc={:08x} to {target:08x}", self.reg.pc),
            None => debug!(target: "IRQ", "Unknown interrupt {ty} from pc={:08x} to {target:08x}", self.reg.pc),
        }
        self.reg[Spr::Lr] = self.reg.pc;
        self.reg[Spr::Srr1] = self.reg.kernel_mode as u32;
        self.reg.pc = target;
        self.reg.irq_enabled = false;
        self.reg.kernel_mode = true;
        true
    }

    pub fn trigger_kind(&mut self, kind: InterruptKind) -> bool {
        self.trigger(kind.as_u32())
    }

    /// Leave an interrupt handler.
    pub fn return_from_interrupt(&mut self) {
        self.reg.pc = self.reg[Spr::Lr];
        self.reg.irq_enabled = true;
        self.reg.kernel_mode = self.reg[Spr::Srr1] & 1 != 0;
        trace!(target: "IRQ", "Return to {:08x}", self.reg.pc);
    }
}
