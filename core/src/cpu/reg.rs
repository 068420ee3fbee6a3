//! Types representing the guest CPU's register file.

use std::fmt;
use std::ops::{Index, IndexMut};

use bincode::{Decode, Encode};

/// Number of special-purpose register slots.
pub const NUM_SPR: usize = 1024;

/// Special-purpose registers with a fixed slot in [RegisterFile::spr].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Spr {
    /// Condition register.
    Cr   = 0,
    /// Link register.
    Lr   = 8,
    /// Privilege level saved across an interrupt.
    Srr1 = 27,
}

/// A paired-single floating-point register.
#[derive(Debug, Default, Clone, Copy, PartialEq, Encode, Decode)]
pub struct PairedSingle {
    pub ps0: f32,
    pub ps1: f32,
}
impl PairedSingle {
    /// Apply some operation to both lanes independently.
    #[inline(always)]
    pub fn zip_with(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self { ps0: f(self.ps0, other.ps0), ps1: f(self.ps1, other.ps1) }
    }
}

/// The complete architectural state of the guest CPU.
#[derive(Clone, PartialEq, Encode, Decode)]
pub struct RegisterFile {
    pub pc: u32,
    pub gpr: [u32; 32],
    pub fpr: [PairedSingle; 32],
    pub spr: [u32; NUM_SPR],

    /// Cleared when the machine stops executing instructions.
    pub running: bool,
    /// Whether interrupts are currently armed.
    pub irq_enabled: bool,
    pub kernel_mode: bool,

    /// Number of executed steps.
    pub cycle: u64,
}
impl RegisterFile {
    /// Power-on state with the program counter at `entry`.
    pub fn new(entry: u32) -> Self {
        RegisterFile {
            pc: entry,
            gpr: [0; 32],
            fpr: [PairedSingle::default(); 32],
            spr: [0; NUM_SPR],
            running: true,
            irq_enabled: false,
            kernel_mode: true,
            cycle: 0,
        }
    }

    /// Read the 4-bit field `crf` of the condition register.
    pub fn cr_field(&self, crf: u32) -> u32 {
        let shift = 28 - (crf & 7) * 4;
        (self[Spr::Cr] >> shift) & 0xf
    }

    /// Replace the 4-bit field `crf` of the condition register.
    pub fn set_cr_field(&mut self, crf: u32, val: u32) {
        let shift = 28 - (crf & 7) * 4;
        let cr = self[Spr::Cr] & !(0xf << shift);
        self[Spr::Cr] = cr | ((val & 0xf) << shift);
    }

    /// Test bit `bi` of the condition register (bit 0 is the MSB).
    pub fn cr_bit(&self, bi: u32) -> bool {
        self[Spr::Cr] & (0x8000_0000 >> (bi & 0x1f)) != 0
    }
}

impl Index<Spr> for RegisterFile {
    type Output = u32;
    fn index(&self, idx: Spr) -> &u32 { &self.spr[idx as usize] }
}
impl IndexMut<Spr> for RegisterFile {
    fn index_mut(&mut self, idx: Spr) -> &mut u32 { &mut self.spr[idx as usize] }
}

impl fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterFile")
            .field("pc", &format_args!("{:08x}", self.pc))
            .field("lr", &format_args!("{:08x}", self[Spr::Lr]))
            .field("cr", &format_args!("{:08x}", self[Spr::Cr]))
            .field("running", &self.running)
            .field("irq_enabled", &self.irq_enabled)
            .field("kernel_mode", &self.kernel_mode)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pc={:08x} lr={:08x} cr={:08x} cycle={}",
            self.pc, self[Spr::Lr], self[Spr::Cr], self.cycle)?;
        for (row, regs) in self.gpr.chunks(8).enumerate() {
            for (col, val) in regs.iter().enumerate() {
                write!(f, "r{:<2}={val:08x} ", row * 8 + col)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
