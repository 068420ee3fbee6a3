//! Wrapper types for representing PowerPC instructions as bitfields.
//!
//! Field names follow the usual PowerPC forms. Bit 0 is the most
//! significant bit of the instruction word.

use super::sign_extend;

/// ['addi', 'addis', 'lwz', 'stw']
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct DFormBits(pub u32);
impl DFormBits {
    #[inline(always)]
    pub fn rd(&self) -> usize { ((self.0 >> 21) & 0x1f) as usize }
    #[inline(always)]
    pub fn rs(&self) -> usize { self.rd() }
    #[inline(always)]
    pub fn ra(&self) -> usize { ((self.0 >> 16) & 0x1f) as usize }
    /// The signed 16-bit immediate (also the displacement `d`).
    #[inline(always)]
    pub fn simm(&self) -> i32 { (self.0 & 0xffff) as u16 as i16 as i32 }
}

/// ['add', 'subf', 'cmp', 'sync', 'eieio', 'isync', 'rfi']
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct XFormBits(pub u32);
impl XFormBits {
    #[inline(always)]
    pub fn rd(&self) -> usize { ((self.0 >> 21) & 0x1f) as usize }
    #[inline(always)]
    pub fn crfd(&self) -> u32 { (self.0 >> 23) & 0x7 }
    #[inline(always)]
    pub fn ra(&self) -> usize { ((self.0 >> 16) & 0x1f) as usize }
    #[inline(always)]
    pub fn rb(&self) -> usize { ((self.0 >> 11) & 0x1f) as usize }
    #[inline(always)]
    pub fn xo(&self) -> u32 { (self.0 >> 1) & 0x3ff }
}

/// ['ps_add', 'ps_sub', 'ps_mul']
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct AFormBits(pub u32);
impl AFormBits {
    #[inline(always)]
    pub fn frd(&self) -> usize { ((self.0 >> 21) & 0x1f) as usize }
    #[inline(always)]
    pub fn fra(&self) -> usize { ((self.0 >> 16) & 0x1f) as usize }
    #[inline(always)]
    pub fn frb(&self) -> usize { ((self.0 >> 11) & 0x1f) as usize }
    #[inline(always)]
    pub fn frc(&self) -> usize { ((self.0 >> 6) & 0x1f) as usize }
    #[inline(always)]
    pub fn xo(&self) -> u32 { (self.0 >> 1) & 0x1f }
}

/// ['b']
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct IFormBits(pub u32);
impl IFormBits {
    /// The word-aligned, sign-extended 26-bit displacement.
    #[inline(always)]
    pub fn li(&self) -> i32 { sign_extend(self.0 & 0x03ff_fffc, 26) }
    #[inline(always)]
    pub fn aa(&self) -> bool { (self.0 & 0b10) != 0 }
    #[inline(always)]
    pub fn lk(&self) -> bool { (self.0 & 0b01) != 0 }
}

/// ['bc']
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct BFormBits(pub u32);
impl BFormBits {
    #[inline(always)]
    pub fn bo(&self) -> u32 { (self.0 >> 21) & 0x1f }
    #[inline(always)]
    pub fn bi(&self) -> u32 { (self.0 >> 16) & 0x1f }
    #[inline(always)]
    pub fn bd(&self) -> i32 { (self.0 & 0xfffc) as u16 as i16 as i32 }
    #[inline(always)]
    pub fn aa(&self) -> bool { (self.0 & 0b10) != 0 }
    #[inline(always)]
    pub fn lk(&self) -> bool { (self.0 & 0b01) != 0 }
}
