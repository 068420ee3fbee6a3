//! Wrapper types for representing PowerPC instructions as bitfields.

pub mod ppc;

/// Sign-extend the low `bits` bits of `x`.
pub fn sign_extend(x: u32, bits: i32) -> i32 {
    if ((x as i32 >> (bits - 1)) & 1) != 0 {
        x as i32 | !0 << bits
    } else {
        x as i32
    }
}
