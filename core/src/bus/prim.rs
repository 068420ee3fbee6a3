
use std::mem;

/// Helper functions implemented on numeric primitives.
///
/// These let us easily convert between numeric primitives and big-endian
/// byte slices in guest memory.
pub trait AccessWidth: Sized + Copy {
    /// Width of an access in bytes.
    const WIDTH: usize;
    /// Decode a value from exactly `WIDTH` big-endian bytes.
    fn from_be_slice(data: &[u8]) -> Self;
    /// Encode a value into exactly `WIDTH` big-endian bytes.
    fn store_be(self, dst: &mut [u8]);
}

/// Macro to make implementing AccessWidth a bit less verbose.
macro_rules! impl_accesswidth {
    ($type:ident) => {
        impl AccessWidth for $type {
            const WIDTH: usize = mem::size_of::<$type>();
            fn from_be_slice(data: &[u8]) -> Self {
                let mut buf = [0u8; mem::size_of::<$type>()];
                buf.copy_from_slice(data);
                Self::from_be_bytes(buf)
            }
            fn store_be(self, dst: &mut [u8]) {
                dst.copy_from_slice(&self.to_be_bytes());
            }
        }
    };
}

// Implement AccessWidth for the supported numeric primitives.
impl_accesswidth!(u32);
impl_accesswidth!(u16);
impl_accesswidth!(u8);


/// The part of the memory map that some virtual address decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// One of the two aliased main RAM windows.
    Ram,
    /// The hardware-register window.
    HwReg,
    /// The Starlet (coprocessor) memory window.
    Starlet,
    /// Not part of any window; masked directly into RAM.
    Fallback,
}

/// The result of translating a virtual address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysAddr {
    /// Offset into the physical memory image.
    pub off: u32,
    /// The window this address was decoded from.
    pub region: Region,
}

/// Different kinds of I/O devices that are accessed without translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoDevice {
    /// Registers shared with the presentation, audio and input collaborators.
    Host,
}
