
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use log::debug;
use thiserror::Error;

use crate::bus::prim::AccessWidth;

/// A failed access on some memory device.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryFault {
    #[error("out-of-bounds {width}-byte access at offset {off:#x} (memory is {len:#x} bytes)")]
    OutOfBounds { off: usize, width: usize, len: usize },
}

/// An abstract, generic memory device.
pub struct BigEndianMemory {
    /// Vector of bytes with the contents of this memory device.
    pub data: Vec<u8>,
    /// Hash of the data most recently loaded into this device.
    hash: u32,
}
impl BigEndianMemory {
    pub fn new(len: usize) -> Self {
        BigEndianMemory { data: vec![0u8; len], hash: crc32fast::hash(&[]) }
    }

    /// Clear this device, then fill it from offset 0 with the contents of
    /// some byte stream (up to the capacity of the device).
    ///
    /// Returns the number of bytes loaded. Anything in the stream past the
    /// end of the device is ignored.
    pub fn load(&mut self, src: &mut impl Read) -> anyhow::Result<usize> {
        self.data.fill(0);
        let mut filled = 0;
        while filled < self.data.len() {
            let res = src.read(&mut self.data[filled..])
                .context(format!("BigEndianMemory: read failed after {filled:#x} bytes"))?;
            if res == 0 {
                break;
            }
            filled += res;
        }
        self.hash = crc32fast::hash(&self.data[..filled]);
        debug!(target: "MEM", "Loaded {filled:#x} bytes, crc32={:08x}", self.hash);
        Ok(filled)
    }

    /// CRC32 of the bytes loaded by the last call to [BigEndianMemory::load].
    pub fn hash(&self) -> u32 { self.hash }

    /// Write some region of this device to a file.
    pub fn dump_range(&self, filename: &impl AsRef<Path>, off: usize, len: usize)
        -> anyhow::Result<()>
    {
        let filename = filename.as_ref();
        let src = self.data.get(off..off.saturating_add(len))
            .with_context(|| format!("BigEndianMemory: dump range {off:x}+{len:x} is out of bounds"))?;
        let mut f = File::create(filename).context(format!("BigEndianMemory: Couldn't create dump file: {}", filename.to_string_lossy()))?;
        f.write_all(src)?;
        debug!(target: "MEM", "Dumped {len:#x} bytes to {}", filename.display());
        Ok(())
    }

    fn check(&self, off: usize, width: usize) -> Result<(), MemoryFault> {
        match off.checked_add(width) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(MemoryFault::OutOfBounds { off, width, len: self.data.len() }),
        }
    }
}

impl fmt::Debug for BigEndianMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BigEndianMemory")
            .field("len", &self.data.len())
            .field("hash", &format_args!("{:08x}", self.hash))
            .finish()
    }
}

/// Generic reads and writes.
impl BigEndianMemory {
    pub fn read<T: AccessWidth>(&self, off: usize) -> Result<T, MemoryFault> {
        self.check(off, T::WIDTH)?;
        Ok(T::from_be_slice(&self.data[off..off + T::WIDTH]))
    }
    pub fn write<T: AccessWidth>(&mut self, off: usize, val: T) -> Result<(), MemoryFault> {
        self.check(off, T::WIDTH)?;
        val.store_be(&mut self.data[off..off + T::WIDTH]);
        Ok(())
    }
}

/// Bulk reads and writes.
impl BigEndianMemory {
    pub fn read_buf(&self, off: usize, dst: &mut [u8]) -> Result<(), MemoryFault> {
        self.check(off, dst.len())?;
        dst.copy_from_slice(&self.data[off..off + dst.len()]);
        Ok(())
    }
    pub fn write_buf(&mut self, off: usize, src: &[u8]) -> Result<(), MemoryFault> {
        self.check(off, src.len())?;
        self.data[off..off + src.len()].copy_from_slice(src);
        Ok(())
    }
}
