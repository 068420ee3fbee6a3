//! Saving and restoring complete machine state.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use anyhow::{bail, Context};
use bincode::{config, Decode, Encode};
use log::debug;

use crate::cpu::reg::RegisterFile;
use crate::dev::io::HostRegisters;
use crate::dev::*;
use crate::machine::Machine;

/// Complete state of a [Machine], minus its configuration.
#[derive(Encode, Decode, PartialEq, Clone)]
pub struct Snapshot {
    pub registers: RegisterFile,
    pub host: HostRegisters,
    /// The whole memory image, including the Starlet mailbox.
    pub memory: Vec<u8>,
}

impl Snapshot {
    pub fn capture(m: &Machine) -> Self {
        Snapshot {
            registers: m.reg.clone(),
            host: m.bus.host,
            memory: m.bus.mem.data.clone(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        use lz4_flex::frame::*;
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("Couldn't open snapshot {}", path.display()))?;
        let mut bytes: Vec<u8> = Vec::new();
        FrameDecoder::new(f).read_to_end(&mut bytes)
            .context("Couldn't decompress snapshot")?;
        let (res, _): (Snapshot, usize) = bincode::decode_from_slice(&bytes, config::standard())
            .context("Couldn't decode snapshot")?;
        if res.memory.len() != IMAGE_SIZE as usize {
            bail!("Snapshot memory is {:#x} bytes, expected {:#x}", res.memory.len(), IMAGE_SIZE);
        }
        debug!(target: "SNAPSHOT", "decoded snapshot: pc={:08x} cycle={}", res.registers.pc, res.registers.cycle);
        Ok(res)
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        use lz4_flex::frame::*;
        let path = path.as_ref();
        let bytes = bincode::encode_to_vec(self, config::standard())?;
        let mut file = File::create(path)
            .with_context(|| format!("Couldn't create snapshot {}", path.display()))?;
        let mut writer = BufWriter::new(&mut file);
        let mut encoder = FrameEncoder::new(&mut writer);
        encoder.write_all(&bytes)?;
        encoder.finish()?;
        drop(writer);
        file.flush()?;
        let real_size = bytes.len() as f64;
        let written = file.metadata()?.len() as f64;
        debug!(target: "SNAPSHOT", "encoded snapshot to {path:?}, size {:.1}k compressed to {:.1}k",
            real_size / 1024f64, written / 1024f64);
        Ok(())
    }
}

impl Machine {
    /// Replace all emulated state with the contents of a snapshot.
    ///
    /// Nothing is changed if the snapshot memory doesn't match the size of
    /// the memory image.
    pub fn restore(&mut self, snap: Snapshot) -> anyhow::Result<()> {
        if snap.memory.len() != self.bus.mem.data.len() {
            bail!("Snapshot memory is {:#x} bytes, expected {:#x}",
                snap.memory.len(), self.bus.mem.data.len());
        }
        self.bus.mem.write_buf(0, &snap.memory)?;
        self.reg = snap.registers;
        self.bus.host = snap.host;
        self.bus.refresh_xfb();
        Ok(())
    }
}
