//! The top-level machine aggregate.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context;
use log::info;

use crate::bus::Bus;
use crate::cpu::excep::VectorTable;
use crate::cpu::reg::RegisterFile;
use crate::dev::*;

/// What to do when the CPU decodes an instruction it doesn't implement.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UnknownOpcodePolicy {
    /// Stop the machine without advancing the program counter.
    #[default]
    Halt,
    /// Log the instruction and continue with the next one.
    Skip,
}

/// Static configuration for a [Machine].
#[derive(Debug, Clone, Copy)]
pub struct MachineConfig {
    pub entry_point: u32,
    pub unknown_opcode: UnknownOpcodePolicy,
    /// Number of steps between presentation ticks.
    pub present_interval: u64,
}
impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            entry_point: ENTRY_POINT,
            unknown_opcode: UnknownOpcodePolicy::Halt,
            present_interval: 300_000,
        }
    }
}

/// Container for all emulated state.
pub struct Machine {
    pub reg: RegisterFile,
    pub bus: Bus,
    pub vectors: VectorTable,
    pub cfg: MachineConfig,
}
impl Machine {
    /// A machine in its power-on state, with empty memory.
    pub fn new(cfg: MachineConfig) -> Self {
        Machine {
            reg: RegisterFile::new(cfg.entry_point),
            bus: Bus::new(),
            vectors: VectorTable::new(INTERRUPT_TABLE_BASE),
            cfg,
        }
    }

    /// Load a boot image from some byte stream and prepare to run it.
    pub fn boot(cfg: MachineConfig, src: &mut impl Read) -> anyhow::Result<Self> {
        let mut m = Self::new(cfg);
        let len = m.bus.mem.load(src).context("Couldn't load boot image")?;
        m.install_vectors();
        m.bus.refresh_xfb();
        info!(target: "Loader", "Loaded {len:#x} bytes (crc32={:08x}), entry point {:08x}",
            m.bus.mem.hash(), m.reg.pc);
        Ok(m)
    }

    pub fn boot_file(cfg: MachineConfig, path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("Couldn't open boot image {}", path.display()))?;
        Self::boot(cfg, &mut BufReader::new(f))
    }
}
