//! Registers shared between the guest and the host-side collaborators.

use bincode::{Decode, Encode};
use log::{debug, warn};

use crate::bus::mmio::*;

/// Backing state for the background colour, input and audio registers.
///
/// Each register has exactly one writer: the guest owns the colour and the
/// audio frequency, the input collaborator owns the input state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct HostRegisters {
    pub bg_color: u32,
    pub input_state: u32,
    pub audio_freq: u32,
}
impl HostRegisters {
    /// Latch the input state published by the input collaborator.
    pub fn set_input_state(&mut self, val: u32) {
        self.input_state = val;
    }
}

impl MmioDevice for HostRegisters {
    fn read(&self, off: usize) -> u32 {
        match off {
            0x00 => self.bg_color,
            0x04 => self.input_state,
            0x08 => self.audio_freq,
            _ => unhandled("HOST", off, None),
        }
    }
    fn write(&mut self, off: usize, val: u32) {
        match off {
            0x00 => self.bg_color = val,
            0x04 => warn!(target: "MMIO", "Ignored guest write {val:08x} to input register"),
            0x08 => {
                debug!(target: "MMIO", "Audio frequency set to {val}");
                self.audio_freq = val;
            },
            _ => { unhandled("HOST", off, Some(val)); },
        }
    }
}
