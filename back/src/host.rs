//! State shared between the emulator thread and the collaborators.

use std::sync::Arc;

use parking_lot::RwLock;

use wiimu_core::bus::Bus;
use wiimu_core::dev::*;

/// Everything the presentation, audio and input collaborators can see.
///
/// The emulator thread writes everything here except `input_state`, which
/// is only written by the input collaborator.
pub struct HostState {
    pub frame: Vec<u32>,
    /// Number of published frames.
    pub frame_count: u64,
    pub bg_color: u32,
    pub audio_freq: u32,
    pub audio: Vec<u8>,
    pub audio_updates: u64,

    pub input_state: u32,

    /// Set once the emulator thread has stopped.
    pub halted: bool,
}
impl Default for HostState {
    fn default() -> Self {
        HostState {
            frame: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
            frame_count: 0,
            bg_color: 0,
            audio_freq: 0,
            audio: Vec::new(),
            audio_updates: 0,
            input_state: 0,
            halted: false,
        }
    }
}
impl HostState {
    /// Copy the presentation buffers out of the bus.
    pub fn publish(&mut self, bus: &mut Bus) {
        if bus.xfb.dirty {
            self.frame.copy_from_slice(&bus.xfb.pixels);
            bus.xfb.dirty = false;
        }
        if bus.audio.updates != self.audio_updates {
            self.audio.clear();
            self.audio.extend_from_slice(bus.audio.samples());
            self.audio_updates = bus.audio.updates;
        }
        self.bg_color = bus.host.bg_color;
        self.audio_freq = bus.host.audio_freq;
        self.frame_count += 1;
    }
}

pub type HostLink = Arc<RwLock<HostState>>;

pub fn new_host_link() -> HostLink {
    Arc::new(RwLock::new(HostState::default()))
}
