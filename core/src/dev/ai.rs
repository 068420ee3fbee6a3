//! Presentation buffer for audio.

use crate::dev::*;

/// Samples copied out of guest memory by the AUDIO_UPDATE command.
pub struct AudioBuffer {
    pub data: Box<[u8]>,
    /// Number of valid bytes at the start of `data`.
    pub len: usize,
    /// Number of completed updates.
    pub updates: u64,
}
impl Default for AudioBuffer {
    fn default() -> Self { Self::new() }
}
impl AudioBuffer {
    pub fn new() -> Self {
        AudioBuffer {
            data: vec![0; AUDIO_BUFFER_CAPACITY].into_boxed_slice(),
            len: 0,
            updates: 0,
        }
    }

    /// The valid part of the buffer.
    pub fn samples(&self) -> &[u8] { &self.data[..self.len] }
}
