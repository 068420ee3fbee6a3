//! Presentation-side copy of the framebuffer.

use crate::dev::*;

/// One `u32` per pixel, refreshed by the bus on every write that lands in
/// the framebuffer region of RAM.
pub struct FrameMirror {
    pub pixels: Vec<u32>,
    /// Set on every update, cleared by whoever presents the frame.
    pub dirty: bool,
}
impl Default for FrameMirror {
    fn default() -> Self { Self::new() }
}
impl FrameMirror {
    pub fn new() -> Self {
        FrameMirror { pixels: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT], dirty: false }
    }

    /// Store a word written at byte offset `off` of the framebuffer.
    pub fn update(&mut self, off: u32, word: u32) {
        if let Some(px) = self.pixels.get_mut((off >> 2) as usize) {
            *px = word;
            self.dirty = true;
        }
    }

    /// Rebuild the whole mirror from the bytes of the framebuffer region.
    pub fn refresh_from(&mut self, fb: &[u8]) {
        for (px, chunk) in self.pixels.iter_mut().zip(fb.chunks_exact(4)) {
            *px = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        self.dirty = true;
    }
}
