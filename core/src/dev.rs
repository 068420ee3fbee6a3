#![allow(clippy::identity_op)]

/// Registers shared with the host-side collaborators.
pub mod io;
/// Presentation mirror of the framebuffer.
pub mod vi;
/// Presentation buffer for audio.
pub mod ai;
/// The Starlet mailbox protocol.
pub mod starlet;

// Sizes of the physical memory image.
pub const RAM_SIZE:       u32 = 0x0200_0000;
pub const WINDOW_SIZE:    u32 = 0x0001_0000;
pub const IMAGE_SIZE:     u32 = RAM_SIZE + 2 * WINDOW_SIZE;
pub const RAM_MASK:       u32 = RAM_SIZE - 1;

// Physical offsets of the reserved sub-ranges (directly after RAM).
pub const HWREG_PHYS:     u32 = RAM_SIZE;
pub const STARLET_PHYS:   u32 = RAM_SIZE + WINDOW_SIZE;

// Base addresses for the virtual windows.
pub const RAM_CACHED_BASE:   u32 = 0x8000_0000;
pub const RAM_UNCACHED_BASE: u32 = 0xc000_0000;
pub const HWREG_BASE:        u32 = 0xcc00_0000;
pub const STARLET_BASE:      u32 = 0xcd00_0000;

// Tail addresses for the virtual windows.
pub const RAM_CACHED_TAIL:   u32 = RAM_CACHED_BASE + RAM_SIZE - 1;
pub const RAM_UNCACHED_TAIL: u32 = RAM_UNCACHED_BASE + RAM_SIZE - 1;
pub const HWREG_TAIL:        u32 = HWREG_BASE + WINDOW_SIZE - 1;
pub const STARLET_TAIL:      u32 = STARLET_BASE + WINDOW_SIZE - 1;

// Memory-mapped registers shared with the host. These are decoded by the bus
// before address translation.
pub const HOST_REG_BASE:      u32 = 0x0d00_0000;
pub const HOST_REG_SIZE:      u32 = 0x0000_000c;
pub const HOST_REG_TAIL:      u32 = HOST_REG_BASE + HOST_REG_SIZE - 1;
pub const REG_VIDEO_BG_COLOR: u32 = HOST_REG_BASE + 0x00;
pub const REG_INPUT_STATE:    u32 = HOST_REG_BASE + 0x04;
pub const REG_AUDIO_FREQ:     u32 = HOST_REG_BASE + 0x08;

// Framebuffer alias, as a physical range inside RAM.
pub const SCREEN_WIDTH:   usize = 640;
pub const SCREEN_HEIGHT:  usize = 480;
pub const FB_PHYS_BASE:   u32 = 0x0180_0000;
pub const FB_SIZE:        u32 = (SCREEN_WIDTH * SCREEN_HEIGHT * 4) as u32;
pub const FB_PHYS_TAIL:   u32 = FB_PHYS_BASE + FB_SIZE - 1;

// Audio presentation buffer (one second of 16-bit stereo).
pub const AUDIO_SAMPLE_RATE:     usize = 32000;
pub const AUDIO_CHANNELS:        usize = 2;
pub const AUDIO_BUFFER_CAPACITY: usize = AUDIO_SAMPLE_RATE * AUDIO_CHANNELS * 2;

// Boot-time constants.
pub const ENTRY_POINT:          u32 = 0x8000_0000;
pub const INTERRUPT_TABLE_BASE: u32 = 0x8000_3000;
pub const INTERRUPT_VECTOR_STRIDE: u32 = 0x10;
