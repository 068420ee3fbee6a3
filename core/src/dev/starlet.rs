//! The Starlet mailbox protocol.
//!
//! The guest writes a parameter block somewhere in memory, points the
//! mailbox at it, and then writes a non-zero command. The mailbox is polled
//! once per step; every command completes within a single poll.

use log::{debug, info, warn};

use crate::cpu::excep::COPROCESSOR_IRQ;
use crate::dev::*;
use crate::machine::Machine;

// Offsets of the mailbox words within the Starlet window.
pub const MBOX_COMMAND:     u32 = 0x00;
pub const MBOX_RESPONSE:    u32 = 0x04;
pub const MBOX_PARAM_ADDR:  u32 = 0x08;
pub const MBOX_RESULT_ADDR: u32 = 0x0c;
pub const MBOX_STATUS:      u32 = 0x10;

pub const RESPONSE_OK:      u32 = 0x00;
pub const RESPONSE_FAIL:    u32 = 0x01;
pub const RESPONSE_UNKNOWN: u32 = 0xff;

pub const STATUS_COMPLETED: u32 = 1;

/// Commands understood by the Starlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarletCommand {
    Init,
    Reset,
    Read,
    Write,
    AudioUpdate,
    Unimpl(u32),
}
impl StarletCommand {
    pub fn from_u32(x: u32) -> Self {
        use StarletCommand::*;
        match x {
            1 => Init,
            2 => Reset,
            3 => Read,
            4 => Write,
            5 => AudioUpdate,
            _ => Unimpl(x),
        }
    }
}

/// The mailbox words, as seen by the guest.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Mailbox {
    pub command: u32,
    pub response: u32,
    pub param_addr: u32,
    pub result_addr: u32,
    pub status: u32,
}

impl Machine {
    /// Read the mailbox out of guest memory.
    pub fn mailbox(&self) -> Mailbox {
        Mailbox {
            command: self.read32(STARLET_BASE + MBOX_COMMAND),
            response: self.read32(STARLET_BASE + MBOX_RESPONSE),
            param_addr: self.read32(STARLET_BASE + MBOX_PARAM_ADDR),
            result_addr: self.read32(STARLET_BASE + MBOX_RESULT_ADDR),
            status: self.read32(STARLET_BASE + MBOX_STATUS),
        }
    }

    /// Write the mailbox back into guest memory.
    pub fn set_mailbox(&mut self, mbox: &Mailbox) {
        self.write32(STARLET_BASE + MBOX_COMMAND, mbox.command);
        self.write32(STARLET_BASE + MBOX_RESPONSE, mbox.response);
        self.write32(STARLET_BASE + MBOX_PARAM_ADDR, mbox.param_addr);
        self.write32(STARLET_BASE + MBOX_RESULT_ADDR, mbox.result_addr);
        self.write32(STARLET_BASE + MBOX_STATUS, mbox.status);
    }

    /// Poll the mailbox, handling a pending command if there is one.
    ///
    /// Returns true if a command was handled.
    pub fn handle_step_starlet(&mut self) -> bool {
        let mut mbox = self.mailbox();
        if mbox.command == 0 {
            return false;
        }

        let cmd = StarletCommand::from_u32(mbox.command);
        debug!(target: "STARLET", "{cmd:?} param={:08x} result={:08x}",
            mbox.param_addr, mbox.result_addr);

        mbox.response = match cmd {
            StarletCommand::Init => {
                info!(target: "STARLET", "Init");
                RESPONSE_OK
            },
            StarletCommand::Reset => {
                info!(target: "STARLET", "Reset");
                RESPONSE_OK
            },
            StarletCommand::Read | StarletCommand::Write => {
                self.starlet_transfer(mbox.param_addr, mbox.result_addr)
            },
            StarletCommand::AudioUpdate => self.starlet_audio_update(mbox.param_addr),
            StarletCommand::Unimpl(x) => {
                warn!(target: "STARLET", "Unknown command {x:08x}");
                RESPONSE_UNKNOWN
            },
        };
        mbox.status = STATUS_COMPLETED;
        mbox.command = 0;
        self.write32(STARLET_BASE + MBOX_RESPONSE, mbox.response);
        self.write32(STARLET_BASE + MBOX_STATUS, mbox.status);
        self.write32(STARLET_BASE + MBOX_COMMAND, mbox.command);

        self.trigger_kind(COPROCESSOR_IRQ);
        true
    }

    /// Copy `count` bytes described by the parameter block `{src, dst, count}`.
    fn starlet_transfer(&mut self, param: u32, result: u32) -> u32 {
        let src = self.read32(param);
        let dst = self.read32(param.wrapping_add(4));
        let count = self.read32(param.wrapping_add(8));
        if count > IMAGE_SIZE {
            warn!(target: "STARLET", "Transfer of {count:#x} bytes is larger than memory");
            return RESPONSE_FAIL;
        }
        debug!(target: "STARLET", "Transfer {src:08x} -> {dst:08x} ({count:#x} bytes)");

        let words = count & !3;
        for off in (0..words).step_by(4) {
            let val = self.read32(src.wrapping_add(off));
            self.write32(dst.wrapping_add(off), val);
        }
        for off in words..count {
            let val = self.read8(src.wrapping_add(off));
            self.write8(dst.wrapping_add(off), val);
        }

        if result != 0 {
            self.write32(result, count);
        }
        RESPONSE_OK
    }

    /// Copy samples described by the parameter block `{addr, size}` into the
    /// audio buffer.
    fn starlet_audio_update(&mut self, param: u32) -> u32 {
        let addr = self.read32(param);
        let size = self.read32(param.wrapping_add(4)) as usize;
        if size > AUDIO_BUFFER_CAPACITY {
            warn!(target: "STARLET", "Audio update of {size:#x} bytes exceeds buffer");
            return RESPONSE_FAIL;
        }
        for i in 0..size {
            let val = self.read8(addr.wrapping_add(i as u32));
            self.bus.audio.data[i] = val;
        }
        self.bus.audio.len = size;
        self.bus.audio.updates += 1;
        debug!(target: "STARLET", "Audio update from {addr:08x} ({size:#x} bytes)");
        RESPONSE_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::reg::Spr;
    use crate::machine::MachineConfig;

    const PARAM: u32 = 0x8000_2000;
    const RESULT: u32 = 0x8000_2100;

    fn machine() -> Machine {
        let mut m = Machine::new(MachineConfig::default());
        m.install_vectors();
        m
    }

    fn submit(m: &mut Machine, cmd: u32, params: &[u32], result: u32) {
        for (i, p) in params.iter().enumerate() {
            m.write32(PARAM + 4 * i as u32, *p);
        }
        m.set_mailbox(&Mailbox {
            command: cmd,
            param_addr: PARAM,
            result_addr: result,
            ..Default::default()
        });
    }

    #[test]
    fn idle_mailbox_does_nothing() {
        let mut m = machine();
        m.reg.irq_enabled = true;
        assert!(!m.handle_step_starlet());
        assert_eq!(m.mailbox(), Mailbox::default());
        assert!(m.reg.irq_enabled);
    }

    #[test]
    fn block_copy_moves_exactly_count_bytes() {
        let mut m = machine();
        for i in 0..20 {
            m.write8(0x8000_1000 + i, 0xa0 + i as u8);
        }
        m.write8(0x8000_1810, 0x77);
        submit(&mut m, 3, &[0x8000_1000, 0x8000_1800, 16], RESULT);

        m.reg.pc = 0x8000_0040;
        m.reg.irq_enabled = true;
        assert!(m.handle_step_starlet());

        for i in 0..16 {
            assert_eq!(m.read8(0x8000_1800 + i), 0xa0 + i as u8);
        }
        assert_eq!(m.read8(0x8000_1810), 0x77);
        let mbox = m.mailbox();
        assert_eq!(mbox.command, 0);
        assert_eq!(mbox.response, RESPONSE_OK);
        assert_eq!(mbox.status, STATUS_COMPLETED);
        assert_eq!(m.read32(RESULT), 16);

        // Exactly one interrupt was taken.
        assert_eq!(m.reg.pc, INTERRUPT_TABLE_BASE + 0x10);
        assert_eq!(m.reg[Spr::Lr], 0x8000_0040);
        assert!(!m.reg.irq_enabled);
        assert!(!m.handle_step_starlet());
        assert_eq!(m.reg.pc, INTERRUPT_TABLE_BASE + 0x10);
    }

    #[test]
    fn write_moves_trailing_bytes_into_the_hwreg_window() {
        let mut m = machine();
        for i in 0..7 {
            m.write8(0x8000_1000 + i, i as u8 + 1);
        }
        submit(&mut m, 4, &[0x8000_1000, 0xcc00_0100, 7], 0);
        assert!(m.handle_step_starlet());
        let base = (HWREG_PHYS + 0x100) as usize;
        assert_eq!(&m.bus.mem.data[base..base + 8], &[1, 2, 3, 4, 5, 6, 7, 0]);
        assert_eq!(m.mailbox().response, RESPONSE_OK);
        assert_eq!(m.read32(RESULT), 0);
    }

    #[test]
    fn audio_update_respects_capacity() {
        let mut m = machine();
        m.write32(0x8000_4000, 0x0102_0304);
        submit(&mut m, 5, &[0x8000_4000, 4], 0);
        assert!(m.handle_step_starlet());
        assert_eq!(m.mailbox().response, RESPONSE_OK);
        assert_eq!(m.bus.audio.samples(), &[1, 2, 3, 4]);
        assert_eq!(m.bus.audio.updates, 1);

        submit(&mut m, 5, &[0x8000_4000, AUDIO_BUFFER_CAPACITY as u32 + 1], 0);
        assert!(m.handle_step_starlet());
        let mbox = m.mailbox();
        assert_eq!(mbox.response, RESPONSE_FAIL);
        assert_eq!(mbox.command, 0);
        assert_eq!(m.bus.audio.updates, 1);
    }

    #[test]
    fn unknown_and_control_commands() {
        let mut m = machine();
        submit(&mut m, 0x99, &[], 0);
        assert!(m.handle_step_starlet());
        assert_eq!(m.mailbox().response, RESPONSE_UNKNOWN);
        assert_eq!(m.mailbox().status, STATUS_COMPLETED);

        for cmd in [1, 2] {
            submit(&mut m, cmd, &[], 0);
            assert!(m.handle_step_starlet());
            assert_eq!(m.mailbox().response, RESPONSE_OK);
            assert_eq!(m.mailbox().command, 0);
        }
        // Interrupts were never armed, so none were taken.
        assert_eq!(m.reg.pc, ENTRY_POINT);
    }
}
