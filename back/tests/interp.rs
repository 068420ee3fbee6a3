use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use wiimu_backend::back::Backend;
use wiimu_backend::host::new_host_link;
use wiimu_backend::interp::{BackendConfig, InterpBackend};
use wiimu_core::cpu::excep::{InterruptKind, RFI_STUB};
use wiimu_core::cpu::reg::Spr;
use wiimu_core::cpu::{CpuRes, HaltReason};
use wiimu_core::dev::*;
use wiimu_core::machine::{Machine, MachineConfig, UnknownOpcodePolicy};

// Encoders for the handful of instructions used below.
fn add(rd: u32, ra: u32, rb: u32) -> u32 { (31 << 26) | (rd << 21) | (ra << 16) | (rb << 11) | (266 << 1) }
fn subf(rd: u32, ra: u32, rb: u32) -> u32 { (31 << 26) | (rd << 21) | (ra << 16) | (rb << 11) | (40 << 1) }
fn cmp(crf: u32, ra: u32, rb: u32) -> u32 { (31 << 26) | (crf << 23) | (ra << 16) | (rb << 11) }
fn addi(rd: u32, ra: u32, simm: i16) -> u32 { (14 << 26) | (rd << 21) | (ra << 16) | simm as u16 as u32 }
fn addis(rd: u32, ra: u32, simm: i16) -> u32 { (15 << 26) | (rd << 21) | (ra << 16) | simm as u16 as u32 }
fn lwz(rd: u32, ra: u32, d: i16) -> u32 { (32 << 26) | (rd << 21) | (ra << 16) | d as u16 as u32 }
fn stw(rs: u32, ra: u32, d: i16) -> u32 { (36 << 26) | (rs << 21) | (ra << 16) | d as u16 as u32 }
fn b(disp: i32, aa: bool, lk: bool) -> u32 { (18 << 26) | (disp as u32 & 0x03ff_fffc) | ((aa as u32) << 1) | lk as u32 }
fn bc(bo: u32, bi: u32, disp: i16) -> u32 { bcx(bo, bi, disp, false, false) }
fn bcx(bo: u32, bi: u32, disp: i16, aa: bool, lk: bool) -> u32 {
    (16 << 26) | (bo << 21) | (bi << 16) | (disp as u16 as u32 & 0xfffc) | ((aa as u32) << 1) | lk as u32
}
fn ps(xo: u32, frd: u32, fra: u32, frb: u32, frc: u32) -> u32 {
    (4 << 26) | (frd << 21) | (fra << 16) | (frb << 11) | (frc << 6) | (xo << 1)
}
const SC: u32 = 0x4400_0002;
const SYNC: u32 = 0x7c00_04ac;
const ISYNC: u32 = 0x4c00_012c;
const EIEIO: u32 = 0x7c00_06ac;
const HALT: u32 = 0;
const UNKNOWN: u32 = 0xfc00_0000;

fn image(program: &[u32]) -> Vec<u8> {
    program.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn backend_with(program: &[u32], mcfg: MachineConfig, cfg: BackendConfig) -> InterpBackend {
    let machine = Machine::boot(mcfg, &mut Cursor::new(image(program))).unwrap();
    InterpBackend::new(machine, cfg, new_host_link(), Arc::new(AtomicBool::new(false)))
}

fn backend(program: &[u32]) -> InterpBackend {
    backend_with(program, MachineConfig::default(), BackendConfig::default())
}

#[test]
fn add_at_entry() {
    let mut be = backend(&[add(3, 1, 2)]);
    be.machine.reg.gpr[1] = 5;
    be.machine.reg.gpr[2] = 7;
    assert_eq!(be.cpu_step(), CpuRes::StepOk);
    assert_eq!(be.machine.reg.gpr[3], 12);
    assert_eq!(be.machine.reg.pc, ENTRY_POINT + 4);
    assert_eq!(be.machine.reg.cycle, 1);
}

#[test]
fn add_wraps() {
    let mut be = backend(&[add(4, 1, 2), subf(5, 2, 1)]);
    be.machine.reg.gpr[1] = 0xffff_fff0;
    be.machine.reg.gpr[2] = 0x20;
    be.cpu_step();
    be.cpu_step();
    assert_eq!(be.machine.reg.gpr[4], 0x10);
    // subf computes rB - rA
    assert_eq!(be.machine.reg.gpr[5], 0xffff_ffd0);
    assert_eq!(be.machine.reg.cycle, 2);
}

#[test]
fn immediates_use_ra_or_zero() {
    let mut be = backend(&[addi(3, 0, -2), addis(4, 0, 0x1234), addi(5, 4, 0x10), addis(6, 3, 1)]);
    be.machine.reg.gpr[0] = 0x1000;
    for _ in 0..4 {
        be.cpu_step();
    }
    assert_eq!(be.machine.reg.gpr[3], 0xffff_fffe);
    assert_eq!(be.machine.reg.gpr[4], 0x1234_0000);
    assert_eq!(be.machine.reg.gpr[5], 0x1234_0010);
    assert_eq!(be.machine.reg.gpr[6], 0x0000_fffe);
}

#[test]
fn load_and_store_through_aliases() {
    let mut be = backend(&[stw(3, 1, 0x10), lwz(4, 2, 0x10), lwz(5, 1, -4)]);
    be.machine.reg.gpr[1] = 0x8000_1000;
    be.machine.reg.gpr[2] = 0xc000_1000;
    be.machine.reg.gpr[3] = 0xdead_beef;
    be.machine.write32(0x8000_0ffc, 0x0bad_f00d);
    for _ in 0..3 {
        be.cpu_step();
    }
    assert_eq!(be.machine.read32(0x8000_1010), 0xdead_beef);
    assert_eq!(be.machine.reg.gpr[4], 0xdead_beef);
    assert_eq!(be.machine.reg.gpr[5], 0x0bad_f00d);
}

#[test]
fn faulted_load_reads_zero() {
    let mut be = backend(&[lwz(4, 1, 0)]);
    be.machine.reg.gpr[1] = STARLET_TAIL - 1;
    be.machine.reg.gpr[4] = 0xffff_ffff;
    assert_eq!(be.cpu_step(), CpuRes::StepOk);
    assert_eq!(be.machine.reg.gpr[4], 0);
    assert!(be.machine.reg.running);
}

#[test]
fn compare_sets_one_field() {
    let mut be = backend(&[cmp(0, 1, 2), cmp(7, 2, 1), cmp(3, 1, 1)]);
    be.machine.reg.gpr[1] = -5i32 as u32;
    be.machine.reg.gpr[2] = 3;
    for _ in 0..3 {
        be.cpu_step();
    }
    assert_eq!(be.machine.reg.cr_field(0), 0x8);
    assert_eq!(be.machine.reg.cr_field(7), 0x4);
    assert_eq!(be.machine.reg.cr_field(3), 0x2);
    assert_eq!(be.machine.reg[Spr::Cr], 0x8002_0004);
}

#[test]
fn branch_relative_and_link() {
    let mut be = backend(&[b(0x100, false, false)]);
    be.cpu_step();
    assert_eq!(be.machine.reg.pc, ENTRY_POINT + 0x100);
    assert_eq!(be.machine.reg[Spr::Lr], 0);

    let mut be = backend(&[HALT, b(-4, false, true)]);
    be.machine.reg.pc = ENTRY_POINT + 4;
    be.cpu_step();
    assert_eq!(be.machine.reg.pc, ENTRY_POINT);
    assert_eq!(be.machine.reg[Spr::Lr], ENTRY_POINT + 8);
}

#[test]
fn branch_absolute() {
    let mut be = backend(&[b(0x40, true, false)]);
    be.cpu_step();
    assert_eq!(be.machine.reg.pc, 0x40);
}

#[test]
fn conditional_branch_on_bit() {
    // Branch if cr0[EQ] is set.
    let prog = [bc(12, 2, 0x20)];

    let mut be = backend(&prog);
    be.cpu_step();
    assert_eq!(be.machine.reg.pc, ENTRY_POINT + 4);

    let mut be = backend(&prog);
    be.machine.reg.set_cr_field(0, 0x2);
    be.cpu_step();
    assert_eq!(be.machine.reg.pc, ENTRY_POINT + 0x20);

    // Branch if cr0[EQ] is clear.
    let mut be = backend(&[bc(4, 2, -8)]);
    be.cpu_step();
    assert_eq!(be.machine.reg.pc, ENTRY_POINT - 8);

    // Branch always.
    let mut be = backend(&[bc(20, 0, 0x10)]);
    be.cpu_step();
    assert_eq!(be.machine.reg.pc, ENTRY_POINT + 0x10);
}

#[test]
fn conditional_branch_link_and_absolute() {
    // Taken, with link.
    let mut be = backend(&[bcx(20, 0, 0x40, false, true)]);
    be.cpu_step();
    assert_eq!(be.machine.reg.pc, ENTRY_POINT + 0x40);
    assert_eq!(be.machine.reg[Spr::Lr], ENTRY_POINT + 4);

    // Taken, absolute.
    let mut be = backend(&[bcx(12, 2, 0x100, true, false)]);
    be.machine.reg.set_cr_field(0, 0x2);
    be.cpu_step();
    assert_eq!(be.machine.reg.pc, 0x100);
    assert_eq!(be.machine.reg[Spr::Lr], 0);

    // Negative absolute displacements are sign-extended too.
    let mut be = backend(&[bcx(20, 0, -0x10, true, true)]);
    be.cpu_step();
    assert_eq!(be.machine.reg.pc, 0xffff_fff0);
    assert_eq!(be.machine.reg[Spr::Lr], ENTRY_POINT + 4);
}

#[test]
fn untaken_conditional_branch_still_links() {
    // Branch if cr0[EQ] is set, which it isn't.
    let mut be = backend(&[bcx(12, 2, 0x40, false, true)]);
    assert_eq!(be.cpu_step(), CpuRes::StepOk);
    assert_eq!(be.machine.reg.pc, ENTRY_POINT + 4);
    assert_eq!(be.machine.reg[Spr::Lr], ENTRY_POINT + 4);
}

#[test]
fn counter_branches_follow_unknown_policy() {
    let mut be = backend(&[bc(16, 0, 0x10)]);
    let res = be.cpu_step();
    assert_eq!(res, CpuRes::HaltEmulation(HaltReason::UnknownOpcode { pc: ENTRY_POINT, word: bc(16, 0, 0x10) }));
    assert!(!be.machine.reg.running);
    assert_eq!(be.machine.reg.pc, ENTRY_POINT);
}

#[test]
fn paired_single_lanes() {
    let mut be = backend(&[ps(21, 1, 2, 3, 0), ps(20, 4, 2, 3, 0), ps(25, 5, 2, 0, 3)]);
    be.machine.reg.fpr[2].ps0 = 1.5;
    be.machine.reg.fpr[2].ps1 = -2.0;
    be.machine.reg.fpr[3].ps0 = 0.5;
    be.machine.reg.fpr[3].ps1 = 4.0;
    for _ in 0..3 {
        be.cpu_step();
    }
    let f = &be.machine.reg.fpr;
    assert_eq!((f[1].ps0, f[1].ps1), (2.0, 2.0));
    assert_eq!((f[4].ps0, f[4].ps1), (1.0, -6.0));
    assert_eq!((f[5].ps0, f[5].ps1), (0.75, -8.0));
}

#[test]
fn barriers_only_advance() {
    let mut be = backend(&[SYNC, ISYNC, EIEIO]);
    let before = be.machine.reg.clone();
    for _ in 0..3 {
        assert_eq!(be.cpu_step(), CpuRes::StepOk);
    }
    assert_eq!(be.machine.reg.pc, ENTRY_POINT + 12);
    assert!(be.machine.reg.gpr == before.gpr && be.machine.reg.spr == before.spr);
}

#[test]
fn unknown_opcode_halts_without_side_effects() {
    let mut be = backend(&[UNKNOWN]);
    be.machine.reg.gpr[7] = 0x77;
    let before = be.machine.reg.clone();
    let mem_before = be.machine.bus.mem.data.clone();

    let res = be.cpu_step();
    assert_eq!(res, CpuRes::HaltEmulation(HaltReason::UnknownOpcode { pc: ENTRY_POINT, word: UNKNOWN }));
    let after = &be.machine.reg;
    assert!(!after.running);
    assert_eq!(after.pc, before.pc);
    assert!(after.gpr == before.gpr && after.spr == before.spr && after.fpr == before.fpr);
    assert_eq!(after.irq_enabled, before.irq_enabled);
    assert_eq!(after.kernel_mode, before.kernel_mode);
    assert!(be.machine.bus.mem.data == mem_before);

    // A stopped machine doesn't step.
    assert_eq!(be.cpu_step(), CpuRes::HaltEmulation(HaltReason::NotRunning));
    assert_eq!(be.machine.reg.cycle, 1);
}

#[test]
fn unknown_opcode_can_be_skipped() {
    let mcfg = MachineConfig { unknown_opcode: UnknownOpcodePolicy::Skip, ..Default::default() };
    let mut be = backend_with(&[UNKNOWN, addi(3, 0, 1)], mcfg, BackendConfig::default());
    assert_eq!(be.cpu_step(), CpuRes::StepOk);
    assert_eq!(be.machine.reg.pc, ENTRY_POINT + 4);
    be.cpu_step();
    assert_eq!(be.machine.reg.gpr[3], 1);
    assert!(be.machine.reg.running);
}

#[test]
fn halt_stops_the_machine() {
    let mut be = backend(&[HALT]);
    assert_eq!(be.cpu_step(), CpuRes::HaltEmulation(HaltReason::Halted));
    assert!(!be.machine.reg.running);
    assert_eq!(be.machine.reg.cycle, 1);
}

#[test]
fn system_call_round_trip() {
    let mut be = backend(&[SC, addi(3, 0, 9)]);
    be.machine.reg.irq_enabled = true;
    be.machine.reg.kernel_mode = false;

    assert_eq!(be.cpu_step(), CpuRes::StepException(InterruptKind::SystemCall));
    let vector = INTERRUPT_TABLE_BASE + 0x90;
    assert_eq!(be.machine.reg.pc, vector);
    assert_eq!(be.machine.reg[Spr::Lr], ENTRY_POINT + 4);
    assert!(be.machine.reg.kernel_mode && !be.machine.reg.irq_enabled);
    assert_eq!(be.machine.read32(vector), RFI_STUB);

    // The stub returns to the instruction after the trap.
    assert_eq!(be.cpu_step(), CpuRes::StepOk);
    assert_eq!(be.machine.reg.pc, ENTRY_POINT + 4);
    assert!(be.machine.reg.irq_enabled);
    assert!(!be.machine.reg.kernel_mode);
    be.cpu_step();
    assert_eq!(be.machine.reg.gpr[3], 9);
}

#[test]
fn disarmed_system_call_falls_through() {
    let mut be = backend(&[SC]);
    assert_eq!(be.cpu_step(), CpuRes::StepOk);
    assert_eq!(be.machine.reg.pc, ENTRY_POINT + 4);
    assert_eq!(be.machine.reg[Spr::Lr], 0);
}

#[test]
fn host_handled_system_calls() {
    let cfg = BackendConfig { hle_syscalls: true, ..Default::default() };
    let mut be = backend_with(&[SC, SC, SC], MachineConfig::default(), cfg);
    be.machine.reg.irq_enabled = true;
    for (i, b) in b"hello\0".iter().enumerate() {
        be.machine.write8(0x8000_2000 + i as u32, *b);
    }
    be.machine.reg.gpr[3] = 0x8000_2000;

    be.machine.reg.gpr[0] = 1;
    assert_eq!(be.cpu_step(), CpuRes::Syscall(1));
    assert_eq!(be.machine.reg.pc, ENTRY_POINT + 4);
    assert!(be.machine.reg.irq_enabled);

    // Unregistered numbers are taken as an interrupt.
    be.machine.reg.gpr[0] = 77;
    assert_eq!(be.cpu_step(), CpuRes::StepException(InterruptKind::SystemCall));
    assert_eq!(be.machine.reg[Spr::Lr], ENTRY_POINT + 8);
    be.cpu_step();

    be.machine.reg.gpr[0] = 2;
    assert_eq!(be.cpu_step(), CpuRes::HaltEmulation(HaltReason::Exit));
    assert!(!be.machine.reg.running);
}

#[test]
fn halted_machine_leaves_the_mailbox_alone() {
    let mut be = backend(&[UNKNOWN]);
    be.machine.write32(STARLET_BASE, 1);
    be.machine.reg.irq_enabled = true;
    let before = be.machine.reg.clone();
    let mem_before = be.machine.bus.mem.data.clone();

    let res = be.step();
    assert_eq!(res, CpuRes::HaltEmulation(HaltReason::UnknownOpcode { pc: ENTRY_POINT, word: UNKNOWN }));
    assert!(!be.machine.reg.running);
    assert_eq!(be.machine.reg.pc, ENTRY_POINT);
    assert!(be.machine.reg.irq_enabled);
    assert_eq!(be.machine.reg[Spr::Lr], before[Spr::Lr]);
    assert!(be.machine.bus.mem.data == mem_before);
    assert_eq!(be.machine.mailbox().command, 1);

    // Same for halt.
    let mut be = backend(&[HALT]);
    be.machine.write32(STARLET_BASE, 1);
    be.machine.reg.irq_enabled = true;
    assert_eq!(be.step(), CpuRes::HaltEmulation(HaltReason::Halted));
    assert_eq!(be.machine.mailbox().command, 1);
    assert_eq!(be.machine.reg.pc, ENTRY_POINT);
}

#[test]
fn starlet_is_polled_after_each_step() {
    let mut be = backend(&[
        // r1 = 0xcd000000
        addis(1, 0, 0xcd00u16 as i16),
        // r2 = 1 (INIT)
        addi(2, 0, 1),
        stw(2, 1, 0),
        HALT,
    ]);
    be.machine.reg.irq_enabled = true;
    be.step();
    be.step();
    assert_eq!(be.step(), CpuRes::StepOk);
    // The mailbox was handled right after the store, which raised an
    // interrupt from the instruction after it.
    assert_eq!(be.machine.mailbox().command, 0);
    assert_eq!(be.machine.mailbox().status, 1);
    assert_eq!(be.machine.reg.pc, INTERRUPT_TABLE_BASE + 0x10);
    assert_eq!(be.machine.reg[Spr::Lr], ENTRY_POINT + 12);
}

#[test]
fn run_stops_at_halt_and_publishes() {
    let mut prog = vec![
        addis(1, 0, 0xc180u16 as i16),
        addis(2, 0, 0x00ffu16 as i16),
        stw(2, 1, 0),
        addis(3, 0, 0x0d00),
        stw(2, 3, 0),
    ];
    prog.push(HALT);
    let mcfg = MachineConfig { present_interval: 2, ..Default::default() };
    let mut be = backend_with(&prog, mcfg, BackendConfig::default());
    be.machine.bus.xfb.dirty = false;
    be.host.write().input_state = 0x42;
    be.run().unwrap();

    assert!(!be.machine.reg.running);
    assert_eq!(be.steps, 5);
    assert_eq!(be.machine.bus.host.input_state, 0x42);
    let host = be.host.read();
    assert!(host.halted);
    assert_eq!(host.frame[0], 0x00ff_0000);
    assert_eq!(host.bg_color, 0x00ff_0000);
    assert!(host.frame_count >= 3);
}

#[test]
fn run_honours_step_limit_and_quit() {
    // An infinite loop.
    let cfg = BackendConfig { max_steps: Some(100), ..Default::default() };
    let mut be = backend_with(&[b(0, false, false)], MachineConfig::default(), cfg);
    be.run().unwrap();
    assert_eq!(be.steps, 100);
    assert_eq!(be.machine.reg.cycle, 100);
    assert!(be.machine.reg.running);

    let mut be = backend(&[b(0, false, false)]);
    be.quit.store(true, std::sync::atomic::Ordering::Relaxed);
    be.run().unwrap();
    assert_eq!(be.steps, 0);
}
