use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use log::{debug, info, LevelFilter};

use wiimu_core::machine::*;
use wiimu_core::snapshot::Snapshot;
use wiimu_backend::back::*;
use wiimu_backend::host::*;
use wiimu_backend::interp::*;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::Builder;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// User-specified behavior for unimplemented instructions.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OpcodePolicy {
    Halt,
    Skip,
}
impl From<OpcodePolicy> for UnknownOpcodePolicy {
    fn from(p: OpcodePolicy) -> Self {
        match p {
            OpcodePolicy::Halt => UnknownOpcodePolicy::Halt,
            OpcodePolicy::Skip => UnknownOpcodePolicy::Skip,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    /// Raw boot image, loaded at the start of RAM
    image: PathBuf,
    /// What to do with unimplemented instructions
    #[clap(short, long, value_enum, default_value = "halt")]
    unknown_opcode: OpcodePolicy,
    /// Number of steps between presentation ticks
    #[clap(short, long, default_value_t = 300_000)]
    present_interval: u64,
    /// Stop after this many steps
    #[clap(short, long)]
    max_steps: Option<u64>,
    /// Handle system calls on the host
    #[clap(long)]
    hle_syscalls: bool,
    /// Log every instruction
    #[clap(short, long)]
    trace: bool,
    #[clap(short, long, value_enum, default_value = "info")]
    log_level: LogLevel,
    /// Dump memory into the current directory on exit
    #[clap(short, long)]
    dump: bool,
    /// Resume from a snapshot instead of starting at the entry point
    #[clap(long)]
    restore: Option<PathBuf>,
    /// Write a snapshot here on exit
    #[clap(short, long)]
    snapshot: Option<PathBuf>,
}

fn setup_logger(level: LevelFilter, trace: bool) -> anyhow::Result<()> {
    use fern::colors::{Color, ColoredLevelConfig};
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Cyan)
        .trace(Color::BrightBlack);
    let cpu_level = if trace { LevelFilter::Trace } else { level };
    fern::Dispatch::new()
        .format(move |out, message, record| {
            let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
            out.finish(format_args!("[{}.{:03}] {:5} [{}] {}",
                now.as_secs(), now.subsec_millis(),
                colors.color(record.level()), record.target(), message))
        })
        .level(level)
        .level_for("CPU", cpu_level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

/// Headless presentation collaborator. Reports each new frame and audio
/// update until the emulator thread stops.
fn presenter(host: HostLink) {
    let mut last_frame = 0;
    let mut last_audio = 0;
    loop {
        {
            let state = host.read();
            if state.frame_count != last_frame {
                last_frame = state.frame_count;
                debug!(target: "VI", "frame {last_frame} crc32={:08x} bg={:08x}",
                    frame_hash(&state.frame), state.bg_color);
            }
            if state.audio_updates != last_audio {
                last_audio = state.audio_updates;
                debug!(target: "AI", "audio update {last_audio}: {:#x} bytes at {}Hz",
                    state.audio.len(), state.audio_freq);
            }
            if state.halted {
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(16));
    }
}

fn frame_hash(frame: &[u32]) -> u32 {
    let mut h = crc32fast::Hasher::new();
    for px in frame {
        h.update(&px.to_be_bytes());
    }
    h.finalize()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logger(args.log_level.into(), args.trace)?;

    let mcfg = MachineConfig {
        unknown_opcode: args.unknown_opcode.into(),
        present_interval: args.present_interval,
        ..Default::default()
    };
    let cfg = BackendConfig {
        hle_syscalls: args.hle_syscalls,
        trace: args.trace,
        max_steps: args.max_steps,
    };

    let mut machine = Machine::boot_file(mcfg, &args.image)?;
    if let Some(path) = &args.restore {
        machine.restore(Snapshot::from_file(path)?)?;
        info!(target: "Other", "Restored snapshot {}", path.display());
    }

    let quit = Arc::new(AtomicBool::new(false));
    let handler_quit = quit.clone();
    ctrlc::set_handler(move || handler_quit.store(true, Ordering::Relaxed))
        .context("Couldn't install Ctrl-C handler")?;

    let host = new_host_link();

    // Fork off the backend thread
    let emu_host = host.clone();
    let emu_thread = Builder::new().name("EmuThread".to_owned()).spawn(move || {
        let mut back = InterpBackend::new(machine, cfg, emu_host.clone(), quit);
        let res = back.run();
        // Make sure the presenter sees us go away, even on error.
        emu_host.write().halted = true;
        res.map(|_| back.machine)
    })?;

    // Fork off the presentation thread
    let vi_host = host.clone();
    let vi_thread = Builder::new().name("VideoThread".to_owned()).spawn(move || {
        presenter(vi_host);
    })?;

    let machine = emu_thread.join()
        .map_err(|_| anyhow!("EmuThread panicked"))?
        .context("InterpBackend returned an Err")?;
    let _ = vi_thread.join();

    if args.dump {
        let dir = machine.bus.dump_memory("bin")?;
        info!(target: "Other", "Dumped memory to {}", dir.display());
    }
    if let Some(path) = &args.snapshot {
        Snapshot::capture(&machine).to_file(path)?;
        info!(target: "Other", "Wrote snapshot {}", path.display());
    }
    info!(target: "Other", "Cycles elapsed: {}", machine.reg.cycle);
    Ok(())
}
