use std::path::PathBuf;

use anyhow::{bail, Context};
use chip_8_core::{Chip8Builder, Chip8Mode, Status};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

mod clock;
mod color;
mod input;
mod render;

use clock::{TickClock, DEFAULT_IPS};
use color::{Color, DEFAULT_BACKGROUND_COLOR, DEFAULT_FOREGROUND_COLOR};
use input::KeyPress;

/// Opcode semantics of a historical interpreter
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    CosmacVip,
    Chip48,
    SuperChip,
}

impl From<Mode> for Chip8Mode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::CosmacVip => Chip8Mode::COSMAC_VIP,
            Mode::Chip48 => Chip8Mode::CHIP_48,
            Mode::SuperChip => Chip8Mode::SUPER_CHIP,
        }
    }
}

/// Headless CHIP-8 runner
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Filepath to Chip-8 ROM file that will be executed
    #[clap(index = 1)]
    rom: PathBuf,

    /// Filepath to font file
    #[clap(long)]
    font: Option<PathBuf>,

    /// Opcode semantics
    #[clap(long, value_enum, default_value_t = Mode::CosmacVip)]
    mode: Mode,

    /// Instructions per second [100-2000], sets how many timer ticks each step sees
    #[clap(short, long, default_value_t = DEFAULT_IPS)]
    ips: u32,

    /// Number of instructions to execute
    #[clap(short, long, default_value_t = 1000)]
    steps: u64,

    /// Hold a key during a range of steps: KEY@FROM[-UNTIL], KEY in hex
    #[clap(long = "press")]
    presses: Vec<KeyPress>,

    /// PRNG seed
    #[clap(long)]
    seed: Option<u64>,

    /// Write the final screen as a PPM image
    #[clap(long)]
    snapshot: Option<PathBuf>,

    /// Snapshot scaling factor
    #[clap(long, default_value_t = 10)]
    scale: usize,

    /// Background Color as HEX 0xAABBFF [default: 0x000000]
    #[clap(long)]
    background: Option<Color>,

    /// Foreground Color as HEX 0xAABBFF [default: 0xFFFFFF]
    #[clap(long)]
    foreground: Option<Color>,

    /// Trace every executed instruction
    #[clap(short, long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.debug {
        logger.filter_level(LevelFilter::Trace);
    }
    logger.init();

    if args.scale == 0 || args.scale > 100 {
        bail!("Display scaling factor must be between [1-100]");
    }

    let mut builder = Chip8Builder::new().with_mode(args.mode.into());

    if let Some(font) = &args.font {
        let font_data = std::fs::read(font)
            .with_context(|| format!("failed to read font file {}", font.display()))?;
        builder = builder.with_font(&font_data)?;
    }

    if let Some(seed) = args.seed {
        builder = builder.with_rng_seed(seed);
    }

    let mut chip = builder.build();

    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("failed to read ROM file {}", args.rom.display()))?;
    let status = chip.load_program(&rom);
    if let Some(fault) = status.fault() {
        return Err(fault).context("failed to load ROM");
    }
    info!(
        "Loaded {} ({} bytes), {:?}",
        args.rom.display(),
        rom.len(),
        chip.quirks()
    );

    let mut clock = TickClock::new(args.ips);
    info!("Running {} steps at {} instructions per second", args.steps, clock.ips());
    let mut sound_playing = false;
    let mut frames = 0u64;
    let mut status = Status::Ok;

    for step in 0..args.steps {
        input::apply(&args.presses, &mut chip, step);

        status = chip.step(clock.tick());
        if !status.is_ok() {
            break;
        }

        if chip.is_sound_active() != sound_playing {
            sound_playing = chip.is_sound_active();
            info!("Sound {} at step {}", if sound_playing { "on" } else { "off" }, step);
        }

        if chip.consume_dirty_flag() {
            frames += 1;
        }
    }

    print!("{}", render::to_text(&chip));
    info!("{} screen updates", frames);

    if let Some(path) = &args.snapshot {
        let pixels = render::to_rgb(
            &chip,
            args.foreground.unwrap_or(DEFAULT_FOREGROUND_COLOR),
            args.background.unwrap_or(DEFAULT_BACKGROUND_COLOR),
        );
        render::write_ppm(path, &pixels, args.scale)?;
        info!("Wrote snapshot to {}", path.display());
    }

    if let Some(fault) = status.fault() {
        return Err(fault).context(format!("program halted at 0x{:04x}", chip.pc()));
    }

    Ok(())
}
