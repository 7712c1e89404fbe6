//! NES CLI - headless runner for the NES core

use clap::Parser;
use log::LevelFilter;
use nes_core::cartridge::InesHeader;
use nes_core::memory::{FRAME_HEIGHT, FRAME_WIDTH};
use nes_core::system::NesSystem;
use nes_core::{Button, CoreConfig, FrameGate, PaletteKind, RenderScheme, SizeCheck};
use sha1::{Digest, Sha1};
use std::error::Error;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// NES core CLI
#[derive(Parser, Debug)]
#[command(name = "nes-cli")]
#[command(about = "Drive the NES core headless and report the resulting frame", long_about = None)]
struct Args {
    /// Path to the iNES ROM file
    #[arg(short, long)]
    rom: PathBuf,

    /// Number of frames to run
    #[arg(short, long, default_value = "60")]
    frames: u32,

    /// Hold a button for the whole run (right, left, down, up, select, start, b, a)
    #[arg(long)]
    hold: Vec<Button>,

    /// Frame generator: palette or linear
    #[arg(long, default_value = "palette")]
    scheme: RenderScheme,

    /// Palette table: canonical or synthetic
    #[arg(long, default_value = "canonical")]
    palette: PaletteKind,

    /// Require the image to hold every bank the header declares
    #[arg(long)]
    strict: bool,

    /// Only render frames while the running flag is set
    #[arg(long)]
    gate_on_running: bool,

    /// Write the final frame to a PNG file
    #[arg(short, long)]
    screenshot: Option<PathBuf>,

    /// Dump the raw iNES header fields
    #[arg(short = 'H', long)]
    dump_header: bool,

    /// Log core activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> CoreConfig {
        CoreConfig {
            scheme: self.scheme,
            palette: self.palette,
            size_check: if self.strict { SizeCheck::Strict } else { SizeCheck::Header },
            frame_gate: if self.gate_on_running { FrameGate::Running } else { FrameGate::RomLoaded },
        }
    }
}

fn main() {
    let args = Args::parse();
    nes_core::logging::init_stderr(if args.verbose { LevelFilter::Debug } else { LevelFilter::Warn });

    // Load ROM file
    let rom_data = match fs::read(&args.rom) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read ROM file: {}", e);
            std::process::exit(1);
        }
    };

    if args.dump_header {
        match InesHeader::parse(&rom_data) {
            Ok(header) => dump_header(&header),
            Err(e) => eprintln!("Cannot dump header: {}", e),
        }
    }

    // Create and initialize system
    let mut system = NesSystem::with_config(args.config());
    system.init();
    let info = match system.load_rom(&rom_data) {
        Ok(info) => info,
        Err(e) => {
            eprintln!("Failed to load ROM: {}", e);
            std::process::exit(1);
        }
    };

    println!("Loaded cartridge:");
    println!("  Size:    {} bytes", info.rom_size);
    println!("  PRG ROM: {} x 16KB", info.prg_banks);
    println!("  CHR ROM: {} x 8KB{}", info.chr_banks, if info.has_chr_ram { " (CHR RAM)" } else { "" });
    println!("  Mapper:  {}", info.mapper);
    println!("  Trainer: {}  Battery: {}", info.has_trainer, info.has_battery);

    system.set_running(true);
    for button in &args.hold {
        system.set_button(button.index() as i32, true);
    }

    println!("\nRunning {} frames...", args.frames);
    for _ in 0..args.frames {
        system.frame();
    }
    println!("Completed {} frames.", system.frame_count());

    let digest = Sha1::digest(system.frame_buffer());
    println!("Frame SHA-1: {:x}", digest);

    let [r, g, b, _] = system.pixel(0, 0);
    println!("Pixel (0,0): #{:02X}{:02X}{:02X}", r, g, b);

    if let Some(path) = &args.screenshot {
        if let Err(e) = save_screenshot(&system, path) {
            eprintln!("Failed to write screenshot: {}", e);
            std::process::exit(1);
        }
        println!("Screenshot written to {}", path.display());
    }
}

fn dump_header(header: &InesHeader) {
    println!("iNES header:");
    println!("  PRG banks: {}", header.prg_rom_size);
    println!("  CHR banks: {}", header.chr_rom_size);
    println!("  Flags 6:   ${:02X}", header.flags_6);
    println!("  Flags 7:   ${:02X}", header.flags_7);
    println!("  PRG RAM:   {}", header.prg_ram_size);
    println!("  Mapper:    {}", header.mapper_number());
    println!("  Mirroring: {:?}", header.mirroring());
    println!("  Expected:  {} bytes", header.expected_rom_size());
}

/// Save the frame buffer as an RGBA PNG
fn save_screenshot(system: &NesSystem, path: &Path) -> Result<(), Box<dyn Error>> {
    let file = fs::File::create(path)?;
    let w = BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, FRAME_WIDTH as u32, FRAME_HEIGHT as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(system.frame_buffer())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_to_config() {
        let args = Args::parse_from([
            "nes-cli", "--rom", "game.nes", "--scheme", "linear", "--palette", "synthetic",
            "--strict", "--gate-on-running", "--hold", "a", "--hold", "right",
        ]);
        assert_eq!(args.config(), CoreConfig::linear());
        assert_eq!(args.hold, vec![Button::A, Button::Right]);
        assert_eq!(args.frames, 60);
    }

    #[test]
    fn test_default_config() {
        let args = Args::parse_from(["nes-cli", "-r", "game.nes"]);
        assert_eq!(args.config(), CoreConfig::default());
        assert!(args.screenshot.is_none());
    }

    #[test]
    fn test_rejects_unknown_button() {
        assert!(Args::try_parse_from(["nes-cli", "-r", "x.nes", "--hold", "turbo"]).is_err());
    }
}
