//! NES Desktop - presents the NES core frame buffer with minifb
//!
//! Keys:
//! - Arrows: D-pad
//! - Z / X: B / A
//! - Right Shift / Enter: Select / Start
//! - Space: toggle running, R: reset, Escape: quit

use clap::Parser;
use log::LevelFilter;
use minifb::{Key, Window, WindowOptions};
use nes_core::memory::{FRAME_HEIGHT, FRAME_WIDTH};
use nes_core::system::NesSystem;
use nes_core::{Button, CoreConfig, FrameGate, PaletteKind, RenderScheme, SizeCheck};
use std::fs;
use std::path::PathBuf;

/// NES core desktop runner
#[derive(Parser, Debug)]
#[command(name = "nes-desktop")]
#[command(about = "A NES core desktop runner", long_about = None)]
struct Args {
    /// Path to the iNES ROM file
    #[arg(short, long)]
    rom: PathBuf,

    /// Screen scale factor (1-4)
    #[arg(short, long, default_value = "2")]
    scale: usize,

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

    /// Log core activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Keyboard layout for the controller
const KEY_MAP: [(Key, Button); 8] = [
    (Key::Right, Button::Right),
    (Key::Left, Button::Left),
    (Key::Down, Button::Down),
    (Key::Up, Button::Up),
    (Key::RightShift, Button::Select),
    (Key::Enter, Button::Start),
    (Key::Z, Button::B),
    (Key::X, Button::A),
];

fn main() {
    let args = Args::parse();
    nes_core::logging::init_stderr(if args.verbose { LevelFilter::Debug } else { LevelFilter::Info });

    // Load ROM file
    let rom_data = match fs::read(&args.rom) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read ROM file: {}", e);
            std::process::exit(1);
        }
    };

    let config = CoreConfig {
        scheme: args.scheme,
        palette: args.palette,
        size_check: if args.strict { SizeCheck::Strict } else { SizeCheck::Header },
        frame_gate: if args.gate_on_running { FrameGate::Running } else { FrameGate::RomLoaded },
    };

    // Create and initialize system
    let mut system = NesSystem::with_config(config);
    system.init();
    if let Err(e) = system.load_rom(&rom_data) {
        eprintln!("Failed to load ROM: {}", e);
        std::process::exit(1);
    }
    system.set_running(true);

    // Create window with specified scale
    let scale = args.scale.clamp(1, 4);
    let mut window = match Window::new(
        "NES Core",
        FRAME_WIDTH * scale,
        FRAME_HEIGHT * scale,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    ) {
        Ok(window) => window,
        Err(e) => {
            eprintln!("Failed to create window: {}", e);
            std::process::exit(1);
        }
    };
    window.set_target_fps(60);

    // minifb wants 0x00RRGGBB per pixel
    let mut pixels = vec![0u32; FRAME_WIDTH * FRAME_HEIGHT];

    println!("Press ESC or close the window to exit.");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        for (key, button) in KEY_MAP {
            system.set_button(button.index() as i32, window.is_key_down(key));
        }
        if window.is_key_pressed(Key::Space, minifb::KeyRepeat::No) {
            let running = !system.is_running();
            system.set_running(running);
        }
        if window.is_key_pressed(Key::R, minifb::KeyRepeat::No) {
            system.reset();
        }

        system.frame();
        convert_frame(system.frame_buffer(), &mut pixels);

        if let Err(e) = window.update_with_buffer(&pixels, FRAME_WIDTH, FRAME_HEIGHT) {
            eprintln!("Failed to update window: {}", e);
            break;
        }
    }

    println!("Closed after {} frames.", system.frame_count());
}

/// RGBA bytes to minifb's 0RGB words
fn convert_frame(rgba: &[u8], out: &mut [u32]) {
    for (pixel, px) in out.iter_mut().zip(rgba.chunks_exact(4)) {
        *pixel = (u32::from(px[0]) << 16) | (u32::from(px[1]) << 8) | u32::from(px[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_frame() {
        let rgba = [0x12, 0x34, 0x56, 0xFF, 0xFF, 0x00, 0x80, 0xFF];
        let mut out = [0u32; 2];
        convert_frame(&rgba, &mut out);
        assert_eq!(out, [0x0012_3456, 0x00FF_0080]);
    }

    #[test]
    fn test_key_map_covers_every_button() {
        for button in Button::ALL {
            assert!(KEY_MAP.iter().any(|&(_, mapped)| mapped == button));
        }
    }
}
