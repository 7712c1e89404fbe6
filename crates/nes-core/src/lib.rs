//! NES Core - Pure Rust core behind the NES module boundary
//!
//! This crate owns the fixed memory arena, the lifecycle state machine, the
//! iNES header parser and the synthetic frame generator. There is no CPU,
//! PPU or APU: the output is a deterministic function of the loaded ROM's
//! mapper class, the frame counter and the controller bits.
//! It contains no WASM or web dependencies.

#![forbid(unsafe_code)]

/// Fixed-size buffers shared with the host
pub mod memory;
/// Palette tables
pub mod palette;
/// Controller bitfield
pub mod controller;
/// iNES header parsing and validation
pub mod cartridge;
/// Synthetic frame generation
pub mod render;
/// Core configuration
pub mod config;
/// State bundle and lifecycle
pub mod system;
/// Stderr logger for native runners
pub mod logging;

pub use cartridge::{CartridgeError, InesHeader, RomInfo};
pub use config::{CoreConfig, FrameGate, SizeCheck};
pub use controller::Button;
pub use palette::PaletteKind;
pub use render::RenderScheme;
pub use system::{Lifecycle, NesSystem, SystemError};
