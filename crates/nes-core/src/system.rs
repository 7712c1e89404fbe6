//! NES System Integration
//!
//! `NesSystem` is the single state bundle behind the module boundary: the
//! memory arena, controller, frame counter, lifecycle flags and the
//! metadata of the loaded ROM. `init` is its only construction point for
//! host-visible state and is idempotent.

use crate::cartridge::{self, CartridgeError, RomInfo};
use crate::config::{CoreConfig, FrameGate};
use crate::controller::{Button, Controller};
use crate::memory::MemoryArena;
use crate::palette;
use crate::render::{self, FrameInputs, MapperClass};

/// Lifecycle state derived from the flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Only `init` does anything
    Uninitialized,
    /// Initialized, no ROM
    Idle,
    /// ROM loaded, running flag clear
    Loaded,
    /// ROM loaded, running flag set
    Running,
}

impl Lifecycle {
    /// Numeric code used at the module boundary
    pub fn code(self) -> u32 {
        match self {
            Lifecycle::Uninitialized => 0,
            Lifecycle::Idle => 1,
            Lifecycle::Loaded => 2,
            Lifecycle::Running => 3,
        }
    }
}

/// NES System - owns every buffer and scalar the host can observe
#[derive(Debug, Clone)]
pub struct NesSystem {
    config: CoreConfig,
    memory: MemoryArena,
    controller: Controller,
    /// Frame counter, wraps at 2^32
    frame_count: u32,
    initialized: bool,
    rom_loaded: bool,
    /// Advisory unless the config gates frames on it
    running: bool,
    rom: RomInfo,
}

impl NesSystem {
    /// Create an uninitialized system with the default config
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    /// Create an uninitialized system with `config`
    pub fn with_config(config: CoreConfig) -> Self {
        Self {
            config,
            memory: MemoryArena::new(),
            controller: Controller::new(),
            frame_count: 0,
            initialized: false,
            rom_loaded: false,
            running: false,
            rom: RomInfo::default(),
        }
    }

    /// Replace the config. Only allowed before `init`.
    pub fn configure(&mut self, config: CoreConfig) -> Result<(), SystemError> {
        if self.initialized {
            return Err(SystemError::AlreadyInitialized);
        }
        self.config = config;
        Ok(())
    }

    /// Zero all buffers, build the palette and enter Idle.
    ///
    /// A second call leaves everything as it is.
    pub fn init(&mut self) -> bool {
        if self.initialized {
            log::debug!("init: already initialized");
            return true;
        }

        self.memory.zero_all();
        palette::fill(self.config.palette, self.memory.palette_mut());
        self.memory.clear_frame();

        self.controller.clear();
        self.frame_count = 0;
        self.rom_loaded = false;
        self.running = false;
        self.rom = RomInfo::default();

        self.initialized = true;
        log::info!("Initialized ({:?} scheme, {:?} palette)", self.config.scheme, self.config.palette);
        true
    }

    /// Validate and stage an iNES image.
    ///
    /// On any failure nothing changes: the previously loaded ROM, if any,
    /// stays loaded.
    pub fn load_rom(&mut self, rom_data: &[u8]) -> Result<RomInfo, SystemError> {
        if !self.initialized {
            log::warn!("load_rom: not initialized");
            return Err(SystemError::NotInitialized);
        }

        let info = cartridge::validate(rom_data, self.config.size_check).map_err(|e| {
            log::warn!("load_rom: {}", e);
            e
        })?;

        let previous_len = if self.rom_loaded { self.rom.rom_size as usize } else { 0 };
        self.memory.stage_rom(rom_data, previous_len);
        if info.has_chr_ram {
            self.memory.seed_chr_ram();
        } else {
            self.memory.clear_chr_ram();
        }

        self.rom = info;
        self.rom_loaded = true;

        log::info!(
            "ROM loaded: {} bytes, PRG={}, CHR={}, mapper={}, CHR RAM={}",
            info.rom_size,
            info.prg_banks,
            info.chr_banks,
            info.mapper,
            if info.has_chr_ram { "yes" } else { "no" }
        );
        Ok(info)
    }

    /// Whether `frame()` would render right now
    pub fn can_render(&self) -> bool {
        let gate_open = match self.config.frame_gate {
            FrameGate::RomLoaded => true,
            FrameGate::Running => self.running,
        };
        self.initialized && self.rom_loaded && gate_open
    }

    /// Render one frame if the lifecycle allows it.
    ///
    /// Returns whether a frame was rendered. When it was not, the frame
    /// buffer and counter are untouched.
    pub fn frame(&mut self) -> bool {
        if !self.can_render() {
            return false;
        }

        self.frame_count = self.frame_count.wrapping_add(1);
        let inputs = FrameInputs {
            frame_count: self.frame_count,
            controls: self.controller.buttons(),
            mapper_class: MapperClass::from_rom(&self.rom),
        };
        let (frame, palette) = self.memory.frame_and_palette();
        render::render_frame(self.config.scheme, frame, palette, &inputs);
        true
    }

    /// Clear controls, frame counter and frame buffer. The ROM stays loaded.
    pub fn reset(&mut self) {
        if !self.initialized {
            return;
        }

        self.controller.clear();
        self.frame_count = 0;
        self.memory.clear_frame();
        if self.rom_loaded && self.rom.has_chr_ram {
            self.memory.clear_chr_ram();
        }
        log::info!("Reset");
    }

    /// Update one controller bit. Indices outside 0..=7 are ignored.
    pub fn set_button(&mut self, button: i32, pressed: bool) {
        if !self.initialized {
            return;
        }
        if let Some(button) = Button::from_index(button) {
            self.controller.set_button(button, pressed);
        }
    }

    pub fn set_running(&mut self, running: bool) {
        if !self.initialized {
            return;
        }
        if self.running != running {
            log::debug!("Running state: {}", running);
        }
        self.running = running;
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match (self.initialized, self.rom_loaded, self.running) {
            (false, _, _) => Lifecycle::Uninitialized,
            (true, false, _) => Lifecycle::Idle,
            (true, true, false) => Lifecycle::Loaded,
            (true, true, true) => Lifecycle::Running,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_rom_loaded(&self) -> bool {
        self.rom_loaded
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Controller bitfield
    pub fn controls(&self) -> u8 {
        self.controller.buttons()
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Metadata of the loaded ROM; all zero until the first successful load
    pub fn rom_info(&self) -> &RomInfo {
        &self.rom
    }

    pub fn frame_buffer(&self) -> &[u8] {
        self.memory.frame_buffer()
    }

    pub fn palette(&self) -> &[u8] {
        self.memory.palette()
    }

    pub fn rom_buffer(&self) -> &[u8] {
        self.memory.rom_buffer()
    }

    pub fn chr_ram(&self) -> &[u8] {
        self.memory.chr_ram()
    }

    /// RGBA of pixel `(x, y)`
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        self.memory.pixel(x, y)
    }
}

impl Default for NesSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// System error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemError {
    /// Called before `init`
    NotInitialized,
    /// Config change after `init`
    AlreadyInitialized,
    /// ROM image rejected
    Cartridge(CartridgeError),
}

impl From<CartridgeError> for SystemError {
    fn from(e: CartridgeError) -> Self {
        SystemError::Cartridge(e)
    }
}

impl std::fmt::Display for SystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemError::NotInitialized => write!(f, "Core not initialized"),
            SystemError::AlreadyInitialized => write!(f, "Core already initialized"),
            SystemError::Cartridge(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SystemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SystemError::Cartridge(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SizeCheck;

    fn rom(prg: u8, chr: u8, flags_6: u8) -> Vec<u8> {
        let mut rom = vec![0u8; 16 + prg as usize * 16384 + chr as usize * 8192];
        rom[0..4].copy_from_slice(b"NES\x1A");
        rom[4] = prg;
        rom[5] = chr;
        rom[6] = flags_6;
        rom
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut system = NesSystem::new();
        assert_eq!(system.lifecycle(), Lifecycle::Uninitialized);

        assert!(system.init());
        assert_eq!(system.lifecycle(), Lifecycle::Idle);

        system.load_rom(&rom(1, 1, 0)).unwrap();
        assert_eq!(system.lifecycle(), Lifecycle::Loaded);

        system.set_running(true);
        assert_eq!(system.lifecycle(), Lifecycle::Running);

        system.reset();
        assert_eq!(system.lifecycle(), Lifecycle::Running);
    }

    #[test]
    fn test_calls_before_init_are_ignored() {
        let mut system = NesSystem::new();
        system.set_button(0, true);
        system.set_running(true);
        system.reset();
        assert!(!system.frame());
        assert_eq!(system.load_rom(&rom(1, 1, 0)), Err(SystemError::NotInitialized));

        assert_eq!(system.controls(), 0);
        assert!(!system.is_running());
        assert!(!system.is_rom_loaded());
    }

    #[test]
    fn test_configure_only_before_init() {
        let mut system = NesSystem::new();
        assert!(system.configure(CoreConfig::linear()).is_ok());
        system.init();
        assert_eq!(
            system.configure(CoreConfig::default()),
            Err(SystemError::AlreadyInitialized)
        );
        assert_eq!(*system.config(), CoreConfig::linear());
    }

    #[test]
    fn test_failed_load_keeps_previous_rom() {
        let mut system = NesSystem::new();
        system.init();
        let first = system.load_rom(&rom(1, 1, 0x10)).unwrap();

        let mut bad = rom(2, 0, 0x20);
        bad[0] = 0;
        assert!(system.load_rom(&bad).is_err());

        assert_eq!(*system.rom_info(), first);
        assert_eq!(&system.rom_buffer()[0..4], b"NES\x1A");
        assert_eq!(system.rom_info().mapper, 1);
    }

    #[test]
    fn test_chr_ram_seeded_and_cleared() {
        let mut system = NesSystem::new();
        system.init();
        system.load_rom(&rom(1, 0, 0x20)).unwrap();
        assert_eq!(system.chr_ram()[0x42], 0x42);

        system.reset();
        assert!(system.chr_ram().iter().all(|&b| b == 0));

        system.load_rom(&rom(1, 1, 0)).unwrap();
        assert!(system.chr_ram().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_running_gate() {
        let mut system = NesSystem::with_config(CoreConfig {
            frame_gate: FrameGate::Running,
            ..CoreConfig::default()
        });
        system.init();
        system.load_rom(&rom(1, 1, 0)).unwrap();

        assert!(!system.frame());
        assert_eq!(system.frame_count(), 0);

        system.set_running(true);
        assert!(system.frame());
        assert_eq!(system.frame_count(), 1);
    }

    #[test]
    fn test_strict_size_check() {
        let mut system = NesSystem::with_config(CoreConfig {
            size_check: SizeCheck::Strict,
            ..CoreConfig::default()
        });
        system.init();

        let full = rom(1, 1, 0);
        assert!(system.load_rom(&full[..full.len() - 1]).is_err());
        assert!(!system.is_rom_loaded());
        assert!(system.load_rom(&full).is_ok());
    }

    #[test]
    fn test_frame_counter_wraps() {
        let mut system = NesSystem::new();
        system.init();
        system.load_rom(&rom(1, 1, 0)).unwrap();
        system.frame_count = u32::MAX;

        assert!(system.frame());
        assert_eq!(system.frame_count(), 0);
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;

        let err = SystemError::from(CartridgeError::NoPrgBanks);
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Invalid iNES header: no PRG banks");
    }
}
