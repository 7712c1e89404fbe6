//! NES WASM - module boundary for the NES core
//!
//! Two surfaces are exported:
//! - Free functions with fixed names (`init`, `loadRom`, `frame`, ...) that
//!   drive one module-level `NesSystem`. Buffer accessors return offsets
//!   into linear memory that stay valid for the life of the module.
//! - `NesEmulator`, a class wrapping an independent `NesSystem`.

use std::cell::RefCell;

use js_sys::Uint8Array;
use nes_core::memory::{FRAME_BUFFER_SIZE, PALETTE_SIZE};
use nes_core::system::NesSystem;
use nes_core::CoreConfig;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsError, JsValue};

mod console;

thread_local! {
    static CORE: RefCell<NesSystem> = RefCell::new(NesSystem::new());
}

fn with_core<R>(f: impl FnOnce(&mut NesSystem) -> R) -> R {
    CORE.with(|core| f(&mut core.borrow_mut()))
}

fn flag(value: bool) -> i32 {
    i32::from(value)
}

/// Zero buffers, populate the palette, enter Idle. Always returns 1.
#[wasm_bindgen]
pub fn init() -> i32 {
    flag(with_core(|core| core.init()))
}

/// Validate and copy an iNES image. Returns 1 on success, 0 on failure.
#[wasm_bindgen(js_name = "loadRom")]
pub fn load_rom(rom_data: &[u8]) -> i32 {
    flag(with_core(|core| core.load_rom(rom_data).is_ok()))
}

/// Render one frame if a ROM is loaded
#[wasm_bindgen]
pub fn frame() {
    with_core(|core| {
        core.frame();
    });
}

/// Clear controls, frame counter and frame buffer
#[wasm_bindgen]
pub fn reset() {
    with_core(|core| core.reset());
}

/// Set controller bit `button` (0..=7). Other indices are ignored.
#[wasm_bindgen(js_name = "setButton")]
pub fn set_button(button: i32, pressed: i32) {
    with_core(|core| core.set_button(button, pressed != 0));
}

#[wasm_bindgen(js_name = "setRunning")]
pub fn set_running(running: i32) {
    with_core(|core| core.set_running(running != 0));
}

/// Base of the 256x240 RGBA frame buffer
#[wasm_bindgen(js_name = "getFrameBuffer")]
pub fn get_frame_buffer() -> *const u8 {
    with_core(|core| core.frame_buffer().as_ptr())
}

#[wasm_bindgen(js_name = "getFrameBufferSize")]
pub fn get_frame_buffer_size() -> i32 {
    FRAME_BUFFER_SIZE as i32
}

/// Base of the 64-entry RGBA palette
#[wasm_bindgen(js_name = "getPalette")]
pub fn get_palette() -> *const u8 {
    with_core(|core| core.palette().as_ptr())
}

#[wasm_bindgen(js_name = "getPaletteSize")]
pub fn get_palette_size() -> i32 {
    PALETTE_SIZE as i32
}

/// Base of the ROM staging buffer
#[wasm_bindgen(js_name = "getRomBuffer")]
pub fn get_rom_buffer() -> *const u8 {
    with_core(|core| core.rom_buffer().as_ptr())
}

/// Base of the 8KB CHR RAM region
#[wasm_bindgen(js_name = "getChrRam")]
pub fn get_chr_ram() -> *const u8 {
    with_core(|core| core.chr_ram().as_ptr())
}

#[wasm_bindgen(js_name = "getFrameCount")]
pub fn get_frame_count() -> u32 {
    with_core(|core| core.frame_count())
}

#[wasm_bindgen(js_name = "getControls")]
pub fn get_controls() -> u32 {
    with_core(|core| u32::from(core.controls()))
}

#[wasm_bindgen(js_name = "getRomSize")]
pub fn get_rom_size() -> u32 {
    with_core(|core| core.rom_info().rom_size)
}

#[wasm_bindgen(js_name = "getMapper")]
pub fn get_mapper() -> u32 {
    with_core(|core| u32::from(core.rom_info().mapper))
}

#[wasm_bindgen(js_name = "getPrgBanks")]
pub fn get_prg_banks() -> u32 {
    with_core(|core| u32::from(core.rom_info().prg_banks))
}

#[wasm_bindgen(js_name = "getChrBanks")]
pub fn get_chr_banks() -> u32 {
    with_core(|core| u32::from(core.rom_info().chr_banks))
}

#[wasm_bindgen(js_name = "hasChrRam")]
pub fn has_chr_ram() -> i32 {
    with_core(|core| flag(core.rom_info().has_chr_ram))
}

#[wasm_bindgen(js_name = "hasTrainer")]
pub fn has_trainer() -> i32 {
    with_core(|core| flag(core.rom_info().has_trainer))
}

#[wasm_bindgen(js_name = "hasBattery")]
pub fn has_battery() -> i32 {
    with_core(|core| flag(core.rom_info().has_battery))
}

#[wasm_bindgen(js_name = "isInitialized")]
pub fn is_initialized() -> i32 {
    with_core(|core| flag(core.is_initialized()))
}

#[wasm_bindgen(js_name = "isRomLoaded")]
pub fn is_rom_loaded() -> i32 {
    with_core(|core| flag(core.is_rom_loaded()))
}

#[wasm_bindgen(js_name = "isRunning")]
pub fn is_running() -> i32 {
    with_core(|core| flag(core.is_running()))
}

/// 0 uninitialized, 1 idle, 2 loaded, 3 running
#[wasm_bindgen(js_name = "getLifecycle")]
pub fn get_lifecycle() -> u32 {
    with_core(|core| core.lifecycle().code())
}

/// Pick the core variant before `init`.
///
/// Bit 0 linear renderer, bit 1 synthetic palette, bit 2 strict size
/// check, bit 3 frames only while running. Returns 0 once initialized.
#[wasm_bindgen]
pub fn configure(flags: u32) -> i32 {
    flag(with_core(|core| core.configure(CoreConfig::from_flags(flags)).is_ok()))
}

/// Route core logging to the browser console. 0 = off .. 5 = trace.
#[wasm_bindgen(js_name = "setLogLevel")]
pub fn set_log_level(level: u32) {
    console::install(level);
}

/// The module's linear memory, for building typed views
#[wasm_bindgen(js_name = "getMemory")]
pub fn get_memory() -> JsValue {
    wasm_bindgen::memory()
}

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// NES core instance for WASM hosts that want their own state
#[wasm_bindgen]
pub struct NesEmulator {
    system: NesSystem,
}

#[wasm_bindgen]
impl NesEmulator {
    /// Create an emulator with the default config
    #[wasm_bindgen(constructor)]
    pub fn new() -> NesEmulator {
        Self {
            system: NesSystem::new(),
        }
    }

    /// Create an emulator from a `configure`-style flags word
    #[wasm_bindgen(js_name = "withFlags")]
    pub fn with_flags(flags: u32) -> NesEmulator {
        Self {
            system: NesSystem::with_config(CoreConfig::from_flags(flags)),
        }
    }

    pub fn init(&mut self) -> bool {
        self.system.init()
    }

    /// Load a ROM from bytes
    #[wasm_bindgen(js_name = "loadRom")]
    pub fn load_rom(&mut self, rom_data: &[u8]) -> Result<(), JsError> {
        self.system
            .load_rom(rom_data)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(())
    }

    /// Render one frame; false when the lifecycle does not allow it
    pub fn frame(&mut self) -> bool {
        self.system.frame()
    }

    /// Reset the emulator
    pub fn reset(&mut self) {
        self.system.reset();
    }

    #[wasm_bindgen(js_name = "setButton")]
    pub fn set_button(&mut self, button: i32, pressed: bool) {
        self.system.set_button(button, pressed);
    }

    #[wasm_bindgen(js_name = "setRunning")]
    pub fn set_running(&mut self, running: bool) {
        self.system.set_running(running);
    }

    /// Get the current frame count
    #[wasm_bindgen(getter, js_name = "frameCount")]
    pub fn frame_count(&self) -> u32 {
        self.system.frame_count()
    }

    #[wasm_bindgen(getter)]
    pub fn controls(&self) -> u8 {
        self.system.controls()
    }

    #[wasm_bindgen(getter)]
    pub fn mapper(&self) -> u8 {
        self.system.rom_info().mapper
    }

    #[wasm_bindgen(getter)]
    pub fn lifecycle(&self) -> u32 {
        self.system.lifecycle().code()
    }

    /// Copy of the RGBA frame buffer (245,760 bytes)
    #[wasm_bindgen(getter, js_name = "frameBuffer")]
    pub fn frame_buffer(&self) -> Uint8Array {
        Uint8Array::from(self.system.frame_buffer())
    }

    /// Pointer to the frame buffer inside linear memory
    #[wasm_bindgen(js_name = "frameBufferPtr")]
    pub fn frame_buffer_ptr(&self) -> *const u8 {
        self.system.frame_buffer().as_ptr()
    }

    /// Copy of the RGBA palette (256 bytes)
    #[wasm_bindgen(getter)]
    pub fn palette(&self) -> Uint8Array {
        Uint8Array::from(self.system.palette())
    }
}

impl Default for NesEmulator {
    fn default() -> Self {
        Self::new()
    }
}
