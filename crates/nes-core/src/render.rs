//! Frame generator
//!
//! Fills the 256x240 RGBA frame buffer with a deterministic pattern that
//! depends only on pixel position, the frame counter, the controller
//! bits and the mapper class of the loaded ROM. All channel arithmetic
//! wraps modulo 256 and alpha is always opaque.

use crate::cartridge::RomInfo;
use crate::controller::Button;
use crate::memory::{BYTES_PER_PIXEL, FRAME_BUFFER_SIZE, FRAME_WIDTH, PALETTE_ENTRIES};

/// Pixel derivation rule
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RenderScheme {
    /// 8x8 blocks of palette colors scrolling every 4 frames, with the
    /// mapper 2 CHR RAM overlay
    #[default]
    Palette,
    /// Raw gradient over x, y and the frame counter
    Linear,
}

/// Mapper classes that change the generated picture
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MapperClass {
    /// Mapper 0 and everything else
    #[default]
    Standard,
    /// Mapper 2 (UxROM) with CHR RAM
    UnromChrRam,
}

impl MapperClass {
    pub fn from_rom(info: &RomInfo) -> Self {
        if info.mapper == 2 && info.has_chr_ram {
            MapperClass::UnromChrRam
        } else {
            MapperClass::Standard
        }
    }
}

/// Per-frame inputs to the generator
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameInputs {
    /// Frame counter after this frame's increment
    pub frame_count: u32,
    pub controls: u8,
    pub mapper_class: MapperClass,
}

/// Apply controller modulation to an RGB triple
pub fn modulate(controls: u8, rgb: [u8; 3]) -> [u8; 3] {
    let [mut r, mut g, mut b] = rgb;
    let pressed = |button: Button| controls & button.mask() != 0;

    if pressed(Button::Right) {
        r = r.wrapping_add(64);
    }
    if pressed(Button::Left) {
        r = r.wrapping_sub(32);
    }
    if pressed(Button::Down) {
        g = g.wrapping_add(64);
    }
    if pressed(Button::Up) {
        g = g.wrapping_sub(32);
    }
    if pressed(Button::B) {
        b = b.wrapping_add(96);
    }
    if pressed(Button::A) {
        b = b.wrapping_add(128);
    }
    [r, g, b]
}

/// Palette index for pixel `(x, y)` under the palette scheme
pub fn palette_index(x: usize, y: usize, frame_count: u32) -> usize {
    ((x >> 3) + (y >> 3) + (frame_count >> 2) as usize) % PALETTE_ENTRIES
}

fn palette_pixel(x: usize, y: usize, palette: &[u8], inputs: &FrameInputs) -> [u8; 3] {
    let base = palette_index(x, y, inputs.frame_count) * 4;
    let rgb = [palette[base], palette[base + 1], palette[base + 2]];
    let [mut r, g, mut b] = modulate(inputs.controls, rgb);

    match inputs.mapper_class {
        MapperClass::Standard => {}
        MapperClass::UnromChrRam => {
            if (x + y) & 8 != 0 {
                r = r.wrapping_add(32);
                b = b.wrapping_add(32);
            }
        }
    }
    [r, g, b]
}

fn linear_pixel(x: usize, y: usize, inputs: &FrameInputs) -> [u8; 3] {
    let frame = inputs.frame_count as usize;
    let rgb = [
        (x + frame) as u8,
        (y + frame) as u8,
        (x + y + frame) as u8,
    ];
    modulate(inputs.controls, rgb)
}

/// Compute the RGBA of a single pixel
pub fn pixel(scheme: RenderScheme, x: usize, y: usize, palette: &[u8], inputs: &FrameInputs) -> [u8; 4] {
    let [r, g, b] = match scheme {
        RenderScheme::Palette => palette_pixel(x, y, palette, inputs),
        RenderScheme::Linear => linear_pixel(x, y, inputs),
    };
    [r, g, b, 0xFF]
}

/// Render a whole frame into `frame`
pub fn render_frame(scheme: RenderScheme, frame: &mut [u8], palette: &[u8], inputs: &FrameInputs) {
    debug_assert_eq!(frame.len(), FRAME_BUFFER_SIZE);

    for (i, out) in frame.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
        let x = i % FRAME_WIDTH;
        let y = i / FRAME_WIDTH;
        out.copy_from_slice(&pixel(scheme, x, y, palette, inputs));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{pixel_offset, PALETTE_SIZE};
    use crate::palette::{self, PaletteKind};

    fn canonical() -> [u8; PALETTE_SIZE] {
        let mut table = [0u8; PALETTE_SIZE];
        palette::fill(PaletteKind::Canonical, &mut table);
        table
    }

    #[test]
    fn test_modulate_wraps() {
        assert_eq!(modulate(0, [10, 20, 30]), [10, 20, 30]);
        assert_eq!(modulate(Button::Right.mask(), [200, 0, 0]), [8, 0, 0]);
        assert_eq!(modulate(Button::Left.mask(), [16, 0, 0]), [240, 0, 0]);
        assert_eq!(modulate(Button::Up.mask(), [0, 0, 0]), [0, 224, 0]);
        assert_eq!(
            modulate(Button::A.mask() | Button::B.mask(), [0, 0, 100]),
            [0, 0, 68]
        );
        // Select and Start do not change the picture
        assert_eq!(
            modulate(Button::Select.mask() | Button::Start.mask(), [1, 2, 3]),
            [1, 2, 3]
        );
    }

    #[test]
    fn test_palette_index_blocks() {
        assert_eq!(palette_index(0, 0, 0), 0);
        assert_eq!(palette_index(7, 7, 3), 0);
        assert_eq!(palette_index(8, 0, 0), 1);
        assert_eq!(palette_index(0, 8, 4), 2);
        assert_eq!(palette_index(255, 239, 0), (31 + 29) % 64);
        assert_eq!(palette_index(0, 0, u32::MAX), (u32::MAX >> 2) as usize % 64);
    }

    #[test]
    fn test_mapper_class() {
        let mut info = RomInfo {
            mapper: 2,
            has_chr_ram: true,
            ..RomInfo::default()
        };
        assert_eq!(MapperClass::from_rom(&info), MapperClass::UnromChrRam);
        info.has_chr_ram = false;
        assert_eq!(MapperClass::from_rom(&info), MapperClass::Standard);
        info.mapper = 0;
        info.has_chr_ram = true;
        assert_eq!(MapperClass::from_rom(&info), MapperClass::Standard);
    }

    #[test]
    fn test_unrom_overlay() {
        let table = canonical();
        let inputs = FrameInputs {
            frame_count: 1,
            controls: 0,
            mapper_class: MapperClass::UnromChrRam,
        };
        // (x + y) & 8 == 0: plain palette color
        assert_eq!(pixel(RenderScheme::Palette, 0, 0, &table, &inputs), [84, 84, 84, 255]);
        // (x + y) & 8 != 0 inside the same block: r and b shifted by 32
        assert_eq!(pixel(RenderScheme::Palette, 4, 4, &table, &inputs), [116, 84, 116, 255]);
    }

    #[test]
    fn test_linear_ignores_mapper_class() {
        let table = canonical();
        let standard = FrameInputs { frame_count: 5, ..FrameInputs::default() };
        let unrom = FrameInputs { mapper_class: MapperClass::UnromChrRam, ..standard };
        assert_eq!(
            pixel(RenderScheme::Linear, 4, 4, &table, &standard),
            pixel(RenderScheme::Linear, 4, 4, &table, &unrom)
        );
        assert_eq!(pixel(RenderScheme::Linear, 4, 4, &table, &standard), [9, 9, 13, 255]);
    }

    #[test]
    fn test_render_frame_fills_every_pixel() {
        let table = canonical();
        let mut frame = vec![0u8; FRAME_BUFFER_SIZE];
        let inputs = FrameInputs { frame_count: 1, ..FrameInputs::default() };
        render_frame(RenderScheme::Linear, &mut frame, &table, &inputs);

        assert!(frame.chunks_exact(4).all(|p| p[3] == 255));
        let last = pixel_offset(255, 239);
        assert_eq!(&frame[last..last + 4], &[0, 240, 239, 255]);
    }
}
