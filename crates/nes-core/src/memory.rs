//! Fixed memory arena
//!
//! All persistent buffers the host can see live here:
//! - Frame buffer: 256x240 RGBA, row-major, stride 1024 bytes
//! - Palette: 64 RGBA entries
//! - ROM staging buffer: up to 2MB
//! - CHR RAM: 8KB, only meaningful for cartridges without CHR ROM
//!
//! Every region is allocated once when the arena is built and never
//! resized, so base addresses are stable for the arena's lifetime.

/// Visible frame width in pixels
pub const FRAME_WIDTH: usize = 256;
/// Visible frame height in pixels
pub const FRAME_HEIGHT: usize = 240;
/// RGBA8
pub const BYTES_PER_PIXEL: usize = 4;
/// Bytes per frame buffer row
pub const FRAME_STRIDE: usize = FRAME_WIDTH * BYTES_PER_PIXEL;
/// Frame buffer size in bytes (245,760)
pub const FRAME_BUFFER_SIZE: usize = FRAME_STRIDE * FRAME_HEIGHT;
/// Number of palette entries
pub const PALETTE_ENTRIES: usize = 64;
/// Palette size in bytes (64 entries x RGBA)
pub const PALETTE_SIZE: usize = PALETTE_ENTRIES * 4;
/// Largest accepted ROM image (2MB)
pub const ROM_BUFFER_SIZE: usize = 2 * 1024 * 1024;
/// CHR RAM size (8KB)
pub const CHR_RAM_SIZE: usize = 8 * 1024;

/// Byte offset of pixel `(x, y)` in the frame buffer
pub const fn pixel_offset(x: usize, y: usize) -> usize {
    (y * FRAME_WIDTH + x) * BYTES_PER_PIXEL
}

/// Statically sized buffers shared with the host
#[derive(Debug, Clone)]
pub struct MemoryArena {
    frame_buffer: Box<[u8]>,
    palette: Box<[u8]>,
    rom_buffer: Box<[u8]>,
    chr_ram: Box<[u8]>,
}

impl MemoryArena {
    /// Allocate every region, zero-filled
    pub fn new() -> Self {
        Self {
            frame_buffer: vec![0; FRAME_BUFFER_SIZE].into_boxed_slice(),
            palette: vec![0; PALETTE_SIZE].into_boxed_slice(),
            rom_buffer: vec![0; ROM_BUFFER_SIZE].into_boxed_slice(),
            chr_ram: vec![0; CHR_RAM_SIZE].into_boxed_slice(),
        }
    }

    /// Zero every region
    pub fn zero_all(&mut self) {
        self.frame_buffer.fill(0);
        self.palette.fill(0);
        self.rom_buffer.fill(0);
        self.chr_ram.fill(0);
    }

    /// Black out the frame buffer, keeping alpha opaque
    pub fn clear_frame(&mut self) {
        for pixel in self.frame_buffer.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&[0, 0, 0, 0xFF]);
        }
    }

    /// Copy a validated ROM image into the staging buffer.
    ///
    /// `previous_len` is the size of the image currently staged; any bytes
    /// it had beyond the new image are zeroed so the buffer only ever holds
    /// one image.
    pub fn stage_rom(&mut self, rom_data: &[u8], previous_len: usize) {
        let len = rom_data.len();
        self.rom_buffer[..len].copy_from_slice(rom_data);
        if previous_len > len {
            self.rom_buffer[len..previous_len].fill(0);
        }
    }

    /// Fill CHR RAM with the low byte of each index
    pub fn seed_chr_ram(&mut self) {
        for (i, byte) in self.chr_ram.iter_mut().enumerate() {
            *byte = i as u8;
        }
    }

    pub fn clear_chr_ram(&mut self) {
        self.chr_ram.fill(0);
    }

    /// RGBA of pixel `(x, y)`
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let offset = pixel_offset(x, y);
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.frame_buffer[offset..offset + BYTES_PER_PIXEL]);
        rgba
    }

    pub fn frame_buffer(&self) -> &[u8] {
        &self.frame_buffer
    }

    pub fn frame_buffer_mut(&mut self) -> &mut [u8] {
        &mut self.frame_buffer
    }

    pub fn palette(&self) -> &[u8] {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut [u8] {
        &mut self.palette
    }

    pub fn rom_buffer(&self) -> &[u8] {
        &self.rom_buffer
    }

    pub fn chr_ram(&self) -> &[u8] {
        &self.chr_ram
    }

    /// Split borrow used by the frame generator: writable frame, read-only palette
    pub fn frame_and_palette(&mut self) -> (&mut [u8], &[u8]) {
        (&mut self.frame_buffer, &self.palette)
    }
}

impl Default for MemoryArena {
    fn default() -> Self {
        Self::new()
    }
}
