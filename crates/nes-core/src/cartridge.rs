//! iNES header parsing and ROM validation
//!
//! An iNES image is a 16-byte header followed by an optional 512-byte
//! trainer, the PRG ROM banks (16KB each) and the CHR ROM banks (8KB each).
//! A CHR bank count of zero means the cartridge carries CHR RAM instead.

use crate::config::SizeCheck;
use crate::memory::ROM_BUFFER_SIZE;

/// iNES header size
pub const HEADER_SIZE: usize = 16;

/// iNES magic: "NES\x1A"
pub const INES_MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];

/// Trainer size when flags 6 bit 2 is set
pub const TRAINER_SIZE: usize = 512;

/// PRG ROM bank size
pub const PRG_BANK_SIZE: usize = 16 * 1024;

/// CHR ROM bank size
pub const CHR_BANK_SIZE: usize = 8 * 1024;

/// Nametable mirroring declared by flags 6
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    #[default]
    Horizontal,
    Vertical,
    FourScreen,
}

/// iNES header structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InesHeader {
    /// Magic number: "NES\x1A"
    pub magic: [u8; 4],
    /// PRG ROM size in 16KB units
    pub prg_rom_size: u8,
    /// CHR ROM size in 8KB units
    pub chr_rom_size: u8,
    /// Flags 6
    pub flags_6: u8,
    /// Flags 7
    pub flags_7: u8,
    /// PRG RAM size in 8KB units
    pub prg_ram_size: u8,
    /// Flags 9
    pub flags_9: u8,
    /// Flags 10
    pub flags_10: u8,
    /// Padding
    pub padding: [u8; 5],
}

impl InesHeader {
    /// Parse an iNES header from the first 16 bytes of `bytes`
    pub fn parse(bytes: &[u8]) -> Result<Self, CartridgeError> {
        if bytes.len() < HEADER_SIZE {
            return Err(CartridgeError::TooSmall { size: bytes.len() });
        }

        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if magic != INES_MAGIC {
            return Err(CartridgeError::BadMagic(magic));
        }

        Ok(Self {
            magic,
            prg_rom_size: bytes[4],
            chr_rom_size: bytes[5],
            flags_6: bytes[6],
            flags_7: bytes[7],
            prg_ram_size: bytes[8],
            flags_9: bytes[9],
            flags_10: bytes[10],
            padding: [bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]],
        })
    }

    /// Mapper number: low nibble from flags 6, high nibble from flags 7
    pub fn mapper_number(&self) -> u8 {
        (self.flags_6 >> 4) | (self.flags_7 & 0xF0)
    }

    /// Check if trainer is present
    pub fn has_trainer(&self) -> bool {
        (self.flags_6 & 0x04) != 0
    }

    /// Check if battery-backed PRG RAM is present
    pub fn has_battery(&self) -> bool {
        (self.flags_6 & 0x02) != 0
    }

    /// No CHR ROM banks means CHR RAM
    pub fn has_chr_ram(&self) -> bool {
        self.chr_rom_size == 0
    }

    pub fn mirroring(&self) -> Mirroring {
        if self.flags_6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if self.flags_6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        }
    }

    /// Bytes the header says the image holds: header, trainer, PRG and CHR banks
    pub fn expected_rom_size(&self) -> usize {
        let trainer = if self.has_trainer() { TRAINER_SIZE } else { 0 };
        HEADER_SIZE
            + trainer
            + self.prg_rom_size as usize * PRG_BANK_SIZE
            + self.chr_rom_size as usize * CHR_BANK_SIZE
    }
}

/// Metadata recorded for the loaded ROM
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RomInfo {
    /// Image size in bytes, header included
    pub rom_size: u32,
    pub prg_banks: u8,
    pub chr_banks: u8,
    pub mapper: u8,
    pub has_chr_ram: bool,
    pub has_trainer: bool,
    pub has_battery: bool,
    pub mirroring: Mirroring,
}

impl RomInfo {
    fn from_header(header: &InesHeader, rom_size: usize) -> Self {
        Self {
            rom_size: rom_size as u32,
            prg_banks: header.prg_rom_size,
            chr_banks: header.chr_rom_size,
            mapper: header.mapper_number(),
            has_chr_ram: header.has_chr_ram(),
            has_trainer: header.has_trainer(),
            has_battery: header.has_battery(),
            mirroring: header.mirroring(),
        }
    }
}

/// Validate a full ROM image.
///
/// Checks run in a fixed order and the first failure wins: minimum size,
/// maximum size, magic, PRG bank count, then (strict mode only) the
/// declared bank footprint.
pub fn validate(rom_data: &[u8], size_check: SizeCheck) -> Result<RomInfo, CartridgeError> {
    let size = rom_data.len();
    if size < HEADER_SIZE {
        return Err(CartridgeError::TooSmall { size });
    }
    if size > ROM_BUFFER_SIZE {
        return Err(CartridgeError::TooLarge { size });
    }

    let header = InesHeader::parse(rom_data)?;

    if header.prg_rom_size == 0 {
        return Err(CartridgeError::NoPrgBanks);
    }

    if size_check == SizeCheck::Strict {
        let expected = header.expected_rom_size();
        if size < expected {
            return Err(CartridgeError::Truncated {
                expected,
                actual: size,
            });
        }
    }

    Ok(RomInfo::from_header(&header, size))
}

/// Cartridge error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartridgeError {
    /// Shorter than the 16-byte header
    TooSmall { size: usize },
    /// Larger than the ROM staging buffer
    TooLarge { size: usize },
    /// First four bytes are not "NES\x1A"
    BadMagic([u8; 4]),
    /// Header declares zero PRG banks
    NoPrgBanks,
    /// Shorter than the header's declared footprint
    Truncated { expected: usize, actual: usize },
}

impl std::fmt::Display for CartridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartridgeError::TooSmall { size } => {
                write!(f, "ROM too small: {} bytes, header needs {}", size, HEADER_SIZE)
            }
            CartridgeError::TooLarge { size } => {
                write!(f, "ROM too large: {} bytes, limit is {}", size, ROM_BUFFER_SIZE)
            }
            CartridgeError::BadMagic(magic) => write!(
                f,
                "Invalid iNES header: magic {:02X} {:02X} {:02X} {:02X}",
                magic[0], magic[1], magic[2], magic[3]
            ),
            CartridgeError::NoPrgBanks => write!(f, "Invalid iNES header: no PRG banks"),
            CartridgeError::Truncated { expected, actual } => write!(
                f,
                "ROM size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for CartridgeError {}
