//! Core configuration
//!
//! The core ships with one canonical behavior and one alternate pinned
//! variant. Both are fully supported; a configuration is fixed once the
//! core is initialized.

use std::str::FromStr;

use crate::palette::PaletteKind;
use crate::render::RenderScheme;

/// How strictly `load_rom` checks the image length
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SizeCheck {
    /// Only the 16-byte header has to be present
    #[default]
    Header,
    /// The image must hold header + trainer + every declared PRG/CHR bank
    Strict,
}

/// What `frame()` requires before it renders
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FrameGate {
    /// Initialized and a ROM loaded
    #[default]
    RomLoaded,
    /// Initialized, a ROM loaded, and the running flag set
    Running,
}

/// Core configuration
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoreConfig {
    pub scheme: RenderScheme,
    pub palette: PaletteKind,
    pub size_check: SizeCheck,
    pub frame_gate: FrameGate,
}

impl CoreConfig {
    pub const FLAG_LINEAR: u32 = 0b0001;
    pub const FLAG_SYNTHETIC_PALETTE: u32 = 0b0010;
    pub const FLAG_STRICT_SIZE: u32 = 0b0100;
    pub const FLAG_GATE_ON_RUNNING: u32 = 0b1000;

    /// Linear gradient renderer, synthetic palette, strict size check,
    /// frames only while running
    pub fn linear() -> Self {
        Self {
            scheme: RenderScheme::Linear,
            palette: PaletteKind::Synthetic,
            size_check: SizeCheck::Strict,
            frame_gate: FrameGate::Running,
        }
    }

    /// Decode from the module-boundary flags word. Unknown bits are ignored.
    pub fn from_flags(flags: u32) -> Self {
        Self {
            scheme: if flags & Self::FLAG_LINEAR != 0 {
                RenderScheme::Linear
            } else {
                RenderScheme::Palette
            },
            palette: if flags & Self::FLAG_SYNTHETIC_PALETTE != 0 {
                PaletteKind::Synthetic
            } else {
                PaletteKind::Canonical
            },
            size_check: if flags & Self::FLAG_STRICT_SIZE != 0 {
                SizeCheck::Strict
            } else {
                SizeCheck::Header
            },
            frame_gate: if flags & Self::FLAG_GATE_ON_RUNNING != 0 {
                FrameGate::Running
            } else {
                FrameGate::RomLoaded
            },
        }
    }

    /// Encode as the module-boundary flags word
    pub fn flags(&self) -> u32 {
        let mut flags = 0;
        if self.scheme == RenderScheme::Linear {
            flags |= Self::FLAG_LINEAR;
        }
        if self.palette == PaletteKind::Synthetic {
            flags |= Self::FLAG_SYNTHETIC_PALETTE;
        }
        if self.size_check == SizeCheck::Strict {
            flags |= Self::FLAG_STRICT_SIZE;
        }
        if self.frame_gate == FrameGate::Running {
            flags |= Self::FLAG_GATE_ON_RUNNING;
        }
        flags
    }
}

impl FromStr for RenderScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "palette" | "p" => Ok(RenderScheme::Palette),
            "linear" | "l" => Ok(RenderScheme::Linear),
            other => Err(format!("unknown render scheme '{}' (palette, linear)", other)),
        }
    }
}

impl FromStr for PaletteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "canonical" => Ok(PaletteKind::Canonical),
            "synthetic" => Ok(PaletteKind::Synthetic),
            other => Err(format!("unknown palette '{}' (canonical, synthetic)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero_flags() {
        let config = CoreConfig::default();
        assert_eq!(config.scheme, RenderScheme::Palette);
        assert_eq!(config.palette, PaletteKind::Canonical);
        assert_eq!(config.flags(), 0);
        assert_eq!(CoreConfig::from_flags(0), config);
    }

    #[test]
    fn test_linear_preset_flags() {
        assert_eq!(CoreConfig::linear().flags(), 0b1111);
        assert_eq!(CoreConfig::from_flags(0b1111), CoreConfig::linear());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Linear".parse::<RenderScheme>(), Ok(RenderScheme::Linear));
        assert_eq!("p".parse::<RenderScheme>(), Ok(RenderScheme::Palette));
        assert_eq!("synthetic".parse::<PaletteKind>(), Ok(PaletteKind::Synthetic));
        assert!("sepia".parse::<PaletteKind>().is_err());
    }

    #[test]
    fn test_unknown_bits_ignored() {
        let config = CoreConfig::from_flags(0xFFFF_FFF0 | CoreConfig::FLAG_STRICT_SIZE);
        assert_eq!(config.size_check, SizeCheck::Strict);
        assert_eq!(config.scheme, RenderScheme::Palette);
    }
}
