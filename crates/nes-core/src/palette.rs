//! Palette tables
//!
//! Two derivations are supported:
//! - Canonical: 64 fixed colors approximating the NES master palette
//! - Synthetic: a gradient computed from the entry index

use crate::memory::PALETTE_ENTRIES;

/// Palette derivation rule
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKind {
    /// Fixed NES master palette approximation
    #[default]
    Canonical,
    /// `(i*4, i*8, i*16)` truncated to bytes
    Synthetic,
}

/// NES master palette (RGB), rows of 16 by luminance
const NES_COLORS: [[u8; 3]; PALETTE_ENTRIES] = [
    [84, 84, 84], [0, 30, 116], [8, 16, 144], [48, 0, 136],
    [68, 0, 100], [92, 0, 48], [84, 4, 0], [60, 24, 0],
    [32, 42, 0], [8, 58, 0], [0, 64, 0], [0, 60, 0],
    [0, 50, 60], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [152, 150, 152], [8, 76, 196], [48, 50, 236], [92, 30, 228],
    [136, 20, 176], [160, 20, 100], [152, 34, 32], [120, 60, 0],
    [84, 90, 0], [40, 114, 0], [8, 124, 0], [0, 118, 40],
    [0, 102, 120], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [236, 238, 236], [76, 154, 236], [120, 124, 236], [176, 98, 236],
    [228, 84, 236], [236, 88, 180], [236, 106, 100], [212, 136, 32],
    [160, 170, 0], [116, 196, 0], [76, 208, 32], [56, 204, 108],
    [56, 180, 204], [60, 60, 60], [0, 0, 0], [0, 0, 0],
    [236, 238, 236], [168, 204, 236], [188, 188, 236], [212, 178, 236],
    [236, 174, 236], [236, 174, 212], [236, 180, 176], [228, 196, 144],
    [204, 210, 120], [180, 222, 120], [168, 226, 144], [152, 226, 180],
    [160, 214, 228], [160, 162, 160], [0, 0, 0], [0, 0, 0],
];

/// RGBA of palette entry `index` (wrapped to 0..64)
pub fn entry(kind: PaletteKind, index: usize) -> [u8; 4] {
    let index = index % PALETTE_ENTRIES;
    match kind {
        PaletteKind::Canonical => {
            let [r, g, b] = NES_COLORS[index];
            [r, g, b, 0xFF]
        }
        PaletteKind::Synthetic => {
            let i = index as u32;
            [(i * 4) as u8, (i * 8) as u8, (i * 16) as u8, 0xFF]
        }
    }
}

/// Write all 64 RGBA entries into `out`
pub fn fill(kind: PaletteKind, out: &mut [u8]) {
    for (index, slot) in out.chunks_exact_mut(4).take(PALETTE_ENTRIES).enumerate() {
        slot.copy_from_slice(&entry(kind, index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::PALETTE_SIZE;

    #[test]
    fn test_canonical_entries() {
        assert_eq!(entry(PaletteKind::Canonical, 0), [84, 84, 84, 255]);
        assert_eq!(entry(PaletteKind::Canonical, 1), [0, 30, 116, 255]);
        assert_eq!(entry(PaletteKind::Canonical, 0x20), [236, 238, 236, 255]);
        assert_eq!(entry(PaletteKind::Canonical, 63), [0, 0, 0, 255]);
    }

    #[test]
    fn test_synthetic_entries() {
        assert_eq!(entry(PaletteKind::Synthetic, 0), [0, 0, 0, 255]);
        assert_eq!(entry(PaletteKind::Synthetic, 1), [4, 8, 16, 255]);
        // 16 * 16 wraps to zero
        assert_eq!(entry(PaletteKind::Synthetic, 16), [64, 128, 0, 255]);
        assert_eq!(entry(PaletteKind::Synthetic, 63), [252, 248, 240, 255]);
    }

    #[test]
    fn test_fill_is_opaque() {
        for kind in [PaletteKind::Canonical, PaletteKind::Synthetic] {
            let mut table = [0u8; PALETTE_SIZE];
            fill(kind, &mut table);
            assert!(table.chunks_exact(4).all(|rgba| rgba[3] == 255));
            assert_eq!(&table[4..8], &entry(kind, 1));
        }
    }
}
