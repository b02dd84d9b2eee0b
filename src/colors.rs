//! Packed ARGB8888 color helpers.
//!
//! Every color in the crate is a `u32` laid out as `0xAARRGGBB`, the same
//! layout textures and pixel buffers store.

pub const WHITE: u32 = 0xFFFFFFFF;
pub const BLACK: u32 = 0xFF000000;

/// Color assigned to freshly constructed models.
pub const MODEL_DEFAULT: u32 = rgb(54, 104, 143);

/// The single sample of the placeholder texture models start with.
pub const TEXTURE_DEFAULT: u32 = rgb(150, 150, 150);

/// Packs an opaque color from 8-bit channels.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    rgba(r, g, b, 0xFF)
}

#[inline]
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Splits a packed color into `[r, g, b, a]` bytes.
#[inline]
pub const fn unpack_rgba(color: u32) -> [u8; 4] {
    [
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
        (color >> 24) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_layout() {
        assert_eq!(rgb(0x12, 0x34, 0x56), 0xFF123456);
        assert_eq!(unpack_rgba(0x80123456), [0x12, 0x34, 0x56, 0x80]);
    }

    #[test]
    fn test_defaults_are_opaque() {
        assert_eq!(unpack_rgba(MODEL_DEFAULT), [54, 104, 143, 255]);
        assert_eq!(unpack_rgba(TEXTURE_DEFAULT), [150, 150, 150, 255]);
    }
}
