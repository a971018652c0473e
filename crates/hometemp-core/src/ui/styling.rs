//! Colors, fonts and screen geometry
//!
//! Colors are RGB565; to convert from 8-bit RGB use `R>>3, G>>2, B>>3`.

use embedded_graphics::pixelcolor::Rgb565;

use super::core::DisplayMode;

pub const DISPLAY_WIDTH_PX: u16 = 320;
pub const DISPLAY_HEIGHT_PX: u16 = 240;

/// Glyph cell height of `FONT_10X20`
pub const FONT_10X20_CHAR_HEIGHT_PX: u32 = 20;

/// Glyph cell height of `FONT_6X10`
pub const FONT_6X10_CHAR_HEIGHT_PX: u32 = 10;

/// Glyph cell width of `FONT_6X10`
pub const FONT_6X10_CHAR_WIDTH_PX: u32 = 6;

pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(21, 42, 21);
pub const GRAY: Rgb565 = Rgb565::new(16, 32, 16);
pub const DARK_GRAY: Rgb565 = Rgb565::new(10, 20, 10);
pub const CRIMSON: Rgb565 = Rgb565::new(220 >> 3, 20 >> 2, 60 >> 3);

/// Temperature line - warm orange
pub const COLOR_TEMPERATURE: Rgb565 = Rgb565::new(230 >> 3, 126 >> 2, 34 >> 3);

/// Humidity line - dodger blue
pub const COLOR_HUMIDITY: Rgb565 = Rgb565::new(30 >> 3, 144 >> 2, 255 >> 3);

/// Background and accent colors for one display mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModePalette {
    pub background: Rgb565,
    pub accent: Rgb565,
    pub text_primary: Rgb565,
    pub text_secondary: Rgb565,
}

impl ModePalette {
    pub const WARM: Self = Self {
        background: Rgb565::new(45 >> 3, 24 >> 2, 18 >> 3),
        accent: Rgb565::new(240 >> 3, 110 >> 2, 60 >> 3),
        text_primary: WHITE,
        text_secondary: LIGHT_GRAY,
    };

    pub const COOL: Self = Self {
        background: Rgb565::new(16 >> 3, 26 >> 2, 45 >> 3),
        accent: Rgb565::new(80 >> 3, 170 >> 2, 230 >> 3),
        text_primary: WHITE,
        text_secondary: LIGHT_GRAY,
    };

    pub fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Warm => Self::WARM,
            DisplayMode::Cool => Self::COOL,
        }
    }
}
