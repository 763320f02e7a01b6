// Text styles and vertical spacing shared by the PDF exporter and the preview estimate.
// Sizes are in points for the PDF; the preview uses the same numbers as pixels.

use crate::layout::font_metrics::FontFace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Rgb(
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        )
    }
}

pub const TEXT_COLOR: Rgb = Rgb::from_hex(0x000000);
pub const MUTED_COLOR: Rgb = Rgb::from_hex(0x555555);
pub const LINK_COLOR: Rgb = Rgb::from_hex(0x1976d2);
pub const RULE_COLOR: Rgb = Rgb::from_hex(0x000000);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    pub color: Rgb,
}

const fn style(face: FontFace, size: f32, color: Rgb) -> TextStyle {
    TextStyle { face, size, color }
}

pub const NAME: TextStyle = style(FontFace::HelveticaBold, 24.0, TEXT_COLOR);
pub const CONTACT: TextStyle = style(FontFace::Helvetica, 10.0, TEXT_COLOR);
pub const SECTION_TITLE: TextStyle = style(FontFace::HelveticaBold, 14.0, TEXT_COLOR);
pub const ROW_TITLE: TextStyle = style(FontFace::HelveticaBold, 12.0, TEXT_COLOR);
pub const DATES: TextStyle = style(FontFace::Helvetica, 9.0, MUTED_COLOR);
pub const BODY: TextStyle = style(FontFace::Helvetica, 9.0, TEXT_COLOR);

// Vertical gaps after each element kind.
pub const NAME_GAP: f32 = 5.0;
pub const CONTACT_GAP: f32 = 3.0;
pub const HEADER_GAP: f32 = 20.0;
pub const SECTION_GAP: f32 = 10.0;
pub const TITLE_RULE_PAD: f32 = 2.0;
pub const TITLE_GAP: f32 = 6.0;
pub const RULE_WIDTH: f32 = 1.0;

// Bullets.
pub const BULLET_INDENT: f32 = 8.0;
pub const BULLET_GAP: f32 = 4.0;
pub const BULLET_SPACING: f32 = 3.0;

/// Minimum horizontal space kept between a row's left text and its right-aligned text.
pub const COLUMN_GAP: f32 = 10.0;
