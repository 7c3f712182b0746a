use std::fmt;

use palette::{IntoColor, Oklch, Srgb};
use thiserror::Error;

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("invalid hex color {input:?}: expected 6 hex digits, got {digits}")]
    DigitCount { input: String, digits: usize },
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a color from the hex digits found in `input`.
    ///
    /// Everything that is not a hex digit is skipped, so `#ff8800`, `ff8800`
    /// and the base16-shell form `ff/88/00` all parse to the same color.
    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let digits: Vec<u8> = input
            .chars()
            .filter_map(|c| c.to_digit(16))
            .map(|d| d as u8)
            .collect();
        if digits.len() != 6 {
            return Err(ColorParseError::DigitCount {
                input: input.to_string(),
                digits: digits.len(),
            });
        }
        let byte = |i: usize| digits[i] << 4 | digits[i + 1];
        Ok(Self::new(byte(0), byte(2), byte(4)))
    }

    /// Serialize to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert to Oklch, for the human-facing readout of a slot.
    pub fn to_oklch(self) -> Oklch {
        let srgb: Srgb<f32> = Srgb::new(self.r, self.g, self.b).into_format();
        srgb.into_color()
    }

    /// WCAG 2.0 relative luminance.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }

    /// WCAG 2.0 contrast ratio between two colors, in [1, 21].
    pub fn contrast_ratio(c1: &Color, c2: &Color) -> f32 {
        let l1 = c1.relative_luminance();
        let l2 = c2.relative_luminance();
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A full-range (JFIF) Y′CbCr triple with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ycc {
    pub y: u8,
    pub cb: u8,
    pub cr: u8,
}

/// Narrow a 16.16 fixed-point value to a byte, saturating at both ends.
fn fixed_to_u8(v: i32) -> u8 {
    (v.clamp(0, 0xff_ffff) >> 16) as u8
}

impl Ycc {
    pub const fn new(y: u8, cb: u8, cr: u8) -> Self {
        Self { y, cb, cr }
    }

    pub fn from_rgb(c: Color) -> Self {
        let (r, g, b) = (c.r as i32, c.g as i32, c.b as i32);
        let y = (19595 * r + 38470 * g + 7471 * b + (1 << 15)) >> 16;
        let cb = -11056 * r - 21712 * g + 32768 * b + (257 << 15);
        let cr = 32768 * r - 27440 * g - 5328 * b + (257 << 15);
        Self {
            y: y as u8,
            cb: fixed_to_u8(cb),
            cr: fixed_to_u8(cr),
        }
    }

    pub fn to_rgb(self) -> Color {
        let y = self.y as i32 * 0x10101;
        let cb = self.cb as i32 - 128;
        let cr = self.cr as i32 - 128;
        Color::new(
            fixed_to_u8(y + 91881 * cr),
            fixed_to_u8(y - 22554 * cb - 46802 * cr),
            fixed_to_u8(y + 116130 * cb),
        )
    }
}

/// One adjustable 8-bit channel of a [`ColorSample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Channel {
    #[value(alias = "y")]
    Luma,
    #[value(alias = "cb")]
    ChromaBlue,
    #[value(alias = "cr")]
    ChromaRed,
    #[value(alias = "r")]
    Red,
    #[value(alias = "g")]
    Green,
    #[value(alias = "b")]
    Blue,
}

const CHANNEL_NAMES: [(&str, &str); 6] = [
    ("Y′", "luma"),
    ("Cb", "chroma-blue"),
    ("Cr", "chroma-red"),
    ("R", "red"),
    ("G", "green"),
    ("B", "blue"),
];

impl Channel {
    /// Channels in slider order: the "video" triple, then the "paint" triple.
    pub const ALL: [Channel; 6] = [
        Channel::Luma,
        Channel::ChromaBlue,
        Channel::ChromaRed,
        Channel::Red,
        Channel::Green,
        Channel::Blue,
    ];

    pub fn abbr(self) -> &'static str {
        CHANNEL_NAMES[self as usize].0
    }

    pub fn name(self) -> &'static str {
        CHANNEL_NAMES[self as usize].1
    }

    /// Whether the channel lives in the Y′CbCr representation.
    pub fn is_luma_chroma(self) -> bool {
        matches!(
            self,
            Channel::Luma | Channel::ChromaBlue | Channel::ChromaRed
        )
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A color held in both RGB and Y′CbCr form.
///
/// Both forms always describe the same color: every write goes to one form
/// and the other is regenerated from it, never from stale data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorSample {
    rgb: Color,
    ycc: Ycc,
}

impl ColorSample {
    pub fn from_rgb(rgb: Color) -> Self {
        Self {
            rgb,
            ycc: Ycc::from_rgb(rgb),
        }
    }

    pub fn from_ycc(ycc: Ycc) -> Self {
        Self {
            rgb: ycc.to_rgb(),
            ycc,
        }
    }

    pub fn rgb(&self) -> Color {
        self.rgb
    }

    pub fn ycc(&self) -> Ycc {
        self.ycc
    }

    pub fn access(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Luma => self.ycc.y,
            Channel::ChromaBlue => self.ycc.cb,
            Channel::ChromaRed => self.ycc.cr,
            Channel::Red => self.rgb.r,
            Channel::Green => self.rgb.g,
            Channel::Blue => self.rgb.b,
        }
    }

    /// Write one channel and regenerate the opposite representation.
    pub fn set_channel(self, channel: Channel, value: u8) -> Self {
        let mut rgb = self.rgb;
        let mut ycc = self.ycc;
        match channel {
            Channel::Luma => ycc.y = value,
            Channel::ChromaBlue => ycc.cb = value,
            Channel::ChromaRed => ycc.cr = value,
            Channel::Red => rgb.r = value,
            Channel::Green => rgb.g = value,
            Channel::Blue => rgb.b = value,
        }
        if channel.is_luma_chroma() {
            Self::from_ycc(ycc)
        } else {
            Self::from_rgb(rgb)
        }
    }

    /// Shift one channel by `delta`, saturating to [0, 255].
    ///
    /// A shift that lands on the current value writes nothing, so the
    /// opposite representation is not regenerated.
    pub fn adjust(self, channel: Channel, delta: i32) -> Self {
        let current = self.access(channel);
        let target = (current as i32).saturating_add(delta).clamp(0, 255) as u8;
        if target == current {
            return self;
        }
        self.set_channel(channel, target)
    }
}

impl From<Color> for ColorSample {
    fn from(rgb: Color) -> Self {
        Self::from_rgb(rgb)
    }
}
