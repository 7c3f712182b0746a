use std::fmt;
use std::io::{self, Write};
use std::ops::{Index, IndexMut};

use crate::color::{Color, ColorParseError, ColorSample};
use crate::terminal;

/// One of the 18 color positions of a terminal theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    Black = 0,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    Foreground,
    Background,
}

/// Abbreviation and display name, indexed by slot discriminant.
const SLOT_NAMES: [(&str, &str); 18] = [
    ("k", "black"),
    ("r", "red"),
    ("g", "green"),
    ("y", "yellow"),
    ("b", "blue"),
    ("m", "magenta"),
    ("c", "cyan"),
    ("w", "white"),
    ("K", "bright-black"),
    ("R", "bright-red"),
    ("G", "bright-green"),
    ("Y", "bright-yellow"),
    ("B", "bright-blue"),
    ("M", "bright-magenta"),
    ("C", "bright-cyan"),
    ("W", "bright-white"),
    ("fg", "foreground"),
    ("bg", "background"),
];

impl Slot {
    pub const ANSI: [Slot; 16] = [
        Slot::Black,
        Slot::Red,
        Slot::Green,
        Slot::Yellow,
        Slot::Blue,
        Slot::Magenta,
        Slot::Cyan,
        Slot::White,
        Slot::BrightBlack,
        Slot::BrightRed,
        Slot::BrightGreen,
        Slot::BrightYellow,
        Slot::BrightBlue,
        Slot::BrightMagenta,
        Slot::BrightCyan,
        Slot::BrightWhite,
    ];

    /// Every slot in canonical order: ANSI 0-15, foreground, background.
    pub const ALL: [Slot; 18] = [
        Slot::Black,
        Slot::Red,
        Slot::Green,
        Slot::Yellow,
        Slot::Blue,
        Slot::Magenta,
        Slot::Cyan,
        Slot::White,
        Slot::BrightBlack,
        Slot::BrightRed,
        Slot::BrightGreen,
        Slot::BrightYellow,
        Slot::BrightBlue,
        Slot::BrightMagenta,
        Slot::BrightCyan,
        Slot::BrightWhite,
        Slot::Foreground,
        Slot::Background,
    ];

    /// The ANSI slot with palette index `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..16`.
    pub fn ansi(index: usize) -> Slot {
        match Slot::ANSI.get(index) {
            Some(slot) => *slot,
            None => panic!("ANSI palette index out of range: {index}"),
        }
    }

    /// Palette index for ANSI slots, `None` for foreground and background.
    pub fn ansi_index(self) -> Option<usize> {
        match self {
            Slot::Foreground | Slot::Background => None,
            slot => Some(slot as usize),
        }
    }

    pub fn is_ansi(self) -> bool {
        self.ansi_index().is_some()
    }

    pub fn abbr(self) -> &'static str {
        SLOT_NAMES[self as usize].0
    }

    pub fn name(self) -> &'static str {
        SLOT_NAMES[self as usize].1
    }

    /// Look a slot up by display name (case-insensitive) or abbreviation
    /// (case-sensitive, since `r` and `R` differ).
    pub fn from_name(name: &str) -> Option<Slot> {
        Slot::ALL
            .iter()
            .copied()
            .find(|s| s.abbr() == name || s.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The 18 colors of a theme, each held as a [`ColorSample`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    ansi: [ColorSample; 16],
    foreground: ColorSample,
    background: ColorSample,
}

impl Palette {
    pub fn new(ansi: [Color; 16], foreground: Color, background: Color) -> Self {
        Self {
            ansi: ansi.map(ColorSample::from_rgb),
            foreground: ColorSample::from_rgb(foreground),
            background: ColorSample::from_rgb(background),
        }
    }

    /// Build a palette from 16 hex strings plus foreground and background.
    pub fn from_hex(
        ansi: &[&str; 16],
        foreground: &str,
        background: &str,
    ) -> Result<Self, ColorParseError> {
        let mut colors = [Color::BLACK; 16];
        for (slot, hex) in colors.iter_mut().zip(ansi) {
            *slot = Color::from_hex(hex)?;
        }
        Ok(Self::new(
            colors,
            Color::from_hex(foreground)?,
            Color::from_hex(background)?,
        ))
    }

    pub fn get(&self, slot: Slot) -> ColorSample {
        self[slot]
    }

    pub fn set(&mut self, slot: Slot, sample: ColorSample) {
        self[slot] = sample;
    }

    /// All slots with their samples, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, ColorSample)> + '_ {
        Slot::ALL.iter().map(move |&slot| (slot, self[slot]))
    }

    /// Reprogram the terminal's colors to this palette, one OSC sequence per
    /// slot.
    pub fn apply<W: Write>(&self, out: &mut W) -> io::Result<()> {
        terminal::write_palette(out, self)
    }
}

/// One line per slot: name, hex and Y′CbCr.
impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (slot, sample) in self.iter() {
            let ycc = sample.ycc();
            writeln!(
                f,
                "{:<15} {}  Y′ {:>3}  Cb {:>3}  Cr {:>3}",
                slot.name(),
                sample.rgb(),
                ycc.y,
                ycc.cb,
                ycc.cr
            )?;
        }
        Ok(())
    }
}

impl Index<Slot> for Palette {
    type Output = ColorSample;

    fn index(&self, slot: Slot) -> &ColorSample {
        match slot {
            Slot::Foreground => &self.foreground,
            Slot::Background => &self.background,
            ansi => &self.ansi[ansi as usize],
        }
    }
}

impl IndexMut<Slot> for Palette {
    fn index_mut(&mut self, slot: Slot) -> &mut ColorSample {
        match slot {
            Slot::Foreground => &mut self.foreground,
            Slot::Background => &mut self.background,
            ansi => &mut self.ansi[ansi as usize],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Channel;

    fn sample_palette() -> Palette {
        let mut ansi = [Color::BLACK; 16];
        for (i, c) in ansi.iter_mut().enumerate() {
            let v = (i * 16) as u8;
            *c = Color::new(v, v / 2, 255 - v);
        }
        Palette::new(
            ansi,
            Color::new(0xd0, 0xc8, 0xc6),
            Color::new(0x3b, 0x32, 0x28),
        )
    }

    #[test]
    fn slot_tables_line_up() {
        assert_eq!(Slot::ALL.len(), 18);
        for (i, slot) in Slot::ALL.iter().enumerate() {
            assert_eq!(*slot as usize, i);
        }
        for (i, slot) in Slot::ANSI.iter().enumerate() {
            assert_eq!(Slot::ansi(i), *slot);
            assert_eq!(slot.ansi_index(), Some(i));
        }
        assert_eq!(Slot::Foreground.ansi_index(), None);
        assert_eq!(Slot::BrightMagenta.name(), "bright-magenta");
        assert_eq!(Slot::BrightMagenta.abbr(), "M");
        assert_eq!(Slot::Background.abbr(), "bg");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn ansi_index_past_sixteen_panics() {
        Slot::ansi(16);
    }

    #[test]
    fn slot_lookup_by_name_and_abbr() {
        assert_eq!(Slot::from_name("r"), Some(Slot::Red));
        assert_eq!(Slot::from_name("R"), Some(Slot::BrightRed));
        assert_eq!(Slot::from_name("Bright-Cyan"), Some(Slot::BrightCyan));
        assert_eq!(Slot::from_name("fg"), Some(Slot::Foreground));
        assert_eq!(Slot::from_name("orange"), None);
    }

    #[test]
    fn new_fills_every_slot() {
        let p = sample_palette();
        assert_eq!(p.get(Slot::Black).rgb(), Color::new(0, 0, 255));
        assert_eq!(p.get(Slot::BrightWhite).rgb(), Color::new(240, 120, 15));
        assert_eq!(p.get(Slot::Foreground).rgb(), Color::new(0xd0, 0xc8, 0xc6));
        assert_eq!(p.get(Slot::Background).rgb(), Color::new(0x3b, 0x32, 0x28));
        assert_eq!(p.iter().count(), 18);
    }

    #[test]
    fn from_hex_parses_all() {
        let hex: [String; 16] = std::array::from_fn(|i| format!("#{i:02x}{i:02x}{i:02x}"));
        let refs: [&str; 16] = std::array::from_fn(|i| hex[i].as_str());
        let p = Palette::from_hex(&refs, "#ffffff", "000000").unwrap();
        assert_eq!(p.get(Slot::Yellow).rgb(), Color::new(3, 3, 3));
        assert_eq!(p.get(Slot::Foreground).rgb(), Color::WHITE);
        assert_eq!(p.get(Slot::Background).rgb(), Color::BLACK);
    }

    #[test]
    fn from_hex_reports_bad_digit_count() {
        let mut hex = ["#000000"; 16];
        hex[5] = "#12345";
        assert!(Palette::from_hex(&hex, "#ffffff", "#000000").is_err());
    }

    #[test]
    fn clone_is_independent() {
        let original = sample_palette();
        let mut copy = original.clone();
        let bumped = copy.get(Slot::Red).adjust(Channel::Green, 10);
        copy.set(Slot::Red, bumped);
        assert_ne!(copy, original);
        assert_eq!(original, sample_palette());
    }

    #[test]
    fn display_lists_every_slot() {
        let text = sample_palette().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 18);
        assert_eq!(lines[0], "black           #0000ff  Y′  29  Cb 255  Cr 107");
        assert!(lines[17].starts_with("background      #3b3228"));
    }

    #[test]
    fn iter_is_canonical_order() {
        let p = sample_palette();
        let slots: Vec<Slot> = p.iter().map(|(s, _)| s).collect();
        assert_eq!(slots, Slot::ALL.to_vec());
    }
}
