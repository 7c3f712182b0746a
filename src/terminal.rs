//! OSC sequences that reprogram the running terminal's colors.

use std::fmt;
use std::io::{self, Write};

use crossterm::{queue, Command};

use crate::color::Color;
use crate::palette::{Palette, Slot};

/// OSC 4 / 10 / 11: set one palette entry, the foreground or the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetSlotColor(pub Slot, pub Color);

impl Command for SetSlotColor {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        let SetSlotColor(slot, c) = *self;
        match slot.ansi_index() {
            Some(index) => write!(f, "\x1b]4;{index}")?,
            None if slot == Slot::Foreground => f.write_str("\x1b]10")?,
            None => f.write_str("\x1b]11")?,
        }
        write!(f, ";rgb:{:02x}/{:02x}/{:02x}\x1b\\", c.r, c.g, c.b)
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "palette changes need an ANSI terminal",
        ))
    }
}

/// OSC 104 / 110 / 111: reset palette, foreground and background to the
/// terminal's own defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetColors;

impl Command for ResetColors {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b]104\x1b\\\x1b]110\x1b\\\x1b]111\x1b\\")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "palette changes need an ANSI terminal",
        ))
    }
}

/// Queue one [`SetSlotColor`] per slot, in canonical order, and flush.
pub fn write_palette<W: Write>(out: &mut W, palette: &Palette) -> io::Result<()> {
    for (slot, sample) in palette.iter() {
        queue!(out, SetSlotColor(slot, sample.rgb()))?;
    }
    out.flush()
}

pub fn restore_defaults<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, ResetColors)?;
    out.flush()
}
