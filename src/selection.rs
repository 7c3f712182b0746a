//! Bitmask selection over the 18 theme slots.
//!
//! ANSI slot `i` owns bit `i`; foreground and background own the two
//! highest-order bits of the word, so they never take part in the range
//! arithmetic over palette indices.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

use thiserror::Error;

use crate::palette::Slot;

const FOREGROUND_BIT: u32 = 62;
const BACKGROUND_BIT: u32 = 63;
const ANSI_BITS: u64 = 0xffff;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SelectionMask(u64);

impl SelectionMask {
    pub const EMPTY: SelectionMask = SelectionMask(0);
    pub const ALL: SelectionMask =
        SelectionMask(ANSI_BITS | 1 << FOREGROUND_BIT | 1 << BACKGROUND_BIT);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn bit_of(slot: Slot) -> u32 {
        match slot {
            Slot::Foreground => FOREGROUND_BIT,
            Slot::Background => BACKGROUND_BIT,
            ansi => ansi as u32,
        }
    }

    pub const fn only(slot: Slot) -> Self {
        Self(1 << Self::bit_of(slot))
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of selected slots.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn contains(self, slot: Slot) -> bool {
        self.0 & Self::only(slot).0 != 0
    }

    /// Every ANSI slot between `a` and `b` inclusive, in either order.
    ///
    /// # Panics
    ///
    /// Panics if either bound is foreground or background.
    pub fn range(a: Slot, b: Slot) -> Self {
        assert!(
            a.is_ansi() && b.is_ansi(),
            "range bounds must be ANSI slots, got {a}..{b}"
        );
        let (lo, hi) = if b < a { (b, a) } else { (a, b) };
        Self((1 << (Self::bit_of(hi) + 1)) - (1 << Self::bit_of(lo)))
    }

    /// The six hues and their bright counterparts.
    pub fn named_hues() -> Self {
        Self::range(Slot::Red, Slot::Cyan) | Self::range(Slot::BrightRed, Slot::BrightCyan)
    }

    /// Black, white, their bright variants, foreground and background.
    pub fn named_grays() -> Self {
        Self::only(Slot::Black)
            | Self::only(Slot::White)
            | Self::only(Slot::BrightBlack)
            | Self::only(Slot::BrightWhite)
            | Self::only(Slot::Foreground)
            | Self::only(Slot::Background)
    }

    /// Toggle `group` as a unit: clear it if every bit is already selected,
    /// otherwise select all of it.
    pub const fn toggle_block(self, group: SelectionMask) -> Self {
        if self.0 & group.0 == group.0 {
            Self(self.0 & !group.0)
        } else {
            Self(self.0 | group.0)
        }
    }

    /// Selected slots in ascending palette order, then foreground, then
    /// background.
    pub fn iter(self) -> Vec<Slot> {
        let mut slots = Vec::with_capacity(self.len());
        for slot in Slot::ANSI {
            let bit = Self::bit_of(slot);
            if self.0 & 1 << bit != 0 {
                slots.push(slot);
            }
            let rest = ANSI_BITS & !((2 << bit) - 1);
            if self.0 & rest == 0 {
                break;
            }
        }
        for slot in [Slot::Foreground, Slot::Background] {
            if self.contains(slot) {
                slots.push(slot);
            }
        }
        slots
    }
}

impl BitOr for SelectionMask {
    type Output = SelectionMask;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SelectionMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for SelectionMask {
    type Output = SelectionMask;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl From<Slot> for SelectionMask {
    fn from(slot: Slot) -> Self {
        Self::only(slot)
    }
}

impl fmt::Debug for SelectionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SelectionMask({:#018x}: {self})", self.0)
    }
}

impl fmt::Display for SelectionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbrs: Vec<&str> = self.iter().into_iter().map(Slot::abbr).collect();
        if abbrs.is_empty() {
            f.write_str("-")
        } else {
            f.write_str(&abbrs.join(" "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionParseError {
    #[error("unknown slot {0:?}")]
    UnknownSlot(String),
    #[error("range bound {0:?} is not an ANSI slot")]
    NonAnsiBound(String),
    #[error("empty selection")]
    Empty,
}

/// Parse a comma-separated selection such as `red..cyan,fg,grays`.
///
/// Terms are slot names or abbreviations, `a..b` ranges over ANSI slots, and
/// the groups `hues`, `grays` and `all`. Terms combine by union.
impl FromStr for SelectionMask {
    type Err = SelectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = SelectionMask::EMPTY;
        for term in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            mask |= match term {
                "hues" => SelectionMask::named_hues(),
                "grays" => SelectionMask::named_grays(),
                "all" => SelectionMask::ALL,
                _ => match term.split_once("..") {
                    Some((a, b)) => {
                        let lo = ansi_bound(a.trim())?;
                        let hi = ansi_bound(b.trim())?;
                        SelectionMask::range(lo, hi)
                    }
                    None => Slot::from_name(term)
                        .map(SelectionMask::only)
                        .ok_or_else(|| SelectionParseError::UnknownSlot(term.to_string()))?,
                },
            };
        }
        if mask.is_empty() {
            return Err(SelectionParseError::Empty);
        }
        Ok(mask)
    }
}

fn ansi_bound(name: &str) -> Result<Slot, SelectionParseError> {
    let slot = Slot::from_name(name)
        .ok_or_else(|| SelectionParseError::UnknownSlot(name.to_string()))?;
    if !slot.is_ansi() {
        return Err(SelectionParseError::NonAnsiBound(name.to_string()));
    }
    Ok(slot)
}
