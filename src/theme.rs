//! base16-shell theme scripts: discovery and parsing.
//!
//! A theme script is a shell file named `base16-<name>.sh` whose color
//! assignments look like `color01="ab/46/42"` or `color_foreground=$color07`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use thiserror::Error;

use crate::color::{Color, ColorParseError};
use crate::palette::Palette;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("line {line}: color index {found} out of order, expected {expected}")]
    OutOfOrder {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: {key} refers to {target}, which is not defined yet")]
    ForwardReference {
        line: usize,
        key: String,
        target: String,
    },
    #[error("line {line}: unknown color key {key}")]
    UnknownKey { line: usize, key: String },
    #[error("line {line}: bad color value for {key}")]
    BadColor {
        line: usize,
        key: String,
        #[source]
        source: ColorParseError,
    },
    #[error("incomplete theme: {0}")]
    Incomplete(String),
}

/// Raw colors of one theme, as parsed from its script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    pub ansi: [Color; 16],
    pub foreground: Color,
    pub background: Color,
}

impl ThemeColors {
    pub fn to_palette(&self) -> Palette {
        Palette::new(self.ansi, self.foreground, self.background)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Index(usize),
    Foreground,
    Background,
}

const ASSIGNMENT: &str = r"(?m)^color_?\w+=\S+";
const COLOR_KEY: &str = r"\bcolor_?(\d+|foreground|background)\b";
const SCRIPT_NAME: &str = r"^base16-(.+)\.sh$";

fn assignment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ASSIGNMENT).expect("regex"))
}

fn color_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(COLOR_KEY).expect("regex"))
}

fn script_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SCRIPT_NAME).expect("regex"))
}

fn missing(what: &str) -> ThemeError {
    ThemeError::Incomplete(format!("no {what}"))
}

fn color_key(s: &str) -> Option<Key> {
    let caps = color_key_re().captures(s)?;
    match &caps[1] {
        "foreground" => Some(Key::Foreground),
        "background" => Some(Key::Background),
        digits => digits.parse().ok().map(Key::Index),
    }
}

/// Parse the color assignments of a base16-shell script.
///
/// Numbered colors must appear in order without gaps. A value may name an
/// earlier color instead of giving hex digits. Indices past 15 are accepted
/// and dropped.
pub fn parse_script(text: &str) -> Result<ThemeColors, ThemeError> {
    let mut indexed: Vec<Color> = Vec::new();
    let mut foreground = None;
    let mut background = None;

    for m in assignment_re().find_iter(text) {
        let line = text[..m.start()].lines().count() + 1;
        let Some((key, value)) = m.as_str().split_once('=') else {
            continue;
        };

        let color = match color_key(value) {
            Some(target) => {
                let resolved = match target {
                    Key::Index(i) => indexed.get(i).copied(),
                    Key::Foreground => foreground,
                    Key::Background => background,
                };
                resolved.ok_or_else(|| ThemeError::ForwardReference {
                    line,
                    key: key.to_string(),
                    target: value.to_string(),
                })?
            }
            None => Color::from_hex(value).map_err(|source| ThemeError::BadColor {
                line,
                key: key.to_string(),
                source,
            })?,
        };

        match color_key(key) {
            Some(Key::Index(found)) => {
                if found != indexed.len() {
                    return Err(ThemeError::OutOfOrder {
                        line,
                        expected: indexed.len(),
                        found,
                    });
                }
                indexed.push(color);
            }
            Some(Key::Foreground) => foreground = Some(color),
            Some(Key::Background) => background = Some(color),
            None => {
                return Err(ThemeError::UnknownKey {
                    line,
                    key: key.to_string(),
                })
            }
        }
    }

    if indexed.len() < 16 {
        let message = format!("{} of 16 palette colors", indexed.len());
        return Err(ThemeError::Incomplete(message));
    }
    let mut ansi = [Color::BLACK; 16];
    ansi.copy_from_slice(&indexed[..16]);
    Ok(ThemeColors {
        ansi,
        foreground: foreground.ok_or_else(|| missing("foreground"))?,
        background: background.ok_or_else(|| missing("background"))?,
    })
}

/// Theme name for a script file name, if it is one.
pub fn theme_name(file_name: &str) -> Option<&str> {
    script_name_re()
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn script_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("base16-{name}.sh"))
}

/// Read and parse a single named theme from `dir`.
pub fn load_theme(dir: &Path, name: &str) -> Result<ThemeColors> {
    let path = script_path(dir, name);
    let text = std::fs::read_to_string(&path).with_context(|| {
        if !path.exists() {
            format!("no theme named {name:?} in {}", dir.display())
        } else {
            format!("couldn't read theme file {}", path.display())
        }
    })?;
    parse_script(&text)
        .with_context(|| format!("invalid theme file {}", path.display()))
}

/// Every valid theme found in a directory, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    themes: BTreeMap<String, ThemeColors>,
}

impl Catalog {
    /// Scan `dir` for theme scripts. Scripts that fail to parse are logged
    /// and skipped.
    pub fn discover(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("couldn't read themes directory {}", dir.display()))?;

        let listing = || format!("couldn't list {}", dir.display());
        let mut themes = BTreeMap::new();
        for entry in entries {
            let entry = entry.with_context(listing)?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str().and_then(theme_name) else {
                continue;
            };
            match load_theme(dir, name) {
                Ok(colors) => {
                    themes.insert(name.to_string(), colors);
                }
                Err(err) => tracing::warn!(theme = name, "skipping theme: {err:#}"),
            }
        }
        tracing::debug!(count = themes.len(), dir = %dir.display(), "discovered themes");
        Ok(Self { themes })
    }

    pub fn from_themes(themes: impl IntoIterator<Item = (String, ThemeColors)>) -> Self {
        Self {
            themes: themes.into_iter().collect(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&ThemeColors> {
        self.themes.get(name)
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
