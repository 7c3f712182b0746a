use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::color::Channel;
use crate::selection::SelectionMask;

/// Browse base16 terminal themes and tweak their colors live.
#[derive(Parser, Debug)]
#[command(name = "tintweak", version, about)]
pub struct Args {
    /// Config file (defaults to ~/.config/tintweak/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding base16-<name>.sh theme scripts
    #[arg(long, global = true)]
    pub themes_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive theme browser and editor (the default)
    Browse {
        /// Open this theme in the editor straight away
        #[arg(short, long)]
        theme: Option<String>,
    },

    /// List available themes
    List,

    /// Print a theme's colors
    Show {
        /// Theme name, e.g. `ocean` for base16-ocean.sh
        name: String,
    },

    /// Apply a theme to the running terminal
    Apply { name: String },

    /// Adjust one channel of selected slots and print the result
    Adjust {
        name: String,

        /// Slots to adjust: names, abbreviations, ranges like red..cyan,
        /// or the groups hues, grays, all; comma-separated
        #[arg(short, long, default_value = "all")]
        select: SelectionMask,

        /// Channel to adjust
        #[arg(short, long, value_enum)]
        channel: Channel,

        /// Signed amount, saturating at 0 and 255
        #[arg(short, long, allow_hyphen_values = true)]
        delta: i32,

        /// Also apply the adjusted theme to the terminal
        #[arg(long)]
        apply: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Slot;

    fn parse(line: &str) -> Result<Args, clap::Error> {
        Args::try_parse_from(line.split_whitespace())
    }

    #[test]
    fn no_subcommand_means_browse() {
        let args = parse("tintweak").unwrap();
        assert_eq!(args.command, None);
        assert_eq!(args.config, None);
    }

    #[test]
    fn browse_with_theme() {
        let args = parse("tintweak browse --theme ocean").unwrap();
        assert_eq!(
            args.command,
            Some(Command::Browse {
                theme: Some("ocean".to_string())
            })
        );
    }

    #[test]
    fn adjust_arguments() {
        let line = "tintweak adjust ocean --select red..cyan,fg --channel cb --delta -12";
        let args = parse(line).unwrap();
        assert_eq!(
            args.command,
            Some(Command::Adjust {
                name: "ocean".to_string(),
                select: SelectionMask::range(Slot::Red, Slot::Cyan)
                    | SelectionMask::only(Slot::Foreground),
                channel: Channel::ChromaBlue,
                delta: -12,
                apply: false,
            })
        );
    }

    #[test]
    fn adjust_selects_everything_by_default() {
        let args = parse("tintweak adjust ocean -c luma -d 5 --apply").unwrap();
        let Some(Command::Adjust { select, apply, .. }) = args.command else {
            panic!("expected adjust, got {:?}", args.command);
        };
        assert_eq!(select, SelectionMask::ALL);
        assert!(apply);
    }

    #[test]
    fn adjust_rejects_bad_selection() {
        let line = "tintweak adjust ocean --select orange --channel luma --delta 3";
        let err = parse(line).unwrap_err();
        assert!(err.to_string().contains("orange"), "got {err}");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = parse("tintweak list --themes-dir /srv/themes").unwrap();
        assert_eq!(args.themes_dir, Some(PathBuf::from("/srv/themes")));
        assert_eq!(args.command, Some(Command::List));
    }
}
