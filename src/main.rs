use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use tintweak::adjust::adjust_palette;
use tintweak::cli::{Args, Command};
use tintweak::config::Config;
use tintweak::logging;
use tintweak::theme::{load_theme, Catalog};
use tintweak::tui::{self, TuiApp};

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = args.themes_dir {
        config.themes_dir = dir;
    }
    let _log_guard = logging::init(&config.logging)?;

    let themes_dir: PathBuf = config.themes_dir.clone();
    match args.command.unwrap_or(Command::Browse { theme: None }) {
        Command::Browse { theme } => {
            let catalog = Catalog::discover(&themes_dir)?;
            if catalog.is_empty() {
                bail!("no base16-*.sh themes found in {}", themes_dir.display());
            }
            let app = TuiApp::new(catalog, config, io::stderr());
            tui::run(app, theme.as_deref())?;
        }
        Command::List => {
            let catalog = Catalog::discover(&themes_dir)?;
            let mut out = io::stdout().lock();
            for name in catalog.names() {
                writeln!(out, "{name}")?;
            }
        }
        Command::Show { name } => {
            let palette = load_theme(&themes_dir, &name)?.to_palette();
            print!("{palette}");
        }
        Command::Apply { name } => {
            let palette = load_theme(&themes_dir, &name)?.to_palette();
            palette
                .apply(&mut io::stderr())
                .context("couldn't write terminal colors")?;
        }
        Command::Adjust {
            name,
            select,
            channel,
            delta,
            apply,
        } => {
            let mut palette = load_theme(&themes_dir, &name)?.to_palette();
            adjust_palette(&mut palette, select, channel, delta);
            print!("{palette}");
            if apply {
                palette
                    .apply(&mut io::stderr())
                    .context("couldn't write terminal colors")?;
            }
        }
    }
    Ok(())
}
