pub mod adjust;
pub mod cli;
pub mod color;
pub mod config;
pub mod logging;
pub mod palette;
pub mod selection;
pub mod terminal;
pub mod theme;
pub mod tui;
