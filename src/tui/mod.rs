pub mod browser;
pub mod editor;
pub mod widgets;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::Terminal;

use crate::config::Config;
use crate::terminal;
use crate::theme::Catalog;
use browser::{Browser, BrowserAction};
use editor::{Editor, EditorAction};
use widgets::PreviewWidget;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

enum Screen {
    Browse,
    Edit(Editor),
}

/// State for the interactive TUI application.
///
/// Color changes are written as OSC sequences to `osc`, which is stderr in
/// the real program.
pub struct TuiApp<W: Write> {
    catalog: Catalog,
    config: Config,
    browser: Browser,
    screen: Screen,
    osc: W,
    quit: bool,
}

impl<W: Write> TuiApp<W> {
    pub fn new(catalog: Catalog, config: Config, osc: W) -> Self {
        let browser = Browser::new(catalog.names().map(str::to_string).collect());
        Self {
            catalog,
            config,
            browser,
            screen: Screen::Browse,
            osc,
            quit: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.screen, Screen::Edit(_))
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn osc(&self) -> &W {
        &self.osc
    }

    /// Apply the named theme and start editing it.
    pub fn open(&mut self, name: &str) -> Result<()> {
        let colors = self
            .catalog
            .get(name)
            .with_context(|| format!("no theme named {name:?}"))?;
        let editor = Editor::new(name, colors.to_palette(), self.config.steps);
        editor
            .palette()
            .apply(&mut self.osc)
            .context("couldn't write terminal colors")?;
        tracing::info!(theme = name, "editing theme");
        self.browser.select_name(name);
        self.screen = Screen::Edit(editor);
        Ok(())
    }

    fn preview(&mut self, name: &str) -> Result<()> {
        if let Some(colors) = self.catalog.get(name) {
            tracing::debug!(theme = name, "previewing theme");
            colors
                .to_palette()
                .apply(&mut self.osc)
                .context("couldn't write terminal colors")?;
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match &mut self.screen {
            Screen::Browse => match self.browser.handle_key(key) {
                BrowserAction::None => {}
                BrowserAction::Highlight(name) => self.preview(&name)?,
                BrowserAction::Open(name) => self.open(&name)?,
                BrowserAction::Quit => self.quit = true,
            },
            Screen::Edit(editor) => match editor.handle_key(key) {
                EditorAction::None => {}
                EditorAction::Apply => editor
                    .palette()
                    .apply(&mut self.osc)
                    .context("couldn't write terminal colors")?,
                EditorAction::Back => {
                    // Leaving the editor discards its edits.
                    let name = editor.name().to_string();
                    self.screen = Screen::Browse;
                    self.preview(&name)?;
                }
                EditorAction::Quit => self.quit = true,
            },
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let buf = frame.buffer_mut();
        match &self.screen {
            Screen::Browse => {
                let width = (self.browser.width() as u16 + 6).min(area.width / 2);
                let [list, preview] =
                    Layout::horizontal([Constraint::Length(width), Constraint::Min(0)]).areas(area);
                self.browser.render(list, buf);
                PreviewWidget::new("preview").render(preview, buf);
            }
            Screen::Edit(editor) => {
                let [controls, preview] =
                    Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .areas(area);
                editor.render(controls, buf);
                PreviewWidget::new(editor.name()).render(preview, buf);
            }
        }
    }
}

/// Launch the TUI application, restoring the terminal on exit.
pub fn run(mut app: TuiApp<io::Stderr>, start: Option<&str>) -> Result<()> {
    if let Some(name) = start {
        app.open(name)?;
    } else if let Some(name) = app.browser.selected().map(str::to_string) {
        app.preview(&name)?;
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut screen = Terminal::new(backend).context("failed to create terminal")?;

    let result = event_loop(&mut screen, &mut app);

    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(screen.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    screen.show_cursor().context("failed to show cursor")?;

    if app.config.restore_on_exit {
        terminal::restore_defaults(&mut app.osc)
            .context("couldn't reset terminal colors")?;
    }
    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut TuiApp<io::Stderr>) -> Result<()> {
    while !app.should_quit() {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw")?;
        if !event::poll(POLL_INTERVAL).context("failed to poll events")? {
            continue;
        }
        if let Event::Key(key) = event::read().context("failed to read event")? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::theme::ThemeColors;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn theme(v: u8) -> ThemeColors {
        ThemeColors {
            ansi: [Color::new(v, v, v); 16],
            foreground: Color::WHITE,
            background: Color::BLACK,
        }
    }

    fn test_app() -> TuiApp<Vec<u8>> {
        let catalog = Catalog::from_themes([
            ("alpha".to_string(), theme(0x10)),
            ("beta".to_string(), theme(0x20)),
        ]);
        TuiApp::new(catalog, Config::default(), Vec::new())
    }

    fn osc_text(app: &TuiApp<Vec<u8>>) -> String {
        String::from_utf8_lossy(app.osc()).into_owned()
    }

    #[test]
    fn highlighting_applies_theme() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Down)).unwrap();
        let out = osc_text(&app);
        assert_eq!(out.matches("\x1b\\").count(), 18);
        assert!(out.contains("\x1b]4;0;rgb:20/20/20"));
    }

    #[test]
    fn enter_opens_editor_and_edits_apply() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(app.is_editing());
        assert!(osc_text(&app).contains("\x1b]4;0;rgb:10/10/10"));

        app.handle_key(key(KeyCode::Char('0'))).unwrap();
        app.handle_key(key(KeyCode::Char('k'))).unwrap();
        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::Right)).unwrap();
        assert!(osc_text(&app).ends_with("\x1b]11;rgb:00/00/00\x1b\\"));
        assert!(osc_text(&app).contains("\x1b]4;0;rgb:13/10/10"));

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(!app.is_editing());
        assert!(osc_text(&app).ends_with("\x1b]11;rgb:00/00/00\x1b\\"));
        let text = osc_text(&app);
        let last_black = text.rfind("\x1b]4;0;").unwrap();
        assert!(text[last_black..].starts_with("\x1b]4;0;rgb:10/10/10"));
    }

    #[test]
    fn quit_from_either_screen() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(app.should_quit());

        let mut app = test_app();
        app.open("beta").unwrap();
        app.handle_key(key(KeyCode::Char('q'))).unwrap();
        assert!(app.should_quit());
    }

    #[test]
    fn opening_unknown_theme_fails() {
        let mut app = test_app();
        assert!(app.open("gamma").is_err());
        assert!(!app.is_editing());
    }

    #[test]
    fn draws_both_screens() {
        let mut app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        app.open("alpha").unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("selection [18]"), "{text}");
        assert!(text.contains("luma"), "{text}");
    }
}
