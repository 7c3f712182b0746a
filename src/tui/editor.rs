use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::widgets::{InspectorWidget, SelectorWidget, SliderWidget};
use crate::adjust::{adjust_palette, Step, Steps};
use crate::color::Channel;
use crate::palette::{Palette, Slot};
use crate::selection::SelectionMask;

/// What the app should do after a key press in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    /// The palette changed; re-apply it to the terminal.
    Apply,
    /// Leave the editor for the theme browser.
    Back,
    Quit,
}

const HELP: &str = "k r g y b m c w/KRGYBMCW slot  [ ] fg/bg  1 hues  2 grays  0 all  \
    tab channel  ←→ hl adjust (shift ×3, alt fine)  ^R reset  esc back  q quit";

/// One editing session over a copy of a theme's palette.
pub struct Editor {
    name: String,
    original: Palette,
    palette: Palette,
    mask: SelectionMask,
    cursor: Slot,
    focus: usize,
    steps: Steps,
}

impl Editor {
    pub fn new(name: impl Into<String>, original: Palette, steps: Steps) -> Self {
        Self {
            name: name.into(),
            palette: original.clone(),
            original,
            mask: SelectionMask::ALL,
            cursor: Slot::Black,
            focus: 0,
            steps,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn mask(&self) -> SelectionMask {
        self.mask
    }

    pub fn channel(&self) -> Channel {
        Channel::ALL[self.focus]
    }

    fn toggle(&mut self, group: SelectionMask) -> EditorAction {
        self.mask = self.mask.toggle_block(group);
        tracing::debug!(mask = %self.mask, "selection changed");
        EditorAction::None
    }

    fn adjust(&mut self, direction: i32, modifiers: KeyModifiers, shifted: bool) -> EditorAction {
        let alt = modifiers.contains(KeyModifiers::ALT);
        let shift = shifted || modifiers.contains(KeyModifiers::SHIFT);
        let step = match (alt, shift) {
            (true, false) => Step::Fine,
            (false, true) => Step::Coarse,
            _ => Step::Normal,
        };
        let delta = self.steps.delta(step, direction);
        if delta == 0 || self.mask.is_empty() {
            return EditorAction::None;
        }
        let channel = self.channel();
        adjust_palette(&mut self.palette, self.mask, channel, delta);
        EditorAction::Apply
    }

    /// Restore the original palette and select every slot again.
    pub fn reset(&mut self) {
        self.palette = self.original.clone();
        self.mask = SelectionMask::ALL;
    }

    pub fn cursor(&self) -> Slot {
        self.cursor
    }

    fn toggle_slot(&mut self, slot: Slot) -> EditorAction {
        self.cursor = slot;
        self.toggle(SelectionMask::only(slot))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => EditorAction::Quit,
            KeyCode::Char('r') if ctrl => {
                self.reset();
                EditorAction::Apply
            }
            KeyCode::Char('q') => EditorAction::Quit,
            KeyCode::Esc => EditorAction::Back,

            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % Channel::ALL.len();
                EditorAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + Channel::ALL.len() - 1) % Channel::ALL.len();
                EditorAction::None
            }

            KeyCode::Right => self.adjust(1, key.modifiers, false),
            KeyCode::Left => self.adjust(-1, key.modifiers, false),
            KeyCode::Char('l') => self.adjust(1, key.modifiers, false),
            KeyCode::Char('h') => self.adjust(-1, key.modifiers, false),
            KeyCode::Char('L') => self.adjust(1, key.modifiers, true),
            KeyCode::Char('H') => self.adjust(-1, key.modifiers, true),

            KeyCode::Char('[') => self.toggle_slot(Slot::Foreground),
            KeyCode::Char(']') => self.toggle_slot(Slot::Background),
            KeyCode::Char('1') => self.toggle(SelectionMask::named_hues()),
            KeyCode::Char('2') => self.toggle(SelectionMask::named_grays()),
            KeyCode::Char('0') => self.toggle(SelectionMask::ALL),
            KeyCode::Char(c) if !ctrl => {
                let mut buf = [0u8; 4];
                let slot = Slot::from_name(c.encode_utf8(&mut buf));
                match slot.filter(|s| s.is_ansi()) {
                    Some(slot) => self.toggle_slot(slot),
                    None => EditorAction::None,
                }
            }
            _ => EditorAction::None,
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let mut constraints = vec![Constraint::Length(5)];
        constraints.extend([Constraint::Min(3); 6]);
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
        let rows = Layout::vertical(constraints).split(area);

        SelectorWidget::new(&self.palette, self.mask, self.cursor)
            .render(rows[0], buf);
        for (i, channel) in Channel::ALL.into_iter().enumerate() {
            SliderWidget::new(&self.palette, self.mask, channel, i == self.focus)
                .render(rows[i + 1], buf);
        }
        InspectorWidget::new(&self.palette, self.cursor)
            .render(rows[7], buf);
        let dim = Style::default().add_modifier(Modifier::DIM);
        Paragraph::new(Line::styled(HELP, dim)).render(rows[8], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn grays() -> Palette {
        Palette::new([Color::new(128, 128, 128); 16], Color::WHITE, Color::BLACK)
    }

    fn editor() -> Editor {
        Editor::new("gray", grays(), Steps::default())
    }

    #[test]
    fn starts_with_everything_selected_on_luma() {
        let e = editor();
        assert_eq!(e.mask(), SelectionMask::ALL);
        assert_eq!(e.channel(), Channel::Luma);
        assert_eq!(e.name(), "gray");
    }

    #[test]
    fn slot_letters_toggle() {
        let mut e = editor();
        assert_eq!(e.handle_key(key(KeyCode::Char('r'))), EditorAction::None);
        assert!(!e.mask().contains(Slot::Red));
        e.handle_key(key(KeyCode::Char('R')));
        assert!(!e.mask().contains(Slot::BrightRed));
        e.handle_key(key(KeyCode::Char('r')));
        assert!(e.mask().contains(Slot::Red));
        e.handle_key(key(KeyCode::Char('[')));
        assert!(!e.mask().contains(Slot::Foreground));
        e.handle_key(key(KeyCode::Char(']')));
        assert!(!e.mask().contains(Slot::Background));
    }

    #[test]
    fn group_keys_toggle_blocks() {
        let mut e = editor();
        e.handle_key(key(KeyCode::Char('0')));
        assert!(e.mask().is_empty());
        e.handle_key(key(KeyCode::Char('2')));
        assert_eq!(e.mask(), SelectionMask::named_grays());
        e.handle_key(key(KeyCode::Char('1')));
        assert_eq!(e.mask(), SelectionMask::ALL);
        e.handle_key(key(KeyCode::Char('1')));
        assert_eq!(e.mask(), SelectionMask::named_grays());
    }

    #[test]
    fn tab_cycles_channels() {
        let mut e = editor();
        e.handle_key(key(KeyCode::BackTab));
        assert_eq!(e.channel(), Channel::Blue);
        e.handle_key(key(KeyCode::Tab));
        e.handle_key(key(KeyCode::Down));
        assert_eq!(e.channel(), Channel::ChromaBlue);
        e.handle_key(key(KeyCode::Up));
        assert_eq!(e.channel(), Channel::Luma);
    }

    #[test]
    fn step_sizes_follow_modifiers() {
        let mut e = editor();
        e.handle_key(key(KeyCode::Char('0')));
        e.handle_key(key(KeyCode::Char('y')));

        assert_eq!(e.handle_key(key(KeyCode::Right)), EditorAction::Apply);
        assert_eq!(e.palette()[Slot::Yellow].access(Channel::Luma), 131);
        e.handle_key(with(KeyCode::Right, KeyModifiers::SHIFT));
        assert_eq!(e.palette()[Slot::Yellow].access(Channel::Luma), 140);
        e.handle_key(with(KeyCode::Left, KeyModifiers::ALT));
        assert_eq!(e.palette()[Slot::Yellow].access(Channel::Luma), 139);
        e.handle_key(key(KeyCode::Char('H')));
        assert_eq!(e.palette()[Slot::Yellow].access(Channel::Luma), 130);
        e.handle_key(key(KeyCode::Char('h')));
        assert_eq!(e.palette()[Slot::Yellow].access(Channel::Luma), 127);

        assert_eq!(e.palette()[Slot::Green], grays()[Slot::Green]);
    }

    #[test]
    fn adjusting_nothing_does_not_apply() {
        let mut e = editor();
        e.handle_key(key(KeyCode::Char('0')));
        assert_eq!(e.handle_key(key(KeyCode::Right)), EditorAction::None);
        assert_eq!(e.palette(), &grays());
    }

    #[test]
    fn reset_restores_original() {
        let mut e = editor();
        e.handle_key(key(KeyCode::Char('L')));
        e.handle_key(key(KeyCode::Char('2')));
        assert_ne!(e.palette(), &grays());
        assert_eq!(e.mask(), SelectionMask::named_hues());
        assert_eq!(
            e.handle_key(with(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            EditorAction::Apply
        );
        assert_eq!(e.palette(), &grays());
        assert_eq!(e.mask(), SelectionMask::ALL, "ctrl-r reselects everything");
    }

    #[test]
    fn fg_bg_keys_move_cursor() {
        let mut e = editor();
        assert_eq!(e.cursor(), Slot::Black);
        e.handle_key(key(KeyCode::Char('[')));
        assert_eq!(e.cursor(), Slot::Foreground);
        e.handle_key(key(KeyCode::Char(']')));
        assert_eq!(e.cursor(), Slot::Background);
        e.handle_key(key(KeyCode::Char('M')));
        assert_eq!(e.cursor(), Slot::BrightMagenta);
    }

    #[test]
    fn leaving_the_editor() {
        let mut e = editor();
        assert_eq!(e.handle_key(key(KeyCode::Esc)), EditorAction::Back);
        assert_eq!(e.handle_key(key(KeyCode::Char('q'))), EditorAction::Quit);
        assert_eq!(
            e.handle_key(with(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            EditorAction::Quit
        );
        assert_eq!(e.handle_key(key(KeyCode::Char('z'))), EditorAction::None);
    }
}
