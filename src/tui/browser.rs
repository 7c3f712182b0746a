use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, List, ListState, Paragraph};

/// What the app should do after a key press in the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserAction {
    None,
    /// The highlighted theme changed; preview it.
    Highlight(String),
    /// Open the highlighted theme in the editor.
    Open(String),
    Quit,
}

/// Filterable list of theme names.
pub struct Browser {
    names: Vec<String>,
    filter: String,
    visible: Vec<usize>,
    state: ListState,
}

impl Browser {
    pub fn new(names: Vec<String>) -> Self {
        let mut browser = Self {
            names,
            filter: String::new(),
            visible: Vec::new(),
            state: ListState::default(),
        };
        browser.refilter();
        browser
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Names matching the filter, in display order.
    pub fn visible(&self) -> impl Iterator<Item = &str> {
        self.visible.iter().map(|&i| self.names[i].as_str())
    }

    pub fn selected(&self) -> Option<&str> {
        let i = self.state.selected()?;
        self.visible.get(i).map(|&n| self.names[n].as_str())
    }

    /// Highlight `name` if it is visible.
    pub fn select_name(&mut self, name: &str) {
        let pos = self.visible().position(|n| n == name);
        if pos.is_some() {
            self.state.select(pos);
        }
    }

    /// Width of the longest theme name.
    pub fn width(&self) -> usize {
        self.names
            .iter()
            .map(|n| n.chars().count())
            .max()
            .unwrap_or(0)
    }

    fn refilter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        let first = (!self.visible.is_empty()).then_some(0);
        self.state.select(first);
    }

    fn step(&mut self, forward: bool) {
        let Some(i) = self.state.selected() else {
            return;
        };
        let next = if forward {
            (i + 1).min(self.visible.len().saturating_sub(1))
        } else {
            i.saturating_sub(1)
        };
        self.state.select(Some(next));
    }

    fn highlight_change(&self, before: Option<String>) -> BrowserAction {
        match self.selected() {
            Some(name) if before.as_deref() != Some(name) => {
                BrowserAction::Highlight(name.to_string())
            }
            _ => BrowserAction::None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> BrowserAction {
        let before = self.selected().map(str::to_string);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return BrowserAction::Quit,
            KeyCode::Char('n') | KeyCode::Char('j') if ctrl => self.step(true),
            KeyCode::Char('p') | KeyCode::Char('k') if ctrl => self.step(false),
            KeyCode::Down => self.step(true),
            KeyCode::Up => self.step(false),
            KeyCode::Enter => {
                return match self.selected() {
                    Some(name) => BrowserAction::Open(name.to_string()),
                    None => BrowserAction::None,
                };
            }
            KeyCode::Esc => {
                if self.filter.is_empty() {
                    return BrowserAction::Quit;
                }
                self.filter.clear();
                self.refilter();
                if let Some(name) = before.as_deref() {
                    self.select_name(name);
                }
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.refilter();
            }
            KeyCode::Char(c) if !ctrl => {
                self.filter.push(c);
                self.refilter();
            }
            _ => {}
        }
        self.highlight_change(before)
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let (shown, total) = (self.visible.len(), self.names.len());
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(format!(" themes [{shown}/{total}] "));
        let inner = block.inner(area);
        block.render(area, buf);

        let [list_area, filter_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner);

        let items: Vec<String> = self.visible().map(str::to_string).collect();
        let reversed = Style::default().add_modifier(Modifier::REVERSED);
        let list = List::new(items)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(reversed);
        StatefulWidget::render(list, list_area, buf, &mut self.state);

        let prompt = Line::from(vec![
            Span::styled("/ ", Style::default().add_modifier(Modifier::DIM)),
            Span::raw(self.filter.clone()),
        ]);
        Paragraph::new(vec![Line::from(""), prompt]).render(filter_area, buf);
    }
}
