use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use crate::color::{Channel, Color as AppColor, Ycc};
use crate::palette::{Palette, Slot};
use crate::selection::SelectionMask;

fn to_color(c: AppColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Choose black or white foreground for readable text on the given background.
fn contrast_fg(c: AppColor) -> Color {
    if c.relative_luminance() > 0.4 {
        Color::Black
    } else {
        Color::White
    }
}

fn rounded(title: String, focused: bool) -> Block<'static> {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(title);
    let style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    block.border_style(style)
}

fn modified(text: &'static str, modifier: Modifier) -> Span<'static> {
    Span::styled(text, Style::default().add_modifier(modifier))
}

/// Renders the 18 slots as swatches with their abbreviations, marking the
/// selected ones.
pub struct SelectorWidget<'a> {
    palette: &'a Palette,
    mask: SelectionMask,
    cursor: Slot,
}

impl<'a> SelectorWidget<'a> {
    pub fn new(palette: &'a Palette, mask: SelectionMask, cursor: Slot) -> Self {
        Self {
            palette,
            mask,
            cursor,
        }
    }

    fn swatch_row(&self, slots: &[Slot]) -> Line<'static> {
        let mut spans = vec![Span::raw(" ")];
        for &slot in slots {
            let c = self.palette[slot].rgb();
            let mark = if self.mask.contains(slot) { "•" } else { " " };
            let label = format!("{:^5}", format!("{mark}{}", slot.abbr()));
            let mut style = Style::default().bg(to_color(c)).fg(contrast_fg(c));
            if slot == self.cursor {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            if !self.mask.contains(slot) {
                style = style.add_modifier(Modifier::DIM);
            }
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }
}

impl Widget for SelectorWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = rounded(format!(" selection [{}] ", self.mask.len()), false);
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            self.swatch_row(&Slot::ANSI[..8]),
            self.swatch_row(&Slot::ANSI[8..]),
            self.swatch_row(&[Slot::Foreground, Slot::Background]),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}

/// Column of each selected slot's marker on a slider `width` cells wide.
///
/// A marker whose column is taken moves to the nearest free cell within
/// three columns; if none is free it overlaps.
pub fn marker_columns(values: &[(Slot, u8)], width: usize) -> Vec<(usize, Slot)> {
    if width == 0 {
        return Vec::new();
    }
    let mut taken = vec![false; width];
    let mut out = Vec::with_capacity(values.len());
    for &(slot, value) in values {
        let mut col = (value as usize * width / 255).min(width - 1);
        for i in 0..=3 {
            if col >= i && !taken[col - i] {
                col -= i;
                break;
            }
            if col + i < width && !taken[col + i] {
                col += i;
                break;
            }
        }
        taken[col] = true;
        out.push((col, slot));
    }
    out
}

/// Columns of the tick marks at 0, 32, 64, … 255.
fn tick_columns(width: usize) -> Vec<(usize, u16)> {
    (0..=8)
        .map(|i| {
            let value = (i * 32).min(255) as u16;
            let col = (value as usize * width.saturating_sub(1)) / 255;
            (col, value)
        })
        .collect()
}

/// One horizontal 0..=255 scale for a channel, with a marker per selected
/// slot drawn in that slot's color.
pub struct SliderWidget<'a> {
    palette: &'a Palette,
    mask: SelectionMask,
    channel: Channel,
    focused: bool,
}

impl<'a> SliderWidget<'a> {
    pub fn new(palette: &'a Palette, mask: SelectionMask, channel: Channel, focused: bool) -> Self {
        Self {
            palette,
            mask,
            channel,
            focused,
        }
    }
}

impl Widget for SliderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.focused {
            format!(" {} ", self.channel.name())
        } else {
            format!(" {} ", self.channel.abbr())
        };
        let block = rounded(title, self.focused);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let width = inner.width as usize;
        let dim = Style::default().add_modifier(Modifier::DIM);
        let mut cells: Vec<(char, Style)> = vec![('╌', dim); width];
        for (i, (col, _)) in tick_columns(width).into_iter().enumerate() {
            cells[col].0 = if i % 2 == 0 { '┬' } else { '┴' };
        }

        let values: Vec<(Slot, u8)> = self
            .mask
            .iter()
            .into_iter()
            .map(|slot| (slot, self.palette[slot].access(self.channel)))
            .collect();
        let background = self.palette[Slot::Background].rgb();
        for (col, slot) in marker_columns(&values, width) {
            let c = self.palette[slot].rgb();
            cells[col] = if slot != Slot::Background && c == background {
                ('▒', Style::default())
            } else if self.focused {
                (cells[col].0, Style::default().bg(to_color(c)))
            } else {
                ('░', Style::default().fg(to_color(c)))
            };
        }

        let scale: Line = cells
            .into_iter()
            .map(|(ch, style)| Span::styled(ch.to_string(), style))
            .collect::<Vec<_>>()
            .into();

        let mut lines = vec![scale];
        if self.focused {
            let mut labels = vec![' '; width];
            for (i, (col, value)) in tick_columns(width).into_iter().enumerate() {
                if i % 2 != 0 {
                    continue;
                }
                let text = value.to_string();
                let last = width.saturating_sub(text.len());
                let start = col.saturating_sub(text.len() / 2).min(last);
                for (j, ch) in text.chars().enumerate() {
                    if let Some(cell) = labels.get_mut(start + j) {
                        *cell = ch;
                    }
                }
            }
            let labels: String = labels.into_iter().collect();
            lines.push(Line::styled(labels, dim));
        }

        let top = inner.y + inner.height.saturating_sub(lines.len() as u16) / 2;
        let height = inner.height.min(lines.len() as u16);
        let area = Rect::new(inner.x, top, inner.width, height);
        Paragraph::new(lines).render(area, buf);
    }
}

/// Detail line for one slot: hex, Y′CbCr, Oklch and contrast against the
/// background.
pub struct InspectorWidget<'a> {
    palette: &'a Palette,
    slot: Slot,
}

impl<'a> InspectorWidget<'a> {
    pub fn new(palette: &'a Palette, slot: Slot) -> Self {
        Self { palette, slot }
    }
}

impl Widget for InspectorWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let sample = self.palette[self.slot];
        let c = sample.rgb();
        let Ycc { y, cb, cr } = sample.ycc();
        let oklch = c.to_oklch();
        let (l, chroma) = (oklch.l, oklch.chroma);
        let hue: f32 = oklch.hue.into_positive_degrees();
        let ratio = AppColor::contrast_ratio(&c, &self.palette[Slot::Background].rgb());
        let (name, hex) = (self.slot.name(), c.to_hex());

        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("  {}  ", self.slot.abbr()),
                Style::default().bg(to_color(c)).fg(contrast_fg(c)),
            ),
            Span::raw(format!("  {name}  {hex}")),
            Span::raw(format!("  Y′{y:>4} Cb{cb:>4} Cr{cr:>4}")),
            Span::raw(format!("  L {l:.2} C {chroma:.2} h {hue:>3.0}°")),
            Span::raw(format!("  contrast {ratio:.1}:1")),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

const SAMPLE: [(&str, usize); 8] = [
    ("fn ", 4),
    ("main", 2),
    ("() {\n    ", 7),
    ("let ", 5),
    ("greeting = ", 7),
    ("\"hello\"", 3),
    (";  // ", 7),
    ("say hi\n}", 8),
];

/// Sample text drawn with the terminal's own indexed colors, so OSC palette
/// changes show up without redrawing.
pub struct PreviewWidget<'a> {
    title: &'a str,
}

impl<'a> PreviewWidget<'a> {
    pub fn new(title: &'a str) -> Self {
        Self { title }
    }
}

impl Widget for PreviewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = rounded(format!(" {} ", self.title), false);
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for i in 0..8u8 {
            let slot = Slot::ansi(i as usize);
            let bright = Slot::ansi(i as usize + 8);
            let normal = Style::default().fg(Color::Indexed(i));
            let brighter = Style::default().fg(Color::Indexed(i + 8));
            lines.push(Line::from(vec![
                Span::styled(format!("{:<16}", slot.name()), normal),
                Span::styled(format!("{:<16}", bright.name()), brighter),
                Span::styled("  ████  ", normal),
                Span::styled("████", brighter),
            ]));
        }
        lines.push(Line::from(""));

        let mut current: Vec<Span> = Vec::new();
        for (text, index) in SAMPLE {
            let style = Style::default().fg(Color::Indexed(index as u8));
            let mut parts = text.split('\n').peekable();
            while let Some(part) = parts.next() {
                if !part.is_empty() {
                    current.push(Span::styled(part.to_string(), style));
                }
                if parts.peek().is_some() {
                    lines.push(Line::from(std::mem::take(&mut current)));
                }
            }
        }
        lines.push(Line::from(current));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            modified(" reversed ", Modifier::REVERSED),
            Span::raw(" "),
            modified("bold", Modifier::BOLD),
            Span::raw(" "),
            modified("dim", Modifier::DIM),
            Span::raw(" "),
            modified("italic", Modifier::ITALIC),
        ]));

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        let mut ansi = [AppColor::BLACK; 16];
        for (i, c) in ansi.iter_mut().enumerate() {
            let v = (i * 17) as u8;
            *c = AppColor::new(v, v, v);
        }
        let fg = AppColor::new(220, 220, 220);
        Palette::new(ansi, fg, AppColor::new(10, 10, 10))
    }

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn markers_spread_on_collision() {
        let values = [(Slot::Red, 100), (Slot::Green, 100), (Slot::Blue, 100)];
        let cols = marker_columns(&values, 51);
        let expected = [(20, Slot::Red), (19, Slot::Green), (21, Slot::Blue)];
        assert_eq!(cols, expected);
    }

    #[test]
    fn markers_stay_in_bounds() {
        let values = [(Slot::Red, 255), (Slot::Green, 255), (Slot::Blue, 0)];
        let cols = marker_columns(&values, 10);
        let expected = [(9, Slot::Red), (8, Slot::Green), (0, Slot::Blue)];
        assert_eq!(cols, expected);
        assert!(marker_columns(&values, 0).is_empty());
    }

    #[test]
    fn tick_columns_span_width() {
        let ticks = tick_columns(256);
        assert_eq!(ticks.first(), Some(&(0, 0)));
        assert_eq!(ticks.last(), Some(&(255, 255)));
        assert_eq!(ticks.len(), 9);
    }

    #[test]
    fn selector_marks_selected_slots() {
        let p = palette();
        let mask = SelectionMask::only(Slot::Red) | SelectionMask::only(Slot::Background);
        let area = Rect::new(0, 0, 60, 5);
        let mut buf = Buffer::empty(area);
        SelectorWidget::new(&p, mask, Slot::Red).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("selection [2]"), "{text}");
        assert!(text.contains("•r"), "{text}");
        assert!(text.contains("•bg"), "{text}");
        assert!(!text.contains("•fg"), "{text}");
    }

    #[test]
    fn slider_shows_channel_name_when_focused() {
        let p = palette();
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        SliderWidget::new(&p, SelectionMask::ALL, Channel::ChromaRed, true).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("chroma-red"), "{text}");
        assert!(text.contains("255"), "{text}");

        let mut buf = Buffer::empty(area);
        SliderWidget::new(&p, SelectionMask::ALL, Channel::ChromaRed, false).render(area, &mut buf);
        assert!(buffer_text(&buf).contains(" Cr "));
    }

    #[test]
    fn inspector_shows_hex() {
        let p = palette();
        let area = Rect::new(0, 0, 120, 1);
        let mut buf = Buffer::empty(area);
        InspectorWidget::new(&p, Slot::Foreground).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("foreground"), "{text}");
        assert!(text.contains("#dcdcdc"), "{text}");
    }
}
