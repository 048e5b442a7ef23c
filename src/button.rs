// button.rs

use crate::app::Action;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Widget},
};

type OnPress<'a> = Box<dyn Fn() -> Action + 'a>;

/// A clickable label. Holds no state of its own; pressing it only hands back
/// whatever the caller's callback produces.
pub struct Button<'a> {
    label: &'a str,
    style: Style,
    focused_style: Style,
    focused: bool,
    on_press: Option<OnPress<'a>>,
}

impl<'a> Button<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            style: Style::default().fg(Color::White).bg(Color::Blue),
            focused_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            focused: false,
            on_press: None,
        }
    }

    pub fn on_press<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Action + 'a,
    {
        self.on_press = Some(Box::new(f));
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn press(&self) -> Option<Action> {
        self.on_press.as_ref().map(|f| f())
    }

    fn current_style(&self) -> Style {
        if self.focused {
            self.focused_style
        } else {
            self.style
        }
    }

    /// Inline form for use inside table cells and footers.
    pub fn as_span(&self) -> Span<'a> {
        Span::styled(format!("[ {} ]", self.label), self.current_style())
    }
}

impl Widget for &Button<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.current_style();
        Paragraph::new(self.label)
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::default().borders(Borders::ALL).border_style(style))
            .render(area, buf);
    }
}
