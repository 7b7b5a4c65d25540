use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ResolvedTheme;

/// One-line bar under the feed: ` Layout  ⠋ page 2 | 3/40 | help`.
pub struct StatusBar<'a> {
    theme: &'a ResolvedTheme,
    label: &'a str,
    segments: Vec<Span<'a>>,
}

impl<'a> StatusBar<'a> {
    pub fn new(theme: &'a ResolvedTheme, label: &'a str) -> Self {
        Self {
            theme,
            label,
            segments: Vec::new(),
        }
    }

    /// Fetch progress, drawn in the spinner color.
    pub fn loading(mut self, text: &'a str) -> Self {
        self.segments
            .push(Span::styled(text, self.theme.spinner_style()));
        self
    }

    pub fn position(mut self, current: usize, total: usize) -> Self {
        self.segments.push(Span::styled(
            format!("{current}/{total}"),
            self.theme.dim_style(),
        ));
        self
    }

    pub fn help(mut self, text: &'a str) -> Self {
        if !text.is_empty() {
            self.segments.push(Span::styled(text, self.theme.dim_style()));
        }
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            Span::styled(format!(" {} ", self.label), self.theme.status_bar_style()),
            Span::raw(" "),
        ];
        for (i, segment) in self.segments.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(segment);
        }
        Line::from(spans).render(area, buf);
    }
}
