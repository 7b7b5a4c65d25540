use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use loadmore::LoadState;

use crate::app::{App, Message};
use crate::feed_list::{Placement, Row};
use crate::help::feed_help;
use crate::keys::{format_key, global_keymap, list_keymap};
use crate::theme::ResolvedTheme;
use crate::views::common::{render_error, truncate_str};
use crate::views::spinner::spinner_frame;
use crate::views::status_bar::StatusBar;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Min(0),    // Feed
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_feed(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_feed(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    if let Some(err) = &app.error {
        let retry = key_for(&Message::Retry);
        render_error(frame, &format!("{err} Press {retry} to retry."), theme, area);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(format!("{} Feed", app.list.kind().label()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.initial_loading && app.list.is_empty() {
        let line = Line::from(vec![
            Span::styled(spinner_frame(app.status_since), theme.spinner_style()),
            Span::styled(" Loading feed...", theme.dim_style()),
        ]);
        frame.render_widget(
            Paragraph::new(line).alignment(Alignment::Center),
            Rect { height: 1, ..inner },
        );
        return;
    }

    let columns = app.list.columns().max(1) as u16;
    let col_width = inner.width / columns;
    let offset = app.list.offset();
    let lines = usize::from(inner.height);

    for placement in app.list.placements() {
        if placement.bottom() <= offset || placement.top >= offset + lines {
            continue;
        }
        let x = inner.x + placement.col as u16 * col_width;
        // The last lane absorbs the rounding remainder.
        let width = if placement.col + placement.span >= usize::from(columns) {
            inner.right().saturating_sub(x)
        } else {
            placement.span as u16 * col_width
        };
        let first = placement.top.max(offset);
        let last = placement.bottom().min(offset + lines);
        for line in first..last {
            let cell = Rect::new(x, inner.y + (line - offset) as u16, width, 1);
            let content = row_line(app, &placement, line - placement.top, usize::from(width));
            frame.render_widget(Paragraph::new(content), cell);
        }
    }
}

/// One screen line of the row at `placement`; `line` counts from its top.
fn row_line(app: &App, placement: &Placement, line: usize, width: usize) -> Line<'static> {
    let theme = &app.theme;
    let selected = placement.index == app.list.selected();
    let base = if selected {
        theme.selection_style()
    } else {
        Style::default()
    };
    let marker = if selected && line == 0 { "▶ " } else { "  " };
    let text_width = width.saturating_sub(2);

    let body = match &app.list.rows()[placement.index] {
        Row::Item(_) if line > 0 => Span::styled(" ".repeat(text_width), base),
        Row::Item(item) => Span::styled(
            format!(
                "{:<text_width$}",
                truncate_str(&item.title, text_width),
            ),
            Style::default().fg(theme.foreground).patch(base),
        ),
        Row::Status(_) => {
            let (text, style) = status_text(app, theme);
            Span::styled(truncate_str(&text, text_width), style.patch(base))
        }
    };
    Line::from(vec![Span::styled(marker, base), body])
}

/// Status row contents for the state it was last refreshed with.
fn status_text(app: &App, theme: &ResolvedTheme) -> (String, Style) {
    match app.status_view {
        LoadState::Loading => (
            format!("{} Loading more...", spinner_frame(app.status_since)),
            theme.spinner_style(),
        ),
        LoadState::Completed => (
            "Scroll down to load more".to_string(),
            Style::default().fg(theme.primary),
        ),
        LoadState::NoMore => (
            "No more items".to_string(),
            theme.dim_style().add_modifier(Modifier::ITALIC),
        ),
        LoadState::Failure => {
            let reason = app.load_error.as_deref().unwrap_or("Loading failed.");
            let retry = key_for(&Message::Retry);
            (
                format!("{reason} Press {retry} to retry."),
                Style::default().fg(theme.warning),
            )
        }
    }
}

fn key_for(message: &Message) -> String {
    list_keymap()
        .find_key(message)
        .map_or_else(|| "?".to_string(), |(code, mods)| format_key(code, mods))
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let keymap = list_keymap().extend(global_keymap());
    let help_text = feed_help().format(&keymap, app.show_help);
    let page = format!(
        "{} page {}",
        spinner_frame(app.status_since),
        app.next_page + 1
    );

    let mut bar = StatusBar::new(&app.theme, app.list.kind().label());
    if app.load_more.is_loading() || app.initial_loading {
        bar = bar.loading(&page);
    }
    if app.list.item_len() > 0 {
        let current = app.list.selected().min(app.list.item_len() - 1) + 1;
        bar = bar.position(current, app.list.item_len());
    }
    frame.render_widget(bar.help(&help_text), area);
}
