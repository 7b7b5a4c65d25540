use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .title(" Debug ")
        .borders(Borders::ALL)
        .border_style(theme.dim_style());

    let mut lines = Vec::new();

    // Controller snapshot
    let controller = &app.load_more;
    lines.push(Line::from(vec![
        Span::styled("State: ", theme.dim_style()),
        Span::styled(
            controller.state().label(),
            Style::default().fg(if controller.is_loading() {
                theme.spinner
            } else {
                theme.foreground
            }),
        ),
        Span::styled(
            format!(
                "  row: {}  next page: {}  gen: {}",
                app.list
                    .status_position()
                    .map_or_else(|| "-".to_string(), |i| i.to_string()),
                app.next_page + 1,
                app.generation,
            ),
            theme.dim_style(),
        ),
    ]));

    let task_count = app.debug.running_tasks.len();
    lines.push(Line::from(vec![
        Span::styled("Tasks: ", theme.dim_style()),
        Span::styled(
            task_count.to_string(),
            Style::default().fg(if task_count > 0 {
                theme.success
            } else {
                theme.foreground
            }),
        ),
    ]));

    for task in &app.debug.running_tasks {
        let elapsed = task.started_at.elapsed();
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}] ", task.id), theme.dim_style()),
            Span::styled(&task.description, Style::default().fg(theme.foreground)),
            Span::styled(format!(" ({:.1?})", elapsed), theme.dim_style()),
        ]));
    }

    // Newest log entries first, as many as fit
    let available_lines = area.height.saturating_sub(2) as usize;
    let log_lines = available_lines.saturating_sub(lines.len());

    for entry in app.debug.log.iter().rev().take(log_lines) {
        lines.push(Line::from(Span::styled(
            format!("  {}", entry.message),
            theme.dim_style(),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestAppBuilder;
    use crate::views::tests::render_to_string;
    use loadmore::LoadState;

    #[test]
    fn shows_controller_state() {
        let app = TestAppBuilder::new()
            .items(5)
            .state(LoadState::Failure)
            .build();
        let output = render_to_string(60, 10, |frame| render(frame, &app, frame.area()));

        assert!(output.contains("State: failure"));
        assert!(output.contains("row: 5"));
        assert!(output.contains("next page: 2"));
        assert!(output.contains("Tasks: 0"));
    }

    #[test]
    fn newest_log_entries_come_first() {
        let mut app = TestAppBuilder::new().build();
        app.debug.log("older");
        app.debug.log("newer");
        let output = render_to_string(40, 10, |frame| render(frame, &app, frame.area()));

        let newer = output.find("newer").unwrap();
        let older = output.find("older").unwrap();
        assert!(newer < older);
    }
}
