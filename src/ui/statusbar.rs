use crate::app::{App, Mode};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// 渲染状态栏
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mode_text = match app.mode {
        Mode::Normal => ("NORMAL", Color::Green),
        Mode::Command => ("COMMAND", Color::Yellow),
        Mode::Dialog => ("DIALOG", Color::Magenta),
        Mode::Help => ("HELP", Color::Blue),
    };

    let mut spans = vec![Span::styled(
        format!(" {} ", mode_text.0),
        Style::default()
            .fg(Color::Black)
            .bg(mode_text.1)
            .add_modifier(Modifier::BOLD),
    )];

    if app.mode == Mode::Command {
        spans.push(Span::raw(format!(" :{}", app.command_input)));
        // 命令补全提示
        let hints: Vec<String> = app
            .command_registry
            .find_matches(&app.command_input)
            .into_iter()
            .take(4)
            .map(|def| format!("{} {}", def.name, def.description))
            .collect();
        if !app.command_input.starts_with('/') && !hints.is_empty() {
            spans.push(Span::styled(
                format!("   {}", hints.join("  ")),
                Style::default().fg(Color::DarkGray),
            ));
        }
    } else {
        spans.push(Span::raw(format!(" {} ", app.route.path())));
    }

    if app.is_busy() {
        spans.push(Span::styled(
            " 提交中… ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    f.render_widget(paragraph, area);
}
