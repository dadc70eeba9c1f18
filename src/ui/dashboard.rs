use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use super::components::{self, block, selected_style, status_span};
use crate::app::App;

/// 首页：任务概览、最近任务、快捷入口
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // 概览
            Constraint::Min(5),    // 最近任务 + 快捷入口
            Constraint::Length(1), // 按键提示
        ])
        .split(area);

    render_overview(f, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    let recent: Vec<ListItem> = app
        .dashboard
        .recent_tasks(&app.tasks)
        .into_iter()
        .map(|task| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", task.id()), Style::default().fg(Color::DarkGray)),
                Span::raw(task.name().to_string()),
                Span::raw("  "),
                status_span(task.status()),
                Span::styled(
                    format!("  截止 {}", task.deadline()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    f.render_widget(List::new(recent).block(block("最近任务")), body[0]);

    let links: Vec<ListItem> = app
        .dashboard
        .quick_links()
        .iter()
        .enumerate()
        .map(|(i, (name, path))| {
            let item = ListItem::new(Line::from(vec![
                Span::raw(format!("  {}", name)),
                Span::styled(format!("  {}", path), Style::default().fg(Color::DarkGray)),
            ]));
            if i == app.dashboard.selected_link {
                item.style(selected_style())
            } else {
                item
            }
        })
        .collect();
    f.render_widget(List::new(links).block(block("快捷入口")), body[1]);

    f.render_widget(
        Paragraph::new(components::key_hints(&[("j/k", "选择"), ("Enter", "进入")])),
        chunks[2],
    );
}

fn render_overview(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    for (status, count) in app.tasks.count_by_status() {
        spans.push(Span::raw("  "));
        spans.push(status_span(status));
        spans.push(Span::styled(
            format!(" {}", count),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(
            format!("  共 {} 个任务", app.tasks.all().len()),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines).block(block("任务概览")), area);
}
