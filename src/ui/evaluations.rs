use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::components::{self, block, key_hints, selected_style};
use crate::app::App;
use crate::models::EvaluationStatus;

/// 测评管理：类型概览 + 测评列表
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let page = &app.evaluations;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 测评类型
            Constraint::Length(1), // 筛选
            Constraint::Min(5),    // 列表
            Constraint::Length(1), // 按键提示
        ])
        .split(area);

    let mut spans = Vec::new();
    for ty in page.types() {
        let (mark, color) = if ty.passed {
            ("✓", components::SUCCESS)
        } else {
            ("○", Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", mark), Style::default().fg(color)));
        spans.push(Span::raw(format!("{}  ", ty.name)));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(block("测评类型")),
        chunks[0],
    );

    let filter = page.status_filter.map(|s| s.display()).unwrap_or("全部");
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" 状态：", Style::default().fg(components::MUTED)),
            Span::raw(filter),
        ])),
        chunks[1],
    );

    let rows: Vec<Row> = page
        .visible()
        .iter()
        .enumerate()
        .map(|(i, eval)| {
            let color = match eval.status {
                EvaluationStatus::Pending => components::WARNING,
                EvaluationStatus::Completed => components::SUCCESS,
            };
            let recipients = page.distribution().recipients(&eval.id).len();
            let row = Row::new(vec![
                Cell::from(eval.id.clone()),
                Cell::from(eval.name.clone()),
                Cell::from(eval.deadline.to_string()),
                Cell::from(Span::styled(eval.status.display(), Style::default().fg(color))),
                Cell::from(if recipients == 0 {
                    "-".to_string()
                } else {
                    format!("{} 人", recipients)
                }),
            ]);
            if i == page.selected {
                row.style(selected_style())
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["测评ID", "测评名称", "截止日期", "状态", "已分发"])
            .style(Style::default().fg(components::ACCENT).add_modifier(Modifier::BOLD)),
    )
    .block(block("测评列表"));
    f.render_widget(table, chunks[2]);

    f.render_widget(
        Paragraph::new(key_hints(&[
            ("f", "筛选"),
            ("d", "分发"),
            ("m", "申请更多测评"),
        ])),
        chunks[3],
    );
}
