//! 各页面共用的小部件
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{AttachmentSet, TaskStatus};

pub const ACCENT: Color = Color::Rgb(136, 192, 208);
pub const MUTED: Color = Color::Rgb(129, 161, 193);
pub const DANGER: Color = Color::Rgb(191, 97, 106);
pub const SUCCESS: Color = Color::Rgb(163, 190, 140);
pub const WARNING: Color = Color::Rgb(235, 203, 139);

/// 页面区块
pub fn block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .border_type(ratatui::widgets::BorderType::Rounded)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(Color::Rgb(41, 98, 218))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::PendingAcceptance => WARNING,
        TaskStatus::InProgress => ACCENT,
        TaskStatus::PendingVerification => Color::Rgb(180, 142, 173),
        TaskStatus::Verified => SUCCESS,
        TaskStatus::Completed => Color::Gray,
        TaskStatus::Rejected => DANGER,
    }
}

pub fn status_span(status: TaskStatus) -> Span<'static> {
    Span::styled(
        status.display(),
        Style::default().fg(status_color(status)).add_modifier(Modifier::BOLD),
    )
}

/// `标签：值`
pub fn field_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}：", label), Style::default().fg(MUTED)),
        Span::raw(value.into()),
    ])
}

/// 底部的按键提示
pub fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, desc) in hints {
        spans.push(Span::styled(
            format!(" {} ", key),
            Style::default().fg(Color::Black).bg(ACCENT),
        ));
        spans.push(Span::styled(format!(" {}  ", desc), Style::default().fg(MUTED)));
    }
    Line::from(spans)
}

pub fn error_line(error: Option<&str>) -> Line<'static> {
    match error {
        Some(message) => Line::from(Span::styled(
            format!("✗ {}", message),
            Style::default().fg(DANGER),
        )),
        None => Line::from(""),
    }
}

/// 已选择的文件列表
pub fn render_attachments(
    f: &mut Frame,
    area: Rect,
    title: &str,
    files: &AttachmentSet,
    selected: Option<usize>,
) {
    let items: Vec<ListItem> = if files.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            format!("  暂无文件（{}）", files.context().hint()),
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        files
            .files()
            .iter()
            .enumerate()
            .map(|(i, file)| {
                let line = Line::from(vec![
                    Span::raw("  "),
                    Span::raw(file.name.clone()),
                    Span::styled(
                        format!("  {}", file.display_size()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]);
                let item = ListItem::new(line);
                if selected == Some(i) {
                    item.style(selected_style())
                } else {
                    item
                }
            })
            .collect()
    };

    let title = format!("{} ({})", title, files.len());
    f.render_widget(List::new(items).block(block(&title)), area);
}

/// 提交中提示
pub fn render_submitting(f: &mut Frame, area: Rect, submitting: bool) {
    if submitting {
        let text = Paragraph::new(Span::styled(
            "提交中，请稍候…",
            Style::default().fg(WARNING).add_modifier(Modifier::BOLD),
        ));
        f.render_widget(text, area);
    }
}
