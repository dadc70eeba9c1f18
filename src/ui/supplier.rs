//! 供应商信息页面
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use super::components::{
    self, block, error_line, key_hints, render_submitting, selected_style,
};
use crate::app::App;
use crate::models::ReviewStatus;
use crate::pages::supplier::SupplierItem;

fn review_color(status: ReviewStatus) -> Color {
    match status {
        ReviewStatus::NotSubmitted => Color::Gray,
        ReviewStatus::Reviewing => components::WARNING,
        ReviewStatus::Approved => components::SUCCESS,
        ReviewStatus::Rejected => components::DANGER,
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let editor = &app.supplier;
    let profile = editor.profile();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 审核状态
            Constraint::Min(8),    // 条目
            Constraint::Length(1), // 错误
            Constraint::Length(1), // 保存中
            Constraint::Length(1), // 按键提示
        ])
        .split(area);

    let status = profile.review_status;
    let mut spans = vec![
        Span::styled(" 审核状态：", Style::default().fg(components::MUTED)),
        Span::styled(
            status.display(),
            Style::default()
                .fg(review_color(status))
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(hint) = status.hint() {
        spans.push(Span::styled(
            format!("  {}", hint),
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(block("供应商信息")),
        chunks[0],
    );

    let items: Vec<ListItem> = editor
        .items()
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let line = match item {
                SupplierItem::Field(field) => {
                    let value = profile.field(field);
                    Line::from(vec![
                        Span::styled(
                            format!("  {:<10}", field.label()),
                            Style::default().fg(components::MUTED),
                        ),
                        if value.is_empty() {
                            Span::styled("（未填写）", Style::default().fg(Color::DarkGray))
                        } else {
                            Span::raw(value.to_string())
                        },
                    ])
                }
                SupplierItem::Document(doc) => {
                    let files = profile.document(doc);
                    let names: Vec<&str> =
                        files.files().iter().map(|a| a.name.as_str()).collect();
                    Line::from(vec![
                        Span::styled(
                            format!("  📎 {:<8}", doc.label()),
                            Style::default().fg(components::MUTED),
                        ),
                        if names.is_empty() {
                            Span::styled("（未上传）", Style::default().fg(Color::DarkGray))
                        } else {
                            Span::raw(names.join(", "))
                        },
                    ])
                }
                SupplierItem::Project(id) => match editor.project(id) {
                    Some(project) => Line::from(vec![
                        Span::styled(
                            format!("  ▸ 项目经验 #{} ", id),
                            Style::default().fg(components::ACCENT),
                        ),
                        Span::raw(if project.name.is_empty() {
                            "（未命名）".to_string()
                        } else {
                            project.name.clone()
                        }),
                        Span::styled(
                            format!("  {}  证明材料 {} 个", project.time, project.proof.len()),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]),
                    None => Line::from(""),
                },
            };
            let item = ListItem::new(line);
            if i == editor.cursor {
                item.style(selected_style())
            } else {
                item
            }
        })
        .collect();
    f.render_widget(List::new(items).block(block("基础信息与补充材料")), chunks[1]);

    f.render_widget(Paragraph::new(error_line(editor.error.as_deref())), chunks[2]);
    render_submitting(f, chunks[3], editor.submitting);
    f.render_widget(
        Paragraph::new(key_hints(&[
            ("e/Enter", "编辑"),
            ("u", "上传"),
            ("n", "新增项目"),
            ("d", "删除"),
            ("w", "保存"),
        ])),
        chunks[4],
    );
}
