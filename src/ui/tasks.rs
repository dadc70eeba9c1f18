//! 任务列表、任务详情以及提交成果、验收确认、申请付款页面
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::components::{
    self, block, error_line, field_line, key_hints, render_attachments, render_submitting,
    selected_style, status_color, status_span,
};
use crate::app::App;
use crate::models::finance::format_currency;
use crate::models::{Task, TaskActionKind};

pub fn render_list(f: &mut Frame, area: Rect, app: &App) {
    let reminders = app
        .tasks
        .reminders(app.today(), app.config.reminder_window_days);
    let reminder_height = if reminders.is_empty() {
        0
    } else {
        reminders.len() as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // 筛选条件
            Constraint::Length(reminder_height), // 提醒
            Constraint::Min(5),                  // 任务表格
            Constraint::Length(1),               // 按键提示
        ])
        .split(area);

    let filter = app
        .tasks
        .status_filter
        .map(|s| s.display())
        .unwrap_or("全部");
    let header = Line::from(vec![
        Span::styled(" 状态：", Style::default().fg(components::MUTED)),
        Span::raw(filter),
        Span::styled("   排序：", Style::default().fg(components::MUTED)),
        Span::raw(app.tasks.sort.label()),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    if !reminders.is_empty() {
        let lines: Vec<Line> = reminders
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::styled(" ⚠ ", Style::default().fg(components::WARNING)),
                    Span::styled(
                        format!("{} {}", r.task_id, r.task_name),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("  {}  ", r.message)),
                    Span::styled(r.alert, Style::default().fg(components::WARNING)),
                    Span::styled(
                        format!("  → {} {}", r.action_label, r.action_path),
                        Style::default().fg(components::ACCENT),
                    ),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(lines).block(block("任务提醒")), chunks[1]);
    }

    let rows: Vec<Row> = app
        .tasks
        .visible()
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let actions: Vec<&str> = task.available_actions().iter().map(|a| a.label()).collect();
            let row = Row::new(vec![
                Cell::from(task.id().to_string()),
                Cell::from(task.name().to_string()),
                Cell::from(task.deadline().to_string()),
                Cell::from(format_currency(task.amount())),
                Cell::from(Span::styled(
                    task.status().display(),
                    Style::default().fg(status_color(task.status())),
                )),
                Cell::from(actions.join(" / ")),
            ]);
            if i == app.tasks.selected {
                row.style(selected_style())
            } else if task.status().is_terminal() {
                row.style(Style::default().fg(Color::DarkGray))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Min(14),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Min(16),
        ],
    )
    .header(
        Row::new(vec!["任务ID", "任务名称", "截止日期", "金额", "状态", "操作"])
            .style(Style::default().fg(components::ACCENT).add_modifier(Modifier::BOLD)),
    )
    .block(block("任务列表"));
    f.render_widget(table, chunks[2]);

    f.render_widget(
        Paragraph::new(key_hints(&[
            ("Enter", "详情"),
            ("a", "下一步"),
            ("f", "筛选"),
            ("s", "排序"),
            ("r", "处理提醒"),
        ])),
        chunks[3],
    );
}

fn task_info(task: &Task) -> Vec<Line<'static>> {
    let mut lines = vec![
        field_line("任务ID", task.id()),
        field_line("任务名称", task.name()),
        Line::from(vec![
            Span::styled("状态：", Style::default().fg(components::MUTED)),
            status_span(task.status()),
        ]),
        field_line("截止日期", task.deadline().to_string()),
        field_line("金额", format_currency(task.amount())),
    ];
    if let Some(reason) = task.rejection_reason() {
        lines.push(field_line("拒绝原因", reason));
    }
    lines
}

/// 任务详情
pub fn render_detail(f: &mut Frame, area: Rect, app: &App) {
    let Some(task) = app.tasks.get(app.detail.task_id()) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // 基本信息
            Constraint::Min(4),    // 描述与要求
            Constraint::Length(1), // 提交状态
            Constraint::Length(1), // 按键提示
        ])
        .split(area);

    f.render_widget(Paragraph::new(task_info(task)).block(block("任务信息")), chunks[0]);

    let description = vec![
        Line::from(Span::styled("任务描述", Style::default().fg(components::MUTED))),
        Line::from(task.description().to_string()),
        Line::from(""),
        Line::from(Span::styled("交付要求", Style::default().fg(components::MUTED))),
        Line::from(task.requirements().to_string()),
    ];
    f.render_widget(
        Paragraph::new(description)
            .block(block("任务详情"))
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    render_submitting(f, chunks[2], app.detail.submitting);

    let hints: Vec<(&str, &str)> = task
        .available_actions()
        .into_iter()
        .map(|kind| match kind {
            TaskActionKind::Accept => ("a", kind.label()),
            TaskActionKind::Reject => ("x", kind.label()),
            TaskActionKind::SubmitDeliverables => ("s", kind.label()),
            TaskActionKind::ConfirmAcceptance => ("c", kind.label()),
            TaskActionKind::ApplyForPayment => ("p", kind.label()),
        })
        .chain([("Esc", "返回")])
        .collect();
    f.render_widget(Paragraph::new(key_hints(&hints)), chunks[3]);
}

/// 上传页面的通用布局：任务信息、文件列表、错误与提交状态
fn upload_layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // 任务信息
            Constraint::Min(4),    // 文件列表
            Constraint::Length(1), // 错误
            Constraint::Length(1), // 提交状态
            Constraint::Length(1), // 按键提示
        ])
        .split(area)
}

/// 提交交付成果
pub fn render_submit(f: &mut Frame, area: Rect, app: &App) {
    let page = &app.submission;
    let Some(task) = app.tasks.get(page.task_id()) else {
        return;
    };
    let chunks = upload_layout(area);

    f.render_widget(Paragraph::new(task_info(task)).block(block("提交成果")), chunks[0]);
    render_attachments(f, chunks[1], "交付成果", page.files(), Some(page.selected));
    f.render_widget(Paragraph::new(error_line(page.error.as_deref())), chunks[2]);
    render_submitting(f, chunks[3], page.submitting);
    f.render_widget(
        Paragraph::new(key_hints(&[
            ("u", "添加文件"),
            ("d", "移除选中"),
            ("Enter", "提交"),
            ("Esc", "返回"),
        ])),
        chunks[4],
    );
}

/// 验收确认
pub fn render_confirm(f: &mut Frame, area: Rect, app: &App) {
    let page = &app.acceptance;
    let Some(task) = app.tasks.get(page.task_id()) else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    f.render_widget(Paragraph::new(task_info(task)).block(block("验收确认")), chunks[0]);

    let note = if page.is_pending() {
        Span::styled("等待确认验收…", Style::default().fg(components::WARNING))
    } else if task.can(TaskActionKind::ConfirmAcceptance) {
        Span::raw("请核对交付成果，确认无误后按 c 确认验收。")
    } else {
        Span::styled(
            format!("任务当前状态为「{}」，无需验收。", task.status()),
            Style::default().fg(Color::DarkGray),
        )
    };
    f.render_widget(
        Paragraph::new(Line::from(note))
            .block(block("说明"))
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    render_submitting(f, chunks[2], page.submitting);
    f.render_widget(
        Paragraph::new(key_hints(&[("c/Enter", "确认验收"), ("Esc", "返回")])),
        chunks[3],
    );
}

/// 申请付款
pub fn render_payment(f: &mut Frame, area: Rect, app: &App) {
    let page = &app.payment;
    let Some(task) = app.tasks.get(page.task_id()) else {
        return;
    };
    let chunks = upload_layout(area);

    f.render_widget(Paragraph::new(task_info(task)).block(block("申请付款")), chunks[0]);
    render_attachments(f, chunks[1], "发票", page.invoice(), None);
    f.render_widget(Paragraph::new(error_line(page.error.as_deref())), chunks[2]);

    if page.submitted {
        f.render_widget(
            Paragraph::new(Span::styled(
                "✓ 付款申请已提交，等待财务处理",
                Style::default().fg(components::SUCCESS),
            )),
            chunks[3],
        );
    } else {
        render_submitting(f, chunks[3], page.submitting);
    }

    f.render_widget(
        Paragraph::new(key_hints(&[
            ("u", "上传发票"),
            ("d", "移除"),
            ("Enter", "提交申请"),
            ("Esc", "返回"),
        ])),
        chunks[4],
    );
}
