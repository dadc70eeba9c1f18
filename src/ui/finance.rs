//! 财务结算与发票上传页面
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::components::{
    self, block, error_line, field_line, key_hints, render_attachments, render_submitting,
    selected_style,
};
use crate::app::App;
use crate::models::finance::format_currency;
use crate::models::SettlementStatus;

fn settlement_color(status: SettlementStatus) -> Color {
    match status {
        SettlementStatus::Pending => components::WARNING,
        SettlementStatus::Settled => components::ACCENT,
        SettlementStatus::Paid => components::SUCCESS,
        SettlementStatus::Rejected => components::DANGER,
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let board = &app.finance;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let overview = board.overview();
    let amount = |label: &str, value: u64, color: Color| {
        vec![
            Span::styled(format!("  {}：", label), Style::default().fg(components::MUTED)),
            Span::styled(
                format_currency(value),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]
    };
    let spans: Vec<Span> = amount("账户余额", overview.account_balance, Color::White)
        .into_iter()
        .chain(amount("待结算", overview.pending_settlement, components::WARNING))
        .chain(amount("已结算", overview.settled_amount, components::SUCCESS))
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(block("财务概览")),
        chunks[0],
    );

    let rows: Vec<Row> = board
        .records()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let invoice = if board.is_invoiced(&record.task_id) {
                Span::styled("已上传", Style::default().fg(components::SUCCESS))
            } else if board.can_upload_invoice(&record.task_id) {
                Span::styled("可上传", Style::default().fg(components::ACCENT))
            } else {
                Span::styled("-", Style::default().fg(Color::DarkGray))
            };
            let row = Row::new(vec![
                Cell::from(record.task_id.clone()),
                Cell::from(record.name.clone()),
                Cell::from(format_currency(record.amount)),
                Cell::from(Span::styled(
                    record.settlement.display(),
                    Style::default().fg(settlement_color(record.settlement)),
                )),
                Cell::from(invoice),
            ]);
            if i == board.selected {
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
        Row::new(vec!["任务ID", "任务名称", "金额", "结算状态", "发票"])
            .style(Style::default().fg(components::ACCENT).add_modifier(Modifier::BOLD)),
    )
    .block(block("任务结算"));
    f.render_widget(table, chunks[1]);

    f.render_widget(
        Paragraph::new(key_hints(&[("j/k", "选择"), ("i/Enter", "上传发票")])),
        chunks[2],
    );
}

/// 发票上传
pub fn render_invoice(f: &mut Frame, area: Rect, app: &App) {
    let page = &app.invoice;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let mut info = vec![field_line("任务ID", page.record_id())];
    if let Ok(record) = app.finance.record(page.record_id()) {
        info.push(field_line("任务名称", record.name.clone()));
        info.push(field_line("金额", format_currency(record.amount)));
    }
    f.render_widget(Paragraph::new(info).block(block("上传发票")), chunks[0]);

    render_attachments(f, chunks[1], "发票", page.invoice(), None);
    f.render_widget(Paragraph::new(error_line(page.error.as_deref())), chunks[2]);
    if page.submitted {
        f.render_widget(
            Paragraph::new(Span::styled(
                "✓ 发票已上传",
                Style::default().fg(components::SUCCESS),
            )),
            chunks[3],
        );
    } else {
        render_submitting(f, chunks[3], page.submitting);
    }
    f.render_widget(
        Paragraph::new(key_hints(&[
            ("u", "选择发票"),
            ("d", "移除"),
            ("Enter", "提交"),
            ("Esc", "返回"),
        ])),
        chunks[4],
    );
}
