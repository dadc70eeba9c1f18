use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::components::{self, block, error_line, key_hints, selected_style};
use crate::app::App;
use crate::models::UserStatus;

/// 用户管理列表
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let admin = &app.users;
    let page = admin.current_page();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // 筛选
            Constraint::Min(5),    // 表格
            Constraint::Length(1), // 分页
            Constraint::Length(1), // 表单错误
            Constraint::Length(1), // 按键提示
        ])
        .split(area);

    let muted = Style::default().fg(components::MUTED);
    let search = if admin.search().is_empty() {
        "-"
    } else {
        admin.search()
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" 角色：", muted),
            Span::raw(admin.role_filter.map(|r| r.display()).unwrap_or("全部")),
            Span::styled("   状态：", muted),
            Span::raw(admin.status_filter.map(|s| s.display()).unwrap_or("全部")),
            Span::styled("   搜索：", muted),
            Span::raw(search.to_string()),
        ])),
        chunks[0],
    );

    let rows: Vec<Row> = page
        .items
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let status_color = match user.status {
                UserStatus::Enabled => components::SUCCESS,
                UserStatus::Disabled => components::DANGER,
            };
            let row = Row::new(vec![
                Cell::from(user.id.clone()),
                Cell::from(user.name.clone()),
                Cell::from(user.role.display()),
                Cell::from(user.phone.clone()),
                Cell::from(user.join_time.to_string()),
                Cell::from(Span::styled(
                    user.status.display(),
                    Style::default().fg(status_color),
                )),
                Cell::from(user.notes.clone()),
            ]);
            if i == admin.selected {
                row.style(selected_style())
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(13),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["用户ID", "姓名", "角色", "电话", "加入时间", "状态", "备注"])
            .style(Style::default().fg(components::ACCENT).add_modifier(Modifier::BOLD)),
    )
    .block(block("用户列表"));
    f.render_widget(table, chunks[1]);

    f.render_widget(
        Paragraph::new(Span::styled(
            format!(
                " 第 {}/{} 页  共 {} 条",
                page.page,
                page.total_pages.max(1),
                page.total
            ),
            Style::default().fg(Color::DarkGray),
        )),
        chunks[2],
    );
    f.render_widget(
        Paragraph::new(error_line(admin.form_error.as_deref())),
        chunks[3],
    );
    f.render_widget(
        Paragraph::new(key_hints(&[
            ("/", "搜索"),
            ("r", "角色"),
            ("t", "状态"),
            ("h/l", "翻页"),
            ("a", "添加"),
            ("e", "编辑"),
            ("x", "启用/禁用"),
        ])),
        chunks[4],
    );
}
