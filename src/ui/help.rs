use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::dialogs::centered_rect;

const GENERAL: &[(&str, &str)] = &[
    ("j, ↓", "下一项"),
    ("k, ↑", "上一项"),
    ("Enter", "打开/提交"),
    ("1-6", "切换栏目"),
    ("Esc", "返回上一级"),
    (":", "命令/路径"),
    ("?", "帮助"),
    ("q", "退出程序"),
];

const TASKS: &[(&str, &str)] = &[
    ("f", "状态筛选"),
    ("s", "截止日期排序"),
    ("a", "执行下一步"),
    ("r", "处理第一条提醒"),
    ("", ""),
    ("a", "详情：接受任务"),
    ("x", "详情：拒绝任务"),
    ("s/c/p", "提交成果/验收/付款"),
    ("u", "上传文件"),
    ("d", "移除文件"),
];

const OTHERS: &[(&str, &str)] = &[
    ("f", "测评：状态筛选"),
    ("d", "测评：分发"),
    ("m", "测评：申请更多"),
    ("e/u", "供应商：编辑/上传"),
    ("n/d", "供应商：新增/移除"),
    ("w", "供应商：保存"),
    ("/ r t", "用户：搜索/角色/状态"),
    ("h/l", "用户：翻页"),
    ("a/e/x", "用户：添加/编辑/启停"),
    ("i", "财务：上传发票"),
];

fn section(title: &str, keys: &[(&str, &str)]) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(keys.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(format!("{:<8}", key), Style::default().fg(Color::Cyan)),
            Span::raw(format!("  {}", desc)),
        ])
    }));
    lines
}

/// 渲染帮助面板
pub fn render(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(80, 70, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" 键盘快捷键帮助 (按 ESC 或 ? 关闭) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    // 分成三列
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ])
        .split(inner);

    let sections = [
        section("基础导航", GENERAL),
        section("任务管理", TASKS),
        section("其他页面", OTHERS),
    ];
    for (lines, column) in sections.into_iter().zip(columns.iter()) {
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), *column);
    }
}
