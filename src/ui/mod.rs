pub mod components;
mod dashboard;
pub mod dialogs;
mod evaluations;
mod finance;
pub mod help;
mod sidebar;
mod statusbar;
mod supplier;
mod tasks;
pub mod text_input;
mod users;

use crate::app::{App, Mode, Notification, NotificationLevel};
use crate::route::Route;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// 主渲染函数
pub fn render(f: &mut Frame, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(40)])
        .split(f.area());

    sidebar::render(f, columns[0], app);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 面包屑
            Constraint::Min(0),    // 页面内容
            Constraint::Length(1), // 状态栏
        ])
        .split(columns[1]);

    render_breadcrumb(f, main[0], &app.route);
    render_page(f, main[1], app);
    statusbar::render(f, main[2], app);

    if app.dialog.is_some() {
        dialogs::render_dialog(f, app);
    }

    if app.mode == Mode::Help {
        help::render(f, f.area());
    }

    if let Some(ref notification) = app.notification {
        render_notification(f, f.area(), notification);
    }
}

fn render_page(f: &mut Frame, area: Rect, app: &App) {
    match &app.route {
        Route::Dashboard => dashboard::render(f, area, app),
        Route::Tasks => tasks::render_list(f, area, app),
        Route::TaskDetail(_) => tasks::render_detail(f, area, app),
        Route::TaskSubmit(_) => tasks::render_submit(f, area, app),
        Route::TaskConfirm(_) => tasks::render_confirm(f, area, app),
        Route::TaskPayment(_) => tasks::render_payment(f, area, app),
        Route::Evaluations => evaluations::render(f, area, app),
        Route::Supplier => supplier::render(f, area, app),
        Route::Users => users::render(f, area, app),
        Route::Finance => finance::render(f, area, app),
        Route::Invoice(_) => finance::render_invoice(f, area, app),
    }
}

/// 顶部面包屑：首页 / 任务管理 / 任务详情
fn render_breadcrumb(f: &mut Frame, area: Rect, route: &Route) {
    let crumbs = route.breadcrumb();
    let last = crumbs.len().saturating_sub(1);
    let mut spans = vec![Span::raw(" ")];
    for (i, crumb) in crumbs.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" / ", Style::default().fg(Color::DarkGray)));
        }
        let style = if i == last {
            Style::default()
                .fg(components::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(crumb, style));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .border_type(ratatui::widgets::BorderType::Rounded);
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// 渲染通知栏
fn render_notification(f: &mut Frame, area: Rect, notification: &Notification) {
    // 通知栏占据顶部 3 行
    let notification_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: 3.min(area.height),
    };

    // 根据级别选择颜色
    let (bg_color, fg_color, prefix) = match notification.level {
        NotificationLevel::Info => (Color::Blue, Color::White, "ℹ"),
        NotificationLevel::Success => (Color::Green, Color::White, "✓"),
        NotificationLevel::Warning => (Color::Yellow, Color::Black, "⚠"),
        NotificationLevel::Error => (Color::Red, Color::White, "✗"),
    };

    let content = Line::from(vec![
        Span::styled(
            format!(" {} ", prefix),
            Style::default()
                .fg(fg_color)
                .bg(bg_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(&notification.message, Style::default().fg(fg_color)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(bg_color))
        .style(Style::default().bg(bg_color));

    f.render_widget(ratatui::widgets::Clear, notification_area);
    f.render_widget(Paragraph::new(content).block(block), notification_area);
}
