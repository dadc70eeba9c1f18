use crate::app::App;
use crate::route::NAVIGATION;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

/// 渲染左侧导航栏
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let current = app.route.nav_index();

    let items: Vec<ListItem> = NAVIGATION
        .iter()
        .enumerate()
        .map(|(i, (name, _))| {
            let is_selected = i == current;

            let content = if is_selected {
                Line::from(vec![
                    Span::raw(" "),
                    Span::styled(
                        format!("{}", i + 1),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::styled(
                        *name,
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(vec![
                    Span::raw(" "),
                    Span::styled(format!("{}", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::raw(" "),
                    Span::styled(*name, Style::default().fg(Color::Gray)),
                ])
            };

            let style = if is_selected {
                Style::default().bg(Color::Rgb(41, 98, 218)) // 蓝色高亮背景
            } else {
                Style::default()
            };

            ListItem::new(content).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" 供应商管理 ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .border_type(ratatui::widgets::BorderType::Rounded),
    );

    f.render_widget(list, area);
}
