use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::text_input::TextField;
use crate::app::App;
use crate::models::{ProfileField, SupplierDocument};

/// 确认操作类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    AcceptTask,
    ConfirmAcceptance,
    ToggleUser,
}

/// 输入内容的用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPurpose {
    RejectReason,
    /// 以下几项：每行一个文件路径
    Deliverables,
    PaymentInvoice,
    InvoiceUpload,
    SupplierDocument(SupplierDocument),
    ProjectProof(u32),
    SupplierField(ProfileField),
    /// 项目经验：`名称=`/`时间=`/`描述=`
    Project(u32),
    UserSearch,
    /// 用户表单：`姓名=`/`联系电话=`/`角色=`/`备注=`
    UserForm,
}

impl InputPurpose {
    pub fn is_file_list(self) -> bool {
        matches!(
            self,
            InputPurpose::Deliverables
                | InputPurpose::PaymentInvoice
                | InputPurpose::InvoiceUpload
                | InputPurpose::SupplierDocument(_)
                | InputPurpose::ProjectProof(_)
        )
    }
}

/// 对话框类型
pub enum DialogType {
    /// 输入对话框，`error` 为上一次提交的校验错误
    Input {
        title: String,
        prompt: String,
        field: TextField,
        purpose: InputPurpose,
        error: Option<String>,
    },
    /// 确认对话框
    Confirm {
        title: String,
        message: String,
        yes_selected: bool,
        action: ConfirmAction,
    },
    /// 分发测评时勾选用户，状态保存在测评页面
    SelectUsers { title: String },
    /// 只读说明
    Info { title: String, message: String },
}

impl DialogType {
    pub fn input(title: &str, prompt: &str, initial: &str, purpose: InputPurpose) -> Self {
        let multiline = purpose.is_file_list()
            || matches!(purpose, InputPurpose::Project(_) | InputPurpose::UserForm);
        DialogType::Input {
            title: title.to_string(),
            prompt: prompt.to_string(),
            field: TextField::new(initial, multiline),
            purpose,
            error: None,
        }
    }

    pub fn confirm(title: &str, message: &str, action: ConfirmAction) -> Self {
        DialogType::Confirm {
            title: title.to_string(),
            message: message.to_string(),
            yes_selected: true,
            action,
        }
    }
}

/// 渲染居中的对话框
pub fn render_dialog(f: &mut Frame, app: &App) {
    let Some(dialog) = &app.dialog else {
        return;
    };

    // 渲染半透明背景遮罩
    render_backdrop(f, f.area());

    let area = match dialog {
        DialogType::Input { field, .. } if field.is_multiline() => centered_rect(70, 60, f.area()),
        DialogType::Confirm { .. } | DialogType::Info { .. } => centered_rect(50, 30, f.area()),
        _ => centered_rect(60, 50, f.area()),
    };

    // 清空对话框区域
    f.render_widget(Clear, area);

    match dialog {
        DialogType::Input {
            title,
            prompt,
            field,
            error,
            ..
        } => render_input_dialog(f, area, title, prompt, field, error.as_deref()),
        DialogType::Confirm {
            title,
            message,
            yes_selected,
            ..
        } => render_confirm_dialog(f, area, title, message, *yes_selected),
        DialogType::SelectUsers { title } => render_select_users_dialog(f, area, title, app),
        DialogType::Info { title, message } => render_info_dialog(f, area, title, message),
    }
}

/// 渲染半透明背景遮罩
fn render_backdrop(f: &mut Frame, area: Rect) {
    let block = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    f.render_widget(block, area);
}

fn dialog_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!("  {}  ", title))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(76, 86, 106))) // Nord border color
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Rgb(46, 52, 64))) // Nord background
}

/// 渲染输入对话框
fn render_input_dialog(
    f: &mut Frame,
    area: Rect,
    title: &str,
    prompt: &str,
    field: &TextField,
    error: Option<&str>,
) {
    let block = dialog_block(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let input_height = if field.is_multiline() {
        Constraint::Min(6)
    } else {
        Constraint::Length(3)
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // 提示文本
            input_height,          // 输入框
            Constraint::Length(1), // 错误信息
            Constraint::Length(1), // 模式指示器
        ])
        .split(inner);

    let prompt_text = Paragraph::new(prompt)
        .style(Style::default().fg(Color::Rgb(129, 161, 193))) // Nord frost color
        .wrap(Wrap { trim: true });
    f.render_widget(prompt_text, chunks[0]);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(136, 192, 208))) // Nord cyan
        .border_type(ratatui::widgets::BorderType::Rounded);
    let input_inner = input_block.inner(chunks[1]);
    f.render_widget(input_block, chunks[1]);
    field.render(f, input_inner);

    if let Some(error) = error {
        let error_line = Paragraph::new(format!("✗ {}", error))
            .style(Style::default().fg(Color::Rgb(191, 97, 106)));
        f.render_widget(error_line, chunks[2]);
    }

    field.render_mode_indicator(f, chunks[3]);
}

/// 渲染确认对话框
fn render_confirm_dialog(
    f: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    yes_selected: bool,
) {
    let block = dialog_block(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(2),    // 消息
            Constraint::Length(1), // 按钮
            Constraint::Length(1), // 帮助
        ])
        .split(inner);

    let message_paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::Rgb(236, 239, 244)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(message_paragraph, chunks[0]);

    let selected = Style::default()
        .fg(Color::Rgb(46, 52, 64))
        .bg(Color::Rgb(136, 192, 208))
        .add_modifier(Modifier::BOLD);
    let normal = Style::default().fg(Color::Rgb(216, 222, 233));
    let (yes_style, no_style) = if yes_selected {
        (selected, normal)
    } else {
        (normal, selected)
    };

    let buttons = Line::from(vec![
        Span::styled("  确定  ", yes_style),
        Span::raw("    "),
        Span::styled("  取消  ", no_style),
    ]);
    f.render_widget(Paragraph::new(buttons).alignment(Alignment::Center), chunks[1]);

    let help = Paragraph::new("←/→ 选择  Enter 确认  y/n 快捷  Esc 取消")
        .style(Style::default().fg(Color::Rgb(76, 86, 106)))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);
}

/// 渲染分发测评的用户选择对话框
fn render_select_users_dialog(f: &mut Frame, area: Rect, title: &str, app: &App) {
    let block = dialog_block(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // 用户列表
            Constraint::Length(1), // 帮助
        ])
        .split(inner);

    let Some(distribute) = app.evaluations.dialog() else {
        return;
    };

    let items: Vec<ListItem> = app
        .users
        .all()
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let checked = distribute.selected.contains(&user.id);
            let marker = if checked { "[x]" } else { "[ ]" };
            let style = if i == distribute.cursor {
                Style::default()
                    .bg(Color::Rgb(41, 98, 218))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(216, 222, 233))
            };
            ListItem::new(Line::from(vec![
                Span::raw("  "),
                Span::styled(marker, Style::default().fg(Color::Rgb(163, 190, 140))),
                Span::raw(format!(" {}  {}  {}", user.id, user.name, user.role)),
            ]))
            .style(style)
        })
        .collect();
    f.render_widget(List::new(items), chunks[0]);

    let help = Paragraph::new(format!(
        "已选 {} 人  j/k 移动  Space 勾选  Enter 确定  Esc 取消",
        distribute.selected.len()
    ))
    .style(Style::default().fg(Color::Rgb(129, 161, 193)))
    .alignment(Alignment::Center);
    f.render_widget(help, chunks[1]);
}

fn render_info_dialog(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let block = dialog_block(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::Rgb(236, 239, 244)))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, chunks[0]);

    let help = Paragraph::new("按任意键关闭")
        .style(Style::default().fg(Color::Rgb(76, 86, 106)))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[1]);
}

/// 计算居中的矩形区域
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_inputs_are_multiline() {
        let dialog = DialogType::input("上传", "路径", "", InputPurpose::Deliverables);
        match dialog {
            DialogType::Input { field, .. } => assert!(field.is_multiline()),
            _ => panic!("expected input dialog"),
        }

        let dialog = DialogType::input("拒绝", "原因", "", InputPurpose::RejectReason);
        match dialog {
            DialogType::Input { field, .. } => assert!(!field.is_multiline()),
            _ => panic!("expected input dialog"),
        }
    }

    #[test]
    fn test_centered_rect_fits() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
    }
}
