use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use tui_textarea::{CursorMove, TextArea};

/// 编辑模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// 插入模式 - 直接输入文本
    Insert,
    /// 普通模式 - 移动光标
    Normal,
}

/// 输入动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// 继续编辑
    Continue,
    /// 提交内容
    Submit,
    /// 取消对话框
    Cancel,
}

/// 对话框中的文本输入框
///
/// 单行输入时 Enter 提交；多行输入时 Enter 换行，Ctrl+S 提交。
pub struct TextField {
    textarea: TextArea<'static>,
    mode: EditMode,
    multiline: bool,
}

impl TextField {
    pub fn new(initial_value: &str, multiline: bool) -> Self {
        let mut textarea = if initial_value.is_empty() {
            TextArea::default()
        } else {
            TextArea::from(initial_value.lines().map(|s| s.to_string()))
        };
        textarea.move_cursor(CursorMove::Bottom);
        textarea.move_cursor(CursorMove::End);

        // Nord 配色
        textarea.set_style(
            Style::default()
                .fg(Color::Rgb(236, 239, 244))
                .bg(Color::Rgb(46, 52, 64)),
        );
        textarea.set_cursor_style(
            Style::default()
                .bg(Color::Rgb(136, 192, 208))
                .fg(Color::Rgb(46, 52, 64)),
        );
        textarea.set_cursor_line_style(Style::default().bg(Color::Rgb(59, 66, 82)));

        Self {
            textarea,
            mode: EditMode::Insert,
            multiline,
        }
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn content(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        // Ctrl+S 在任何模式下都提交
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return InputAction::Submit;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputAction::Cancel;
        }

        match self.mode {
            EditMode::Insert => self.handle_insert_mode(key),
            EditMode::Normal => self.handle_normal_mode(key),
        }
    }

    fn handle_insert_mode(&mut self, key: KeyEvent) -> InputAction {
        match key.code {
            KeyCode::Esc => {
                if self.multiline {
                    self.mode = EditMode::Normal;
                    InputAction::Continue
                } else {
                    InputAction::Cancel
                }
            }
            KeyCode::Enter => {
                if self.multiline {
                    self.textarea.insert_newline();
                    InputAction::Continue
                } else {
                    InputAction::Submit
                }
            }
            KeyCode::Char(c) => {
                self.textarea.insert_char(c);
                InputAction::Continue
            }
            KeyCode::Backspace => {
                self.textarea.delete_char();
                InputAction::Continue
            }
            KeyCode::Delete => {
                self.textarea.delete_next_char();
                InputAction::Continue
            }
            KeyCode::Left => self.cursor(CursorMove::Back),
            KeyCode::Right => self.cursor(CursorMove::Forward),
            KeyCode::Up => self.cursor(CursorMove::Up),
            KeyCode::Down => self.cursor(CursorMove::Down),
            KeyCode::Home => self.cursor(CursorMove::Head),
            KeyCode::End => self.cursor(CursorMove::End),
            _ => InputAction::Continue,
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> InputAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => InputAction::Cancel,
            KeyCode::Enter => InputAction::Submit,
            KeyCode::Char('i') => {
                self.mode = EditMode::Insert;
                InputAction::Continue
            }
            KeyCode::Char('a') => {
                self.textarea.move_cursor(CursorMove::Forward);
                self.mode = EditMode::Insert;
                InputAction::Continue
            }
            KeyCode::Char('o') => {
                self.textarea.move_cursor(CursorMove::End);
                self.textarea.insert_newline();
                self.mode = EditMode::Insert;
                InputAction::Continue
            }
            KeyCode::Char('h') | KeyCode::Left => self.cursor(CursorMove::Back),
            KeyCode::Char('j') | KeyCode::Down => self.cursor(CursorMove::Down),
            KeyCode::Char('k') | KeyCode::Up => self.cursor(CursorMove::Up),
            KeyCode::Char('l') | KeyCode::Right => self.cursor(CursorMove::Forward),
            KeyCode::Char('0') | KeyCode::Home => self.cursor(CursorMove::Head),
            KeyCode::Char('$') | KeyCode::End => self.cursor(CursorMove::End),
            KeyCode::Char('x') | KeyCode::Delete => {
                self.textarea.delete_next_char();
                InputAction::Continue
            }
            KeyCode::Char('u') => {
                self.textarea.undo();
                InputAction::Continue
            }
            _ => InputAction::Continue,
        }
    }

    fn cursor(&mut self, movement: CursorMove) -> InputAction {
        self.textarea.move_cursor(movement);
        InputAction::Continue
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        f.render_widget(&self.textarea, area);
    }

    /// 渲染模式指示器和提交方式
    pub fn render_mode_indicator(&self, f: &mut Frame, area: Rect) {
        let (text, color) = match (self.mode, self.multiline) {
            (EditMode::Insert, true) => ("-- INSERT --  Ctrl+S 提交  Esc 普通模式", Color::Rgb(163, 190, 140)),
            (EditMode::Insert, false) => ("-- INSERT --  Enter 提交  Esc 取消", Color::Rgb(163, 190, 140)),
            (EditMode::Normal, _) => ("-- NORMAL --  Enter 提交  i 编辑  Esc 取消", Color::Rgb(136, 192, 208)),
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(field: &mut TextField, s: &str) {
        for c in s.chars() {
            field.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_single_line_enter_submits() {
        let mut field = TextField::new("", false);
        type_str(&mut field, "时间冲突");
        assert_eq!(field.handle_key(key(KeyCode::Enter)), InputAction::Submit);
        assert_eq!(field.content(), "时间冲突");
        assert_eq!(field.handle_key(key(KeyCode::Esc)), InputAction::Cancel);
    }

    #[test]
    fn test_multi_line_collects_lines() {
        let mut field = TextField::new("", true);
        type_str(&mut field, "/tmp/a.pdf");
        assert_eq!(field.handle_key(key(KeyCode::Enter)), InputAction::Continue);
        type_str(&mut field, "/tmp/b.pdf");
        assert_eq!(field.content(), "/tmp/a.pdf\n/tmp/b.pdf");

        assert_eq!(field.handle_key(key(KeyCode::Esc)), InputAction::Continue);
        assert_eq!(field.mode, EditMode::Normal);
        assert_eq!(field.handle_key(key(KeyCode::Enter)), InputAction::Submit);
    }

    #[test]
    fn test_ctrl_s_submits() {
        let mut field = TextField::new("姓名=张三", true);
        let action = field.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(action, InputAction::Submit);
        assert_eq!(field.content(), "姓名=张三");
    }
}
