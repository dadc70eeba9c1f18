use crate::app::{App, Mode};
use crate::input::actions::{execute_command, resolve_confirm, resolve_input};
use crate::input::Command;
use crate::route::{Route, NAVIGATION};
use crate::ui::dialogs::DialogType;
use crate::ui::text_input::InputAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// 处理键盘输入
/// 返回 false 表示应该退出应用
pub fn handle_key_input(app: &mut App, key: KeyEvent) -> bool {
    // Windows 下会收到按键释放事件
    if key.kind == KeyEventKind::Release {
        return true;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Command => handle_command_mode(app, key),
        Mode::Dialog => handle_dialog_mode(app, key),
        Mode::Help => handle_help_mode(app, key),
    }
}

/// 处理正常模式的按键
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return false;
    }

    match match_key(&app.route, key) {
        Some(Command::Quit) => false,
        Some(cmd) => execute_command(app, cmd),
        None => true,
    }
}

/// 把按键映射为命令：先匹配全局按键，再匹配当前页面的按键
pub fn match_key(route: &Route, key: KeyEvent) -> Option<Command> {
    let global = match key.code {
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char('?') => Some(Command::ShowHelp),
        KeyCode::Char(':') => Some(Command::EnterCommandMode),
        KeyCode::Esc | KeyCode::Backspace => Some(Command::Back),
        KeyCode::Char('j') | KeyCode::Down => Some(Command::SelectNext),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::SelectPrev),
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            NAVIGATION
                .get(index)
                .and_then(|(_, path)| Route::parse(path).ok())
                .map(Command::Navigate)
        }
        _ => None,
    };
    if global.is_some() {
        return global;
    }

    let KeyCode::Char(c) = key.code else {
        return (key.code == KeyCode::Enter).then(|| enter_command(route));
    };

    match (route, c) {
        (Route::Tasks, 'f') => Some(Command::CycleStatusFilter),
        (Route::Tasks, 's') => Some(Command::ToggleSort),
        (Route::Tasks, 'a') => Some(Command::NextAction),
        (Route::Tasks, 'r') => Some(Command::FollowReminder),

        (Route::TaskDetail(_), 'a') => Some(Command::AcceptTask),
        (Route::TaskDetail(_), 'x') => Some(Command::RejectTask),
        (Route::TaskDetail(_), 's') => Some(Command::GoSubmit),
        (Route::TaskDetail(_), 'c') => Some(Command::GoConfirm),
        (Route::TaskDetail(_), 'p') => Some(Command::GoPayment),

        (Route::TaskSubmit(_) | Route::TaskPayment(_) | Route::Invoice(_), 'u') => {
            Some(Command::AttachFiles)
        }
        (Route::TaskSubmit(_) | Route::TaskPayment(_) | Route::Invoice(_), 'd') => {
            Some(Command::RemoveFile)
        }
        (Route::TaskConfirm(_), 'c') => Some(Command::Submit),

        (Route::Evaluations, 'f') => Some(Command::CycleStatusFilter),
        (Route::Evaluations, 'd') => Some(Command::Distribute),
        (Route::Evaluations, 'm') => Some(Command::ApplyForMore),

        (Route::Supplier, 'e') => Some(Command::EditItem),
        (Route::Supplier, 'u') => Some(Command::AttachFiles),
        (Route::Supplier, 'n') => Some(Command::AddProject),
        (Route::Supplier, 'd') => Some(Command::RemoveItem),
        (Route::Supplier, 'w') => Some(Command::SaveProfile),

        (Route::Users, '/') => Some(Command::Search),
        (Route::Users, 'r') => Some(Command::CycleRoleFilter),
        (Route::Users, 't') => Some(Command::CycleStatusFilter),
        (Route::Users, 'l') => Some(Command::NextPage),
        (Route::Users, 'h') => Some(Command::PrevPage),
        (Route::Users, 'a') => Some(Command::AddUser),
        (Route::Users, 'e') => Some(Command::EditUser),
        (Route::Users, 'x') => Some(Command::ToggleUser),

        (Route::Finance, 'i') => Some(Command::UploadInvoice),
        _ => None,
    }
}

/// Enter 在各页面的含义
fn enter_command(route: &Route) -> Command {
    match route {
        Route::TaskSubmit(_) | Route::TaskConfirm(_) | Route::TaskPayment(_) | Route::Invoice(_) => {
            Command::Submit
        }
        Route::Supplier => Command::EditItem,
        Route::Users => Command::EditUser,
        Route::Finance => Command::UploadInvoice,
        _ => Command::Open,
    }
}

/// 处理命令模式的按键
fn handle_command_mode(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Normal;
            app.command_input.clear();
        }
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.mode = Mode::Normal;
            return execute_text_command(app, &input);
        }
        KeyCode::Backspace => {
            if app.command_input.pop().is_none() {
                app.mode = Mode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    true
}

/// 执行命令行输入，支持命令名、别名和路由路径
fn execute_text_command(app: &mut App, input: &str) -> bool {
    if input.trim().is_empty() {
        return true;
    }
    match app.command_registry.resolve(input) {
        Some(Command::Quit) => false,
        Some(cmd) => execute_command(app, cmd),
        None => {
            tracing::debug!(input, "unknown command");
            app.show_notification(
                format!("未知命令或页面: {}", input.trim()),
                crate::app::NotificationLevel::Warning,
            );
            true
        }
    }
}

/// 处理对话框模式的按键
fn handle_dialog_mode(app: &mut App, key: KeyEvent) -> bool {
    let Some(dialog) = app.dialog.as_mut() else {
        app.mode = Mode::Normal;
        return true;
    };

    match dialog {
        DialogType::Input { field, purpose, .. } => {
            let purpose = *purpose;
            match field.handle_key(key) {
                InputAction::Continue => {}
                InputAction::Submit => {
                    let content = field.content();
                    match resolve_input(app, purpose, &content) {
                        Ok(()) => {
                            // 提交过程中可能已打开新的对话框
                            if matches!(app.dialog, Some(DialogType::Input { .. })) {
                                app.close_dialog();
                            }
                        }
                        Err(err) => {
                            if let Some(DialogType::Input { error, .. }) = app.dialog.as_mut() {
                                *error = Some(err.to_string());
                            }
                        }
                    }
                }
                InputAction::Cancel => {
                    if purpose == crate::ui::dialogs::InputPurpose::RejectReason {
                        app.detail.cancel_dialog();
                    }
                    if purpose == crate::ui::dialogs::InputPurpose::UserForm {
                        app.users.cancel_form();
                    }
                    app.close_dialog();
                }
            }
        }
        DialogType::Confirm {
            yes_selected,
            action,
            ..
        } => match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *yes_selected = !*yes_selected;
            }
            KeyCode::Char('y') => {
                let action = action.clone();
                app.close_dialog();
                resolve_confirm(app, action, true);
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                let action = action.clone();
                app.close_dialog();
                resolve_confirm(app, action, false);
            }
            KeyCode::Enter => {
                let (action, yes) = (action.clone(), *yes_selected);
                app.close_dialog();
                resolve_confirm(app, action, yes);
            }
            _ => {}
        },
        DialogType::SelectUsers { .. } => match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                app.evaluations.move_cursor(app.users.all(), true);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.evaluations.move_cursor(app.users.all(), false);
            }
            KeyCode::Char(' ') => {
                app.evaluations.toggle_at_cursor(app.users.all());
            }
            KeyCode::Enter => match app.evaluations.confirm_distribute() {
                Ok(count) => {
                    app.close_dialog();
                    app.show_notification(
                        crate::pages::evaluations::distribute_message(count),
                        crate::app::NotificationLevel::Success,
                    );
                }
                Err(err) => app.show_error(&err),
            },
            KeyCode::Esc | KeyCode::Char('q') => {
                app.evaluations.cancel_distribute();
                app.close_dialog();
            }
            _ => {}
        },
        DialogType::Info { .. } => {
            app.evaluations.info_open = false;
            app.close_dialog();
        }
    }
    true
}

/// 处理帮助模式的按键
fn handle_help_mode(app: &mut App, key: KeyEvent) -> bool {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
        app.mode = Mode::Normal;
    }
    true
}
