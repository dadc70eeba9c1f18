//! 命令执行和对话框结果处理
use crate::app::{App, Mode, NotificationLevel};
use crate::error::ValidationError;
use crate::input::Command;
use crate::models::{TaskActionKind, UserStatus};
use crate::pages::load_attachments;
use crate::pages::supplier::SupplierItem;
use crate::pages::task_detail::ACCEPT_PROMPT;
use crate::route::Route;
use crate::seed;
use crate::ui::dialogs::{ConfirmAction, DialogType, InputPurpose};

const FILE_PROMPT: &str = "每行输入一个文件路径";

/// 执行命令
/// 返回 false 表示应该退出应用
pub fn execute_command(app: &mut App, cmd: Command) -> bool {
    match cmd {
        Command::Quit => return false,
        Command::ShowHelp => app.mode = Mode::Help,
        Command::EnterCommandMode => {
            app.mode = Mode::Command;
            app.command_input.clear();
        }
        Command::Navigate(route) => app.navigate(route),
        Command::Back => {
            let parent = app.route.parent();
            if parent != app.route {
                app.navigate(parent);
            }
        }
        Command::SelectNext => select(app, true),
        Command::SelectPrev => select(app, false),
        Command::Open => open_selected(app),

        Command::CycleStatusFilter => match app.route {
            Route::Tasks => app.tasks.cycle_status_filter(),
            Route::Evaluations => app.evaluations.cycle_status_filter(),
            Route::Users => app.users.cycle_status_filter(),
            _ => {}
        },
        Command::ToggleSort => app.tasks.toggle_sort(),
        Command::NextAction => next_action(app),
        Command::FollowReminder => follow_reminder(app),
        Command::AcceptTask => request_accept(app),
        Command::RejectTask => open_reject(app),
        Command::GoSubmit => go_task_page(app, TaskActionKind::SubmitDeliverables),
        Command::GoConfirm => go_task_page(app, TaskActionKind::ConfirmAcceptance),
        Command::GoPayment => go_task_page(app, TaskActionKind::ApplyForPayment),

        Command::AttachFiles => attach_files(app),
        Command::RemoveFile => remove_file(app),
        Command::Submit => submit_page(app),

        Command::Distribute => open_distribute(app),
        Command::ApplyForMore => {
            app.evaluations.info_open = true;
            app.open_dialog(DialogType::Info {
                title: "申请更多测评".to_string(),
                message: format!(
                    "如需更多测评名额，请联系平台管理员：\n\n邮箱：{}\n电话：{}",
                    seed::CONTACT_EMAIL,
                    seed::CONTACT_PHONE
                ),
            });
        }

        Command::EditItem => edit_supplier_item(app),
        Command::AddProject => {
            let id = app.supplier.add_project();
            tracing::debug!(project = id, "project added");
            edit_project(app, id);
        }
        Command::RemoveItem => remove_supplier_item(app),
        Command::SaveProfile => save_profile(app),

        Command::Search => {
            let current = app.users.search().to_string();
            app.open_dialog(DialogType::input(
                "搜索用户",
                "输入用户ID或姓名，留空显示全部",
                &current,
                InputPurpose::UserSearch,
            ));
        }
        Command::CycleRoleFilter => app.users.cycle_role_filter(),
        Command::NextPage => app.users.next_page(),
        Command::PrevPage => app.users.prev_page(),
        Command::AddUser => {
            app.users.open_add();
            open_user_form(app, "添加用户");
        }
        Command::EditUser => {
            let Some(user) = app.users.selected_user() else {
                return true;
            };
            match app.users.open_edit(&user.id) {
                Ok(()) => open_user_form(app, "编辑用户"),
                Err(err) => app.show_error(&err),
            }
        }
        Command::ToggleUser => {
            let Some(user) = app.users.selected_user() else {
                return true;
            };
            match app.users.request_toggle(&user.id) {
                Ok(prompt) => app.open_dialog(DialogType::confirm(
                    "切换用户状态",
                    &prompt,
                    ConfirmAction::ToggleUser,
                )),
                Err(err) => app.show_error(&err),
            }
        }

        Command::UploadInvoice => {
            if let Some(record) = app.finance.selected_record() {
                let route = Route::Invoice(record.task_id.clone());
                app.navigate(route);
            }
        }
    }
    true
}

fn select(app: &mut App, forward: bool) {
    match app.route {
        Route::Dashboard if forward => app.dashboard.select_next(),
        Route::Dashboard => app.dashboard.select_prev(),
        Route::Tasks if forward => app.tasks.select_next(),
        Route::Tasks => app.tasks.select_prev(),
        Route::TaskSubmit(_) if forward => app.submission.select_next(),
        Route::TaskSubmit(_) => app.submission.select_prev(),
        Route::Evaluations if forward => app.evaluations.select_next(),
        Route::Evaluations => app.evaluations.select_prev(),
        Route::Supplier if forward => app.supplier.select_next(),
        Route::Supplier => app.supplier.select_prev(),
        Route::Users if forward => app.users.select_next(),
        Route::Users => app.users.select_prev(),
        Route::Finance if forward => app.finance.select_next(),
        Route::Finance => app.finance.select_prev(),
        _ => {}
    }
}

fn open_selected(app: &mut App) {
    match app.route {
        Route::Dashboard => {
            if let Some(route) = app.dashboard.selected_route() {
                app.navigate(route);
            }
        }
        Route::Tasks => {
            if let Some(task) = app.tasks.selected_task() {
                app.navigate(Route::TaskDetail(task.id().to_string()));
            }
        }
        _ => {}
    }
}

/// 任务列表上的快捷操作：按任务当前状态跳转到对应页面
fn next_action(app: &mut App) {
    let Some(task) = app.tasks.selected_task() else {
        return;
    };
    let id = task.id().to_string();
    match task.available_actions().first() {
        Some(TaskActionKind::Accept) | Some(TaskActionKind::Reject) => {
            app.navigate(Route::TaskDetail(id));
            request_accept(app);
        }
        Some(TaskActionKind::SubmitDeliverables) => app.navigate(Route::TaskSubmit(id)),
        Some(TaskActionKind::ConfirmAcceptance) => app.navigate(Route::TaskConfirm(id)),
        Some(TaskActionKind::ApplyForPayment) => app.navigate(Route::TaskPayment(id)),
        None => app.show_notification(
            format!("任务「{}」没有可执行的操作", task.name()),
            NotificationLevel::Info,
        ),
    }
}

fn follow_reminder(app: &mut App) {
    let today = app.today();
    let reminders = app.tasks.reminders(today, app.config.reminder_window_days);
    match reminders.first() {
        Some(reminder) => app.navigate(reminder.action_route()),
        None => app.show_notification("暂无任务提醒".to_string(), NotificationLevel::Info),
    }
}

fn request_accept(app: &mut App) {
    if app.detail.submitting {
        return;
    }
    match app.detail.request_accept(&app.tasks) {
        Ok(()) => app.open_dialog(DialogType::confirm(
            "确认接受任务",
            ACCEPT_PROMPT,
            ConfirmAction::AcceptTask,
        )),
        Err(err) => app.show_error(&err),
    }
}

fn open_reject(app: &mut App) {
    if app.detail.submitting {
        return;
    }
    match app.detail.open_reject(&app.tasks) {
        Ok(()) => app.open_dialog(DialogType::input(
            "拒绝任务",
            "请输入拒绝原因",
            "",
            InputPurpose::RejectReason,
        )),
        Err(err) => app.show_error(&err),
    }
}

/// 从详情页进入操作页面，任务状态不允许时给出提示
fn go_task_page(app: &mut App, kind: TaskActionKind) {
    let id = app.detail.task_id().to_string();
    let Some(task) = app.tasks.get(&id) else {
        return;
    };
    if !task.can(kind) {
        let err = ValidationError::IllegalTransition {
            from: task.status(),
            action: kind.label(),
        };
        app.show_error(&err);
        return;
    }
    let route = match kind {
        TaskActionKind::SubmitDeliverables => Route::TaskSubmit(id),
        TaskActionKind::ConfirmAcceptance => Route::TaskConfirm(id),
        _ => Route::TaskPayment(id),
    };
    app.navigate(route);
}

fn attach_files(app: &mut App) {
    let (title, purpose) = match app.route {
        Route::TaskSubmit(_) => ("上传交付成果", InputPurpose::Deliverables),
        Route::TaskPayment(_) => ("上传发票", InputPurpose::PaymentInvoice),
        Route::Invoice(_) => ("上传发票", InputPurpose::InvoiceUpload),
        Route::Supplier => match app.supplier.selected_item() {
            Some(SupplierItem::Document(doc)) => (doc.label(), InputPurpose::SupplierDocument(doc)),
            Some(SupplierItem::Project(id)) => ("上传项目证明", InputPurpose::ProjectProof(id)),
            _ => return,
        },
        _ => return,
    };
    app.open_dialog(DialogType::input(title, FILE_PROMPT, "", purpose));
}

fn remove_file(app: &mut App) {
    match app.route {
        Route::TaskSubmit(_) => {
            if let Some(file) = app.submission.remove_selected() {
                tracing::debug!(file = %file.name, "deliverable removed");
            }
        }
        Route::TaskPayment(_) => app.payment.remove(),
        Route::Invoice(_) => app.invoice.remove(),
        _ => {}
    }
}

/// 提交当前页面；正在提交时忽略
fn submit_page(app: &mut App) {
    let result = match app.route {
        Route::TaskSubmit(_) if !app.submission.submitting => app.submission.submit(&app.tasks),
        Route::TaskPayment(_) if !app.payment.submitting => app.payment.submit(&app.tasks),
        Route::Invoice(_) if !app.invoice.submitting => app.invoice.submit(),
        Route::TaskConfirm(_) if !app.acceptance.submitting => {
            match app.acceptance.request(&app.tasks) {
                Ok(()) => app.open_dialog(DialogType::confirm(
                    "确认验收",
                    "确认验收后任务将进入已验收状态，是否继续？",
                    ConfirmAction::ConfirmAcceptance,
                )),
                Err(err) => app.show_error(&err),
            }
            return;
        }
        _ => return,
    };
    match result {
        Ok(submission) => app.submit(submission),
        Err(err) => app.show_error(&err),
    }
}

fn open_distribute(app: &mut App) {
    let Some(evaluation) = app.evaluations.selected_evaluation() else {
        return;
    };
    match app.evaluations.open_distribute(&evaluation.id) {
        Ok(()) => app.open_dialog(DialogType::SelectUsers {
            title: format!("分发测评：{}", evaluation.name),
        }),
        Err(err) => app.show_error(&err),
    }
}

fn edit_supplier_item(app: &mut App) {
    match app.supplier.selected_item() {
        Some(SupplierItem::Field(field)) => {
            let current = app.supplier.profile().field(field).to_string();
            app.open_dialog(DialogType::input(
                field.label(),
                &format!("请输入{}", field.label()),
                &current,
                InputPurpose::SupplierField(field),
            ));
        }
        Some(SupplierItem::Project(id)) => edit_project(app, id),
        Some(SupplierItem::Document(_)) => attach_files(app),
        None => {}
    }
}

fn edit_project(app: &mut App, id: u32) {
    let Some(text) = app.supplier.project_text(id) else {
        return;
    };
    app.open_dialog(DialogType::input(
        "编辑项目经验",
        "每行一项：名称=、时间=、描述=",
        &text,
        InputPurpose::Project(id),
    ));
}

fn remove_supplier_item(app: &mut App) {
    match app.supplier.selected_item() {
        Some(SupplierItem::Project(id)) => {
            app.supplier.remove_project(id);
        }
        Some(SupplierItem::Document(doc)) => app.supplier.clear_document(doc),
        _ => {}
    }
}

fn save_profile(app: &mut App) {
    if app.supplier.submitting {
        return;
    }
    match app.supplier.save() {
        Ok(submission) => app.submit(submission),
        Err(err) => app.show_error(&err),
    }
}

fn open_user_form(app: &mut App, title: &str) {
    let text = app.users.form().map(|f| f.to_text()).unwrap_or_default();
    app.open_dialog(DialogType::input(
        title,
        "每行一项：姓名=、联系电话=、角色=（管理员/普通用户）、备注=",
        &text,
        InputPurpose::UserForm,
    ));
}

/// 处理输入对话框的提交
///
/// 返回错误时对话框保持打开并显示错误。
pub fn resolve_input(
    app: &mut App,
    purpose: InputPurpose,
    content: &str,
) -> Result<(), ValidationError> {
    if purpose.is_file_list() && content.trim().is_empty() {
        return Ok(());
    }

    match purpose {
        InputPurpose::RejectReason => {
            app.detail.set_reason(content);
            let submission = app.detail.submit_reject(&app.tasks)?;
            app.submit(submission);
        }
        InputPurpose::Deliverables => {
            let added = app.submission.add_files(load_attachments(content)?)?;
            notify_added(app, added);
        }
        InputPurpose::PaymentInvoice => {
            app.payment.attach(load_attachments(content)?)?;
            notify_added(app, 1);
        }
        InputPurpose::InvoiceUpload => {
            app.invoice.attach(load_attachments(content)?)?;
            notify_added(app, 1);
        }
        InputPurpose::SupplierDocument(doc) => {
            let batch = load_attachments(content)?;
            let added = batch.len();
            app.supplier.attach_document(doc, batch)?;
            notify_added(app, added);
        }
        InputPurpose::ProjectProof(id) => {
            let batch = load_attachments(content)?;
            let added = batch.len();
            app.supplier.attach_project_proof(id, batch)?;
            notify_added(app, added);
        }
        InputPurpose::SupplierField(field) => {
            app.supplier.set_field(field, content.trim().to_string());
        }
        InputPurpose::Project(id) => {
            app.supplier.apply_project_text(id, content);
        }
        InputPurpose::UserSearch => app.users.set_search(content.trim()),
        InputPurpose::UserForm => {
            if let Some(form) = app.users.form_mut() {
                form.apply_text(content)?;
            }
            let today = app.today();
            let id = app.users.save_form(today)?;
            app.show_notification(format!("用户 {} 已保存", id), NotificationLevel::Success);
        }
    }
    Ok(())
}

fn notify_added(app: &mut App, count: usize) {
    app.show_notification(format!("已添加 {} 个文件", count), NotificationLevel::Info);
}

/// 处理确认对话框的结果
pub fn resolve_confirm(app: &mut App, action: ConfirmAction, confirmed: bool) {
    match (action, confirmed) {
        (ConfirmAction::AcceptTask, true) => match app.detail.confirm_accept(&app.tasks) {
            Some(Ok(submission)) => app.submit(submission),
            Some(Err(err)) => app.show_error(&err),
            None => {}
        },
        (ConfirmAction::AcceptTask, false) => app.detail.cancel_dialog(),
        (ConfirmAction::ConfirmAcceptance, true) => match app.acceptance.confirm(&app.tasks) {
            Some(Ok(submission)) => app.submit(submission),
            Some(Err(err)) => app.show_error(&err),
            None => {}
        },
        (ConfirmAction::ConfirmAcceptance, false) => app.acceptance.cancel(),
        (ConfirmAction::ToggleUser, true) => {
            if let Some(status) = app.users.confirm_toggle() {
                let message = match status {
                    UserStatus::Enabled => "用户已启用",
                    UserStatus::Disabled => "用户已禁用",
                };
                app.show_notification(message.to_string(), NotificationLevel::Success);
            }
        }
        (ConfirmAction::ToggleUser, false) => app.users.cancel_toggle(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::Config;
    use crate::models::{ProfileField, Role};
    use crate::service::SimulatedService;
    use chrono::NaiveDate;
    use std::time::Duration;
    use tokio::runtime::Runtime;

    fn setup() -> (Runtime, App) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .build()
            .unwrap();
        let today = NaiveDate::from_ymd_opt(2023, 12, 13).unwrap();
        let app = App::with_parts(
            Config::default(),
            Box::new(FixedClock(today)),
            SimulatedService::new(Duration::ZERO),
            runtime.handle().clone(),
        );
        (runtime, app)
    }

    #[test]
    fn test_go_task_page_checks_status() {
        let (_runtime, mut app) = setup();
        app.navigate(Route::TaskDetail("T-002".to_string()));
        execute_command(&mut app, Command::GoSubmit);
        assert_eq!(app.route, Route::TaskDetail("T-002".to_string()));
        assert!(app.notification.is_some());

        app.navigate(Route::TaskDetail("T-001".to_string()));
        execute_command(&mut app, Command::GoSubmit);
        assert_eq!(app.route, Route::TaskSubmit("T-001".to_string()));
    }

    #[test]
    fn test_follow_reminder() {
        let (_runtime, mut app) = setup();
        app.navigate(Route::Tasks);
        execute_command(&mut app, Command::FollowReminder);
        assert_eq!(app.route, Route::TaskSubmit("T-001".to_string()));
    }

    #[test]
    fn test_submit_without_files_is_rejected_locally() {
        let (_runtime, mut app) = setup();
        app.navigate(Route::TaskSubmit("T-001".to_string()));
        execute_command(&mut app, Command::Submit);
        assert!(!app.is_busy());
        assert!(app.submission.error.is_some());
    }

    #[test]
    fn test_unreadable_file_keeps_dialog_error() {
        let (_runtime, mut app) = setup();
        app.navigate(Route::TaskSubmit("T-001".to_string()));
        let err = resolve_input(&mut app, InputPurpose::Deliverables, "/no/such/file.pdf")
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnreadableFile { .. }));
        assert!(app.submission.files().is_empty());
    }

    #[test]
    fn test_user_form_through_text() {
        let (_runtime, mut app) = setup();
        execute_command(&mut app, Command::AddUser);
        let err = resolve_input(&mut app, InputPurpose::UserForm, "姓名=陈十三\n角色=管理员")
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("联系电话"));

        resolve_input(
            &mut app,
            InputPurpose::UserForm,
            "姓名=陈十三\n联系电话=13800138010\n角色=管理员",
        )
        .unwrap();
        let user = app.users.get("U-011").unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.join_time, NaiveDate::from_ymd_opt(2023, 12, 13).unwrap());
    }

    #[test]
    fn test_supplier_field_edit_and_save() {
        let (_runtime, mut app) = setup();
        resolve_input(
            &mut app,
            InputPurpose::SupplierField(ProfileField::CompanyName),
            "  新公司  ",
        )
        .unwrap();
        assert_eq!(app.supplier.profile().company_name, "新公司");

        execute_command(&mut app, Command::SaveProfile);
        assert!(app.supplier.submitting);
        assert!(app.is_busy());
    }
}
