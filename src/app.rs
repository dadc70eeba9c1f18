use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{OperationFailure, ValidationError};
use crate::input::CommandRegistry;
use crate::pages::{
    AcceptanceConfirmation, Commit, Dashboard, DeliverableSubmission, Evaluations, FinanceBoard,
    InvoiceUpload, PaymentApplication, Submission, SupplierEditor, TaskDetail, TaskList, UserAdmin,
};
use crate::route::Route;
use crate::seed;
use crate::service::{Dispatcher, Operation, SimulatedService};
use crate::ui::dialogs::DialogType;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 通知消息
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    /// 检查通知是否已过期（3秒后自动消失）
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= 3
    }
}

/// 应用模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 正常模式 - 导航和页面操作
    Normal,
    /// 命令模式 - 输入路由或命令
    Command,
    /// 对话框模式
    Dialog,
    /// 帮助模式 - 显示快捷键
    Help,
}

/// 应用状态
///
/// 每个页面由各自的控制器持有状态，应用只负责路由、对话框和提交。
pub struct App {
    /// 当前页面
    pub route: Route,
    /// 当前模式
    pub mode: Mode,
    pub tasks: TaskList,
    pub dashboard: Dashboard,
    pub detail: TaskDetail,
    pub submission: DeliverableSubmission,
    pub acceptance: AcceptanceConfirmation,
    pub payment: PaymentApplication,
    pub evaluations: Evaluations,
    pub supplier: SupplierEditor,
    pub users: UserAdmin,
    pub finance: FinanceBoard,
    pub invoice: InvoiceUpload,
    /// 应用配置
    pub config: Config,
    clock: Box<dyn Clock>,
    dispatcher: Dispatcher<SimulatedService>,
    /// 票据 -> 等待结果的提交
    pending: HashMap<u64, Submission>,
    /// 当前显示的对话框
    pub dialog: Option<DialogType>,
    /// 命令输入缓冲
    pub command_input: String,
    /// 命令注册表
    pub command_registry: CommandRegistry,
    /// 通知消息
    pub notification: Option<Notification>,
}

impl App {
    /// 创建新的应用实例，提交在 `handle` 所属的运行时上执行
    pub fn new(config: Config, handle: Handle) -> Self {
        let service = SimulatedService::new(Duration::from_millis(config.simulated_delay_ms));
        Self::with_parts(config, Box::new(SystemClock), service, handle)
    }

    pub fn with_parts(
        config: Config,
        clock: Box<dyn Clock>,
        service: SimulatedService,
        handle: Handle,
    ) -> Self {
        let users = UserAdmin::new(seed::users(), config.users_per_page);
        Self {
            route: Route::Dashboard,
            mode: Mode::Normal,
            tasks: TaskList::new(seed::tasks()),
            dashboard: Dashboard::default(),
            detail: TaskDetail::default(),
            submission: DeliverableSubmission::default(),
            acceptance: AcceptanceConfirmation::default(),
            payment: PaymentApplication::default(),
            evaluations: Evaluations::new(seed::evaluations(), seed::evaluation_types()),
            supplier: SupplierEditor::new(seed::supplier_profile()),
            users,
            finance: FinanceBoard::new(seed::finance_overview(), seed::finance_records()),
            invoice: InvoiceUpload::default(),
            config,
            clock,
            dispatcher: Dispatcher::new(service, handle),
            pending: HashMap::new(),
            dialog: None,
            command_input: String::new(),
            command_registry: CommandRegistry::new(),
            notification: None,
        }
    }

    /// 处理键盘输入
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        use crate::input::handle_key_input;
        handle_key_input(self, key)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// 跳转页面；目标不存在或不可用时停留在当前页
    pub fn navigate(&mut self, route: Route) {
        if let Err(err) = self.open_route(&route) {
            tracing::warn!(path = %route.path(), error = %err, "navigation refused");
            self.show_notification(err.to_string(), NotificationLevel::Warning);
            return;
        }
        tracing::debug!(from = %self.route.path(), to = %route.path(), "navigate");
        self.route = route;
    }

    fn open_route(&mut self, route: &Route) -> Result<(), ValidationError> {
        match route {
            Route::TaskDetail(id) => {
                self.tasks.find(id)?;
                self.detail.open(id);
                self.detail.submitting = self.in_flight(id, |op| {
                    matches!(op, Operation::AcceptTask { .. } | Operation::RejectTask { .. })
                });
            }
            Route::TaskSubmit(id) => {
                self.tasks.find(id)?;
                self.submission.open(id);
                self.submission.submitting = self
                    .in_flight(id, |op| matches!(op, Operation::SubmitDeliverables { .. }));
            }
            Route::TaskConfirm(id) => {
                self.tasks.find(id)?;
                self.acceptance.open(id);
                self.acceptance.submitting = self
                    .in_flight(id, |op| matches!(op, Operation::ConfirmAcceptance { .. }));
            }
            Route::TaskPayment(id) => {
                self.tasks.find(id)?;
                self.payment.open(id);
                self.payment.submitting = self
                    .in_flight(id, |op| matches!(op, Operation::ApplyForPayment { .. }));
            }
            Route::Invoice(id) => {
                self.invoice.open(id, &self.finance)?;
                self.invoice.submitting = self
                    .in_flight(id, |op| matches!(op, Operation::UploadInvoice { .. }));
            }
            _ => {}
        }
        Ok(())
    }

    /// 页面切换后，提交中的标记以尚未返回的操作为准
    fn in_flight(&self, target: &str, kind: fn(&Operation) -> bool) -> bool {
        self.pending
            .values()
            .any(|s| kind(&s.operation) && s.operation.target() == target)
    }

    /// 派发已通过本地校验的提交
    pub fn submit(&mut self, submission: Submission) {
        let duplicate = self
            .pending
            .values()
            .any(|s| s.operation.same_target(&submission.operation));
        if duplicate {
            tracing::warn!(
                op = submission.operation.label(),
                target = submission.operation.target(),
                "operation already in flight"
            );
            self.show_notification(
                format!("{}正在提交，请稍候", submission.operation.label()),
                NotificationLevel::Warning,
            );
            return;
        }
        tracing::info!(
            op = submission.operation.label(),
            target = submission.operation.target(),
            "dispatching operation"
        );
        let ticket = self.dispatcher.dispatch(submission.operation.clone());
        self.pending.insert(ticket, submission);
    }

    /// 是否有提交尚未返回
    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    /// 取回已完成的提交：成功则执行修改，失败则保持原状态
    pub fn poll_operations(&mut self) {
        for outcome in self.dispatcher.drain() {
            let Some(submission) = self.pending.remove(&outcome.ticket) else {
                continue;
            };
            match outcome.result {
                Ok(()) => self.complete(submission),
                Err(failure) => self.fail(submission.operation, failure),
            }
        }
    }

    fn complete(&mut self, submission: Submission) {
        let Submission { operation, commit } = submission;
        match commit {
            Commit::Task { task_id, action } => {
                if let Err(err) = self.tasks.commit(&task_id, action) {
                    // 提交期间状态已被其他操作改变
                    tracing::error!(task = %task_id, error = %err, "commit rejected");
                    self.release(&operation, false);
                    self.show_notification(err.to_string(), NotificationLevel::Error);
                    return;
                }
            }
            Commit::Invoice { record_id } => self.finance.mark_invoiced(&record_id),
            Commit::SupplierProfile => {
                tracing::info!(company = operation.target(), "supplier profile saved");
            }
        }

        self.release(&operation, true);
        self.show_notification(
            operation.success_message().to_string(),
            NotificationLevel::Success,
        );

        // 提交成果、验收确认完成后回到任务详情
        let back_to_detail = match &operation {
            Operation::SubmitDeliverables { task_id, .. } => {
                self.route == Route::TaskSubmit(task_id.clone())
            }
            Operation::ConfirmAcceptance { task_id } => {
                self.route == Route::TaskConfirm(task_id.clone())
            }
            _ => false,
        };
        if back_to_detail {
            let parent = self.route.parent();
            self.navigate(parent);
        }
    }

    fn fail(&mut self, operation: Operation, failure: OperationFailure) {
        tracing::error!(
            op = operation.label(),
            target = operation.target(),
            error = %failure,
            "operation failed"
        );
        self.release(&operation, false);
        self.show_notification(failure.to_string(), NotificationLevel::Error);
    }

    /// 清除页面上的“提交中”标记
    fn release(&mut self, operation: &Operation, success: bool) {
        match operation {
            Operation::AcceptTask { task_id } | Operation::RejectTask { task_id, .. } => {
                self.detail.finish(task_id)
            }
            Operation::SubmitDeliverables { task_id, .. } => {
                self.submission.finish(task_id, success)
            }
            Operation::ConfirmAcceptance { task_id } => self.acceptance.finish(task_id),
            Operation::ApplyForPayment { task_id, .. } => self.payment.finish(task_id, success),
            Operation::UploadInvoice { record_id, .. } => self.invoice.finish(record_id, success),
            Operation::SaveSupplierProfile { .. } => self.supplier.finish(),
        }
    }

    pub fn open_dialog(&mut self, dialog: DialogType) {
        self.dialog = Some(dialog);
        self.mode = Mode::Dialog;
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
        self.mode = Mode::Normal;
    }

    /// 显示通知消息
    pub fn show_notification(&mut self, message: String, level: NotificationLevel) {
        self.notification = Some(Notification {
            message,
            level,
            created_at: Instant::now(),
        });
    }

    /// 校验错误统一以警告提示
    pub fn show_error(&mut self, err: &ValidationError) {
        self.show_notification(err.to_string(), NotificationLevel::Warning);
    }

    /// 清除已过期的通知
    pub fn clear_expired_notification(&mut self) {
        if let Some(ref notification) = self.notification {
            if notification.is_expired() {
                self.notification = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::TaskStatus;
    use tokio::runtime::Runtime;

    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .build()
            .unwrap()
    }

    fn app(runtime: &Runtime, service: SimulatedService) -> App {
        let today = NaiveDate::from_ymd_opt(2023, 12, 13).unwrap();
        App::with_parts(
            Config::default(),
            Box::new(FixedClock(today)),
            service,
            runtime.handle().clone(),
        )
    }

    /// 等待所有提交返回
    fn settle(app: &mut App) {
        for _ in 0..500 {
            app.poll_operations();
            if !app.is_busy() {
                return;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        panic!("operations did not finish");
    }

    #[test]
    fn test_navigate_opens_controllers() {
        let runtime = runtime();
        let mut app = app(&runtime, SimulatedService::new(Duration::ZERO));
        app.navigate(Route::TaskSubmit("T-001".to_string()));
        assert_eq!(app.route, Route::TaskSubmit("T-001".to_string()));
        assert_eq!(app.submission.task_id(), "T-001");

        app.navigate(Route::TaskDetail("T-404".to_string()));
        assert_eq!(app.route, Route::TaskSubmit("T-001".to_string()));
        assert!(app.notification.is_some());
    }

    #[test]
    fn test_invoice_route_requires_open_record() {
        let runtime = runtime();
        let mut app = app(&runtime, SimulatedService::new(Duration::ZERO));
        app.navigate(Route::Invoice("T-003".to_string()));
        assert_eq!(app.route, Route::Dashboard);
        app.navigate(Route::Invoice("T-001".to_string()));
        assert_eq!(app.route, Route::Invoice("T-001".to_string()));
    }

    #[test]
    fn test_accept_commits_after_service() {
        let runtime = runtime();
        let mut app = app(&runtime, SimulatedService::new(Duration::ZERO));
        app.navigate(Route::TaskDetail("T-002".to_string()));
        app.detail.request_accept(&app.tasks).unwrap();
        let submission = app.detail.confirm_accept(&app.tasks).unwrap().unwrap();

        app.submit(submission);
        assert!(app.detail.submitting);
        assert_eq!(app.tasks.get("T-002").unwrap().status(), TaskStatus::PendingAcceptance);

        settle(&mut app);
        assert!(!app.detail.submitting);
        assert_eq!(app.tasks.get("T-002").unwrap().status(), TaskStatus::InProgress);
        let notification = app.notification.as_ref().unwrap();
        assert_eq!(notification.message, "任务已接受！");
        assert_eq!(notification.level, NotificationLevel::Success);
    }

    #[test]
    fn test_failure_leaves_state_unchanged() {
        let runtime = runtime();
        let mut app = app(&runtime, SimulatedService::failing(Duration::ZERO));
        app.navigate(Route::TaskDetail("T-002".to_string()));
        app.detail.open_reject(&app.tasks).unwrap();
        app.detail.set_reason("排期冲突");
        let submission = app.detail.submit_reject(&app.tasks).unwrap();

        app.submit(submission);
        settle(&mut app);
        assert!(!app.detail.submitting);
        assert_eq!(app.tasks.get("T-002").unwrap().status(), TaskStatus::PendingAcceptance);
        assert_eq!(
            app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Error)
        );
    }

    #[test]
    fn test_returning_to_page_keeps_in_flight_submission() {
        use crate::models::Attachment;
        use crate::models::attachment::{MB, MIME_PDF};

        let runtime = runtime();
        let mut app = app(&runtime, SimulatedService::new(Duration::from_secs(30)));
        app.navigate(Route::TaskSubmit("T-001".to_string()));
        app.submission
            .add_files(vec![Attachment::new("报告.pdf", MB, MIME_PDF)])
            .unwrap();
        let submission = app.submission.submit(&app.tasks).unwrap();
        app.submit(submission);
        assert!(app.submission.submitting);

        app.navigate(Route::TaskSubmit("T-002".to_string()));
        assert!(!app.submission.submitting);
        app.navigate(Route::TaskSubmit("T-001".to_string()));
        assert!(app.submission.submitting);

        app.submission
            .add_files(vec![Attachment::new("报告.pdf", MB, MIME_PDF)])
            .unwrap();
        let again = app.submission.submit(&app.tasks).unwrap();
        app.submit(again);
        assert_eq!(app.pending.len(), 1);
        assert_eq!(
            app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Warning)
        );
    }

    #[test]
    fn test_confirm_returns_to_detail() {
        let runtime = runtime();
        let mut app = app(&runtime, SimulatedService::new(Duration::ZERO));
        app.navigate(Route::TaskConfirm("T-004".to_string()));
        app.acceptance.request(&app.tasks).unwrap();
        let submission = app.acceptance.confirm(&app.tasks).unwrap().unwrap();
        app.submit(submission);
        settle(&mut app);

        assert_eq!(app.tasks.get("T-004").unwrap().status(), TaskStatus::Verified);
        assert_eq!(app.route, Route::TaskDetail("T-004".to_string()));
    }

    #[test]
    fn test_invoice_upload_marks_record() {
        use crate::models::Attachment;
        use crate::models::attachment::{MB, MIME_PDF};

        let runtime = runtime();
        let mut app = app(&runtime, SimulatedService::new(Duration::ZERO));
        app.navigate(Route::Invoice("T-002".to_string()));
        app.invoice
            .attach(vec![Attachment::new("发票.pdf", MB, MIME_PDF)])
            .unwrap();
        let submission = app.invoice.submit().unwrap();
        app.submit(submission);
        settle(&mut app);

        assert!(app.finance.is_invoiced("T-002"));
        assert!(app.invoice.submitted);
        assert!(!app.invoice.submitting);
    }
}
