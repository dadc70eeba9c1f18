use chrono::NaiveDate;
use serde::Serialize;

pub use super::status::TaskStatus;
use super::attachment::{AttachmentSet, UploadContext};
use super::confirm::Confirmed;
use crate::error::ValidationError;

/// 任务操作类型（不带参数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskActionKind {
    Accept,
    Reject,
    SubmitDeliverables,
    ConfirmAcceptance,
    ApplyForPayment,
}

impl TaskActionKind {
    pub fn label(self) -> &'static str {
        match self {
            TaskActionKind::Accept => "接受任务",
            TaskActionKind::Reject => "拒绝任务",
            TaskActionKind::SubmitDeliverables => "提交成果",
            TaskActionKind::ConfirmAcceptance => "确认验收",
            TaskActionKind::ApplyForPayment => "申请付款",
        }
    }

    /// 该操作合法的起始状态
    pub fn from_status(self) -> TaskStatus {
        match self {
            TaskActionKind::Accept | TaskActionKind::Reject => TaskStatus::PendingAcceptance,
            TaskActionKind::SubmitDeliverables => TaskStatus::InProgress,
            TaskActionKind::ConfirmAcceptance => TaskStatus::PendingVerification,
            TaskActionKind::ApplyForPayment => TaskStatus::Verified,
        }
    }

    pub fn to_status(self) -> TaskStatus {
        match self {
            TaskActionKind::Accept => TaskStatus::InProgress,
            TaskActionKind::Reject => TaskStatus::Rejected,
            TaskActionKind::SubmitDeliverables => TaskStatus::PendingVerification,
            TaskActionKind::ConfirmAcceptance => TaskStatus::Verified,
            TaskActionKind::ApplyForPayment => TaskStatus::Completed,
        }
    }
}

const ALL_ACTIONS: [TaskActionKind; 5] = [
    TaskActionKind::Accept,
    TaskActionKind::Reject,
    TaskActionKind::SubmitDeliverables,
    TaskActionKind::ConfirmAcceptance,
    TaskActionKind::ApplyForPayment,
];

/// 带参数的任务操作
#[derive(Debug, Clone)]
pub enum TaskAction {
    Accept,
    Reject { reason: String },
    SubmitDeliverables(AttachmentSet),
    /// 确认验收，参数为已确认的任务ID
    ConfirmAcceptance(Confirmed<String>),
    ApplyForPayment(AttachmentSet),
}

impl TaskAction {
    pub fn kind(&self) -> TaskActionKind {
        match self {
            TaskAction::Accept => TaskActionKind::Accept,
            TaskAction::Reject { .. } => TaskActionKind::Reject,
            TaskAction::SubmitDeliverables(_) => TaskActionKind::SubmitDeliverables,
            TaskAction::ConfirmAcceptance(_) => TaskActionKind::ConfirmAcceptance,
            TaskAction::ApplyForPayment(_) => TaskActionKind::ApplyForPayment,
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind().label()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    id: String,
    name: String,
    deadline: NaiveDate,
    status: TaskStatus,
    /// 任务金额（元）
    amount: u64,
    description: String,
    requirements: String,
    rejection_reason: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>, deadline: NaiveDate, amount: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            deadline,
            status: TaskStatus::PendingAcceptance,
            amount,
            description: String::new(),
            requirements: String::new(),
            rejection_reason: None,
        }
    }

    /// 以指定状态构造（用于初始数据）
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.requirements = requirements.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn requirements(&self) -> &str {
        &self.requirements
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// 当前状态下可执行的操作
    pub fn available_actions(&self) -> Vec<TaskActionKind> {
        ALL_ACTIONS
            .into_iter()
            .filter(|kind| kind.from_status() == self.status)
            .collect()
    }

    pub fn can(&self, kind: TaskActionKind) -> bool {
        kind.from_status() == self.status
    }

    /// 检查操作是否合法，返回目标状态，不修改任务
    pub fn plan(&self, action: &TaskAction) -> Result<TaskStatus, ValidationError> {
        let kind = action.kind();
        if !self.can(kind) {
            return Err(ValidationError::illegal(self.status, action));
        }

        match action {
            TaskAction::Accept => {}
            TaskAction::Reject { reason } => {
                if reason.trim().is_empty() {
                    return Err(ValidationError::EmptyRejectionReason);
                }
            }
            TaskAction::SubmitDeliverables(files) => {
                if files.context() != UploadContext::Deliverable || !files.has_valid() {
                    return Err(ValidationError::MissingAttachment("请上传至少一个文件"));
                }
            }
            TaskAction::ConfirmAcceptance(confirmed) => {
                if confirmed.subject() != &self.id {
                    return Err(ValidationError::NotFound {
                        entity: "待确认的任务",
                        id: confirmed.subject().clone(),
                    });
                }
            }
            TaskAction::ApplyForPayment(invoices) => {
                if invoices.context() != UploadContext::Invoice || !invoices.has_valid() {
                    return Err(ValidationError::MissingAttachment("请上传发票文件"));
                }
            }
        }

        Ok(kind.to_status())
    }

    /// 执行操作：校验通过后才修改状态
    pub fn apply(&mut self, action: TaskAction) -> Result<TaskStatus, ValidationError> {
        let next = self.plan(&action)?;
        if let TaskAction::Reject { reason } = action {
            self.rejection_reason = Some(reason.trim().to_string());
        }
        self.status = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attachment::{Attachment, MIME_PDF, MIME_PNG};
    use crate::models::confirm::PendingConfirmation;

    fn task(status: TaskStatus) -> Task {
        Task::new(
            "T-001",
            "产品质检审核",
            NaiveDate::from_ymd_opt(2023, 12, 15).unwrap(),
            5000,
        )
        .with_status(status)
    }

    fn deliverables() -> AttachmentSet {
        let mut set = AttachmentSet::new(UploadContext::Deliverable);
        set.add_batch(vec![Attachment::new("报告.pdf", 1024, MIME_PDF)])
            .unwrap();
        set
    }

    fn invoices() -> AttachmentSet {
        let mut set = AttachmentSet::new(UploadContext::Invoice);
        set.add_batch(vec![Attachment::new("发票.png", 1024, MIME_PNG)])
            .unwrap();
        set
    }

    fn confirmed(id: &str) -> Confirmed<String> {
        PendingConfirmation::request(id.to_string()).confirm()
    }

    fn all_actions() -> Vec<TaskAction> {
        vec![
            TaskAction::Accept,
            TaskAction::Reject {
                reason: "产能不足".to_string(),
            },
            TaskAction::SubmitDeliverables(deliverables()),
            TaskAction::ConfirmAcceptance(confirmed("T-001")),
            TaskAction::ApplyForPayment(invoices()),
        ]
    }

    #[test]
    fn test_happy_path() {
        let mut t = task(TaskStatus::PendingAcceptance);
        assert_eq!(t.apply(TaskAction::Accept), Ok(TaskStatus::InProgress));
        assert_eq!(
            t.apply(TaskAction::SubmitDeliverables(deliverables())),
            Ok(TaskStatus::PendingVerification)
        );
        assert_eq!(
            t.apply(TaskAction::ConfirmAcceptance(confirmed("T-001"))),
            Ok(TaskStatus::Verified)
        );
        assert_eq!(
            t.apply(TaskAction::ApplyForPayment(invoices())),
            Ok(TaskStatus::Completed)
        );
        assert!(t.available_actions().is_empty());
    }

    #[test]
    fn test_illegal_transitions_do_not_mutate() {
        for status in TaskStatus::ALL {
            for action in all_actions() {
                let mut t = task(status);
                let legal = action.kind().from_status() == status;
                let result = t.apply(action.clone());
                assert_eq!(result.is_ok(), legal, "{:?} {:?}", status, action.kind());
                if !legal {
                    assert_eq!(t.status(), status);
                    assert!(matches!(
                        result,
                        Err(ValidationError::IllegalTransition { .. })
                    ));
                }
            }
        }
    }

    #[test]
    fn test_reject_requires_reason() {
        let mut t = task(TaskStatus::PendingAcceptance);
        for reason in ["", "   ", "\n"] {
            let result = t.apply(TaskAction::Reject {
                reason: reason.to_string(),
            });
            assert_eq!(result, Err(ValidationError::EmptyRejectionReason));
            assert_eq!(t.status(), TaskStatus::PendingAcceptance);
        }

        t.apply(TaskAction::Reject {
            reason: "  交期无法满足 ".to_string(),
        })
        .unwrap();
        assert_eq!(t.status(), TaskStatus::Rejected);
        assert_eq!(t.rejection_reason(), Some("交期无法满足"));
        assert!(t.status().is_terminal());
    }

    #[test]
    fn test_submit_requires_attachment() {
        let mut t = task(TaskStatus::InProgress);
        let empty = AttachmentSet::new(UploadContext::Deliverable);
        assert!(matches!(
            t.apply(TaskAction::SubmitDeliverables(empty)),
            Err(ValidationError::MissingAttachment(_))
        ));
        // 发票不能当作交付成果
        assert!(t.apply(TaskAction::SubmitDeliverables(invoices())).is_err());
        assert_eq!(t.status(), TaskStatus::InProgress);
    }

    #[test]
    fn test_payment_requires_invoice() {
        let mut t = task(TaskStatus::Verified);
        let empty = AttachmentSet::new(UploadContext::Invoice);
        let err = t.apply(TaskAction::ApplyForPayment(empty)).unwrap_err();
        assert_eq!(err.to_string(), "请上传发票文件");
        assert_eq!(t.status(), TaskStatus::Verified);
    }

    #[test]
    fn test_confirmation_must_match_task() {
        let mut t = task(TaskStatus::PendingVerification);
        assert!(t
            .apply(TaskAction::ConfirmAcceptance(confirmed("T-002")))
            .is_err());
        assert_eq!(t.status(), TaskStatus::PendingVerification);
    }

    #[test]
    fn test_plan_does_not_mutate() {
        let t = task(TaskStatus::PendingAcceptance);
        assert_eq!(t.plan(&TaskAction::Accept), Ok(TaskStatus::InProgress));
        assert_eq!(t.status(), TaskStatus::PendingAcceptance);
    }

    #[test]
    fn test_available_actions() {
        assert_eq!(
            task(TaskStatus::PendingAcceptance).available_actions(),
            vec![TaskActionKind::Accept, TaskActionKind::Reject]
        );
        assert_eq!(
            task(TaskStatus::Verified).available_actions(),
            vec![TaskActionKind::ApplyForPayment]
        );
        assert!(task(TaskStatus::Rejected).available_actions().is_empty());
    }
}
