//! 任务详情：接受或拒绝任务
use crate::error::ValidationError;
use crate::models::{PendingConfirmation, TaskAction, TaskActionKind};
use crate::service::Operation;

use super::{Commit, Submission, TaskList};

pub const ACCEPT_PROMPT: &str = "您确定要接受此任务吗？接受后将进入进行中状态。";

/// 详情页上的对话框
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailDialog {
    /// 接受前的二次确认
    Accept(PendingConfirmation<String>),
    /// 填写拒绝原因，`error` 为上一次提交的校验错误
    Reject { reason: String, error: Option<String> },
}

#[derive(Debug, Default)]
pub struct TaskDetail {
    task_id: String,
    dialog: Option<DetailDialog>,
    pub submitting: bool,
}

impl TaskDetail {
    /// 切换到另一个任务时重置页面状态
    pub fn open(&mut self, task_id: &str) {
        if self.task_id != task_id {
            self.task_id = task_id.to_string();
            self.dialog = None;
            self.submitting = false;
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    #[cfg(test)]
    pub fn dialog(&self) -> Option<&DetailDialog> {
        self.dialog.as_ref()
    }

    fn ensure(&self, tasks: &TaskList, kind: TaskActionKind) -> Result<(), ValidationError> {
        let task = tasks.find(&self.task_id)?;
        if !task.can(kind) {
            return Err(ValidationError::IllegalTransition {
                from: task.status(),
                action: kind.label(),
            });
        }
        Ok(())
    }

    pub fn request_accept(&mut self, tasks: &TaskList) -> Result<(), ValidationError> {
        self.ensure(tasks, TaskActionKind::Accept)?;
        self.dialog = Some(DetailDialog::Accept(PendingConfirmation::request(
            self.task_id.clone(),
        )));
        Ok(())
    }

    /// 确认接受；没有待确认的请求时返回 None
    pub fn confirm_accept(&mut self, tasks: &TaskList) -> Option<Result<Submission, ValidationError>> {
        let pending = match self.dialog.take() {
            Some(DetailDialog::Accept(pending)) => pending,
            other => {
                self.dialog = other;
                return None;
            }
        };
        let task_id = pending.confirm().into_subject();
        let action = TaskAction::Accept;
        Some(tasks.plan(&task_id, &action).map(|_| {
            self.submitting = true;
            Submission {
                operation: Operation::AcceptTask {
                    task_id: task_id.clone(),
                },
                commit: Commit::Task { task_id, action },
            }
        }))
    }

    pub fn open_reject(&mut self, tasks: &TaskList) -> Result<(), ValidationError> {
        self.ensure(tasks, TaskActionKind::Reject)?;
        self.dialog = Some(DetailDialog::Reject {
            reason: String::new(),
            error: None,
        });
        Ok(())
    }

    pub fn set_reason(&mut self, text: &str) {
        if let Some(DetailDialog::Reject { reason, .. }) = &mut self.dialog {
            *reason = text.to_string();
        }
    }

    /// 提交拒绝原因
    ///
    /// 原因为空时对话框保持打开并记录错误，任务状态不变。
    pub fn submit_reject(&mut self, tasks: &TaskList) -> Result<Submission, ValidationError> {
        let reason = match &self.dialog {
            Some(DetailDialog::Reject { reason, .. }) => reason.trim().to_string(),
            _ => return Err(ValidationError::EmptyRejectionReason),
        };

        let action = TaskAction::Reject {
            reason: reason.clone(),
        };
        if let Err(err) = tasks.plan(&self.task_id, &action) {
            if let Some(DetailDialog::Reject { error, .. }) = &mut self.dialog {
                *error = Some(err.to_string());
            }
            return Err(err);
        }

        self.dialog = None;
        self.submitting = true;
        Ok(Submission {
            operation: Operation::RejectTask {
                task_id: self.task_id.clone(),
                reason,
            },
            commit: Commit::Task {
                task_id: self.task_id.clone(),
                action,
            },
        })
    }

    /// 关闭对话框，接受请求被取消
    pub fn cancel_dialog(&mut self) {
        if let Some(DetailDialog::Accept(pending)) = self.dialog.take() {
            let task_id = pending.cancel();
            tracing::debug!(task = %task_id, "accept cancelled");
        }
    }

    pub fn finish(&mut self, task_id: &str) {
        if self.task_id == task_id {
            self.submitting = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::seed;

    fn detail(id: &str) -> TaskDetail {
        let mut detail = TaskDetail::default();
        detail.open(id);
        detail
    }

    #[test]
    fn test_accept_requires_confirmation() {
        let mut tasks = TaskList::new(seed::tasks());
        let mut page = detail("T-002");

        page.request_accept(&tasks).unwrap();
        assert!(matches!(page.dialog(), Some(DetailDialog::Accept(_))));

        let submission = page.confirm_accept(&tasks).unwrap().unwrap();
        assert!(page.submitting);
        assert!(page.dialog().is_none());
        assert_eq!(submission.operation.target(), "T-002");

        // 提交成功前状态不变
        assert_eq!(tasks.find("T-002").unwrap().status(), TaskStatus::PendingAcceptance);
        let Commit::Task { task_id, action } = submission.commit else {
            panic!("expected task commit");
        };
        tasks.commit(&task_id, action).unwrap();
        assert_eq!(tasks.find("T-002").unwrap().status(), TaskStatus::InProgress);
    }

    #[test]
    fn test_cancel_accept_leaves_status() {
        let tasks = TaskList::new(seed::tasks());
        let mut page = detail("T-002");
        page.request_accept(&tasks).unwrap();
        page.cancel_dialog();
        assert!(page.dialog().is_none());
        assert!(page.confirm_accept(&tasks).is_none());
        assert_eq!(tasks.find("T-002").unwrap().status(), TaskStatus::PendingAcceptance);
    }

    #[test]
    fn test_empty_reason_keeps_dialog_open() {
        let tasks = TaskList::new(seed::tasks());
        let mut page = detail("T-002");
        page.open_reject(&tasks).unwrap();
        page.set_reason("   ");

        let err = page.submit_reject(&tasks).unwrap_err();
        assert_eq!(err, ValidationError::EmptyRejectionReason);
        assert_eq!(
            page.dialog(),
            Some(&DetailDialog::Reject {
                reason: "   ".to_string(),
                error: Some("请输入拒绝原因".to_string()),
            })
        );
        assert!(!page.submitting);
        assert_eq!(tasks.find("T-002").unwrap().status(), TaskStatus::PendingAcceptance);
    }

    #[test]
    fn test_reject_with_reason() {
        let mut tasks = TaskList::new(seed::tasks());
        let mut page = detail("T-002");
        page.open_reject(&tasks).unwrap();
        page.set_reason("  时间冲突 ");

        let submission = page.submit_reject(&tasks).unwrap();
        assert_eq!(
            submission.operation,
            Operation::RejectTask {
                task_id: "T-002".to_string(),
                reason: "时间冲突".to_string(),
            }
        );
        if let Commit::Task { task_id, action } = submission.commit {
            tasks.commit(&task_id, action).unwrap();
        }
        let task = tasks.find("T-002").unwrap();
        assert_eq!(task.status(), TaskStatus::Rejected);
        assert_eq!(task.rejection_reason(), Some("时间冲突"));
    }

    #[test]
    fn test_actions_unavailable_in_other_states() {
        let tasks = TaskList::new(seed::tasks());
        let mut page = detail("T-001");
        assert!(page.request_accept(&tasks).is_err());
        assert!(page.open_reject(&tasks).is_err());
        assert!(page.dialog().is_none());
    }

    #[test]
    fn test_open_other_task_resets() {
        let tasks = TaskList::new(seed::tasks());
        let mut page = detail("T-002");
        page.open_reject(&tasks).unwrap();
        page.open("T-002");
        assert!(page.dialog().is_some());
        page.open("T-001");
        assert!(page.dialog().is_none());
    }
}
