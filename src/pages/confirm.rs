//! 验收确认
use crate::error::ValidationError;
use crate::models::{PendingConfirmation, TaskAction, TaskActionKind};
use crate::service::Operation;

use super::{Commit, Submission, TaskList};

#[derive(Debug, Default)]
pub struct AcceptanceConfirmation {
    task_id: String,
    pending: Option<PendingConfirmation<String>>,
    pub submitting: bool,
}

impl AcceptanceConfirmation {
    pub fn open(&mut self, task_id: &str) {
        if self.task_id != task_id {
            self.task_id = task_id.to_string();
            self.pending = None;
            self.submitting = false;
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// 第一步：发起确认请求
    pub fn request(&mut self, tasks: &TaskList) -> Result<(), ValidationError> {
        let task = tasks.find(&self.task_id)?;
        let kind = TaskActionKind::ConfirmAcceptance;
        if !task.can(kind) {
            return Err(ValidationError::IllegalTransition {
                from: task.status(),
                action: kind.label(),
            });
        }
        self.pending = Some(PendingConfirmation::request(self.task_id.clone()));
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// 第二步：确认；没有待确认的请求时返回 None
    pub fn confirm(&mut self, tasks: &TaskList) -> Option<Result<Submission, ValidationError>> {
        let confirmed = self.pending.take()?.confirm();
        let action = TaskAction::ConfirmAcceptance(confirmed);
        let task_id = self.task_id.clone();
        Some(tasks.plan(&task_id, &action).map(|_| {
            self.submitting = true;
            Submission {
                operation: Operation::ConfirmAcceptance {
                    task_id: task_id.clone(),
                },
                commit: Commit::Task { task_id, action },
            }
        }))
    }

    pub fn finish(&mut self, task_id: &str) {
        if self.task_id == task_id {
            self.submitting = false;
        }
    }
}
