//! 提交交付成果
use crate::error::ValidationError;
use crate::models::{Attachment, AttachmentSet, TaskAction, UploadContext};
use crate::service::Operation;

use super::{Commit, Submission, TaskList};

#[derive(Debug)]
pub struct DeliverableSubmission {
    task_id: String,
    files: AttachmentSet,
    pub selected: usize,
    pub submitting: bool,
    /// 最近一次上传或提交的错误
    pub error: Option<String>,
}

impl Default for DeliverableSubmission {
    fn default() -> Self {
        Self {
            task_id: String::new(),
            files: AttachmentSet::new(UploadContext::Deliverable),
            selected: 0,
            submitting: false,
            error: None,
        }
    }
}

impl DeliverableSubmission {
    pub fn open(&mut self, task_id: &str) {
        if self.task_id != task_id {
            *self = Self {
                task_id: task_id.to_string(),
                ..Self::default()
            };
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn files(&self) -> &AttachmentSet {
        &self.files
    }

    /// 添加一批文件，任一文件不合法则整批不加入
    pub fn add_files(&mut self, batch: Vec<Attachment>) -> Result<usize, ValidationError> {
        match self.files.add_batch(batch) {
            Ok(added) => {
                self.error = None;
                Ok(added)
            }
            Err(err) => {
                tracing::warn!(task = %self.task_id, error = %err, "deliverable rejected");
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn remove_selected(&mut self) -> Option<Attachment> {
        let removed = self.files.remove(self.selected);
        self.selected = self.selected.min(self.files.len().saturating_sub(1));
        removed
    }

    pub fn select_next(&mut self) {
        self.selected = super::step(self.selected, self.files.len(), true);
    }

    pub fn select_prev(&mut self) {
        self.selected = super::step(self.selected, self.files.len(), false);
    }

    pub fn submit(&mut self, tasks: &TaskList) -> Result<Submission, ValidationError> {
        let action = TaskAction::SubmitDeliverables(self.files.clone());
        if let Err(err) = tasks.plan(&self.task_id, &action) {
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.error = None;
        self.submitting = true;
        Ok(Submission {
            operation: Operation::SubmitDeliverables {
                task_id: self.task_id.clone(),
                files: self.files.names(),
            },
            commit: Commit::Task {
                task_id: self.task_id.clone(),
                action,
            },
        })
    }

    /// 提交结束；成功后清空已提交的文件
    pub fn finish(&mut self, task_id: &str, success: bool) {
        if self.task_id == task_id {
            self.submitting = false;
            if success {
                self.files.clear();
                self.selected = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::models::attachment::{MB, MIME_PDF};
    use crate::seed;

    fn page() -> DeliverableSubmission {
        let mut page = DeliverableSubmission::default();
        page.open("T-001");
        page
    }

    #[test]
    fn test_submit_requires_files() {
        let tasks = TaskList::new(seed::tasks());
        let mut page = page();
        let err = page.submit(&tasks).unwrap_err();
        assert_eq!(err.to_string(), "请上传至少一个文件");
        assert!(!page.submitting);
        assert_eq!(page.error.as_deref(), Some("请上传至少一个文件"));
    }

    #[test]
    fn test_invalid_batch_keeps_list() {
        let mut page = page();
        page.add_files(vec![Attachment::new("a.pdf", MB, MIME_PDF)]).unwrap();

        let err = page
            .add_files(vec![
                Attachment::new("b.pdf", MB, MIME_PDF),
                Attachment::new("c.zip", MB, "application/zip"),
            ])
            .unwrap_err();
        assert!(err.to_string().contains("只支持PDF、Word、Excel、JPEG和PNG格式的文件"));
        assert_eq!(page.files().names(), vec!["a.pdf"]);
    }

    #[test]
    fn test_submit_and_commit() {
        let mut tasks = TaskList::new(seed::tasks());
        let mut page = page();
        page.add_files(vec![
            Attachment::new("报告.pdf", MB, MIME_PDF),
            Attachment::new("附录.pdf", MB, MIME_PDF),
        ])
        .unwrap();

        let submission = page.submit(&tasks).unwrap();
        assert!(page.submitting);
        assert_eq!(
            submission.operation,
            Operation::SubmitDeliverables {
                task_id: "T-001".to_string(),
                files: vec!["报告.pdf".to_string(), "附录.pdf".to_string()],
            }
        );

        if let Commit::Task { task_id, action } = submission.commit {
            tasks.commit(&task_id, action).unwrap();
        }
        page.finish("T-001", true);
        assert!(!page.submitting);
        assert!(page.files().is_empty());
        assert_eq!(tasks.find("T-001").unwrap().status(), TaskStatus::PendingVerification);
    }

    #[test]
    fn test_failed_submission_keeps_files() {
        let mut page = page();
        page.add_files(vec![Attachment::new("报告.pdf", MB, MIME_PDF)]).unwrap();
        page.submitting = true;
        page.finish("T-001", false);
        assert!(!page.submitting);
        assert_eq!(page.files().len(), 1);
    }

    #[test]
    fn test_remove_selected() {
        let mut page = page();
        page.add_files(vec![
            Attachment::new("a.pdf", MB, MIME_PDF),
            Attachment::new("b.pdf", MB, MIME_PDF),
        ])
        .unwrap();
        page.select_next();
        assert_eq!(page.remove_selected().map(|f| f.name), Some("b.pdf".to_string()));
        assert_eq!(page.selected, 0);
        assert_eq!(page.files().names(), vec!["a.pdf"]);
    }
}
