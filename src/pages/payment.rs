//! 申请付款
use crate::error::ValidationError;
use crate::models::{Attachment, AttachmentSet, TaskAction, UploadContext};
use crate::service::Operation;

use super::{Commit, Submission, TaskList};

#[derive(Debug)]
pub struct PaymentApplication {
    task_id: String,
    invoice: AttachmentSet,
    pub submitting: bool,
    /// 申请已提交
    pub submitted: bool,
    pub error: Option<String>,
}

impl Default for PaymentApplication {
    fn default() -> Self {
        Self {
            task_id: String::new(),
            invoice: AttachmentSet::new(UploadContext::Invoice),
            submitting: false,
            submitted: false,
            error: None,
        }
    }
}

impl PaymentApplication {
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

    pub fn invoice(&self) -> &AttachmentSet {
        &self.invoice
    }

    /// 上传发票，新文件替换旧文件
    pub fn attach(&mut self, batch: Vec<Attachment>) -> Result<usize, ValidationError> {
        match self.invoice.add_batch(batch) {
            Ok(added) => {
                self.error = None;
                Ok(added)
            }
            Err(err) => {
                tracing::warn!(task = %self.task_id, error = %err, "invoice rejected");
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn remove(&mut self) {
        self.invoice.clear();
    }

    pub fn submit(&mut self, tasks: &TaskList) -> Result<Submission, ValidationError> {
        let action = TaskAction::ApplyForPayment(self.invoice.clone());
        if let Err(err) = tasks.plan(&self.task_id, &action) {
            self.error = Some(err.to_string());
            return Err(err);
        }

        let invoice = self
            .invoice
            .current()
            .map(|f| f.name.clone())
            .unwrap_or_default();
        self.error = None;
        self.submitting = true;
        Ok(Submission {
            operation: Operation::ApplyForPayment {
                task_id: self.task_id.clone(),
                invoice,
            },
            commit: Commit::Task {
                task_id: self.task_id.clone(),
                action,
            },
        })
    }

    pub fn finish(&mut self, task_id: &str, success: bool) {
        if self.task_id == task_id {
            self.submitting = false;
            self.submitted |= success;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attachment::{MB, MIME_PDF, MIME_PNG};
    use crate::models::TaskStatus;
    use crate::models::attachment::InvalidKind;
    use crate::seed;

    fn page() -> PaymentApplication {
        let mut page = PaymentApplication::default();
        page.open("T-005");
        page
    }

    #[test]
    fn test_oversized_invoice_rejected() {
        let mut page = page();
        let err = page
            .attach(vec![Attachment::new("发票.pdf", 6 * MB, MIME_PDF)])
            .unwrap_err();
        assert_eq!(err.invalid_kind(), Some(InvalidKind::TooLarge));
        assert!(page.invoice().is_empty());
        assert_eq!(page.error.as_deref(), Some("文件大小不能超过5MB"));
    }

    #[test]
    fn test_new_invoice_replaces_old() {
        let mut page = page();
        page.attach(vec![Attachment::new("旧.pdf", MB, MIME_PDF)]).unwrap();
        page.attach(vec![Attachment::new("新.png", MB, MIME_PNG)]).unwrap();
        assert_eq!(page.invoice().names(), vec!["新.png"]);
    }

    #[test]
    fn test_submit_flow() {
        let mut tasks = TaskList::new(seed::tasks());
        let mut page = page();
        assert_eq!(page.submit(&tasks).unwrap_err().to_string(), "请上传发票文件");

        page.attach(vec![Attachment::new("发票.pdf", MB, MIME_PDF)]).unwrap();
        let submission = page.submit(&tasks).unwrap();
        assert_eq!(
            submission.operation,
            Operation::ApplyForPayment {
                task_id: "T-005".to_string(),
                invoice: "发票.pdf".to_string(),
            }
        );
        if let Commit::Task { task_id, action } = submission.commit {
            tasks.commit(&task_id, action).unwrap();
        }
        page.finish("T-005", true);
        assert!(page.submitted);
        assert_eq!(tasks.find("T-005").unwrap().status(), TaskStatus::Completed);
    }
}
