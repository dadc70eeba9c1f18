//! 上传发票
use crate::error::ValidationError;
use crate::models::{Attachment, AttachmentSet, UploadContext};
use crate::service::Operation;

use super::{Commit, FinanceBoard, Submission};

#[derive(Debug)]
pub struct InvoiceUpload {
    record_id: String,
    invoice: AttachmentSet,
    pub submitting: bool,
    pub submitted: bool,
    pub error: Option<String>,
}

impl Default for InvoiceUpload {
    fn default() -> Self {
        Self {
            record_id: String::new(),
            invoice: AttachmentSet::new(UploadContext::Invoice),
            submitting: false,
            submitted: false,
            error: None,
        }
    }
}

impl InvoiceUpload {
    /// 只有允许上传发票的记录可以打开
    pub fn open(&mut self, record_id: &str, finance: &FinanceBoard) -> Result<(), ValidationError> {
        let record = finance.record(record_id)?;
        if !record.settlement.accepts_invoice() {
            return Err(ValidationError::Unavailable {
                entity: "结算记录",
                id: record_id.to_string(),
                action: "上传发票",
            });
        }
        if self.record_id != record_id {
            *self = Self {
                record_id: record_id.to_string(),
                submitted: finance.is_invoiced(record_id),
                ..Self::default()
            };
        }
        Ok(())
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn invoice(&self) -> &AttachmentSet {
        &self.invoice
    }

    pub fn attach(&mut self, batch: Vec<Attachment>) -> Result<usize, ValidationError> {
        match self.invoice.add_batch(batch) {
            Ok(added) => {
                self.error = None;
                Ok(added)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn remove(&mut self) {
        self.invoice.clear();
    }

    pub fn submit(&mut self) -> Result<Submission, ValidationError> {
        let Some(file) = self.invoice.current().filter(|_| self.invoice.has_valid()) else {
            let err = ValidationError::MissingAttachment("请上传发票文件");
            self.error = Some(err.to_string());
            return Err(err);
        };

        let invoice = file.name.clone();
        self.error = None;
        self.submitting = true;
        Ok(Submission {
            operation: Operation::UploadInvoice {
                record_id: self.record_id.clone(),
                invoice,
            },
            commit: Commit::Invoice {
                record_id: self.record_id.clone(),
            },
        })
    }

    pub fn finish(&mut self, record_id: &str, success: bool) {
        if self.record_id == record_id {
            self.submitting = false;
            self.submitted |= success;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attachment::{MB, MIME_JPEG};
    use crate::seed;

    fn finance() -> FinanceBoard {
        FinanceBoard::new(seed::finance_overview(), seed::finance_records())
    }

    #[test]
    fn test_open_only_for_open_records() {
        let finance = finance();
        let mut page = InvoiceUpload::default();
        assert!(page.open("T-003", &finance).is_err());
        assert!(page.open("T-404", &finance).is_err());
        page.open("T-002", &finance).unwrap();
        assert_eq!(page.record_id(), "T-002");
    }

    #[test]
    fn test_submit_flow() {
        let mut finance = finance();
        let mut page = InvoiceUpload::default();
        page.open("T-001", &finance).unwrap();
        assert!(page.submit().is_err());
        assert_eq!(page.error.as_deref(), Some("请上传发票文件"));

        page.attach(vec![Attachment::new("发票.jpg", MB, MIME_JPEG)]).unwrap();
        let submission = page.submit().unwrap();
        assert!(page.submitting);
        if let Commit::Invoice { record_id } = &submission.commit {
            finance.mark_invoiced(record_id);
        }
        page.finish("T-001", true);
        assert!(page.submitted);
        assert!(finance.is_invoiced("T-001"));
    }
}
