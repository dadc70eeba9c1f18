//! 页面控制器
//!
//! 每个页面的状态只由一个控制器持有，界面层通过显式的读写方法访问。
//! 需要提交的操作先在本地校验，返回 [`Submission`]，由应用派发给提交服务，
//! 成功后再执行其中的 [`Commit`]。

pub mod confirm;
pub mod dashboard;
pub mod evaluations;
pub mod finance;
pub mod invoice;
pub mod payment;
pub mod submit;
pub mod supplier;
pub mod task_detail;
pub mod tasks;
pub mod users;

pub use confirm::AcceptanceConfirmation;
pub use dashboard::Dashboard;
pub use evaluations::Evaluations;
pub use finance::FinanceBoard;
pub use invoice::InvoiceUpload;
pub use payment::PaymentApplication;
pub use submit::DeliverableSubmission;
pub use supplier::SupplierEditor;
pub use task_detail::TaskDetail;
pub use tasks::TaskList;
pub use users::UserAdmin;

use std::path::Path;

use crate::error::ValidationError;
use crate::models::{Attachment, TaskAction};
use crate::service::Operation;

/// 提交成功后需要在本地执行的修改
#[derive(Debug, Clone)]
pub enum Commit {
    Task { task_id: String, action: TaskAction },
    Invoice { record_id: String },
    SupplierProfile,
}

/// 已通过本地校验、等待提交的操作
#[derive(Debug, Clone)]
pub struct Submission {
    pub operation: Operation,
    pub commit: Commit,
}

/// 从文件路径（每行一个）读取附件信息
pub fn load_attachments(input: &str) -> Result<Vec<Attachment>, ValidationError> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            Attachment::from_path(Path::new(line)).map_err(|err| ValidationError::UnreadableFile {
                path: line.to_string(),
                reason: err.to_string(),
            })
        })
        .collect()
}

/// 列表中移动选中项，越界时停在两端
pub(crate) fn step(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1).min(len - 1)
    } else {
        index.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_attachments_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("报告.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 2048]).unwrap();

        let input = format!("\n  {}  \n\n", path.display());
        let files = load_attachments(&input).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].byte_size, 2048);
        assert_eq!(files[0].mime_type, "application/pdf");
    }

    #[test]
    fn test_load_attachments_missing_file() {
        let err = load_attachments("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, ValidationError::UnreadableFile { .. }));
    }

    #[test]
    fn test_step_clamps() {
        assert_eq!(step(0, 0, true), 0);
        assert_eq!(step(0, 3, false), 0);
        assert_eq!(step(1, 3, true), 2);
        assert_eq!(step(2, 3, true), 2);
    }
}
