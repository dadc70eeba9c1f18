//! 业务错误类型
//!
//! 校验错误在本地恢复并以提示消息呈现，绝不修改状态；
//! 操作失败来自（模拟的）提交服务，记录日志后保持原状态。

use crate::models::attachment::InvalidKind;
use crate::models::task::{TaskAction, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0}为必填项")]
    MissingField(&'static str),

    #[error("{field}格式不正确: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("请输入拒绝原因")]
    EmptyRejectionReason,

    #[error("{message}")]
    InvalidAttachment {
        kind: InvalidKind,
        file_name: String,
        message: String,
    },

    #[error("{0}")]
    MissingAttachment(&'static str),

    #[error("任务当前状态为「{from}」，无法执行「{action}」")]
    IllegalTransition { from: TaskStatus, action: &'static str },

    #[error("请至少选择一名用户")]
    EmptySelection,

    #[error("测评「{0}」已完成，无法分发")]
    NotDistributable(String),

    #[error("{entity}「{id}」当前不可{action}")]
    Unavailable {
        entity: &'static str,
        id: String,
        action: &'static str,
    },

    #[error("未找到{entity}: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("无法读取文件 {path}: {reason}")]
    UnreadableFile { path: String, reason: String },

    #[error("无法识别的路径: {0}")]
    UnknownRoute(String),
}

impl ValidationError {
    /// 构造非法状态转换错误
    pub fn illegal(from: TaskStatus, action: &TaskAction) -> Self {
        Self::IllegalTransition {
            from,
            action: action.label(),
        }
    }

    /// 附件校验失败的具体类型（其他错误返回 None）
    #[cfg(test)]
    pub fn invalid_kind(&self) -> Option<InvalidKind> {
        match self {
            Self::InvalidAttachment { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// 提交服务返回的失败
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation}失败: {reason}")]
pub struct OperationFailure {
    pub operation: &'static str,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(
            ValidationError::EmptyRejectionReason.to_string(),
            "请输入拒绝原因"
        );
        assert_eq!(
            ValidationError::MissingField("姓名").to_string(),
            "姓名为必填项"
        );

        let err = ValidationError::illegal(TaskStatus::Completed, &TaskAction::Accept);
        assert_eq!(err.to_string(), "任务当前状态为「已完成」，无法执行「接受任务」");
    }

    #[test]
    fn test_invalid_kind_only_for_attachments() {
        let err = ValidationError::InvalidAttachment {
            kind: InvalidKind::TooLarge,
            file_name: "a.pdf".to_string(),
            message: "文件大小不能超过5MB".to_string(),
        };
        assert_eq!(err.invalid_kind(), Some(InvalidKind::TooLarge));
        assert_eq!(err.to_string(), "文件大小不能超过5MB");
        assert_eq!(ValidationError::EmptySelection.invalid_kind(), None);
    }

    #[test]
    fn test_operation_failure_display() {
        let failure = OperationFailure {
            operation: "接受任务",
            reason: "网络超时".to_string(),
        };
        assert_eq!(failure.to_string(), "接受任务失败: 网络超时");
    }
}
