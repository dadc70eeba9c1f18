use serde::{Deserialize, Serialize};
use std::fmt;

/// 任务状态
///
/// 待接受 → 进行中 → 待验收 → 已验收 → 已完成，另有 待接受 → 已拒绝 的终止分支。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    PendingAcceptance,
    InProgress,
    PendingVerification,
    Verified,
    Completed,
    Rejected,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::PendingAcceptance,
        TaskStatus::InProgress,
        TaskStatus::PendingVerification,
        TaskStatus::Verified,
        TaskStatus::Completed,
        TaskStatus::Rejected,
    ];

    pub fn display(self) -> &'static str {
        match self {
            TaskStatus::PendingAcceptance => "待接受",
            TaskStatus::InProgress => "进行中",
            TaskStatus::PendingVerification => "待验收",
            TaskStatus::Verified => "已验收",
            TaskStatus::Completed => "已完成",
            TaskStatus::Rejected => "已拒绝",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TaskStatus::PendingAcceptance => "pending_acceptance",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::PendingVerification => "pending_verification",
            TaskStatus::Verified => "verified",
            TaskStatus::Completed => "completed",
            TaskStatus::Rejected => "rejected",
        }
    }

    /// 接受内部名称或中文显示名
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.name() == s || status.display() == s)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Rejected)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_and_display() {
        assert_eq!(TaskStatus::parse("in_progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("待验收"), Some(TaskStatus::PendingVerification));
        assert_eq!(TaskStatus::parse(" verified "), Some(TaskStatus::Verified));
        assert_eq!(TaskStatus::parse("unknown"), None);
    }

    #[test]
    fn test_terminal_states() {
        let terminal: Vec<_> = TaskStatus::ALL.into_iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![TaskStatus::Completed, TaskStatus::Rejected]);
    }
}
