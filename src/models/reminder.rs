use chrono::NaiveDate;
use serde::Serialize;

use super::task::{Task, TaskActionKind, TaskStatus};
use crate::route::Route;

pub const DEFAULT_REMINDER_WINDOW_DAYS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// 进行中且临近截止日期
    ApproachingDeadline { remaining_days: i64 },
    NeedsVerification,
    ReadyForPayment,
}

/// 任务进度提醒（由状态和截止日期推导，不保存）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub task_id: String,
    pub task_name: String,
    pub kind: ReminderKind,
    pub message: String,
    pub alert: &'static str,
    pub action_label: &'static str,
    pub action_path: String,
}

impl Reminder {
    pub fn action_route(&self) -> Route {
        match self.kind {
            ReminderKind::ApproachingDeadline { .. } => Route::TaskSubmit(self.task_id.clone()),
            ReminderKind::NeedsVerification => Route::TaskConfirm(self.task_id.clone()),
            ReminderKind::ReadyForPayment => Route::TaskPayment(self.task_id.clone()),
        }
    }
}

/// 截止日期与今天相差的整天数（均按零点计算，已过期为负数）
pub fn remaining_days(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// 计算单个任务的提醒，不满足任何规则时返回 None
pub fn reminder_for(task: &Task, today: NaiveDate, window_days: i64) -> Option<Reminder> {
    let deadline = task.deadline().format("%Y-%m-%d").to_string();

    let (kind, message, alert, action) = match task.status() {
        TaskStatus::InProgress => {
            let days = remaining_days(task.deadline(), today);
            if days > window_days {
                return None;
            }
            (
                ReminderKind::ApproachingDeadline {
                    remaining_days: days,
                },
                format!("截止日期：{}，剩余 {} 天", deadline, days),
                "快超期，请尽快提交交付成果",
                TaskActionKind::SubmitDeliverables,
            )
        }
        TaskStatus::PendingVerification => (
            ReminderKind::NeedsVerification,
            format!("截止日期：{}", deadline),
            "任务待验收，请确认验收",
            TaskActionKind::ConfirmAcceptance,
        ),
        TaskStatus::Verified => (
            ReminderKind::ReadyForPayment,
            format!("截止日期：{}", deadline),
            "任务已验收，请申请付款",
            TaskActionKind::ApplyForPayment,
        ),
        _ => return None,
    };

    let mut reminder = Reminder {
        task_id: task.id().to_string(),
        task_name: task.name().to_string(),
        kind,
        message,
        alert,
        action_label: action.label(),
        action_path: String::new(),
    };
    reminder.action_path = reminder.action_route().path();
    Some(reminder)
}

/// 所有需要提醒的任务，保持原有顺序
pub fn reminders(tasks: &[Task], today: NaiveDate, window_days: i64) -> Vec<Reminder> {
    tasks
        .iter()
        .filter_map(|task| reminder_for(task, today, window_days))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 12, 13).unwrap()
    }

    fn task(id: &str, status: TaskStatus, deadline: NaiveDate) -> Task {
        Task::new(id, "产品质检审核", deadline, 5000).with_status(status)
    }

    #[test]
    fn test_approaching_deadline_scenario() {
        let t = task("T-001", TaskStatus::InProgress, today() + Duration::days(2));
        let reminder = reminder_for(&t, today(), DEFAULT_REMINDER_WINDOW_DAYS).unwrap();

        assert!(reminder.message.contains("剩余 2 天"));
        assert_eq!(reminder.message, "截止日期：2023-12-15，剩余 2 天");
        assert_eq!(reminder.action_label, "提交成果");
        assert_eq!(reminder.action_path, "/tasks/T-001/submit");
        assert_eq!(
            reminder.kind,
            ReminderKind::ApproachingDeadline { remaining_days: 2 }
        );
    }

    #[test]
    fn test_in_progress_eligibility_window() {
        for offset in -5..=10 {
            let t = task("T-001", TaskStatus::InProgress, today() + Duration::days(offset));
            assert_eq!(
                reminder_for(&t, today(), DEFAULT_REMINDER_WINDOW_DAYS).is_some(),
                offset <= 2,
                "offset {}",
                offset
            );
        }
    }

    #[test]
    fn test_verification_and_payment_always_remind() {
        let far = today() + Duration::days(30);

        let verify = reminder_for(&task("T-004", TaskStatus::PendingVerification, far), today(), 2)
            .unwrap();
        assert_eq!(verify.kind, ReminderKind::NeedsVerification);
        assert_eq!(verify.action_path, "/tasks/T-004/confirm");
        assert_eq!(verify.alert, "任务待验收，请确认验收");

        let pay = reminder_for(&task("T-005", TaskStatus::Verified, far), today(), 2).unwrap();
        assert_eq!(pay.kind, ReminderKind::ReadyForPayment);
        assert_eq!(pay.action_label, "申请付款");
        assert_eq!(pay.action_route(), Route::TaskPayment("T-005".to_string()));
    }

    #[test]
    fn test_other_statuses_never_remind() {
        for status in [
            TaskStatus::PendingAcceptance,
            TaskStatus::Completed,
            TaskStatus::Rejected,
        ] {
            assert!(reminder_for(&task("T-002", status, today()), today(), 2).is_none());
        }
    }

    #[test]
    fn test_one_reminder_per_task_in_order() {
        let tasks = vec![
            task("T-001", TaskStatus::InProgress, today() + Duration::days(1)),
            task("T-002", TaskStatus::PendingAcceptance, today()),
            task("T-003", TaskStatus::Verified, today()),
            task("T-004", TaskStatus::InProgress, today() + Duration::days(9)),
            task("T-005", TaskStatus::PendingVerification, today()),
        ];
        let ids: Vec<_> = reminders(&tasks, today(), 2)
            .into_iter()
            .map(|r| r.task_id)
            .collect();
        assert_eq!(ids, vec!["T-001", "T-003", "T-005"]);
    }

    #[test]
    fn test_remaining_days() {
        assert_eq!(remaining_days(today(), today()), 0);
        assert_eq!(remaining_days(today() - Duration::days(3), today()), -3);
    }
}
