//! 任务列表，同时持有全部任务
use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::models::reminder::{self, Reminder};
use crate::models::{Task, TaskAction, TaskStatus};
use crate::query::{Filter, SortOrder, sort_by_date};

pub struct TaskList {
    tasks: Vec<Task>,
    /// None 表示全部状态
    pub status_filter: Option<TaskStatus>,
    pub sort: SortOrder,
    pub selected: usize,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            status_filter: None,
            sort: SortOrder::Asc,
            selected: 0,
        }
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == task_id)
    }

    pub fn find(&self, task_id: &str) -> Result<&Task, ValidationError> {
        self.get(task_id).ok_or_else(|| ValidationError::NotFound {
            entity: "任务",
            id: task_id.to_string(),
        })
    }

    /// 按当前筛选和排序条件得到的列表
    pub fn visible(&self) -> Vec<Task> {
        let filtered = Filter::new()
            .eq(|t: &Task| t.status(), self.status_filter)
            .apply(&self.tasks);
        sort_by_date(&filtered, |t| t.deadline(), self.sort)
    }

    pub fn set_status_filter(&mut self, status: Option<TaskStatus>) {
        self.status_filter = status;
        self.selected = 0;
    }

    /// 全部 → 各状态 → 全部
    pub fn cycle_status_filter(&mut self) {
        let next = match self.status_filter {
            None => Some(TaskStatus::ALL[0]),
            Some(current) => TaskStatus::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| TaskStatus::ALL.get(i + 1).copied()),
        };
        self.set_status_filter(next);
    }

    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
    }

    pub fn select_next(&mut self) {
        self.selected = super::step(self.selected, self.visible().len(), true);
    }

    pub fn select_prev(&mut self) {
        self.selected = super::step(self.selected, self.visible().len(), false);
    }

    pub fn selected_task(&self) -> Option<Task> {
        self.visible().into_iter().nth(self.selected)
    }

    pub fn reminders(&self, today: NaiveDate, window_days: i64) -> Vec<Reminder> {
        reminder::reminders(&self.tasks, today, window_days)
    }

    /// 各状态的任务数
    pub fn count_by_status(&self) -> Vec<(TaskStatus, usize)> {
        TaskStatus::ALL
            .iter()
            .map(|status| {
                let count = self.tasks.iter().filter(|t| t.status() == *status).count();
                (*status, count)
            })
            .collect()
    }

    /// 只校验，不修改
    pub fn plan(&self, task_id: &str, action: &TaskAction) -> Result<TaskStatus, ValidationError> {
        self.find(task_id)?.plan(action)
    }

    /// 提交成功后执行状态转换
    pub fn commit(&mut self, task_id: &str, action: TaskAction) -> Result<TaskStatus, ValidationError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id() == task_id)
            .ok_or_else(|| ValidationError::NotFound {
                entity: "任务",
                id: task_id.to_string(),
            })?;
        let label = action.label();
        let next = task.apply(action)?;
        tracing::info!(task = task_id, action = label, status = next.name(), "task transitioned");
        Ok(next)
    }
}
