use crate::models::Task;
use crate::route::{NAVIGATION, Route};

use super::TaskList;

/// 首页展示的最近任务数
pub const RECENT_TASKS: usize = 3;

/// 首页：任务概览和快捷入口
#[derive(Debug, Default)]
pub struct Dashboard {
    /// 选中的快捷入口
    pub selected_link: usize,
}

impl Dashboard {
    pub fn recent_tasks<'a>(&self, tasks: &'a TaskList) -> Vec<&'a Task> {
        tasks.all().iter().take(RECENT_TASKS).collect()
    }

    /// 除首页外的各栏目
    pub fn quick_links(&self) -> &'static [(&'static str, &'static str)] {
        &NAVIGATION[1..]
    }

    pub fn select_next(&mut self) {
        self.selected_link = super::step(self.selected_link, self.quick_links().len(), true);
    }

    pub fn select_prev(&mut self) {
        self.selected_link = super::step(self.selected_link, self.quick_links().len(), false);
    }

    pub fn selected_route(&self) -> Option<Route> {
        self.quick_links()
            .get(self.selected_link)
            .and_then(|(_, path)| Route::parse(path).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_recent_tasks_and_links() {
        let tasks = TaskList::new(seed::tasks());
        let mut dashboard = Dashboard::default();
        let recent = dashboard.recent_tasks(&tasks);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id(), "T-001");

        assert_eq!(dashboard.selected_route(), Some(Route::Tasks));
        for _ in 0..10 {
            dashboard.select_next();
        }
        assert_eq!(dashboard.selected_route(), Some(Route::Finance));
    }
}
