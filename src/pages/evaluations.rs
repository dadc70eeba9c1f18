//! 测评管理：筛选、分发、申请更多测评
use std::collections::BTreeSet;

use crate::error::ValidationError;
use crate::models::{Distribution, Evaluation, EvaluationStatus, EvaluationType, User};
use crate::query::Filter;

/// 分发对话框
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributeDialog {
    pub evaluation_id: String,
    pub selected: BTreeSet<String>,
    pub cursor: usize,
}

pub struct Evaluations {
    evaluations: Vec<Evaluation>,
    types: Vec<EvaluationType>,
    distribution: Distribution,
    pub status_filter: Option<EvaluationStatus>,
    pub selected: usize,
    dialog: Option<DistributeDialog>,
    /// “申请更多测评”说明是否打开
    pub info_open: bool,
}

impl Evaluations {
    pub fn new(evaluations: Vec<Evaluation>, types: Vec<EvaluationType>) -> Self {
        Self {
            evaluations,
            types,
            distribution: Distribution::new(),
            status_filter: None,
            selected: 0,
            dialog: None,
            info_open: false,
        }
    }

    pub fn types(&self) -> &[EvaluationType] {
        &self.types
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn visible(&self) -> Vec<Evaluation> {
        Filter::new()
            .eq(|e: &Evaluation| e.status, self.status_filter)
            .apply(&self.evaluations)
    }

    /// 全部 → 待参加 → 已完成 → 全部
    pub fn cycle_status_filter(&mut self) {
        self.status_filter = match self.status_filter {
            None => Some(EvaluationStatus::Pending),
            Some(EvaluationStatus::Pending) => Some(EvaluationStatus::Completed),
            Some(EvaluationStatus::Completed) => None,
        };
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        self.selected = super::step(self.selected, self.visible().len(), true);
    }

    pub fn select_prev(&mut self) {
        self.selected = super::step(self.selected, self.visible().len(), false);
    }

    pub fn selected_evaluation(&self) -> Option<Evaluation> {
        self.visible().into_iter().nth(self.selected)
    }

    pub fn dialog(&self) -> Option<&DistributeDialog> {
        self.dialog.as_ref()
    }

    /// 打开分发对话框，只有待参加的测评可以分发
    pub fn open_distribute(&mut self, evaluation_id: &str) -> Result<(), ValidationError> {
        let evaluation = self
            .evaluations
            .iter()
            .find(|e| e.id == evaluation_id)
            .ok_or_else(|| ValidationError::NotFound {
                entity: "测评",
                id: evaluation_id.to_string(),
            })?;
        if !evaluation.distributable() {
            return Err(ValidationError::NotDistributable(evaluation.name.clone()));
        }
        self.dialog = Some(DistributeDialog {
            evaluation_id: evaluation_id.to_string(),
            selected: BTreeSet::new(),
            cursor: 0,
        });
        Ok(())
    }

    pub fn move_cursor(&mut self, users: &[User], forward: bool) {
        if let Some(dialog) = &mut self.dialog {
            dialog.cursor = super::step(dialog.cursor, users.len(), forward);
        }
    }

    /// 勾选或取消光标所在的用户
    pub fn toggle_user(&mut self, user_id: &str) {
        if let Some(dialog) = &mut self.dialog {
            if !dialog.selected.remove(user_id) {
                dialog.selected.insert(user_id.to_string());
            }
        }
    }

    pub fn toggle_at_cursor(&mut self, users: &[User]) {
        let user_id = self
            .dialog
            .as_ref()
            .and_then(|d| users.get(d.cursor))
            .map(|u| u.id.clone());
        if let Some(user_id) = user_id {
            self.toggle_user(&user_id);
        }
    }

    /// 确认分发，返回选中的用户数；未选择用户时对话框保持打开
    pub fn confirm_distribute(&mut self) -> Result<usize, ValidationError> {
        let dialog = self.dialog.as_ref().ok_or(ValidationError::EmptySelection)?;
        if dialog.selected.is_empty() {
            return Err(ValidationError::EmptySelection);
        }

        let count = dialog.selected.len();
        let added = self
            .distribution
            .distribute(&dialog.evaluation_id, &dialog.selected);
        tracing::info!(
            evaluation = %dialog.evaluation_id,
            users = count,
            new_pairs = added,
            "evaluation distributed"
        );
        self.dialog = None;
        Ok(count)
    }

    pub fn cancel_distribute(&mut self) {
        self.dialog = None;
    }
}

/// 分发成功提示
pub fn distribute_message(count: usize) -> String {
    format!("已将测评分发给 {} 名用户", count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn page() -> Evaluations {
        Evaluations::new(seed::evaluations(), seed::evaluation_types())
    }

    #[test]
    fn test_status_filter() {
        let mut page = page();
        assert_eq!(page.visible().len(), 5);
        page.cycle_status_filter();
        assert_eq!(page.visible().len(), 3);
        page.cycle_status_filter();
        let ids: Vec<String> = page.visible().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["E-003", "E-005"]);
        page.cycle_status_filter();
        assert_eq!(page.status_filter, None);
    }

    #[test]
    fn test_distribute_requires_selection() {
        let users = seed::users();
        let mut page = page();
        page.open_distribute("E-001").unwrap();

        assert_eq!(page.confirm_distribute(), Err(ValidationError::EmptySelection));
        assert!(page.dialog().is_some());

        page.toggle_at_cursor(&users);
        page.move_cursor(&users, true);
        page.toggle_at_cursor(&users);
        page.move_cursor(&users, true);
        page.toggle_at_cursor(&users);
        page.toggle_at_cursor(&users);

        assert_eq!(page.confirm_distribute(), Ok(2));
        assert!(page.dialog().is_none());
        assert!(page.distribution().contains("E-001", "U-001"));
        assert!(page.distribution().contains("E-001", "U-002"));
        assert!(!page.distribution().contains("E-001", "U-003"));
        assert_eq!(distribute_message(2), "已将测评分发给 2 名用户");
    }

    #[test]
    fn test_completed_evaluation_not_distributable() {
        let mut page = page();
        assert_eq!(
            page.open_distribute("E-003"),
            Err(ValidationError::NotDistributable("成本控制评估".to_string()))
        );
        assert!(page.dialog().is_none());
        assert!(matches!(
            page.open_distribute("E-404"),
            Err(ValidationError::NotFound { .. })
        ));
    }

    #[test]
    fn test_cancel_records_nothing() {
        let mut page = page();
        page.open_distribute("E-002").unwrap();
        page.toggle_user("U-003");
        page.cancel_distribute();
        assert!(page.distribution().is_empty());
    }
}
