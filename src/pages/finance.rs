use std::collections::BTreeSet;

use crate::error::ValidationError;
use crate::models::{FinanceOverview, TaskRecord};

/// 财务管理：概览和任务结算记录
pub struct FinanceBoard {
    overview: FinanceOverview,
    records: Vec<TaskRecord>,
    /// 已提交发票的记录
    invoiced: BTreeSet<String>,
    pub selected: usize,
}

impl FinanceBoard {
    pub fn new(overview: FinanceOverview, records: Vec<TaskRecord>) -> Self {
        Self {
            overview,
            records,
            invoiced: BTreeSet::new(),
            selected: 0,
        }
    }

    pub fn overview(&self) -> &FinanceOverview {
        &self.overview
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Result<&TaskRecord, ValidationError> {
        self.records
            .iter()
            .find(|r| r.task_id == id)
            .ok_or_else(|| ValidationError::NotFound {
                entity: "结算记录",
                id: id.to_string(),
            })
    }

    /// 待结算、已结算的记录可以上传发票
    pub fn can_upload_invoice(&self, id: &str) -> bool {
        self.record(id)
            .map(|r| r.settlement.accepts_invoice())
            .unwrap_or(false)
    }

    pub fn is_invoiced(&self, id: &str) -> bool {
        self.invoiced.contains(id)
    }

    pub fn mark_invoiced(&mut self, id: &str) {
        self.invoiced.insert(id.to_string());
    }

    pub fn select_next(&mut self) {
        self.selected = super::step(self.selected, self.records.len(), true);
    }

    pub fn select_prev(&mut self) {
        self.selected = super::step(self.selected, self.records.len(), false);
    }

    pub fn selected_record(&self) -> Option<&TaskRecord> {
        self.records.get(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_invoice_availability() {
        let board = FinanceBoard::new(seed::finance_overview(), seed::finance_records());
        assert!(board.can_upload_invoice("T-001"));
        assert!(board.can_upload_invoice("T-002"));
        assert!(!board.can_upload_invoice("T-003"));
        assert!(!board.can_upload_invoice("T-004"));
        assert!(!board.can_upload_invoice("T-999"));
    }

    #[test]
    fn test_selection_and_marking() {
        let mut board = FinanceBoard::new(seed::finance_overview(), seed::finance_records());
        board.select_next();
        board.select_next();
        assert_eq!(board.selected_record().map(|r| r.task_id.as_str()), Some("T-003"));

        board.mark_invoiced("T-001");
        assert!(board.is_invoiced("T-001"));
        assert_eq!(board.overview().account_balance, 25000);
    }
}
