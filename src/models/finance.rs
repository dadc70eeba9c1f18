use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Pending,
    Settled,
    Paid,
    Rejected,
}

impl SettlementStatus {
    pub fn display(self) -> &'static str {
        match self {
            SettlementStatus::Pending => "待结算",
            SettlementStatus::Settled => "已结算",
            SettlementStatus::Paid => "已支付",
            SettlementStatus::Rejected => "驳回",
        }
    }

    /// 待结算和已结算的记录可以上传发票
    pub fn accepts_invoice(self) -> bool {
        matches!(self, SettlementStatus::Pending | SettlementStatus::Settled)
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// 财务概览（元）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceOverview {
    pub account_balance: u64,
    pub pending_settlement: u64,
    pub settled_amount: u64,
}

/// 任务结算记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    pub name: String,
    pub amount: u64,
    pub settlement: SettlementStatus,
}

/// 格式化人民币金额，如 `¥25,000.00`
pub fn format_currency(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("¥{}.00", grouped)
}
