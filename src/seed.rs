//! 启动时载入的内存数据
use chrono::NaiveDate;

use crate::models::{
    Evaluation, EvaluationStatus, EvaluationType, FinanceOverview, Role, SettlementStatus,
    SupplierProfile, Task, TaskRecord, TaskStatus, User, UserStatus,
};
use crate::models::supplier::{ProjectExperience, ReviewStatus};

/// 仅用于常量日期
fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

const TASK_DESCRIPTION: &str = "对新产品线进行质量审核，确保产品符合质量标准。需要检查产品的材料、工艺和成品质量，并提供详细的质量评估报告。";
const TASK_REQUIREMENTS: &str = "产品符合质量标准，提交完整报告";

pub fn tasks() -> Vec<Task> {
    let rows = [
        ("T-001", "产品质检审核", TaskStatus::InProgress, 15, 5000),
        ("T-002", "供应链优化方案", TaskStatus::PendingAcceptance, 20, 8000),
        ("T-003", "原材料成本分析", TaskStatus::Completed, 10, 12000),
        ("T-004", "生产流程改进", TaskStatus::PendingVerification, 25, 7000),
        ("T-005", "质量控制体系审核", TaskStatus::Verified, 18, 15000),
    ];

    rows.into_iter()
        .map(|(id, name, status, day, amount)| {
            Task::new(id, name, date(2023, 12, day), amount)
                .with_status(status)
                .with_description(TASK_DESCRIPTION)
                .with_requirements(TASK_REQUIREMENTS)
        })
        .collect()
}

pub fn users() -> Vec<User> {
    let rows = [
        ("张三", Role::Admin, UserStatus::Enabled, "系统主管理员"),
        ("李四", Role::Standard, UserStatus::Disabled, "负责产品质检"),
        ("王五", Role::Standard, UserStatus::Enabled, "负责供应链管理"),
        ("赵六", Role::Admin, UserStatus::Enabled, "财务管理员"),
        ("钱七", Role::Standard, UserStatus::Enabled, "负责客户关系"),
        ("孙八", Role::Standard, UserStatus::Disabled, "临时用户"),
        ("周九", Role::Standard, UserStatus::Enabled, "负责技术支持"),
        ("吴十", Role::Standard, UserStatus::Enabled, "负责市场营销"),
        ("郑十一", Role::Standard, UserStatus::Enabled, "负责产品开发"),
        ("王十二", Role::Standard, UserStatus::Disabled, "实习生"),
    ];

    rows.into_iter()
        .enumerate()
        .map(|(i, (name, role, status, notes))| User {
            id: format!("U-{:03}", i + 1),
            name: name.to_string(),
            role,
            phone: format!("1380013800{}", i),
            join_time: date(2023, 12, i as u32 + 1),
            status,
            notes: notes.to_string(),
        })
        .collect()
}

pub fn evaluations() -> Vec<Evaluation> {
    let rows = [
        ("E-001", "产品质量评估", 15, EvaluationStatus::Pending),
        ("E-002", "供应链效率评估", 20, EvaluationStatus::Pending),
        ("E-003", "成本控制评估", 10, EvaluationStatus::Completed),
        ("E-004", "服务质量评估", 25, EvaluationStatus::Pending),
        ("E-005", "技术能力评估", 18, EvaluationStatus::Completed),
    ];

    rows.into_iter()
        .map(|(id, name, day, status)| Evaluation {
            id: id.to_string(),
            name: name.to_string(),
            deadline: date(2023, 12, day),
            status,
        })
        .collect()
}

pub fn evaluation_types() -> Vec<EvaluationType> {
    let rows = [
        ("产品质检", true),
        ("服务质检", true),
        ("技术支持", false),
        ("供应链管理", true),
        ("成本控制", false),
    ];

    rows.into_iter()
        .zip(1..)
        .map(|((name, passed), id)| EvaluationType {
            id,
            name: name.to_string(),
            passed,
        })
        .collect()
}

/// 申请更多测评时展示的联系方式
pub const CONTACT_EMAIL: &str = "supplier@company.com";
pub const CONTACT_PHONE: &str = "123-456-7890";

pub fn supplier_profile() -> SupplierProfile {
    let mut project = ProjectExperience::new(1);
    project.name = "智能制造系统开发".to_string();
    project.time = "2022-06-15".to_string();
    project.description = "为某大型制造企业开发智能生产管理系统".to_string();

    SupplierProfile {
        company_name: "北京科技有限公司".to_string(),
        credit_code: "91110108MA01ABCDEF".to_string(),
        contact_person: "张三".to_string(),
        contact_phone: "13800138000".to_string(),
        contact_address: "北京市海淀区中关村南大街5号".to_string(),
        employee_count: "50".to_string(),
        projects: vec![project],
        review_status: ReviewStatus::Reviewing,
        ..SupplierProfile::default()
    }
}

pub fn finance_overview() -> FinanceOverview {
    FinanceOverview {
        account_balance: 25000,
        pending_settlement: 15000,
        settled_amount: 120000,
    }
}

pub fn finance_records() -> Vec<TaskRecord> {
    let rows = [
        ("T-001", "产品质检审核", 5000, SettlementStatus::Pending),
        ("T-002", "供应链优化方案", 8000, SettlementStatus::Settled),
        ("T-003", "原材料成本分析", 12000, SettlementStatus::Paid),
        ("T-004", "生产流程改进", 7000, SettlementStatus::Rejected),
        ("T-005", "质量控制体系审核", 15000, SettlementStatus::Pending),
    ];

    rows.into_iter()
        .map(|(task_id, name, amount, settlement)| TaskRecord {
            task_id: task_id.to_string(),
            name: name.to_string(),
            amount,
            settlement,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::next_user_id;

    #[test]
    fn test_seed_shapes() {
        assert_eq!(tasks().len(), 5);
        assert_eq!(users().len(), 10);
        assert_eq!(users()[9].id, "U-010");
        assert_eq!(users()[9].phone, "13800138009");
        assert_eq!(next_user_id(&users()), "U-011");
        assert_eq!(evaluation_types()[4].id, 5);
        assert!(supplier_profile().validate().is_ok());
    }
}
