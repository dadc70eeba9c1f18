use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Pending,
    Completed,
}

impl EvaluationStatus {
    pub fn display(self) -> &'static str {
        match self {
            EvaluationStatus::Pending => "待参加",
            EvaluationStatus::Completed => "已完成",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "pending" | "待参加" => Some(EvaluationStatus::Pending),
            "completed" | "已完成" => Some(EvaluationStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: String,
    pub name: String,
    pub deadline: NaiveDate,
    pub status: EvaluationStatus,
}

impl Evaluation {
    /// 只有待参加的测评可以分发
    pub fn distributable(&self) -> bool {
        self.status == EvaluationStatus::Pending
    }
}

/// 测评类型概览
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationType {
    pub id: u32,
    pub name: String,
    pub passed: bool,
}

/// 测评分发记录：(测评ID, 用户ID) 对的集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    pairs: BTreeSet<(String, String)>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录分发，返回新增的对数（重复分发不计）
    pub fn distribute<'a>(
        &mut self,
        evaluation_id: &str,
        user_ids: impl IntoIterator<Item = &'a String>,
    ) -> usize {
        user_ids
            .into_iter()
            .filter(|user_id| {
                self.pairs
                    .insert((evaluation_id.to_string(), (*user_id).clone()))
            })
            .count()
    }

    #[cfg(test)]
    pub fn contains(&self, evaluation_id: &str, user_id: &str) -> bool {
        self.pairs
            .contains(&(evaluation_id.to_string(), user_id.to_string()))
    }

    pub fn recipients(&self, evaluation_id: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(e, _)| e == evaluation_id)
            .map(|(_, u)| u.as_str())
            .collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribute_is_a_set() {
        let mut dist = Distribution::new();
        let users = vec!["U-001".to_string(), "U-002".to_string()];
        assert_eq!(dist.distribute("E-001", &users), 2);
        assert_eq!(dist.distribute("E-001", &users), 0);
        assert_eq!(dist.distribute("E-002", &users[..1]), 1);

        assert_eq!(dist.len(), 3);
        assert!(dist.contains("E-001", "U-002"));
        assert!(!dist.contains("E-002", "U-002"));
        assert_eq!(dist.recipients("E-001"), vec!["U-001", "U-002"]);
    }

    #[test]
    fn test_distributable() {
        let mut evaluation = Evaluation {
            id: "E-001".to_string(),
            name: "产品质量评估".to_string(),
            deadline: NaiveDate::from_ymd_opt(2023, 12, 15).unwrap(),
            status: EvaluationStatus::Pending,
        };
        assert!(evaluation.distributable());
        evaluation.status = EvaluationStatus::Completed;
        assert!(!evaluation.distributable());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(EvaluationStatus::parse("待参加"), Some(EvaluationStatus::Pending));
        assert_eq!(EvaluationStatus::parse("completed"), Some(EvaluationStatus::Completed));
        assert_eq!(EvaluationStatus::parse("x"), None);
    }
}
