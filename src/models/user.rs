use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Standard,
}

impl Role {
    pub fn display(self) -> &'static str {
        match self {
            Role::Admin => "管理员",
            Role::Standard => "普通用户",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "admin" | "管理员" => Some(Role::Admin),
            "standard" | "普通用户" => Some(Role::Standard),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Enabled,
    Disabled,
}

impl UserStatus {
    pub fn display(self) -> &'static str {
        match self {
            UserStatus::Enabled => "启用",
            UserStatus::Disabled => "禁用",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "enabled" | "启用" => Some(UserStatus::Enabled),
            "disabled" | "禁用" => Some(UserStatus::Disabled),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Enabled => UserStatus::Disabled,
            UserStatus::Disabled => UserStatus::Enabled,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub phone: String,
    pub join_time: NaiveDate,
    pub status: UserStatus,
    pub notes: String,
}

/// 添加/编辑用户的表单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    /// 编辑时为原用户ID，添加时为空
    pub id: Option<String>,
    pub name: String,
    pub role: Role,
    pub phone: String,
    pub notes: String,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            role: Role::Standard,
            phone: String::new(),
            notes: String::new(),
        }
    }
}

impl UserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: Some(user.id.clone()),
            name: user.name.clone(),
            role: user.role,
            phone: user.phone.clone(),
            notes: user.notes.clone(),
        }
    }

    /// 以 `字段=值` 的多行文本表示，用于终端中编辑
    pub fn to_text(&self) -> String {
        format!(
            "姓名={}\n联系电话={}\n角色={}\n备注={}",
            self.name, self.phone, self.role, self.notes
        )
    }

    /// 读取 `to_text` 格式的文本，未出现的字段保持原值
    pub fn apply_text(&mut self, text: &str) -> Result<(), ValidationError> {
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().to_string();
            match key.trim() {
                "姓名" => self.name = value,
                "联系电话" => self.phone = value,
                "备注" => self.notes = value,
                "角色" => {
                    self.role = Role::parse(&value).ok_or(ValidationError::InvalidField {
                        field: "角色",
                        value,
                    })?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// 姓名和联系电话为必填项
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("姓名"));
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::MissingField("联系电话"));
        }
        if !self
            .phone
            .trim()
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-' || c == '+')
        {
            return Err(ValidationError::InvalidField {
                field: "联系电话",
                value: self.phone.clone(),
            });
        }
        Ok(())
    }
}

/// 生成下一个用户ID：`U-` 加三位序号，取现有最大序号加一
pub fn next_user_id(users: &[User]) -> String {
    let max = users
        .iter()
        .filter_map(|u| u.id.strip_prefix("U-"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("U-{:03}", max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_text_roundtrip() {
        let mut form = UserForm::default();
        form.apply_text("姓名= 陈十三 \n联系电话=13800138010\n角色=管理员\n无关行").unwrap();
        assert_eq!(form.name, "陈十三");
        assert_eq!(form.role, Role::Admin);

        let mut copy = UserForm::default();
        copy.apply_text(&form.to_text()).unwrap();
        assert_eq!(copy, form);

        assert!(matches!(
            form.apply_text("角色=访客"),
            Err(ValidationError::InvalidField { field: "角色", .. })
        ));
    }

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            name: "张三".to_string(),
            role: Role::Admin,
            phone: "13800138000".to_string(),
            join_time: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
            status: UserStatus::Enabled,
            notes: String::new(),
        }
    }

    #[test]
    fn test_next_user_id() {
        assert_eq!(next_user_id(&[]), "U-001");
        assert_eq!(next_user_id(&[user("U-001"), user("U-010")]), "U-011");
        assert_eq!(next_user_id(&[user("admin"), user("U-002")]), "U-003");
    }

    #[test]
    fn test_form_requires_name_and_phone() {
        let mut form = UserForm::default();
        assert_eq!(form.validate(), Err(ValidationError::MissingField("姓名")));
        form.name = "李四".to_string();
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingField("联系电话"))
        );
        form.phone = "138-0013-8001".to_string();
        assert_eq!(form.validate(), Ok(()));
        form.phone = "电话".to_string();
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(Role::parse("管理员"), Some(Role::Admin));
        assert_eq!(Role::parse("standard"), Some(Role::Standard));
        assert_eq!(UserStatus::parse("禁用"), Some(UserStatus::Disabled));
        assert_eq!(UserStatus::Enabled.toggled(), UserStatus::Disabled);
    }

    #[test]
    fn test_form_from_user() {
        let form = UserForm::from_user(&user("U-001"));
        assert_eq!(form.id.as_deref(), Some("U-001"));
        assert_eq!(form.role, Role::Admin);
    }
}
