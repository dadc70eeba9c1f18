use serde::{Deserialize, Serialize};
use std::fmt;

use super::attachment::{Attachment, AttachmentSet, UploadContext};
use crate::error::ValidationError;

/// 供应商资料审核状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    NotSubmitted,
    Reviewing,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn display(self) -> &'static str {
        match self {
            ReviewStatus::NotSubmitted => "未提交",
            ReviewStatus::Reviewing => "审核中",
            ReviewStatus::Approved => "通过",
            ReviewStatus::Rejected => "不通过",
        }
    }

    /// 审核状态下方的提示
    pub fn hint(self) -> Option<&'static str> {
        match self {
            ReviewStatus::Rejected => Some("请根据审核意见修改资料后重新提交"),
            ReviewStatus::Reviewing => Some("资料审核中，审核期间仍可修改并保存"),
            _ => None,
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// 项目经验
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectExperience {
    pub id: u32,
    pub name: String,
    /// 项目时间（YYYY-MM-DD）
    pub time: String,
    pub description: String,
    pub proof: AttachmentSet,
}

impl ProjectExperience {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: String::new(),
            time: String::new(),
            description: String::new(),
            proof: AttachmentSet::new(UploadContext::SupplierDocument),
        }
    }
}

/// 项目经验中可编辑的文本字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectField {
    Name,
    Time,
    Description,
}

/// 供应商基础信息中可编辑的文本字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    CompanyName,
    CreditCode,
    ContactPerson,
    ContactPhone,
    ContactAddress,
    EmployeeCount,
}

impl ProfileField {
    pub const ALL: [ProfileField; 6] = [
        ProfileField::CompanyName,
        ProfileField::CreditCode,
        ProfileField::ContactPerson,
        ProfileField::ContactPhone,
        ProfileField::ContactAddress,
        ProfileField::EmployeeCount,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::CompanyName => "公司名称",
            ProfileField::CreditCode => "统一社会信用代码",
            ProfileField::ContactPerson => "联系人",
            ProfileField::ContactPhone => "联系电话",
            ProfileField::ContactAddress => "联系地址",
            ProfileField::EmployeeCount => "员工人数",
        }
    }
}

/// 补充材料
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierDocument {
    Video,
    LeaseContract,
    EmployeeRoster,
}

impl SupplierDocument {
    pub fn label(self) -> &'static str {
        match self {
            SupplierDocument::Video => "公司场地视频",
            SupplierDocument::LeaseContract => "租赁合同",
            SupplierDocument::EmployeeRoster => "员工花名册",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierProfile {
    pub company_name: String,
    pub credit_code: String,
    pub contact_person: String,
    pub contact_phone: String,
    pub contact_address: String,
    pub employee_count: String,
    pub company_video: AttachmentSet,
    pub projects: Vec<ProjectExperience>,
    pub lease_contract: AttachmentSet,
    pub employee_roster: AttachmentSet,
    pub review_status: ReviewStatus,
}

impl Default for SupplierProfile {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            credit_code: String::new(),
            contact_person: String::new(),
            contact_phone: String::new(),
            contact_address: String::new(),
            employee_count: String::new(),
            company_video: AttachmentSet::new(UploadContext::SupplierVideo),
            projects: Vec::new(),
            lease_contract: AttachmentSet::new(UploadContext::SupplierDocument),
            employee_roster: AttachmentSet::new(UploadContext::SupplierDocument),
            review_status: ReviewStatus::NotSubmitted,
        }
    }
}

impl SupplierProfile {
    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::CompanyName => &self.company_name,
            ProfileField::CreditCode => &self.credit_code,
            ProfileField::ContactPerson => &self.contact_person,
            ProfileField::ContactPhone => &self.contact_phone,
            ProfileField::ContactAddress => &self.contact_address,
            ProfileField::EmployeeCount => &self.employee_count,
        }
    }

    pub fn set_field(&mut self, field: ProfileField, value: String) {
        let slot = match field {
            ProfileField::CompanyName => &mut self.company_name,
            ProfileField::CreditCode => &mut self.credit_code,
            ProfileField::ContactPerson => &mut self.contact_person,
            ProfileField::ContactPhone => &mut self.contact_phone,
            ProfileField::ContactAddress => &mut self.contact_address,
            ProfileField::EmployeeCount => &mut self.employee_count,
        };
        *slot = value.trim().to_string();
    }

    pub fn document(&self, doc: SupplierDocument) -> &AttachmentSet {
        match doc {
            SupplierDocument::Video => &self.company_video,
            SupplierDocument::LeaseContract => &self.lease_contract,
            SupplierDocument::EmployeeRoster => &self.employee_roster,
        }
    }

    pub fn document_mut(&mut self, doc: SupplierDocument) -> &mut AttachmentSet {
        match doc {
            SupplierDocument::Video => &mut self.company_video,
            SupplierDocument::LeaseContract => &mut self.lease_contract,
            SupplierDocument::EmployeeRoster => &mut self.employee_roster,
        }
    }

    /// 上传补充材料，错误消息带上材料名称
    pub fn attach(&mut self, doc: SupplierDocument, batch: Vec<Attachment>) -> Result<(), ValidationError> {
        self.document_mut(doc)
            .add_batch(batch)
            .map(|_| ())
            .map_err(|err| prefix_error(err, doc.label()))
    }

    /// 添加项目经验，新ID为现有最大ID加一
    pub fn add_project(&mut self) -> u32 {
        let id = self.projects.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        self.projects.push(ProjectExperience::new(id));
        id
    }

    pub fn remove_project(&mut self, id: u32) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        self.projects.len() != before
    }

    pub fn update_project(&mut self, id: u32, field: ProjectField, value: String) -> bool {
        match self.projects.iter_mut().find(|p| p.id == id) {
            Some(project) => {
                match field {
                    ProjectField::Name => project.name = value,
                    ProjectField::Time => project.time = value,
                    ProjectField::Description => project.description = value,
                }
                true
            }
            None => false,
        }
    }

    pub fn attach_project_proof(&mut self, id: u32, batch: Vec<Attachment>) -> Result<(), ValidationError> {
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ValidationError::NotFound {
                entity: "项目经验",
                id: id.to_string(),
            })?;
        project
            .proof
            .add_batch(batch)
            .map(|_| ())
            .map_err(|err| prefix_error(err, "证明材料"))
    }

    /// 保存前的边界校验
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ProfileField::CompanyName,
            ProfileField::CreditCode,
            ProfileField::ContactPerson,
            ProfileField::ContactPhone,
        ];
        for field in required {
            if self.field(field).trim().is_empty() {
                return Err(ValidationError::MissingField(field.label()));
            }
        }

        if !self.employee_count.is_empty() && self.employee_count.parse::<u32>().is_err() {
            return Err(ValidationError::InvalidField {
                field: ProfileField::EmployeeCount.label(),
                value: self.employee_count.clone(),
            });
        }

        for project in &self.projects {
            if !project.time.is_empty() && crate::clock::parse_date(&project.time).is_none() {
                return Err(ValidationError::InvalidField {
                    field: "项目时间",
                    value: project.time.clone(),
                });
            }
        }
        Ok(())
    }
}

/// 通用的“材料…”消息替换为具体材料名称
fn prefix_error(err: ValidationError, prefix: &str) -> ValidationError {
    match err {
        ValidationError::InvalidAttachment {
            kind,
            file_name,
            message,
        } => {
            let message = match message.strip_prefix("材料") {
                Some(rest) => format!("{}{}", prefix, rest),
                None => message,
            };
            ValidationError::InvalidAttachment {
                kind,
                file_name,
                message,
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attachment::{InvalidKind, MB, MIME_MP4, MIME_PDF};

    fn profile() -> SupplierProfile {
        SupplierProfile {
            company_name: "北京科技有限公司".to_string(),
            credit_code: "91110108MA01ABCDEF".to_string(),
            contact_person: "张三".to_string(),
            contact_phone: "13800138000".to_string(),
            ..SupplierProfile::default()
        }
    }

    #[test]
    fn test_validate_required_fields() {
        assert_eq!(profile().validate(), Ok(()));

        let mut p = profile();
        p.set_field(ProfileField::ContactPerson, "   ".to_string());
        assert_eq!(p.validate(), Err(ValidationError::MissingField("联系人")));
    }

    #[test]
    fn test_validate_formats() {
        // 信用代码只要求填写，不校验格式
        let mut p = profile();
        p.credit_code = "123".to_string();
        assert_eq!(p.validate(), Ok(()));

        let mut p = profile();
        p.employee_count = "五十".to_string();
        assert!(matches!(
            p.validate(),
            Err(ValidationError::InvalidField { field: "员工人数", .. })
        ));

        let mut p = profile();
        let id = p.add_project();
        p.update_project(id, ProjectField::Time, "去年".to_string());
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_project_ids() {
        let mut p = profile();
        assert_eq!(p.add_project(), 1);
        assert_eq!(p.add_project(), 2);
        assert!(p.remove_project(1));
        assert!(!p.remove_project(1));
        assert_eq!(p.add_project(), 3);
        assert!(p.update_project(3, ProjectField::Name, "智能制造系统开发".to_string()));
        assert!(!p.update_project(9, ProjectField::Name, "x".to_string()));
    }

    #[test]
    fn test_video_rules() {
        let mut p = profile();
        let err = p
            .attach(SupplierDocument::Video, vec![Attachment::new("site.mov", MB, "video/quicktime")])
            .unwrap_err();
        assert_eq!(err.to_string(), "公司场地视频只支持MP4格式");

        let err = p
            .attach(SupplierDocument::Video, vec![Attachment::new("site.mp4", 51 * MB, MIME_MP4)])
            .unwrap_err();
        assert_eq!(err.invalid_kind(), Some(InvalidKind::TooLarge));
        assert!(p.company_video.is_empty());

        p.attach(SupplierDocument::Video, vec![Attachment::new("site.mp4", 49 * MB, MIME_MP4)])
            .unwrap();
        assert_eq!(p.company_video.len(), 1);
    }

    #[test]
    fn test_document_error_prefix() {
        let mut p = profile();
        let err = p
            .attach(
                SupplierDocument::LeaseContract,
                vec![Attachment::new("合同.pdf", 6 * MB, MIME_PDF)],
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "租赁合同不能超过5MB");

        let id = p.add_project();
        let err = p
            .attach_project_proof(id, vec![Attachment::new("a.txt", 1, "text/plain")])
            .unwrap_err();
        assert_eq!(err.to_string(), "证明材料只支持PDF、JPEG、PNG或Excel格式");
        assert!(p.attach_project_proof(99, vec![Attachment::new("a.pdf", 1, MIME_PDF)]).is_err());
    }
}
