//! 供应商信息编辑
use crate::error::ValidationError;
use crate::models::supplier::ProjectExperience;
use crate::models::{Attachment, ProfileField, ProjectField, SupplierDocument, SupplierProfile};
use crate::service::Operation;

use super::{Commit, Submission};

/// 页面上可选中的条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierItem {
    Field(ProfileField),
    Document(SupplierDocument),
    Project(u32),
}

const DOCUMENTS: [SupplierDocument; 3] = [
    SupplierDocument::Video,
    SupplierDocument::LeaseContract,
    SupplierDocument::EmployeeRoster,
];

pub struct SupplierEditor {
    profile: SupplierProfile,
    pub cursor: usize,
    pub submitting: bool,
    pub error: Option<String>,
}

impl SupplierEditor {
    pub fn new(profile: SupplierProfile) -> Self {
        Self {
            profile,
            cursor: 0,
            submitting: false,
            error: None,
        }
    }

    pub fn profile(&self) -> &SupplierProfile {
        &self.profile
    }

    /// 字段 → 补充材料 → 项目经验
    pub fn items(&self) -> Vec<SupplierItem> {
        ProfileField::ALL
            .into_iter()
            .map(SupplierItem::Field)
            .chain(DOCUMENTS.into_iter().map(SupplierItem::Document))
            .chain(self.profile.projects.iter().map(|p| SupplierItem::Project(p.id)))
            .collect()
    }

    pub fn selected_item(&self) -> Option<SupplierItem> {
        self.items().get(self.cursor).copied()
    }

    pub fn select_next(&mut self) {
        self.cursor = super::step(self.cursor, self.items().len(), true);
    }

    pub fn select_prev(&mut self) {
        self.cursor = super::step(self.cursor, self.items().len(), false);
    }

    pub fn project(&self, id: u32) -> Option<&ProjectExperience> {
        self.profile.projects.iter().find(|p| p.id == id)
    }

    pub fn set_field(&mut self, field: ProfileField, value: String) {
        self.profile.set_field(field, value);
    }

    fn record<T>(&mut self, result: Result<T, ValidationError>) -> Result<T, ValidationError> {
        match &result {
            Ok(_) => self.error = None,
            Err(err) => self.error = Some(err.to_string()),
        }
        result
    }

    pub fn attach_document(
        &mut self,
        doc: SupplierDocument,
        batch: Vec<Attachment>,
    ) -> Result<(), ValidationError> {
        let result = self.profile.attach(doc, batch);
        self.record(result)
    }

    pub fn clear_document(&mut self, doc: SupplierDocument) {
        self.profile.document_mut(doc).clear();
    }

    /// 新增项目经验并选中它
    pub fn add_project(&mut self) -> u32 {
        let id = self.profile.add_project();
        self.cursor = self.items().len() - 1;
        id
    }

    pub fn remove_project(&mut self, id: u32) -> bool {
        let removed = self.profile.remove_project(id);
        self.cursor = self.cursor.min(self.items().len() - 1);
        removed
    }

    pub fn update_project(&mut self, id: u32, field: ProjectField, value: String) -> bool {
        self.profile.update_project(id, field, value.trim().to_string())
    }

    /// 项目经验的多行文本表示：`名称=`、`时间=`、`描述=`
    pub fn project_text(&self, id: u32) -> Option<String> {
        self.project(id).map(|p| {
            format!("名称={}\n时间={}\n描述={}", p.name, p.time, p.description)
        })
    }

    pub fn apply_project_text(&mut self, id: u32, text: &str) -> bool {
        if self.project(id).is_none() {
            return false;
        }
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let field = match key.trim() {
                "名称" => ProjectField::Name,
                "时间" => ProjectField::Time,
                "描述" => ProjectField::Description,
                _ => continue,
            };
            self.update_project(id, field, value.to_string());
        }
        true
    }

    pub fn attach_project_proof(
        &mut self,
        id: u32,
        batch: Vec<Attachment>,
    ) -> Result<(), ValidationError> {
        let result = self.profile.attach_project_proof(id, batch);
        self.record(result)
    }

    /// 校验后提交保存
    pub fn save(&mut self) -> Result<Submission, ValidationError> {
        let result = self.profile.validate();
        self.record(result)?;
        self.submitting = true;
        Ok(Submission {
            operation: Operation::SaveSupplierProfile {
                company_name: self.profile.company_name.clone(),
            },
            commit: Commit::SupplierProfile,
        })
    }

    pub fn finish(&mut self) {
        self.submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attachment::{MB, MIME_MP4};
    use crate::seed;

    #[test]
    fn test_items_follow_projects() {
        let mut editor = SupplierEditor::new(seed::supplier_profile());
        assert_eq!(editor.items().len(), 10);
        assert_eq!(editor.selected_item(), Some(SupplierItem::Field(ProfileField::CompanyName)));

        let id = editor.add_project();
        assert_eq!(id, 2);
        assert_eq!(editor.selected_item(), Some(SupplierItem::Project(2)));

        assert!(editor.remove_project(2));
        assert_eq!(editor.selected_item(), Some(SupplierItem::Project(1)));
    }

    #[test]
    fn test_save_requires_fields() {
        let mut editor = SupplierEditor::new(seed::supplier_profile());
        editor.set_field(ProfileField::ContactPerson, "  ".to_string());

        let err = editor.save().unwrap_err();
        assert_eq!(err, ValidationError::MissingField("联系人"));
        assert_eq!(editor.error.as_deref(), Some("联系人为必填项"));
        assert!(!editor.submitting);

        editor.set_field(ProfileField::ContactPerson, "李四".to_string());
        let submission = editor.save().unwrap();
        assert!(editor.submitting);
        assert!(editor.error.is_none());
        assert!(matches!(submission.commit, Commit::SupplierProfile));
    }

    #[test]
    fn test_employee_count_numeric() {
        let mut editor = SupplierEditor::new(seed::supplier_profile());
        editor.set_field(ProfileField::EmployeeCount, "五十".to_string());
        assert!(matches!(editor.save(), Err(ValidationError::InvalidField { .. })));
    }

    #[test]
    fn test_attach_video() {
        let mut editor = SupplierEditor::new(seed::supplier_profile());
        let err = editor
            .attach_document(
                SupplierDocument::Video,
                vec![Attachment::new("site.mp4", 60 * MB, MIME_MP4)],
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "公司场地视频不能超过50MB");
        assert!(editor.profile().company_video.is_empty());

        editor
            .attach_document(
                SupplierDocument::Video,
                vec![Attachment::new("site.mp4", 10 * MB, MIME_MP4)],
            )
            .unwrap();
        assert!(editor.error.is_none());
        editor.clear_document(SupplierDocument::Video);
        assert!(editor.profile().company_video.is_empty());
    }

    #[test]
    fn test_project_text() {
        let mut editor = SupplierEditor::new(seed::supplier_profile());
        let text = editor.project_text(1).unwrap();
        assert!(text.starts_with("名称=智能制造系统开发\n时间=2022-06-15"));

        assert!(editor.apply_project_text(1, "名称=数据平台建设\n时间= 2023-03-01"));
        let project = editor.project(1).unwrap();
        assert_eq!(project.name, "数据平台建设");
        assert_eq!(project.time, "2023-03-01");
        assert_eq!(project.description, "为某大型制造企业开发智能生产管理系统");
        assert!(!editor.apply_project_text(7, "名称=x"));
    }

    #[test]
    fn test_update_project_trims() {
        let mut editor = SupplierEditor::new(seed::supplier_profile());
        assert!(editor.update_project(1, ProjectField::Time, " 2023-01-01 ".to_string()));
        assert_eq!(editor.project(1).unwrap().time, "2023-01-01");
    }
}
