use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ValidationError;

pub const KB: u64 = 1024;
pub const MB: u64 = 1024 * KB;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_XLS: &str = "application/vnd.ms-excel";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";
pub const MIME_MP4: &str = "video/mp4";
pub const MIME_UNKNOWN: &str = "application/octet-stream";

const INVOICE_TYPES: &[&str] = &[MIME_PDF, MIME_JPEG, MIME_PNG];
const DELIVERABLE_TYPES: &[&str] = &[
    MIME_PDF, MIME_DOC, MIME_DOCX, MIME_XLS, MIME_XLSX, MIME_JPEG, MIME_PNG,
];
const VIDEO_TYPES: &[&str] = &[MIME_MP4];
const DOCUMENT_TYPES: &[&str] = &[MIME_PDF, MIME_JPEG, MIME_PNG, MIME_XLS, MIME_XLSX];

/// 附件校验失败的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidKind {
    UnsupportedType,
    TooLarge,
    TooManyFiles,
}

/// 上传场景，每个场景有自己的类型白名单和大小限制
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadContext {
    /// 发票：PDF/JPEG/PNG，5MB，单文件
    Invoice,
    /// 交付成果：PDF/Word/Excel/JPEG/PNG，10MB，最多 5 个
    Deliverable,
    /// 公司场地视频：MP4，50MB
    SupplierVideo,
    /// 供应商补充材料（租赁合同、员工花名册、项目证明）
    SupplierDocument,
}

/// 场景对应的校验规则
#[derive(Debug, Clone, Copy)]
pub struct AttachmentRule {
    pub allowed_mime_types: &'static [&'static str],
    pub max_bytes: u64,
    pub max_count: usize,
    type_message: &'static str,
    size_message: &'static str,
}

impl UploadContext {
    pub fn rule(self) -> AttachmentRule {
        match self {
            UploadContext::Invoice => AttachmentRule {
                allowed_mime_types: INVOICE_TYPES,
                max_bytes: 5 * MB,
                max_count: 1,
                type_message: "只支持PDF、JPEG和PNG格式的文件",
                size_message: "文件大小不能超过5MB",
            },
            UploadContext::Deliverable => AttachmentRule {
                allowed_mime_types: DELIVERABLE_TYPES,
                max_bytes: 10 * MB,
                max_count: 5,
                type_message: "只支持PDF、Word、Excel、JPEG和PNG格式的文件",
                size_message: "文件大小不能超过10MB",
            },
            UploadContext::SupplierVideo => AttachmentRule {
                allowed_mime_types: VIDEO_TYPES,
                max_bytes: 50 * MB,
                max_count: 1,
                type_message: "公司场地视频只支持MP4格式",
                size_message: "公司场地视频不能超过50MB",
            },
            UploadContext::SupplierDocument => AttachmentRule {
                allowed_mime_types: DOCUMENT_TYPES,
                max_bytes: 5 * MB,
                max_count: 1,
                type_message: "材料只支持PDF、JPEG、PNG或Excel格式",
                size_message: "材料不能超过5MB",
            },
        }
    }

    /// 解析 CLI 中的场景名
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "invoice" => Some(UploadContext::Invoice),
            "deliverable" => Some(UploadContext::Deliverable),
            "video" => Some(UploadContext::SupplierVideo),
            "document" | "doc" => Some(UploadContext::SupplierDocument),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UploadContext::Invoice => "发票",
            UploadContext::Deliverable => "交付成果",
            UploadContext::SupplierVideo => "公司场地视频",
            UploadContext::SupplierDocument => "补充材料",
        }
    }

    /// 上传区域下方的格式说明
    pub fn hint(self) -> String {
        let rule = self.rule();
        let formats = match self {
            UploadContext::Invoice => "PDF、JPEG、PNG",
            UploadContext::Deliverable => "PDF、Word、Excel、JPEG、PNG",
            UploadContext::SupplierVideo => "MP4",
            UploadContext::SupplierDocument => "PDF、JPEG、PNG、Excel",
        };
        if rule.max_count > 1 {
            format!(
                "支持{}格式，单文件不超过{}，最多{}个文件",
                formats,
                format_file_size(rule.max_bytes),
                rule.max_count
            )
        } else {
            format!("支持{}格式，文件不超过{}", formats, format_file_size(rule.max_bytes))
        }
    }

    /// 单文件场景：新文件替换旧文件
    pub fn replaces(self) -> bool {
        self.rule().max_count == 1
    }
}

impl AttachmentRule {
    /// 纯校验：先类型后大小，遇到第一个违规即返回
    pub fn check(&self, mime_type: &str, byte_size: u64) -> Result<(), InvalidKind> {
        if !self.allowed_mime_types.contains(&mime_type) {
            return Err(InvalidKind::UnsupportedType);
        }
        if byte_size > self.max_bytes {
            return Err(InvalidKind::TooLarge);
        }
        Ok(())
    }

    pub fn validate(&self, attachment: &Attachment) -> Result<(), ValidationError> {
        self.check(&attachment.mime_type, attachment.byte_size)
            .map_err(|kind| self.error(kind, attachment))
    }

    fn error(&self, kind: InvalidKind, attachment: &Attachment) -> ValidationError {
        let message = match kind {
            InvalidKind::UnsupportedType => self.type_message.to_string(),
            InvalidKind::TooLarge => self.size_message.to_string(),
            InvalidKind::TooManyFiles => format!("最多只能上传{}个文件", self.max_count),
        };
        ValidationError::InvalidAttachment {
            kind,
            file_name: attachment.name.clone(),
            message,
        }
    }
}

/// 用户选择的文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
}

impl Attachment {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, byte_size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            byte_size,
            mime_type: mime_type.into(),
        }
    }

    /// 从磁盘文件读取元数据（不读取内容）
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("不是文件: {}", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            byte_size: metadata.len(),
            mime_type: mime_for_path(path).to_string(),
        })
    }

    pub fn display_size(&self) -> String {
        format_file_size(self.byte_size)
    }
}

/// 根据扩展名推断 MIME 类型
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => MIME_PDF,
        "doc" => MIME_DOC,
        "docx" => MIME_DOCX,
        "xls" => MIME_XLS,
        "xlsx" => MIME_XLSX,
        "jpg" | "jpeg" => MIME_JPEG,
        "png" => MIME_PNG,
        "mp4" => MIME_MP4,
        _ => MIME_UNKNOWN,
    }
}

/// 格式化文件大小
pub fn format_file_size(bytes: u64) -> String {
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}

/// 某个上传场景下已接受的附件列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentSet {
    context: UploadContext,
    files: Vec<Attachment>,
}

impl AttachmentSet {
    pub fn new(context: UploadContext) -> Self {
        Self {
            context,
            files: Vec::new(),
        }
    }

    pub fn context(&self) -> UploadContext {
        self.context
    }

    pub fn files(&self) -> &[Attachment] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// 单文件场景下的当前文件
    pub fn current(&self) -> Option<&Attachment> {
        self.files.first()
    }

    /// 添加一批文件
    ///
    /// 逐个按 类型 → 大小 → 数量 校验，第一个违规的文件使整批作废，
    /// 已有列表保持不变。单文件场景下新文件替换旧文件。
    pub fn add_batch(&mut self, batch: Vec<Attachment>) -> Result<usize, ValidationError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let rule = self.context.rule();
        let existing = if self.context.replaces() { 0 } else { self.files.len() };

        for (idx, file) in batch.iter().enumerate() {
            rule.validate(file)?;
            if existing + idx + 1 > rule.max_count {
                return Err(rule.error(InvalidKind::TooManyFiles, file));
            }
        }

        let added = batch.len();
        if self.context.replaces() {
            self.files = batch;
        } else {
            self.files.extend(batch);
        }
        Ok(added)
    }

    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// 至少有一个文件，且所有文件都满足本场景的规则
    pub fn has_valid(&self) -> bool {
        let rule = self.context.rule();
        !self.files.is_empty()
            && self.files.len() <= rule.max_count
            && self.files.iter().all(|f| rule.validate(f).is_ok())
    }

    pub fn names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.name.clone()).collect()
    }
}
