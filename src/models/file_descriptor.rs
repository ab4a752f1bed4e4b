//! 文件描述模型
//!
//! `FileDescriptor` 由后端在上传时生成，之后不可变

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 后端接受的扩展名（仅作提示，客户端不拦截）
pub const ACCEPTED_EXTENSIONS: &[&str] = &["docx", "pdf", "jpg", "jpeg", "png"];

/// 后端公布的单文件大小上限（MB）
pub const MAX_UPLOAD_SIZE_MB: u64 = 100;

/// 已上传文件的描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// 会话内唯一的文件ID
    pub id: String,
    /// 原始文件名
    pub name: String,
    /// 后端识别出的类型（docx / pdf / image ...）
    #[serde(rename = "type")]
    pub file_type: String,
    /// 文件大小（字节），后端未返回时为 0
    #[serde(default)]
    pub size: u64,
}

impl FileDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        file_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            file_type: file_type.into(),
            size,
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_type(&self.file_type)
    }
}

/// 文件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Docx,
    Pdf,
    Image,
    Unknown,
}

impl FileKind {
    /// 根据后端返回的 `type` 字段分类
    pub fn from_type(file_type: &str) -> Self {
        match file_type.trim().to_ascii_lowercase().as_str() {
            "docx" => FileKind::Docx,
            "pdf" => FileKind::Pdf,
            "image" | "jpg" | "jpeg" | "png" => FileKind::Image,
            _ => FileKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Docx => "docx",
            FileKind::Pdf => "pdf",
            FileKind::Image => "image",
            FileKind::Unknown => "unknown",
        }
    }
}

/// 文件名的扩展名是否在后端接受列表内
pub fn is_accepted_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ACCEPTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// 文件大小是否超过后端公布的上限
pub fn exceeds_upload_limit(size_bytes: u64) -> bool {
    size_bytes > MAX_UPLOAD_SIZE_MB * 1024 * 1024
}

/// 待上传的本地文件
#[derive(Debug, Clone)]
pub struct UploadBlob {
    pub name: String,
    pub content: Vec<u8>,
}

impl UploadBlob {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// 根据文件名推断 MIME 类型
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}
