//! 导出相关的请求/响应结构与产物描述

use crate::models::file_descriptor::FileDescriptor;
use crate::models::metadata::Metadata;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `POST /api/upload` 响应
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub files: Vec<FileDescriptor>,
}

/// `POST /api/prepare` 请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrepareRequest {
    pub session_id: String,
    pub order: Vec<String>,
    pub metadata: Metadata,
}

/// `POST /api/prepare` 响应
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrepareResponse {
    pub export_id: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub metadata_url: Option<String>,
}

/// `GET /health` 响应
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// 一次成功导出的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub export_id: String,
    pub warnings: Vec<String>,
}

impl From<PrepareResponse> for ExportResult {
    fn from(response: PrepareResponse) -> Self {
        Self {
            export_id: response.export_id,
            warnings: response.warnings,
        }
    }
}

/// 导出产物类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// 编译后的 PDF
    Pdf,
    /// JSON 元数据附件
    Sidecar,
}

impl ArtifactKind {
    /// 按获取顺序排列
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Pdf, ArtifactKind::Sidecar];

    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "pdf",
            ArtifactKind::Sidecar => "json",
        }
    }

    /// 本地保存的文件名：`export_{export_id}.{ext}`
    pub fn file_name(&self, export_id: &str) -> String {
        format!("export_{}.{}", export_id, self.extension())
    }

    /// 后端获取路径，export_id 作为单个路径段编码
    pub fn endpoint(&self, export_id: &str) -> String {
        let id = urlencoding::encode(export_id);
        match self {
            ArtifactKind::Pdf => format!("/api/download/{}", id),
            ArtifactKind::Sidecar => format!("/api/metadata/{}", id),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "PDF",
            ArtifactKind::Sidecar => "JSON 元数据",
        }
    }
}

/// 单个产物的获取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    Delivered { path: PathBuf, bytes: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutcome {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub status: ArtifactStatus,
}

impl ArtifactOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self.status, ArtifactStatus::Delivered { .. })
    }

    /// 获取失败时生成的附加警告
    pub fn failure_warning(&self) -> Option<String> {
        match &self.status {
            ArtifactStatus::Delivered { .. } => None,
            ArtifactStatus::Failed { reason } => Some(format!(
                "{} 文件 {} 获取失败: {}",
                self.kind.label(),
                self.file_name,
                reason
            )),
        }
    }
}

/// `prepare()` 完成后返回给调用方的报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub export_id: String,
    /// 后端警告 + 产物获取失败的附加警告
    pub warnings: Vec<String>,
    pub artifacts: Vec<ArtifactOutcome>,
}

impl ExportReport {
    pub fn all_delivered(&self) -> bool {
        self.artifacts.iter().all(ArtifactOutcome::is_delivered)
    }

    pub fn delivered_paths(&self) -> Vec<&PathBuf> {
        self.artifacts
            .iter()
            .filter_map(|a| match &a.status {
                ArtifactStatus::Delivered { path, .. } => Some(path),
                ArtifactStatus::Failed { .. } => None,
            })
            .collect()
    }
}
