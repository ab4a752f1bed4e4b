use crate::error::{AppError, AppResult};
use crate::models::file_descriptor::UploadBlob;
use crate::models::metadata::MetadataField;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 导出任务（TOML）
///
/// ```toml
/// files = ["titul.pdf", "thesis.docx", "antiplagiat.pdf"]
/// order = ["titul.pdf", "thesis.docx"]
/// exclude = []
///
/// [metadata]
/// title = "..."
/// author = "..."
/// year = 2025
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ExportJob {
    /// 待上传的本地文件，相对路径按任务文件所在目录解析
    pub files: Vec<PathBuf>,
    /// 期望顺序（按文件名），未列出的文件保持相对顺序排在后面
    #[serde(default)]
    pub order: Vec<String>,
    /// 上传后移除的文件（按文件名）
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub metadata: JobMetadata,
    /// 任务文件自身的路径，加载时填入
    #[serde(skip)]
    pub file_path: Option<String>,
}

/// 任务中的元数据，所有字段都通过 `Metadata::set_field` 写入
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub supervisor: Option<String>,
    pub year: Option<i64>,
    pub faculty: Option<String>,
    pub form: Option<String>,
}

impl JobMetadata {
    /// 已填写的字段及其文本值
    pub fn entries(&self) -> Vec<(MetadataField, String)> {
        let mut entries = Vec::new();
        let text_fields = [
            (MetadataField::Title, &self.title),
            (MetadataField::Author, &self.author),
            (MetadataField::Supervisor, &self.supervisor),
            (MetadataField::Faculty, &self.faculty),
            (MetadataField::Form, &self.form),
        ];
        for (field, value) in text_fields {
            if let Some(value) = value {
                entries.push((field, value.clone()));
            }
        }
        if let Some(year) = self.year {
            entries.push((MetadataField::Year, year.to_string()));
        }
        entries
    }
}

/// 从 TOML 文件加载导出任务
pub async fn load_export_job(job_file_path: &Path) -> AppResult<ExportJob> {
    let path_display = job_file_path.display().to_string();

    let content = fs::read_to_string(job_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_display, e))?;

    let mut job: ExportJob = toml::from_str(&content).map_err(|e| AppError::TomlParse {
        path: path_display.clone(),
        source: e,
    })?;

    // 相对路径以任务文件目录为基准
    if let Some(base_dir) = job_file_path.parent() {
        job.files = job
            .files
            .into_iter()
            .map(|p| if p.is_relative() { base_dir.join(p) } else { p })
            .collect();
    }
    job.file_path = Some(path_display);

    tracing::info!("已加载导出任务: {} 个文件", job.files.len());

    Ok(job)
}

/// 读取任务中的所有文件内容
pub async fn read_upload_blobs(job: &ExportJob) -> AppResult<Vec<UploadBlob>> {
    let mut blobs = Vec::with_capacity(job.files.len());

    for path in &job.files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AppError::InvalidJob(format!("无效的文件路径: {}", path.display())))?;

        let content = fs::read(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        tracing::debug!("读取文件 {} ({} 字节)", name, content.len());
        blobs.push(UploadBlob::new(name, content));
    }

    Ok(blobs)
}
