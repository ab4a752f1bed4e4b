//! 产物写入服务 - 业务能力层
//!
//! 只负责"把产物保存到本地目录"能力，不关心流程

use crate::error::{AppError, AppResult};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// 产物写入服务
///
/// 职责：
/// - 将获取到的产物保存到输出目录
/// - 只接受单级文件名，拒绝路径穿越
/// - 同名文件直接覆盖
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 写入产物
    ///
    /// # 参数
    /// - `file_name`: 文件名（如 `export_{id}.pdf`）
    /// - `content`: 文件内容
    ///
    /// # 返回
    /// 返回保存后的完整路径
    pub async fn write(&self, file_name: &str, content: &[u8]) -> AppResult<PathBuf> {
        if !is_plain_file_name(file_name) {
            return Err(AppError::file_write_failed(
                file_name,
                io::Error::new(io::ErrorKind::InvalidInput, "文件名不能包含路径"),
            ));
        }

        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| AppError::file_write_failed(self.output_dir.display().to_string(), e))?;

        let path = self.output_dir.join(file_name);
        fs::write(&path, content)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

        debug!("已保存 {} ({} 字节)", path.display(), content.len());

        Ok(path)
    }
}

fn is_plain_file_name(file_name: &str) -> bool {
    let mut components = Path::new(file_name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
