use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ArtifactStatus, ExportReport, FileDescriptor};
/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅者
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试中可能重复初始化，忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n导出日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header).map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 论文导出");
    info!("🌐 后端地址: {}", config.base_url());
    info!("📁 保存目录: {}", config.download_dir);
    info!("{}", "=".repeat(60));
}

/// 按顺序列出当前文件
pub fn log_file_list(files: &[FileDescriptor]) {
    info!("📋 当前顺序 ({} 个文件):", files.len());
    for (index, file) in files.iter().enumerate() {
        info!(
            "  {}. {} [{}] {}",
            index + 1,
            truncate_text(&file.name, 60),
            file.kind().as_str(),
            format_size(file.size)
        );
    }
}

/// 打印导出结果
pub fn log_export_summary(report: &ExportReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 导出完成: {}", report.export_id);
    info!("{}", "=".repeat(60));
    for artifact in &report.artifacts {
        match &artifact.status {
            ArtifactStatus::Delivered { path, bytes } => {
                info!("✅ {}: {} ({})", artifact.kind.label(), path.display(), format_size(*bytes as u64))
            }
            ArtifactStatus::Failed { reason } => {
                warn!("❌ {}: {} ({})", artifact.kind.label(), artifact.file_name, reason)
            }
        }
    }
    if !report.warnings.is_empty() {
        warn!("⚠️ 警告 ({} 条):", report.warnings.len());
        for warning in &report.warnings {
            warn!("  • {}", warning);
        }
    }
    info!("{}", "=".repeat(60));
}

/// 将导出结果追加到日志文件
pub fn append_export_summary(log_file_path: &str, report: &ExportReport) -> AppResult<()> {
    let mut lines = vec![format!(
        "[{}] 导出 {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        report.export_id
    )];
    for artifact in &report.artifacts {
        let line = match &artifact.status {
            ArtifactStatus::Delivered { path, .. } => format!("  已保存: {}", path.display()),
            ArtifactStatus::Failed { reason } => format!("  失败: {} ({})", artifact.file_name, reason),
        };
        lines.push(line);
    }
    for warning in &report.warnings {
        lines.push(format!("  警告: {}", warning));
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    writeln!(file, "{}", lines.join("\n")).map_err(|e| AppError::file_write_failed(log_file_path, e))?;

    Ok(())
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// 人类可读的文件大小
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let value = bytes as f64;
    if value >= MB {
        format!("{:.1} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{} B", bytes)
    }
}
