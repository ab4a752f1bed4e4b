//! 错误类型
//!
//! - `ValidationError`：本地前置条件不满足，不发起任何网络请求
//! - `TransportError`：后端返回非成功响应或网络失败
//! - `OrchestratorError`：编排层对外暴露的统一错误
//! - `AppError`：命令行驱动层的文件、配置错误

use crate::models::metadata::MetadataField;
use thiserror::Error;

/// 本地校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 上传时没有选择文件
    #[error("未选择任何文件")]
    EmptySelection,
    /// 尚未上传文件（没有会话）
    #[error("请先上传文件")]
    MissingSession,
    /// 必填元数据缺失或无效
    #[error("请填写必填字段: {}", join_fields(.missing))]
    IncompleteMetadata { missing: Vec<MetadataField> },
    /// 年份不是整数
    #[error("年份必须是整数: '{value}'")]
    InvalidYear { value: String },
    /// 培养形式不在枚举范围内
    #[error("未知的培养形式: '{value}'")]
    InvalidForm { value: String },
}

fn join_fields(fields: &[MetadataField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// 传输层错误
#[derive(Debug, Error)]
pub enum TransportError {
    /// 网络请求失败（连接、超时等）
    #[error("请求 {endpoint} 失败: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 后端返回非 2xx 响应
    #[error("{endpoint} 返回错误 (HTTP {status}): {detail}")]
    Status {
        endpoint: String,
        status: u16,
        detail: String,
    },
    /// 响应体无法解析
    #[error("无法解析 {endpoint} 的响应: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// 响应格式正确但内容不可用（如缺少 export_id）
    #[error("{endpoint} 的响应无效: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

impl TransportError {
    /// 后端返回的 HTTP 状态码（如果有）
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Request { source, .. } => source.status().map(|s| s.as_u16()),
            TransportError::Decode { .. } | TransportError::InvalidResponse { .. } => None,
        }
    }

    /// 面向用户的错误描述：优先使用后端的 `detail`
    pub fn detail(&self) -> String {
        match self {
            TransportError::Status { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// 编排层错误
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("校验失败: {0}")]
    Validation(#[from] ValidationError),
    #[error("后端调用失败: {0}")]
    Transport(#[from] TransportError),
    /// 已有上传或导出正在进行
    #[error("已有操作正在进行，请稍候")]
    Busy,
    /// 请求进行期间会话被重置，结果已丢弃
    #[error("会话在请求期间已被重置，导出结果已丢弃")]
    SessionReset,
}

impl OrchestratorError {
    pub fn is_validation(&self) -> bool {
        matches!(self, OrchestratorError::Validation(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, OrchestratorError::Transport(_))
    }
}

/// 驱动层错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error("读取文件失败 ({path}): {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("写入文件失败 ({path}): {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("导出任务无效: {0}")]
    InvalidJob(String),
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::FileRead {
            path: path.into(),
            source,
        }
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::FileWrite {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 编排层结果类型
pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// 传输层结果类型
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// 驱动层结果类型
pub type AppResult<T> = std::result::Result<T, AppError>;
