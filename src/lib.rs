//! # Thesis Export
//!
//! 把多个上传文件（封面、正文、查重报告、附录）按用户指定的顺序和元数据
//! 交给远程编译服务，取回合并后的 PDF 和 JSON 元数据。
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 文件描述、元数据、请求/响应结构、导出任务加载
//!
//! ### ② 传输层（Clients）
//! - `Transport` - 与编译后端交互的抽象（upload / prepare / 获取产物 / health）
//! - `BackendClient` - 基于 reqwest 的实现
//!
//! ### ③ 业务能力层（Services）
//! - `ArtifactWriter` - 把产物写入本地目录
//!
//! ### ④ 流程层（Workflow）
//! - `FileOrder` - 文件集合与顺序，保证顺序始终是文件集合的一个排列
//! - `ExportFlow` - prepare → PDF → JSON 元数据 的线性流程
//!
//! ### ⑤ 编排层（Orchestration）
//! - `ExportOrchestrator` - 唯一的状态所有者，持有单飞锁
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{arrange_by_names, App};
pub use clients::{BackendClient, Transport};
pub use config::Config;
pub use error::{AppError, OrchestratorError, Result, TransportError, ValidationError};
pub use models::{ExportReport, ExportResult, FileDescriptor, Metadata, MetadataField, StudyForm, UploadBlob};
pub use orchestrator::{ExportOrchestrator, OrchestratorPhase};
pub use services::ArtifactWriter;
pub use workflow::{ExportFlow, FileOrder};
