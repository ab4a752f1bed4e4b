//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `state` - 会话状态
//! - 会话句柄、文件集合、元数据、导出结果集中在一个结构体中
//! - 阶段：Idle → Uploading → Ready → Preparing → Retrieving → Ready
//!
//! ### `export_orchestrator` - 导出编排器
//! - 唯一的状态所有者
//! - 上传与导出共用一个单飞锁
//! - 把 prepare 与两次产物获取串成线性流程
//!
//! ## 层次关系
//!
//! ```text
//! app (执行导出任务)
//!     ↓
//! orchestrator::ExportOrchestrator (状态机 + 单飞锁)
//!     ↓
//! workflow (FileOrder / ExportFlow)
//!     ↓
//! services (ArtifactWriter)   clients (Transport)
//! ```

pub mod export_orchestrator;
pub mod state;

pub use export_orchestrator::ExportOrchestrator;
pub use state::OrchestratorPhase;
