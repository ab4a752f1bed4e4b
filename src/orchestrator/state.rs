//! 编排器状态
//!
//! 会话句柄、文件集合、元数据和导出结果集中在一个 `SessionState` 中，
//! 只由 `ExportOrchestrator` 修改

use crate::models::{ExportResult, FileDescriptor, Metadata};
use crate::workflow::FileOrder;
use std::fmt;

/// 编排器所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorPhase {
    /// 没有会话
    Idle,
    /// 上传请求进行中
    Uploading,
    /// 已有会话，可编辑、可导出
    Ready,
    /// prepare 请求进行中
    Preparing,
    /// 正在获取产物
    Retrieving,
}

impl fmt::Display for OrchestratorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrchestratorPhase::Idle => "idle",
            OrchestratorPhase::Uploading => "uploading",
            OrchestratorPhase::Ready => "ready",
            OrchestratorPhase::Preparing => "preparing",
            OrchestratorPhase::Retrieving => "retrieving",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) phase: OrchestratorPhase,
    pub(crate) session_id: Option<String>,
    pub(crate) files: FileOrder,
    pub(crate) metadata: Metadata,
    pub(crate) export: Option<ExportResult>,
    /// 每次上传或重置都会递增，用于识别过期的请求结果
    pub(crate) generation: u64,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self {
            phase: OrchestratorPhase::Idle,
            session_id: None,
            files: FileOrder::new(),
            metadata: Metadata::default(),
            export: None,
            generation: 0,
        }
    }

    /// 上传成功：开始一个全新的编辑会话（元数据保留）
    pub(crate) fn apply_upload(&mut self, session_id: String, descriptors: Vec<FileDescriptor>) {
        self.session_id = Some(session_id);
        self.files.apply_upload(descriptors);
        self.export = None;
        self.generation += 1;
        self.phase = OrchestratorPhase::Ready;
    }

    pub(crate) fn reset(&mut self) {
        self.session_id = None;
        self.files.clear();
        self.metadata = Metadata::default();
        self.export = None;
        self.generation += 1;
        self.phase = OrchestratorPhase::Idle;
    }

    /// 请求失败后的回落阶段
    pub(crate) fn settled_phase(&self) -> OrchestratorPhase {
        if self.session_id.is_some() {
            OrchestratorPhase::Ready
        } else {
            OrchestratorPhase::Idle
        }
    }
}
