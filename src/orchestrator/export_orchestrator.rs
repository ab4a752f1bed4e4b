//! 导出编排器 - 编排层
//!
//! ## 职责
//!
//! 1. **状态所有者**：唯一持有会话句柄、文件集合、元数据与导出结果
//! 2. **单飞锁**：上传与导出互斥，进行中再次触发直接拒绝
//! 3. **流程调度**：upload → prepare → 获取产物
//! 4. **错误边界**：所有错误在这里转换为类型化结果，状态始终保持一致
//!
//! 状态锁只在同步代码段中持有，绝不跨越 `.await`。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::clients::Transport;
use crate::error::{OrchestratorError, Result, ValidationError};
use crate::models::file_descriptor::{
    exceeds_upload_limit, is_accepted_extension, MAX_UPLOAD_SIZE_MB,
};
use crate::models::{
    ExportReport, ExportResult, FileDescriptor, HealthStatus, Metadata, MetadataField,
    PrepareRequest, UploadBlob,
};
use crate::orchestrator::state::{OrchestratorPhase, SessionState};
use crate::services::ArtifactWriter;
use crate::workflow::ExportFlow;

/// 导出编排器
pub struct ExportOrchestrator {
    state: Mutex<SessionState>,
    busy: AtomicBool,
    transport: Arc<dyn Transport>,
    flow: ExportFlow,
}

/// 单飞锁守卫，离开作用域时释放
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl ExportOrchestrator {
    pub fn new(transport: Arc<dyn Transport>, writer: ArtifactWriter) -> Self {
        Self {
            state: Mutex::new(SessionState::new()),
            busy: AtomicBool::new(false),
            flow: ExportFlow::new(Arc::clone(&transport), writer),
            transport,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self) -> Result<BusyGuard<'_>> {
        BusyGuard::acquire(&self.busy).ok_or_else(|| {
            warn!("⚠️ 已有操作正在进行，拒绝新的请求");
            OrchestratorError::Busy
        })
    }

    // ========== 上传 ==========

    /// 上传文件并开始新的编辑会话
    ///
    /// 失败时原有的会话、文件集合和顺序保持不变
    pub async fn upload(&self, files: Vec<UploadBlob>) -> Result<Vec<FileDescriptor>> {
        let _guard = self.acquire()?;

        if files.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }

        for file in &files {
            if !is_accepted_extension(&file.name) {
                warn!("⚠️ {} 的扩展名可能不被后端接受", file.name);
            }
            if exceeds_upload_limit(file.size()) {
                warn!(
                    "⚠️ {} 超过 {} MB，后端可能拒绝",
                    file.name, MAX_UPLOAD_SIZE_MB
                );
            }
        }

        let (previous_phase, generation) = {
            let mut state = self.lock_state();
            let previous = state.phase;
            state.phase = OrchestratorPhase::Uploading;
            (previous, state.generation)
        };

        info!("📤 正在上传 {} 个文件...", files.len());

        let response = match self.transport.upload(&files).await {
            Ok(response) => response,
            Err(e) => {
                error!("❌ 上传失败: {}", e);
                let mut state = self.lock_state();
                if state.generation == generation {
                    state.phase = previous_phase;
                }
                return Err(e.into());
            }
        };

        let mut state = self.lock_state();
        if state.generation != generation {
            warn!("⚠️ 会话已在上传期间重置，丢弃会话 {}", response.session_id);
            return Err(OrchestratorError::SessionReset);
        }
        state.apply_upload(response.session_id, response.files);
        info!(
            "✓ 上传完成: 会话 {} | {} 个文件",
            state.session_id.as_deref().unwrap_or_default(),
            state.files.len()
        );

        Ok(state.files.ordered())
    }

    // ========== 导出 ==========

    /// 校验本地状态、提交导出请求并获取两个产物
    ///
    /// 提交的是调用时刻的顺序和元数据快照
    pub async fn prepare(&self) -> Result<ExportReport> {
        let _guard = self.acquire()?;

        let (request, generation) = {
            let mut state = self.lock_state();
            let session_id = state
                .session_id
                .clone()
                .ok_or(ValidationError::MissingSession)?;

            let missing = state.metadata.missing_fields();
            if !missing.is_empty() {
                return Err(ValidationError::IncompleteMetadata { missing }.into());
            }

            if state.files.is_empty() {
                warn!("⚠️ 当前没有任何文件，仍然提交导出请求");
            }

            let request = PrepareRequest {
                session_id,
                order: state.files.order().to_vec(),
                metadata: state.metadata.clone(),
            };
            state.phase = OrchestratorPhase::Preparing;
            (request, state.generation)
        };

        let export = match self.flow.submit(&request).await {
            Ok(export) => export,
            Err(e) => {
                error!("❌ 导出失败: {}", e);
                let mut state = self.lock_state();
                if state.generation == generation {
                    let settled = state.settled_phase();
                    state.phase = settled;
                }
                return Err(e.into());
            }
        };

        {
            let mut state = self.lock_state();
            if state.generation != generation {
                warn!("⚠️ 会话已在导出期间重置，丢弃导出 {}", export.export_id);
                return Err(OrchestratorError::SessionReset);
            }
            state.export = Some(export.clone());
            state.phase = OrchestratorPhase::Retrieving;
        }

        let artifacts = self.flow.retrieve_artifacts(&export.export_id).await;
        let extra_warnings: Vec<String> = artifacts
            .iter()
            .filter_map(|a| a.failure_warning())
            .collect();

        let export = ExportResult {
            warnings: export.warnings.into_iter().chain(extra_warnings).collect(),
            ..export
        };

        let mut state = self.lock_state();
        if state.generation == generation {
            // 同一代会话内，export 只会在上面写入
            debug_assert!(state.export.is_some());
            state.export = Some(export.clone());
            state.phase = OrchestratorPhase::Ready;
        } else {
            debug!("会话已在获取产物期间重置，结果不写回状态");
        }

        Ok(ExportReport {
            export_id: export.export_id,
            warnings: export.warnings,
            artifacts,
        })
    }

    /// 回到初始状态，清空会话、文件、元数据和导出结果
    ///
    /// 不等待进行中的请求；其结果返回时会被丢弃
    pub fn reset(&self) {
        self.lock_state().reset();
        info!("🔄 会话已重置");
    }

    /// 检查后端连通性，不占用单飞锁，也不修改会话状态
    pub async fn check_connection(&self) -> Result<HealthStatus> {
        let status = self.transport.health().await?;
        debug!("后端状态: {}", status.status);
        Ok(status)
    }

    // ========== 编辑 ==========

    pub fn move_up(&self, index: usize) {
        self.lock_state().files.move_up(index);
    }

    pub fn move_down(&self, index: usize) {
        self.lock_state().files.move_down(index);
    }

    /// 删除文件；返回被删除的描述，id 不存在时返回 `None`
    pub fn remove_file(&self, id: &str) -> Option<FileDescriptor> {
        self.lock_state().files.remove(id)
    }

    pub fn set_metadata_field(
        &self,
        field: MetadataField,
        value: &str,
    ) -> std::result::Result<(), ValidationError> {
        self.lock_state().metadata.set_field(field, value)
    }

    // ========== 只读快照 ==========

    pub fn phase(&self) -> OrchestratorPhase {
        self.lock_state().phase
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn session_id(&self) -> Option<String> {
        self.lock_state().session_id.clone()
    }

    pub fn ordered_files(&self) -> Vec<FileDescriptor> {
        self.lock_state().files.ordered()
    }

    pub fn order(&self) -> Vec<String> {
        self.lock_state().files.order().to_vec()
    }

    /// Order 是否仍是 Registry 的一个排列
    pub fn is_consistent(&self) -> bool {
        self.lock_state().files.is_consistent()
    }

    pub fn metadata(&self) -> Metadata {
        self.lock_state().metadata.clone()
    }

    pub fn export_result(&self) -> Option<ExportResult> {
        self.lock_state().export.clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.lock_state()
            .export
            .as_ref()
            .map(|e| e.warnings.clone())
            .unwrap_or_default()
    }
}
