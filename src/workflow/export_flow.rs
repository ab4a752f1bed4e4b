//! 导出流程 - 流程层
//!
//! 核心职责：定义"一次导出"的线性流程
//!
//! 流程顺序：
//! 1. prepare → 拿到 export_id 和 warnings（export_id 为空视为失败，不获取产物）
//! 2. 获取 PDF → 写入本地
//! 3. 获取 JSON 元数据 → 写入本地
//!
//! 第 2、3 步互相独立：一步失败不会阻止另一步，也不会回滚已保存的结果

use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::backend_client::PREPARE_ENDPOINT;
use crate::clients::Transport;
use crate::error::{TransportError, TransportResult};
use crate::models::{ArtifactKind, ArtifactOutcome, ArtifactStatus, ExportResult, PrepareRequest};
use crate::services::ArtifactWriter;

/// 导出流程
///
/// - 不持有会话状态
/// - 只依赖传输层和产物写入服务
pub struct ExportFlow {
    transport: Arc<dyn Transport>,
    writer: ArtifactWriter,
}

impl ExportFlow {
    pub fn new(transport: Arc<dyn Transport>, writer: ArtifactWriter) -> Self {
        Self { transport, writer }
    }

    /// 提交导出请求
    pub async fn submit(&self, request: &PrepareRequest) -> TransportResult<ExportResult> {
        info!(
            "📤 提交导出请求: 会话 {} | {} 个文件",
            request.session_id,
            request.order.len()
        );

        let response = self.transport.prepare(request).await?;
        if response.export_id.trim().is_empty() {
            return Err(TransportError::InvalidResponse {
                endpoint: PREPARE_ENDPOINT.to_string(),
                reason: "缺少 export_id".to_string(),
            });
        }
        let result = ExportResult::from(response);

        info!(
            "✓ 导出已生成: {} ({} 条警告)",
            result.export_id,
            result.warnings.len()
        );

        Ok(result)
    }

    /// 依次获取 PDF 与 JSON 元数据
    pub async fn retrieve_artifacts(&self, export_id: &str) -> Vec<ArtifactOutcome> {
        let mut outcomes = Vec::with_capacity(ArtifactKind::ALL.len());
        for kind in ArtifactKind::ALL {
            outcomes.push(self.retrieve(export_id, kind).await);
        }
        outcomes
    }

    async fn retrieve(&self, export_id: &str, kind: ArtifactKind) -> ArtifactOutcome {
        let file_name = kind.file_name(export_id);
        info!("📥 正在获取 {}: {}", kind.label(), file_name);

        let status = match self.transport.fetch_artifact(export_id, kind).await {
            Ok(content) => match self.writer.write(&file_name, &content).await {
                Ok(path) => {
                    info!("✓ 已保存 {}", path.display());
                    ArtifactStatus::Delivered {
                        path,
                        bytes: content.len(),
                    }
                }
                Err(e) => {
                    warn!("⚠️ {} 保存失败: {}", file_name, e);
                    ArtifactStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            },
            Err(e) => {
                warn!("⚠️ {} 获取失败: {}", file_name, e);
                ArtifactStatus::Failed { reason: e.detail() }
            }
        };

        ArtifactOutcome {
            kind,
            file_name,
            status,
        }
    }
}
