use crate::clients::{BackendClient, Transport};
use crate::config::Config;
use crate::models::{load_export_job, read_upload_blobs, ExportJob};
use crate::orchestrator::ExportOrchestrator;
use crate::services::ArtifactWriter;
use crate::utils::logging;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: ExportOrchestrator,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(&config);

        let client = BackendClient::new(&config).context("无法创建后端客户端")?;
        let transport: Arc<dyn Transport> = Arc::new(client);
        let writer = ArtifactWriter::new(&config.download_dir);

        Ok(Self::with_transport(config, transport, writer))
    }

    /// 使用自定义传输层创建（测试使用）
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>, writer: ArtifactWriter) -> Self {
        Self {
            config,
            orchestrator: ExportOrchestrator::new(transport, writer),
        }
    }

    pub fn orchestrator(&self) -> &ExportOrchestrator {
        &self.orchestrator
    }

    /// 运行应用主逻辑：加载任务 → 上传 → 整理 → 填写元数据 → 导出
    pub async fn run(&self) -> Result<()> {
        self.check_backend().await;

        info!("\n📁 正在加载导出任务: {}", self.config.job_file);
        let job = load_export_job(Path::new(&self.config.job_file)).await?;

        self.run_job(&job).await
    }

    /// 执行一个已加载的导出任务
    pub async fn run_job(&self, job: &ExportJob) -> Result<()> {
        if let Some(path) = &job.file_path {
            info!("📋 执行导出任务: {}", path);
        }
        let blobs = read_upload_blobs(job).await?;
        self.orchestrator.upload(blobs).await.context("上传失败")?;

        self.apply_exclusions(&job.exclude);
        arrange_by_names(&self.orchestrator, &job.order);
        logging::log_file_list(&self.orchestrator.ordered_files());

        for (field, value) in job.metadata.entries() {
            self.orchestrator
                .set_metadata_field(field, &value)
                .with_context(|| format!("元数据字段 {} 无效", field))?;
        }

        let report = self.orchestrator.prepare().await.context("导出失败")?;

        logging::log_export_summary(&report);
        logging::append_export_summary(&self.config.output_log_file, &report)?;

        if !report.all_delivered() {
            warn!("⚠️ 部分产物未能获取，详见警告");
        }

        Ok(())
    }

    /// 诊断用：检查后端是否可达，失败只记录警告
    async fn check_backend(&self) {
        match self.orchestrator.check_connection().await {
            Ok(status) => info!("✓ 后端连接正常: {}", status.status),
            Err(e) => warn!("⚠️ 后端健康检查失败: {}", e),
        }
    }

    fn apply_exclusions(&self, names: &[String]) {
        for name in names {
            let target = self
                .orchestrator
                .ordered_files()
                .into_iter()
                .find(|f| &f.name == name);
            match target {
                Some(file) => {
                    self.orchestrator.remove_file(&file.id);
                    info!("🗑️ 已移除: {}", name);
                }
                None => warn!("⚠️ 要移除的文件不存在: {}", name),
            }
        }
    }
}

/// 按文件名调整顺序，只使用 `move_up`
///
/// 列出的文件依次排到最前面，未列出的文件保持原有相对顺序。
/// 返回成功定位的文件数量。
pub fn arrange_by_names(orchestrator: &ExportOrchestrator, names: &[String]) -> usize {
    let mut placed = 0;

    for name in names {
        let files = orchestrator.ordered_files();
        let found = files
            .iter()
            .enumerate()
            .skip(placed)
            .find(|(_, f)| &f.name == name)
            .map(|(index, _)| index);

        let Some(mut index) = found else {
            warn!("⚠️ 顺序中的文件不存在: {}", name);
            continue;
        };

        while index > placed {
            orchestrator.move_up(index);
            index -= 1;
        }
        placed += 1;
    }

    placed
}
