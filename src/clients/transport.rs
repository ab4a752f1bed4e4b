//! 传输层抽象
//!
//! 只描述与编译后端交互的四个操作，不包含任何业务逻辑

use crate::error::TransportResult;
use crate::models::{
    ArtifactKind, HealthStatus, PrepareRequest, PrepareResponse, UploadBlob, UploadResponse,
};
use async_trait::async_trait;

#[async_trait]
pub trait Transport: Send + Sync {
    /// `POST /api/upload`
    async fn upload(&self, files: &[UploadBlob]) -> TransportResult<UploadResponse>;

    /// `POST /api/prepare`
    async fn prepare(&self, request: &PrepareRequest) -> TransportResult<PrepareResponse>;

    /// `GET /api/download/{id}` 或 `GET /api/metadata/{id}`
    async fn fetch_artifact(&self, export_id: &str, kind: ArtifactKind) -> TransportResult<Vec<u8>>;

    /// `GET /health`
    async fn health(&self) -> TransportResult<HealthStatus>;
}
