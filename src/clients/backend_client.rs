/// 编译后端 HTTP 客户端
///
/// 基于 reqwest 实现 `Transport`
use crate::clients::transport::Transport;
use crate::config::Config;
use crate::error::{TransportError, TransportResult};
use crate::models::{
    ArtifactKind, HealthStatus, PrepareRequest, PrepareResponse, UploadBlob, UploadResponse,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const UPLOAD_ENDPOINT: &str = "/api/upload";
pub(crate) const PREPARE_ENDPOINT: &str = "/api/prepare";
const HEALTH_ENDPOINT: &str = "/health";

/// 上传文件时的表单字段名
const UPLOAD_FIELD: &str = "files";

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// 根据配置创建客户端
    pub fn new(config: &Config) -> TransportResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| request_failed(config.base_url(), e))?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// 发送请求并返回响应体；非 2xx 响应转换为 `TransportError::Status`
    async fn execute(&self, endpoint: &str, request: RequestBuilder) -> TransportResult<Vec<u8>> {
        debug!("请求后端: {}", endpoint);

        let response = request
            .send()
            .await
            .map_err(|e| request_failed(endpoint, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| request_failed(endpoint, e))?;

        if !status.is_success() {
            let detail = error_detail(status, &body);
            warn!("后端返回错误 {} (HTTP {}): {}", endpoint, status.as_u16(), detail);
            return Err(TransportError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                detail,
            });
        }

        debug!("{} 响应 {} 字节", endpoint, body.len());
        Ok(body.to_vec())
    }
}

#[async_trait]
impl Transport for BackendClient {
    async fn upload(&self, files: &[UploadBlob]) -> TransportResult<UploadResponse> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.content.clone())
                .file_name(file.name.clone())
                .mime_str(&file.mime_type())
                .map_err(|e| request_failed(UPLOAD_ENDPOINT, e))?;
            form = form.part(UPLOAD_FIELD, part);
        }

        let request = self.http.post(self.url(UPLOAD_ENDPOINT)).multipart(form);
        let body = self.execute(UPLOAD_ENDPOINT, request).await?;
        decode(UPLOAD_ENDPOINT, &body)
    }

    async fn prepare(&self, request: &PrepareRequest) -> TransportResult<PrepareResponse> {
        let builder = self.http.post(self.url(PREPARE_ENDPOINT)).json(request);
        let body = self.execute(PREPARE_ENDPOINT, builder).await?;
        decode(PREPARE_ENDPOINT, &body)
    }

    async fn fetch_artifact(&self, export_id: &str, kind: ArtifactKind) -> TransportResult<Vec<u8>> {
        let endpoint = kind.endpoint(export_id);
        let request = self.http.get(self.url(&endpoint));
        self.execute(&endpoint, request).await
    }

    async fn health(&self) -> TransportResult<HealthStatus> {
        let request = self.http.get(self.url(HEALTH_ENDPOINT));
        let body = self.execute(HEALTH_ENDPOINT, request).await?;
        decode(HEALTH_ENDPOINT, &body)
    }
}

// ========== 辅助函数 ==========

fn request_failed(endpoint: &str, source: reqwest::Error) -> TransportError {
    TransportError::Request {
        endpoint: endpoint.to_string(),
        source,
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> TransportResult<T> {
    serde_json::from_slice(body).map_err(|e| TransportError::Decode {
        endpoint: endpoint.to_string(),
        source: e,
    })
}

/// 提取错误响应中的 `detail`，没有时退回到状态码描述
fn error_detail(status: StatusCode, body: &[u8]) -> String {
    let detail = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());

    match detail {
        Some(Value::String(text)) if !text.is_empty() => text,
        Some(Value::Null) | Some(Value::String(_)) | None => format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        ),
        Some(other) => other.to_string(),
    }
}
