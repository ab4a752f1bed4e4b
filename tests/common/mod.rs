//! 测试用的内存传输层

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thesis_export::error::{TransportError, TransportResult};
use thesis_export::models::{
    ArtifactKind, FileDescriptor, HealthStatus, PrepareRequest, PrepareResponse, UploadBlob,
    UploadResponse,
};
use thesis_export::{ArtifactWriter, ExportOrchestrator, Transport};
use tokio::sync::Notify;

/// 脚本化的响应：成功值或 (HTTP 状态码, detail)
pub type Scripted<T> = Result<T, (u16, String)>;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload(Vec<String>),
    Prepare(PrepareRequest),
    Fetch(String, ArtifactKind),
    Health,
}

/// 让 upload / prepare 停在半路，直到测试放行
#[derive(Default)]
pub struct Gate {
    pub started: Notify,
    pub release: Notify,
}

pub struct FakeTransport {
    upload: Mutex<Scripted<UploadResponse>>,
    prepare: Mutex<Scripted<PrepareResponse>>,
    artifacts: Mutex<HashMap<ArtifactKind, Scripted<Vec<u8>>>>,
    upload_gate: Mutex<Option<Arc<Gate>>>,
    prepare_gate: Mutex<Option<Arc<Gate>>>,
    calls: Mutex<Vec<Call>>,
}

pub fn descriptor(id: &str, name: &str) -> FileDescriptor {
    FileDescriptor::new(id, name, "pdf", 1024)
}

pub fn upload_response(session_id: &str, files: &[(&str, &str)]) -> UploadResponse {
    UploadResponse {
        session_id: session_id.to_string(),
        files: files.iter().map(|(id, name)| descriptor(id, name)).collect(),
    }
}

pub fn prepare_response(export_id: &str, warnings: &[&str]) -> PrepareResponse {
    PrepareResponse {
        export_id: export_id.to_string(),
        warnings: warnings.iter().map(|w| w.to_string()).collect(),
        pdf_url: None,
        metadata_url: None,
    }
}

pub fn blobs(names: &[&str]) -> Vec<UploadBlob> {
    names
        .iter()
        .map(|n| UploadBlob::new(*n, n.as_bytes().to_vec()))
        .collect()
}

fn scripted_error(endpoint: &str, (status, detail): (u16, String)) -> TransportError {
    TransportError::Status {
        endpoint: endpoint.to_string(),
        status,
        detail,
    }
}

impl FakeTransport {
    /// 默认：上传返回 A、B、C；prepare 返回 exp123；两个产物都可获取
    pub fn new() -> Self {
        let mut artifacts = HashMap::new();
        artifacts.insert(ArtifactKind::Pdf, Ok(b"%PDF-1.7".to_vec()));
        artifacts.insert(ArtifactKind::Sidecar, Ok(br#"{"export_id":"exp123"}"#.to_vec()));

        Self {
            upload: Mutex::new(Ok(upload_response(
                "s1",
                &[("A", "titul.pdf"), ("B", "thesis.docx"), ("C", "antiplagiat.pdf")],
            ))),
            prepare: Mutex::new(Ok(prepare_response("exp123", &["low scan resolution"]))),
            artifacts: Mutex::new(artifacts),
            upload_gate: Mutex::new(None),
            prepare_gate: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_upload(&self, result: Scripted<UploadResponse>) {
        *self.upload.lock().unwrap() = result;
    }

    pub fn set_prepare(&self, result: Scripted<PrepareResponse>) {
        *self.prepare.lock().unwrap() = result;
    }

    pub fn set_artifact(&self, kind: ArtifactKind, result: Scripted<Vec<u8>>) {
        self.artifacts.lock().unwrap().insert(kind, result);
    }

    pub fn gate_upload(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.upload_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn gate_prepare(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.prepare_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn network_calls(&self) -> usize {
        self.calls().iter().filter(|c| **c != Call::Health).count()
    }

    pub fn prepare_calls(&self) -> Vec<PrepareRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Prepare(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn fetch_calls(&self) -> Vec<(String, ArtifactKind)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Fetch(id, kind) => Some((id, kind)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn upload(&self, files: &[UploadBlob]) -> TransportResult<UploadResponse> {
        self.record(Call::Upload(files.iter().map(|f| f.name.clone()).collect()));
        let gate = self.upload_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        let scripted = self.upload.lock().unwrap().clone();
        scripted.map_err(|e| scripted_error("/api/upload", e))
    }

    async fn prepare(&self, request: &PrepareRequest) -> TransportResult<PrepareResponse> {
        self.record(Call::Prepare(request.clone()));
        let gate = self.prepare_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        let scripted = self.prepare.lock().unwrap().clone();
        scripted.map_err(|e| scripted_error("/api/prepare", e))
    }

    async fn fetch_artifact(&self, export_id: &str, kind: ArtifactKind) -> TransportResult<Vec<u8>> {
        self.record(Call::Fetch(export_id.to_string(), kind));
        let scripted = self
            .artifacts
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Err((404, "Export not found".to_string())));
        scripted.map_err(|e| scripted_error(&kind.endpoint(export_id), e))
    }

    async fn health(&self) -> TransportResult<HealthStatus> {
        self.record(Call::Health);
        Ok(HealthStatus {
            status: "healthy".to_string(),
            service: Some("vkr-export-api".to_string()),
            version: None,
        })
    }
}

/// 创建编排器，产物写入临时目录
pub fn orchestrator_with(
    transport: &Arc<FakeTransport>,
    output_dir: &std::path::Path,
) -> ExportOrchestrator {
    let transport: Arc<dyn Transport> = Arc::clone(transport) as Arc<dyn Transport>;
    ExportOrchestrator::new(transport, ArtifactWriter::new(output_dir))
}
