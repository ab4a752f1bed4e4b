pub mod export;
pub mod file_descriptor;
pub mod loaders;
pub mod metadata;

pub use export::{
    ArtifactKind, ArtifactOutcome, ArtifactStatus, ExportReport, ExportResult, HealthStatus,
    PrepareRequest, PrepareResponse, UploadResponse,
};
pub use file_descriptor::{FileDescriptor, FileKind, UploadBlob};
pub use loaders::{load_export_job, read_upload_blobs, ExportJob, JobMetadata};
pub use metadata::{Metadata, MetadataField, StudyForm};
