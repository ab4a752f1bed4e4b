pub mod toml_loader;

pub use toml_loader::{load_export_job, read_upload_blobs, ExportJob, JobMetadata};
