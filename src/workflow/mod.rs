pub mod export_flow;
pub mod file_order;

pub use export_flow::ExportFlow;
pub use file_order::FileOrder;
