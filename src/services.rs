pub mod document_service;
pub use document_service::DocumentService;
pub mod download_service;
pub use download_service::DownloadService;
pub mod export_gate;
pub use export_gate::ExportGate;
pub mod form_store;
pub use form_store::FormStore;
pub mod markup;
pub mod preview_service;
pub use preview_service::PreviewService;
pub mod print_service;
pub use print_service::PrintService;
pub mod raster;
pub mod share_service;
pub use share_service::ShareService;
