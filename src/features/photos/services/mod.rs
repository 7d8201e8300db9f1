mod ingestion_service;
mod photo_service;

pub use ingestion_service::IngestionService;
pub use photo_service::PhotoService;
