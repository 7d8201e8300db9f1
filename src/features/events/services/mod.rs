mod archive_service;
mod event_service;

pub use archive_service::{ArchiveService, ArchiveStream};
pub use event_service::EventService;
