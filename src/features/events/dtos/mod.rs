mod event_dto;

pub use event_dto::{CreateEventDto, EventResponseDto, SetCoverDto};
