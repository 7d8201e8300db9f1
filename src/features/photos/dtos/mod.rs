mod photo_dto;

pub use photo_dto::{CaptionUpdateDto, FavoriteUpdateDto, PhotoResponseDto, UploadPhotosDto};
