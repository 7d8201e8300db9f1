use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::events::{dtos as events_dtos, handlers as events_handlers};
use crate::features::photos::{dtos as photos_dtos, handlers as photos_handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::login,
        // Events
        events_handlers::list_events,
        events_handlers::get_event,
        events_handlers::create_event,
        events_handlers::delete_event,
        events_handlers::update_event_cover,
        events_handlers::download_event_zip,
        events_handlers::download_event_alias,
        // Photos
        photos_handlers::list_photos,
        photos_handlers::list_event_photos,
        photos_handlers::upload_photos,
        photos_handlers::update_photo_caption,
        photos_handlers::update_photo_favorite,
        photos_handlers::remove_photo,
    ),
    components(schemas(
        auth_dtos::LoginRequestDto,
        auth_dtos::LoginResponseDto,
        events_dtos::CreateEventDto,
        events_dtos::SetCoverDto,
        events_dtos::EventResponseDto,
        photos_dtos::PhotoResponseDto,
        photos_dtos::CaptionUpdateDto,
        photos_dtos::FavoriteUpdateDto,
        photos_dtos::UploadPhotosDto,
    )),
    tags(
        (name = "auth", description = "Admin password check"),
        (name = "events", description = "Gallery events and archive downloads"),
        (name = "photos", description = "Photo listings, uploads and admin edits"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Aperture API",
        version = "0.1.0",
        description = "Photo gallery portfolio API",
    )
)]
pub struct ApiDoc;

/// Adds the shared-secret header scheme to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_password",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-admin-password"))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
