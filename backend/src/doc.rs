//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every inbound HTTP path together with the schema
//! wrappers for domain types ([`ErrorSchema`], [`ErrorCodeSchema`],
//! [`NoticeSchema`]) and the session cookie security scheme. The document
//! backs Swagger UI in debug builds and `cargo run --bin openapi-dump`.

use crate::inbound::http::auth::{LoginRequest, LoginResponse, NoticeResponse};
use crate::inbound::http::cities::{
    CityMutationResponse, CityRequest, CityResponse, ListCitiesResponse,
};
use crate::inbound::http::lookup::{DirectoryEntryResponse, DirectoryNamesResponse};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, NoticeLevelSchema, NoticeSchema,
};
use crate::inbound::http::validation::NumberInput;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "City locator API",
        description = "Login-gated management of city records kept in a remote document store."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::cities::list_cities,
        crate::inbound::http::cities::add_city,
        crate::inbound::http::cities::update_city,
        crate::inbound::http::cities::delete_city,
        crate::inbound::http::lookup::list_directory,
        crate::inbound::http::lookup::lookup_city,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        NoticeSchema,
        NoticeLevelSchema,
        NumberInput,
        LoginRequest,
        LoginResponse,
        NoticeResponse,
        CityRequest,
        CityResponse,
        ListCitiesResponse,
        CityMutationResponse,
        DirectoryNamesResponse,
        DirectoryEntryResponse,
    )),
    tags(
        (name = "auth", description = "Admin login and logout"),
        (name = "cities", description = "City records held in the record store"),
        (name = "lookup", description = "Built-in city directory"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
