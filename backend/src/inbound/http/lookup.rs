//! Public lookup over the built-in city directory.
//!
//! ```text
//! GET /api/v1/lookup          -> {"names":["Lagos", ...]}
//! GET /api/v1/lookup/{name}   -> {"name":"Lagos","country":"Nigeria",...}
//! ```

use actix_web::{get, web};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{DirectoryEntry, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Names known to the directory, in table order.
#[derive(Debug, Serialize, ToSchema)]
pub struct DirectoryNamesResponse {
    pub names: Vec<String>,
}

/// One directory entry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntryResponse {
    #[schema(example = "Lagos")]
    pub name: String,
    pub country: String,
    pub continent: String,
    pub lat: f64,
    pub lon: f64,
    #[schema(example = "Lagos (Nigeria)")]
    pub label: String,
}

impl From<&DirectoryEntry> for DirectoryEntryResponse {
    fn from(entry: &DirectoryEntry) -> Self {
        Self {
            name: entry.name.to_owned(),
            country: entry.country.to_owned(),
            continent: entry.continent.to_owned(),
            lat: entry.lat,
            lon: entry.lon,
            label: format!("{} ({})", entry.name, entry.country),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/lookup",
    responses((status = 200, description = "Directory names", body = DirectoryNamesResponse)),
    tags = ["lookup"],
    operation_id = "listDirectory",
    security([])
)]
#[get("/lookup")]
pub async fn list_directory(state: web::Data<HttpState>) -> web::Json<DirectoryNamesResponse> {
    web::Json(DirectoryNamesResponse {
        names: state.directory.names().into_iter().map(str::to_owned).collect(),
    })
}

/// Look a city up by name, ignoring case and surrounding whitespace.
#[utoipa::path(
    get,
    path = "/api/v1/lookup/{name}",
    params(("name" = String, Path, description = "City name")),
    responses(
        (status = 200, description = "Directory entry", body = DirectoryEntryResponse),
        (status = 404, description = "Unknown city", body = ErrorSchema)
    ),
    tags = ["lookup"],
    operation_id = "lookupCity",
    security([])
)]
#[get("/lookup/{name}")]
pub async fn lookup_city(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DirectoryEntryResponse>> {
    let name = path.into_inner();
    let entry = state.directory.lookup(&name).ok_or_else(|| {
        Error::not_found(format!("no city named {}", name.trim()))
            .with_details(json!({ "name": name, "code": "unknown_city" }))
    })?;
    Ok(web::Json(entry.into()))
}
