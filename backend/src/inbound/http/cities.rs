//! City record handlers.
//!
//! ```text
//! GET    /api/v1/cities
//! POST   /api/v1/cities       {"city":"Lagos","country":"Nigeria","continent":"Africa","lat":6.52,"lon":"3.37"}
//! PUT    /api/v1/cities/{id}
//! DELETE /api/v1/cities/{id}
//! ```
//!
//! Every route requires a logged-in admin. Listing never fails outright: a
//! store outage yields an empty list plus an error notice.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CityFields, CityRecord, Error, Notice};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::NoticeResponse;
use crate::inbound::http::schemas::{ErrorSchema, NoticeSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, NumberInput, city_validation_error, parse_city_id, parse_number, require,
};

const PRIVATE_NO_CACHE: (&str, &str) = ("Cache-Control", "private, no-cache, must-revalidate");

const CITY: FieldName = FieldName::new("city");
const COUNTRY: FieldName = FieldName::new("country");
const CONTINENT: FieldName = FieldName::new("continent");
const LAT: FieldName = FieldName::new("lat");
const LON: FieldName = FieldName::new("lon");

/// Request body for creating or updating a record.
///
/// Coordinates may be sent as numbers or numeric strings.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityRequest {
    #[schema(example = "Lagos")]
    pub city: Option<String>,
    #[schema(example = "Nigeria")]
    pub country: Option<String>,
    #[schema(example = "Africa")]
    pub continent: Option<String>,
    pub lat: Option<NumberInput>,
    pub lon: Option<NumberInput>,
}

impl TryFrom<CityRequest> for CityFields {
    type Error = Error;

    fn try_from(value: CityRequest) -> Result<Self, Self::Error> {
        let city = require(value.city, CITY)?;
        let country = require(value.country, COUNTRY)?;
        let continent = require(value.continent, CONTINENT)?;
        let lat = parse_number(require(value.lat, LAT)?, LAT)?;
        let lon = parse_number(require(value.lon, LON)?, LON)?;
        CityFields::try_from_parts(&city, &country, &continent, lat, lon)
            .map_err(city_validation_error)
    }
}

/// A stored record as returned to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityResponse {
    pub id: String,
    pub city: String,
    pub country: String,
    pub continent: String,
    pub lat: f64,
    pub lon: f64,
    /// Creation time in seconds since the Unix epoch.
    pub timestamp: i64,
    /// Selection label, `"{city} ({country})"`.
    #[schema(example = "Lagos (Nigeria)")]
    pub label: String,
}

impl From<CityRecord> for CityResponse {
    fn from(record: CityRecord) -> Self {
        let label = record.fields.label();
        Self {
            id: record.id.to_string(),
            city: record.fields.city().to_owned(),
            country: record.fields.country().to_owned(),
            continent: record.fields.continent().to_owned(),
            lat: record.fields.lat(),
            lon: record.fields.lon(),
            timestamp: record.timestamp,
            label,
        }
    }
}

/// Body for `GET /api/v1/cities`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListCitiesResponse {
    pub cities: Vec<CityResponse>,
    /// Present when the store could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<NoticeSchema>)]
    pub notice: Option<Notice>,
}

/// Body returned after a create or update.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityMutationResponse {
    pub city: CityResponse,
    #[schema(value_type = NoticeSchema)]
    pub notice: Notice,
}

/// List every stored record.
#[utoipa::path(
    get,
    path = "/api/v1/cities",
    responses(
        (status = 200, description = "Stored records, or an empty list with an error notice", body = ListCitiesResponse),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["cities"],
    operation_id = "listCities",
    security(("SessionCookie" = []))
)]
#[get("/cities")]
pub async fn list_cities(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let admin = session.require_admin()?;
    let listing = state.cities_query.list(admin.session_id()).await;
    Ok(HttpResponse::Ok()
        .insert_header(PRIVATE_NO_CACHE)
        .json(ListCitiesResponse {
            cities: listing.records.into_iter().map(CityResponse::from).collect(),
            notice: listing.notice,
        }))
}

/// Create a record. The store assigns the id.
#[utoipa::path(
    post,
    path = "/api/v1/cities",
    request_body = CityRequest,
    responses(
        (status = 201, description = "Record created", body = CityMutationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["cities"],
    operation_id = "addCity",
    security(("SessionCookie" = []))
)]
#[post("/cities")]
pub async fn add_city(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CityRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let fields = CityFields::try_from(payload.into_inner())?;
    let record = state.cities_command.add(fields).await?;
    let notice = Notice::success(format!("Successfully added {}!", record.fields.city()));
    Ok(HttpResponse::Created().json(CityMutationResponse {
        city: record.into(),
        notice,
    }))
}

/// Replace the mutable fields of a record.
#[utoipa::path(
    put,
    path = "/api/v1/cities/{id}",
    params(("id" = String, Path, description = "Record identifier")),
    request_body = CityRequest,
    responses(
        (status = 200, description = "Record updated", body = CityMutationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such record", body = ErrorSchema),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["cities"],
    operation_id = "updateCity",
    security(("SessionCookie" = []))
)]
#[put("/cities/{id}")]
pub async fn update_city(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CityRequest>,
) -> ApiResult<web::Json<CityMutationResponse>> {
    session.require_admin()?;
    let id = parse_city_id(path.into_inner())?;
    let fields = CityFields::try_from(payload.into_inner())?;
    let record = state.cities_command.update(&id, fields).await?;
    let notice = Notice::success(format!("Successfully updated {}!", record.fields.city()));
    Ok(web::Json(CityMutationResponse {
        city: record.into(),
        notice,
    }))
}

/// Remove a record.
#[utoipa::path(
    delete,
    path = "/api/v1/cities/{id}",
    params(("id" = String, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Record deleted", body = NoticeResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such record", body = ErrorSchema),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["cities"],
    operation_id = "deleteCity",
    security(("SessionCookie" = []))
)]
#[delete("/cities/{id}")]
pub async fn delete_city(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<NoticeResponse>> {
    session.require_admin()?;
    let id = parse_city_id(path.into_inner())?;
    state.cities_command.delete(&id).await?;
    Ok(web::Json(NoticeResponse {
        notice: Notice::warning("City record deleted."),
    }))
}
