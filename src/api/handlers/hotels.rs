//! Hotel handlers.

use axum::{Json, extract::State};
use diesel_async::scoped_futures::ScopedFutureExt;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HOTEL_TAG;
use crate::api::dto::{
    CreatedResponse, ErrorResponse, HotelAddRequest, HotelListParams, HotelPatchRequest,
    StatusResponse,
};
use crate::error::{AppError, AppResult};
use crate::models::{Hotel, NewHotel, PatchHotel, ReplaceHotel};
use crate::repositories::{Changes, HotelFilter, HotelsRepository};
use crate::state::AppState;
use crate::utils::validate::{PathParams, ValidatedJson, ValidatedQuery};

pub fn hotel_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_hotels, create_hotel))
        .routes(routes!(get_hotel, replace_hotel, patch_hotel, delete_hotel))
}

/// GET /hotels - Search hotels by title and location
#[utoipa::path(
    get,
    path = "/hotels",
    tag = HOTEL_TAG,
    params(HotelListParams),
    responses(
        (status = 200, description = "Matching hotels ordered by id", body = Vec<Hotel>),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
async fn list_hotels(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<HotelListParams>,
) -> AppResult<Json<Vec<Hotel>>> {
    let filter = params.filter();
    let window = params.window();

    let hotels = state
        .db
        .scoped(|conn| {
            async move { HotelsRepository::new(conn).get_page(&filter, window).await }.scope_boxed()
        })
        .await?;
    Ok(Json(hotels))
}

/// GET /hotels/{hotel_id}
#[utoipa::path(
    get,
    path = "/hotels/{hotel_id}",
    tag = HOTEL_TAG,
    params(("hotel_id" = i32, Path, description = "Hotel id")),
    responses(
        (status = 200, description = "The hotel", body = Hotel),
        (status = 404, description = "Hotel not found", body = ErrorResponse)
    )
)]
async fn get_hotel(
    State(state): State<AppState>,
    PathParams(hotel_id): PathParams<i32>,
) -> AppResult<Json<Hotel>> {
    let filter = HotelFilter::new().id(hotel_id);

    state
        .db
        .scoped(|conn| {
            async move { HotelsRepository::new(conn).get_one_or_none(&filter).await }
                .scope_boxed()
        })
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Hotel"))
}

/// POST /hotels
#[utoipa::path(
    post,
    path = "/hotels",
    tag = HOTEL_TAG,
    request_body = HotelAddRequest,
    responses(
        (status = 200, description = "Hotel created", body = CreatedResponse<Hotel>),
        (status = 400, description = "Invalid hotel data", body = ErrorResponse)
    )
)]
async fn create_hotel(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<HotelAddRequest>,
) -> AppResult<Json<CreatedResponse<Hotel>>> {
    let record = NewHotel::from(req);

    let hotel = state
        .db
        .scoped(|conn| async move { HotelsRepository::new(conn).add(record).await }.scope_boxed())
        .await?;

    info!(hotel_id = hotel.id, "Hotel created");
    Ok(Json(CreatedResponse::ok(hotel)))
}

/// PUT /hotels/{hotel_id}
#[utoipa::path(
    put,
    path = "/hotels/{hotel_id}",
    tag = HOTEL_TAG,
    params(("hotel_id" = i32, Path, description = "Hotel id")),
    request_body = HotelAddRequest,
    responses(
        (status = 200, description = "Hotel replaced", body = StatusResponse),
        (status = 404, description = "Hotel not found", body = ErrorResponse)
    )
)]
async fn replace_hotel(
    State(state): State<AppState>,
    PathParams(hotel_id): PathParams<i32>,
    ValidatedJson(req): ValidatedJson<HotelAddRequest>,
) -> AppResult<Json<StatusResponse>> {
    edit_hotel(&state, hotel_id, Changes::Replace(ReplaceHotel::from(req))).await
}

/// PATCH /hotels/{hotel_id}
#[utoipa::path(
    patch,
    path = "/hotels/{hotel_id}",
    tag = HOTEL_TAG,
    params(("hotel_id" = i32, Path, description = "Hotel id")),
    request_body = HotelPatchRequest,
    responses(
        (status = 200, description = "Hotel updated", body = StatusResponse),
        (status = 404, description = "Hotel not found", body = ErrorResponse)
    )
)]
async fn patch_hotel(
    State(state): State<AppState>,
    PathParams(hotel_id): PathParams<i32>,
    ValidatedJson(req): ValidatedJson<HotelPatchRequest>,
) -> AppResult<Json<StatusResponse>> {
    edit_hotel(&state, hotel_id, Changes::Patch(PatchHotel::from(req))).await
}

async fn edit_hotel(
    state: &AppState,
    hotel_id: i32,
    changes: Changes<Hotel>,
) -> AppResult<Json<StatusResponse>> {
    let filter = HotelFilter::new().id(hotel_id);

    let updated = state
        .db
        .scoped(|conn| {
            async move {
                let mut hotels = HotelsRepository::new(conn);
                if hotels.get_one_or_none(&filter).await?.is_none() {
                    return Err(AppError::not_found("Hotel"));
                }
                hotels.edit(changes, &filter).await
            }
            .scope_boxed()
        })
        .await?;

    info!(hotel_id, updated, "Hotel updated");
    Ok(Json(StatusResponse::ok()))
}

/// DELETE /hotels/{hotel_id} - Remove a hotel and its rooms
#[utoipa::path(
    delete,
    path = "/hotels/{hotel_id}",
    tag = HOTEL_TAG,
    params(("hotel_id" = i32, Path, description = "Hotel id")),
    responses(
        (status = 200, description = "Hotel deleted", body = StatusResponse),
        (status = 404, description = "Hotel not found", body = ErrorResponse)
    )
)]
async fn delete_hotel(
    State(state): State<AppState>,
    PathParams(hotel_id): PathParams<i32>,
) -> AppResult<Json<StatusResponse>> {
    let filter = HotelFilter::new().id(hotel_id);

    state
        .db
        .scoped(|conn| {
            async move {
                let mut hotels = HotelsRepository::new(conn);
                if hotels.get_one_or_none(&filter).await?.is_none() {
                    return Err(AppError::not_found("Hotel"));
                }
                hotels.delete(&filter).await
            }
            .scope_boxed()
        })
        .await?;

    info!(hotel_id, "Hotel deleted");
    Ok(Json(StatusResponse::ok()))
}
