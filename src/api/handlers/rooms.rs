//! Room handlers, nested under their hotel.
//!
//! Every lookup and mutation is scoped by both `hotel_id` and `room_id`, so a
//! room addressed through the wrong hotel is reported as missing.

use axum::{Json, extract::State};
use diesel_async::scoped_futures::ScopedFutureExt;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ROOM_TAG;
use crate::api::dto::{
    CreatedResponse, ErrorResponse, PaginationParams, RoomAddRequest, RoomPatchRequest,
    StatusResponse,
};
use crate::error::{AppError, AppResult};
use crate::models::{PatchRoom, ReplaceRoom, Room};
use crate::repositories::{Changes, HotelFilter, HotelsRepository, RoomFilter, RoomsRepository};
use crate::state::AppState;
use crate::utils::validate::{PathParams, ValidatedJson, ValidatedQuery};

pub fn room_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_rooms, create_room))
        .routes(routes!(get_room, replace_room, patch_room, delete_room))
}

fn room_filter(hotel_id: i32, room_id: i32) -> RoomFilter {
    RoomFilter::new().id(room_id).hotel_id(hotel_id)
}

/// GET /hotel/{hotel_id}/rooms - One page of a hotel's rooms
#[utoipa::path(
    get,
    path = "/hotel/{hotel_id}/rooms",
    tag = ROOM_TAG,
    params(
        ("hotel_id" = i32, Path, description = "Hotel id"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Rooms ordered by id", body = Vec<Room>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse)
    )
)]
async fn list_rooms(
    State(state): State<AppState>,
    PathParams(hotel_id): PathParams<i32>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<Vec<Room>>> {
    let filter = RoomFilter::new().hotel_id(hotel_id);
    let window = params.window();

    let rooms = state
        .db
        .scoped(|conn| {
            async move { RoomsRepository::new(conn).get_page(&filter, window).await }.scope_boxed()
        })
        .await?;
    Ok(Json(rooms))
}

/// GET /hotel/{hotel_id}/rooms/{room_id} - A single room
#[utoipa::path(
    get,
    path = "/hotel/{hotel_id}/rooms/{room_id}",
    tag = ROOM_TAG,
    params(
        ("hotel_id" = i32, Path, description = "Hotel id"),
        ("room_id" = i32, Path, description = "Room id")
    ),
    responses(
        (status = 200, description = "The room", body = Room),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
async fn get_room(
    State(state): State<AppState>,
    PathParams((hotel_id, room_id)): PathParams<(i32, i32)>,
) -> AppResult<Json<Room>> {
    let filter = room_filter(hotel_id, room_id);

    state
        .db
        .scoped(|conn| {
            async move { RoomsRepository::new(conn).get_one_or_none(&filter).await }.scope_boxed()
        })
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Room"))
}

/// POST /hotel/{hotel_id}/rooms - Add a room to an existing hotel
#[utoipa::path(
    post,
    path = "/hotel/{hotel_id}/rooms",
    tag = ROOM_TAG,
    params(("hotel_id" = i32, Path, description = "Hotel id")),
    request_body = RoomAddRequest,
    responses(
        (status = 200, description = "Room created", body = CreatedResponse<Room>),
        (status = 400, description = "Invalid room data", body = ErrorResponse),
        (status = 404, description = "Hotel not found", body = ErrorResponse)
    )
)]
async fn create_room(
    State(state): State<AppState>,
    PathParams(hotel_id): PathParams<i32>,
    ValidatedJson(req): ValidatedJson<RoomAddRequest>,
) -> AppResult<Json<CreatedResponse<Room>>> {
    let record = req.into_new_room(hotel_id);
    let hotel = HotelFilter::new().id(hotel_id);

    let room = state
        .db
        .scoped(|conn| {
            async move {
                if HotelsRepository::new(&mut *conn)
                    .get_one_or_none(&hotel)
                    .await?
                    .is_none()
                {
                    return Err(AppError::not_found("Hotel"));
                }
                RoomsRepository::new(conn).add(record).await
            }
            .scope_boxed()
        })
        .await?;

    info!(room_id = room.id, hotel_id, "Room created");
    Ok(Json(CreatedResponse::ok(room)))
}

/// PUT /hotel/{hotel_id}/rooms/{room_id} - Overwrite every room field
#[utoipa::path(
    put,
    path = "/hotel/{hotel_id}/rooms/{room_id}",
    tag = ROOM_TAG,
    params(
        ("hotel_id" = i32, Path, description = "Hotel id"),
        ("room_id" = i32, Path, description = "Room id")
    ),
    request_body = RoomAddRequest,
    responses(
        (status = 200, description = "Room replaced", body = StatusResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
async fn replace_room(
    State(state): State<AppState>,
    PathParams((hotel_id, room_id)): PathParams<(i32, i32)>,
    ValidatedJson(req): ValidatedJson<RoomAddRequest>,
) -> AppResult<Json<StatusResponse>> {
    let changes = Changes::Replace(ReplaceRoom::from(req.into_new_room(hotel_id)));
    edit_room(&state, hotel_id, room_id, changes).await
}

/// PATCH /hotel/{hotel_id}/rooms/{room_id} - Update only the given fields
#[utoipa::path(
    patch,
    path = "/hotel/{hotel_id}/rooms/{room_id}",
    tag = ROOM_TAG,
    params(
        ("hotel_id" = i32, Path, description = "Hotel id"),
        ("room_id" = i32, Path, description = "Room id")
    ),
    request_body = RoomPatchRequest,
    responses(
        (status = 200, description = "Room updated", body = StatusResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
async fn patch_room(
    State(state): State<AppState>,
    PathParams((hotel_id, room_id)): PathParams<(i32, i32)>,
    ValidatedJson(req): ValidatedJson<RoomPatchRequest>,
) -> AppResult<Json<StatusResponse>> {
    let changes = Changes::Patch(PatchRoom::from(req));
    edit_room(&state, hotel_id, room_id, changes).await
}

async fn edit_room(
    state: &AppState,
    hotel_id: i32,
    room_id: i32,
    changes: Changes<Room>,
) -> AppResult<Json<StatusResponse>> {
    let filter = room_filter(hotel_id, room_id);

    let updated = state
        .db
        .scoped(|conn| {
            async move {
                let mut rooms = RoomsRepository::new(conn);
                if rooms.get_one_or_none(&filter).await?.is_none() {
                    return Err(AppError::not_found("Room"));
                }
                rooms.edit(changes, &filter).await
            }
            .scope_boxed()
        })
        .await?;

    info!(room_id, hotel_id, updated, "Room updated");
    Ok(Json(StatusResponse::ok()))
}

/// DELETE /hotel/{hotel_id}/rooms/{room_id} - Remove a room
#[utoipa::path(
    delete,
    path = "/hotel/{hotel_id}/rooms/{room_id}",
    tag = ROOM_TAG,
    params(
        ("hotel_id" = i32, Path, description = "Hotel id"),
        ("room_id" = i32, Path, description = "Room id")
    ),
    responses(
        (status = 200, description = "Room deleted", body = StatusResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
async fn delete_room(
    State(state): State<AppState>,
    PathParams((hotel_id, room_id)): PathParams<(i32, i32)>,
) -> AppResult<Json<StatusResponse>> {
    let filter = room_filter(hotel_id, room_id);

    state
        .db
        .scoped(|conn| {
            async move {
                let mut rooms = RoomsRepository::new(conn);
                if rooms.get_one_or_none(&filter).await?.is_none() {
                    return Err(AppError::not_found("Room"));
                }
                rooms.delete(&filter).await
            }
            .scope_boxed()
        })
        .await?;

    info!(room_id, hotel_id, "Room deleted");
    Ok(Json(StatusResponse::ok()))
}
