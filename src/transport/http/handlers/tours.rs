use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::booking::TourFilter;
use crate::domain::error::Error;
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{ApiResponse, AppState};

#[utoipa::path(
    get,
    path = "/api/tours",
    params(
        ("location" = Option<String>, Query, description = "Substring match on location"),
        ("minPrice" = Option<f64>, Query, description = "Inclusive lower price bound"),
        ("maxPrice" = Option<f64>, Query, description = "Inclusive upper price bound"),
        ("duration" = Option<String>, Query, description = "Substring match on duration"),
        ("search" = Option<String>, Query, description = "Free text over name/description/location"),
        ("sort" = Option<String>, Query, description = "price-asc | price-desc | rating")
    ),
    responses((status = 200, description = "Tours matching the filters", body = ApiResponse))
)]
pub async fn list_tours_handler(
    State(state): State<AppState>,
    Query(filter): Query<TourFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let tours = state.tours.list(&filter).await?;
    let count = tours.len();
    Ok(Json(ApiResponse::ok_list(
        serde_json::to_value(tours).unwrap_or_default(),
        count,
    )))
}

#[utoipa::path(
    get,
    path = "/api/tours/{id}",
    params(("id" = i64, Path, description = "Tour id")),
    responses(
        (status = 200, description = "Single tour", body = ApiResponse),
        (status = 404, description = "No such tour", body = ApiResponse)
    )
)]
pub async fn get_tour_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let tour = state.tours.get(id).await?.ok_or(Error::NotFound("Tour"))?;
    Ok(Json(ApiResponse::ok(serde_json::to_value(tour).unwrap_or_default())))
}

#[utoipa::path(
    get,
    path = "/api/destinations",
    responses((status = 200, description = "Unique tour locations", body = ApiResponse))
)]
pub async fn destinations_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let destinations = state.tours.destinations().await?;
    let count = destinations.len();
    Ok(Json(ApiResponse::ok_list(
        serde_json::to_value(destinations).unwrap_or_default(),
        count,
    )))
}
