use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value as JsonValue;

use crate::domain::error::Error;
use crate::domain::model::Book;
use crate::storage::collections;
use crate::transport::http::auth::CurrentUser;
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{
    json_422, ApiResponse, AppState, BookPatch, BookQuery, CreateBookRequest,
};
use crate::transport::http::validate::validate_new_book;

#[utoipa::path(
    get,
    path = "/api/books",
    params(
        ("search" = Option<String>, Query, description = "Substring match over title/author/isbn"),
        ("category" = Option<String>, Query, description = "Exact category filter")
    ),
    responses((status = 200, description = "Books, newest first", body = ApiResponse))
)]
pub async fn list_books_handler(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let records = match &query.search {
        Some(term) => {
            state
                .store
                .search(collections::BOOKS, &["title", "author", "isbn"], term)
                .await?
        }
        None => state.store.read_all(collections::BOOKS).await?,
    };

    let mut books: Vec<Book> = records
        .into_iter()
        .map(|v| state.store.decode(collections::BOOKS, v))
        .collect::<Result<_, _>>()?;

    if let Some(category) = &query.category {
        books.retain(|b| {
            serde_json::to_value(b.category)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .as_deref()
                == Some(category.as_str())
        });
    }
    books.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let count = books.len();
    Ok(Json(ApiResponse::ok_list(
        serde_json::to_value(books).unwrap_or_default(),
        count,
    )))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Single book", body = ApiResponse),
        (status = 404, description = "No such book", body = ApiResponse)
    )
)]
pub async fn get_book_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let mut predicate = serde_json::Map::new();
    predicate.insert("id".to_string(), JsonValue::from(id));
    let book = state
        .store
        .find_one(collections::BOOKS, &predicate)
        .await?
        .ok_or(Error::NotFound("Book"))?;
    Ok(Json(ApiResponse::ok(book)))
}

#[utoipa::path(
    post,
    path = "/api/books",
    request_body = CreateBookRequest,
    security(("bearer_token" = [])),
    responses(
        (status = 201, description = "Book created", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 403, description = "Admin only", body = ApiResponse),
        (status = 409, description = "Duplicate ISBN", body = ApiResponse)
    )
)]
pub async fn create_book_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    request: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return Ok(
                json_422(e, r#"{"title","author","isbn","category","description","quantity"}"#)
                    .into_response(),
            )
        }
    };

    validate_new_book(&request)?;

    let mut predicate = serde_json::Map::new();
    predicate.insert("isbn".to_string(), JsonValue::from(request.isbn.as_str()));
    if state
        .store
        .find_one(collections::BOOKS, &predicate)
        .await?
        .is_some()
    {
        return Err(Error::Conflict("Book with this ISBN already exists".to_string()).into());
    }

    // Like the original model hook: available defaults to quantity.
    let available = request.available.unwrap_or(request.quantity);
    let fields = crate::domain::auth::json_object(serde_json::json!({
        "title": request.title,
        "author": request.author,
        "isbn": request.isbn,
        "category": request.category,
        "description": request.description,
        "quantity": request.quantity,
        "available": available,
    }));
    let book = state.store.create(collections::BOOKS, fields).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(book))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = i64, Path, description = "Book id")),
    request_body = BookPatch,
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Book updated", body = ApiResponse),
        (status = 403, description = "Admin only", body = ApiResponse),
        (status = 404, description = "No such book", body = ApiResponse)
    )
)]
pub async fn update_book_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    request: Result<Json<BookPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let Json(patch) = match request {
        Ok(v) => v,
        Err(e) => return Ok(json_422(e, "a partial book object").into_response()),
    };

    let mut fields = serde_json::Map::new();
    if let Some(v) = patch.title {
        fields.insert("title".to_string(), JsonValue::from(v));
    }
    if let Some(v) = patch.author {
        fields.insert("author".to_string(), JsonValue::from(v));
    }
    if let Some(v) = patch.isbn {
        fields.insert("isbn".to_string(), JsonValue::from(v));
    }
    if let Some(v) = patch.category {
        fields.insert("category".to_string(), serde_json::json!(v));
    }
    if let Some(v) = patch.description {
        fields.insert("description".to_string(), JsonValue::from(v));
    }
    if let Some(v) = patch.quantity {
        fields.insert("quantity".to_string(), JsonValue::from(v));
    }
    if let Some(v) = patch.available {
        fields.insert("available".to_string(), JsonValue::from(v));
    }

    let updated = state
        .store
        .update(collections::BOOKS, id, fields)
        .await?
        .ok_or(Error::NotFound("Book"))?;
    Ok(Json(ApiResponse::ok(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = i64, Path, description = "Book id")),
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Book removed", body = ApiResponse),
        (status = 403, description = "Admin only", body = ApiResponse),
        (status = 404, description = "No such book", body = ApiResponse)
    )
)]
pub async fn delete_book_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    state
        .store
        .delete_one(collections::BOOKS, id)
        .await?
        .ok_or(Error::NotFound("Book"))?;
    Ok(Json(ApiResponse::message("Book deleted successfully")))
}
