use crate::domain::auth::{PopulatedBorrow, UserProfile};
use crate::domain::lending::LoanView;
use crate::domain::model::{
    Book, BookCategory, Booking, BookingStatus, BorrowRecord, PublicUser, Role, Tour,
    TransactionKind, TransactionStatus,
};
use crate::transport::http::handlers::{auth, bookings, books, health, lending, tours, users};
use crate::transport::http::types::{
    ApiResponse, BookPatch, BookingRequest, ContactRequest, CreateBookRequest, LoanRequest,
    LoginRequest, RegisterRequest,
};
use axum::routing::{get, post};
use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        auth::register_handler,
        auth::login_handler,
        auth::profile_handler,
        users::list_users_handler,
        users::get_user_handler,
        books::list_books_handler,
        books::get_book_handler,
        books::create_book_handler,
        books::update_book_handler,
        books::delete_book_handler,
        lending::borrow_handler,
        lending::return_handler,
        lending::list_transactions_handler,
        lending::user_transactions_handler,
        tours::list_tours_handler,
        tours::get_tour_handler,
        tours::destinations_handler,
        bookings::create_booking_handler,
        bookings::list_bookings_handler,
        bookings::contact_handler
    ),
    components(schemas(
        ApiResponse,
        RegisterRequest,
        LoginRequest,
        CreateBookRequest,
        BookPatch,
        LoanRequest,
        BookingRequest,
        ContactRequest,
        Role,
        PublicUser,
        UserProfile,
        PopulatedBorrow,
        BorrowRecord,
        Book,
        BookCategory,
        TransactionKind,
        TransactionStatus,
        LoanView,
        Tour,
        Booking,
        BookingStatus
    )),
    modifiers(&SecurityAddon)
)]
#[allow(dead_code)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build(),
                ),
            );
        }
    }
}

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/profile", get(auth::profile_handler))
        .route("/api/users", get(users::list_users_handler))
        .route("/api/users/:id", get(users::get_user_handler))
        .route(
            "/api/books",
            get(books::list_books_handler).post(books::create_book_handler),
        )
        .route(
            "/api/books/:id",
            get(books::get_book_handler)
                .put(books::update_book_handler)
                .delete(books::delete_book_handler),
        )
        .route("/api/transactions/borrow", post(lending::borrow_handler))
        .route("/api/transactions/return", post(lending::return_handler))
        .route("/api/transactions", get(lending::list_transactions_handler))
        .route(
            "/api/transactions/user/:user_id",
            get(lending::user_transactions_handler),
        )
        .route("/api/tours", get(tours::list_tours_handler))
        .route("/api/tours/:id", get(tours::get_tour_handler))
        .route("/api/destinations", get(tours::destinations_handler))
        .route(
            "/api/bookings",
            get(bookings::list_bookings_handler).post(bookings::create_booking_handler),
        )
        .route("/api/contact", post(bookings::contact_handler))
        .with_state(app_state)
}
