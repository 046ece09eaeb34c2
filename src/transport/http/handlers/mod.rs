pub mod auth;
pub mod bookings;
pub mod books;
pub mod health;
pub mod lending;
pub mod tours;
pub mod users;
